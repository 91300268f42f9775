/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A pedantic gzip (RFC 1952) decompressor.
//!
//! This crate decompresses gzip files into their original bytes, handling
//! all three DEFLATE block modes (stored, fixed Huffman and dynamic Huffman)
//! and multi-member files.
//!
//! Use it if
//! - You want a small, 100% safe, pure rust gzip decoder
//! - You want strict RFC 1951/1952 conformance with precise error reporting
//!
//! # Usage
//!
//! Decoding gzip data into a `Vec<u8>`
//!
//! ```no_run
//! use ungzip_inflate::GzipDecoder;
//! let totally_valid_data = [0; 23];
//! let mut decoder = GzipDecoder::new(&totally_valid_data);
//!
//! let decompressed = decoder.decode_gzip();
//! ```
//!
//! Decoding gzip data into an arbitrary sink without confirming the trailer
//! checksum
//!
//! ```no_run
//! use ungzip_inflate::{GzipDecoder, GzipOptions};
//! let totally_valid_data = [0; 23];
//! let options = GzipOptions::default()
//!                     .set_confirm_checksum(false);
//! let mut sink = Vec::new();
//! let mut decoder = GzipDecoder::new_with_options(&totally_valid_data, options);
//!
//! let bytes_written = decoder.decode_into(&mut sink);
//! ```
pub use crate::decoder::{GzipDecoder, GzipOptions};

mod bitstream;
mod constants;
mod crc32;
mod decoder;
pub mod errors;
mod huffman;
mod window;
