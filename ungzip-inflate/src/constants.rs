/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

/// Number of symbols in the code-length (precode) alphabet
pub const DEFLATE_NUM_PRECODE_SYMS: usize = 19;

/// Number of symbols in the literal/length alphabet.  Note: this is the
/// maximum value; a dynamic block may declare fewer symbols.
pub const DEFLATE_NUM_LITLEN_SYMS: usize = 288;

/// Number of symbols in the distance alphabet, maximum as above
pub const DEFLATE_NUM_OFFSET_SYMS: usize = 32;

/// Maximum codeword length for the literal/length and distance codes
pub const DEFLATE_MAX_CODEWORD_LENGTH: u8 = 15;

/// Maximum codeword length for the precode
pub const DEFLATE_MAX_PRE_CODEWORD_LENGTH: u8 = 7;

/// Order in which precode lengths are stored
pub static DEFLATE_PRECODE_LENS_PERMUTATION: [u8; DEFLATE_NUM_PRECODE_SYMS] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15,
];

/// The literal/length symbol ending a block
pub const DEFLATE_END_OF_BLOCK: u16 = 256;

/// Base match length for length codes 257..=285
pub static DEFLATE_LENGTH_BASE: [u16; 29] = [
    3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 15, 17, 19, 23, 27, 31, 35, 43, 51, 59, 67, 83, 99, 115, 131,
    163, 195, 227, 258,
];

/// Number of extra length bits for length codes 257..=285
pub static DEFLATE_LENGTH_EXTRA_BITS: [u8; 29] = [
    0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 0,
];

/// Base match distance for distance codes 0..=29
pub static DEFLATE_DISTANCE_BASE: [u16; 30] = [
    1, 2, 3, 4, 5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513, 769, 1025, 1537,
    2049, 3073, 4097, 6145, 8193, 12289, 16385, 24577,
];

/// Number of extra distance bits for distance codes 0..=29
pub static DEFLATE_DISTANCE_EXTRA_BITS: [u8; 30] = [
    0, 0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12, 13,
    13,
];

/// Deflate block types as announced by the 2-bit BTYPE field
pub const DEFLATE_BLOCKTYPE_UNCOMPRESSED: u16 = 0;
pub const DEFLATE_BLOCKTYPE_STATIC: u16 = 1;
pub const DEFLATE_BLOCKTYPE_DYNAMIC_HUFFMAN: u16 = 2;

/// Gzip member magic bytes
pub const GZIP_ID1: u8 = 0x1f;
pub const GZIP_ID2: u8 = 0x8b;

/// The only compression method gzip ever standardised
pub const GZIP_CM_DEFLATE: u8 = 8;

/// Gzip flag byte bits
pub const GZIP_FLAG_FHCRC: u8 = 1 << 1;
pub const GZIP_FLAG_FEXTRA: u8 = 1 << 2;
pub const GZIP_FLAG_FNAME: u8 = 1 << 3;
pub const GZIP_FLAG_FCOMMENT: u8 = 1 << 4;

/// Bits 5..7 of the flag byte are reserved and must be zero
pub const GZIP_FLAG_RESERVED: u8 = 0xe0;
