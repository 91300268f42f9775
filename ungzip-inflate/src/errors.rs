/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fmt::{Debug, Formatter};

/// A struct returned when decompression fails
pub struct GzipDecodeErrors
{
    /// reason why decompression failed
    pub error:  DecodeErrorStatus,
    /// byte offset into the compressed stream at the time of failure
    pub offset: usize
}

impl GzipDecodeErrors
{
    /// Create a new decode error wrapper, `offset` being how far
    /// into the compressed stream we were when we hit the error
    pub fn new(error: DecodeErrorStatus, offset: usize) -> GzipDecodeErrors
    {
        GzipDecodeErrors { error, offset }
    }
}

impl Debug for GzipDecodeErrors
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        writeln!(f, "{:?}(near compressed byte {})", self.error, self.offset)
    }
}

/// Reasons why decompression fails
pub enum DecodeErrorStatus
{
    /// Input ended before a required field was fully read
    Truncated,
    /// File does not start with `0x1f 0x8b`
    BadMagic(u8, u8),
    /// Compression method other than deflate (8)
    UnsupportedMethod(u8),
    /// Bits 5..7 of the flag byte were set
    ReservedFlagBits(u8),
    /// A block announced the reserved block type 0b11
    ReservedBlockType,
    /// LEN of a stored block is not the complement of NLEN
    StoredLengthMismatch(u16, u16),
    /// A dynamic block header count was out of range
    DynamicHeader(&'static str, usize),
    /// A repeat code appeared before any code length was decoded
    NoPreviousLength,
    /// A repeat run would overrun the combined code length vector
    RepeatOverflow(usize, usize),
    /// A code length exceeded the limit of its alphabet
    InvalidLengths(u8, u8),
    /// The code lengths over-allocate the codespace, or the stream
    /// used a bit pattern with no assigned code
    MalformedCodes,
    /// A decoded symbol lies outside its alphabet
    InvalidSymbol(u16),
    /// Length code 284 carried the extra-bit value reserved for code 285
    InvalidLengthExtra,
    /// A back-reference reached into the unwritten window region
    InvalidDistance(usize),
    /// The sink accepted fewer bytes than it was offered
    SinkWriteShort(usize, usize),
    /// The sink failed the write outright
    SinkIo(std::io::Error),
    /// Stored CRC-32 does not match the emitted bytes
    ///
    /// Only checked when checksum confirmation is enabled
    ChecksumMismatch(u32, u32),
    /// Stored ISIZE does not match the emitted byte count
    ///
    /// Only checked when checksum confirmation is enabled
    SizeMismatch(u32, u32),
    /// Limit set by the user was exceeded by decompressed output
    OutputLimitExceeded(usize, usize)
}

impl Debug for DecodeErrorStatus
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        match self
        {
            Self::Truncated => writeln!(f, "Input ended inside a required field"),
            Self::BadMagic(id1, id2) =>
            {
                writeln!(f, "Bad magic bytes {id1:#04x} {id2:#04x}, not a gzip file")
            }
            Self::UnsupportedMethod(method) =>
            {
                writeln!(f, "Unsupported compression method {method}, only deflate (8) is known")
            }
            Self::ReservedFlagBits(flags) =>
            {
                writeln!(f, "Reserved bits set in flag byte {flags:#010b}")
            }
            Self::ReservedBlockType => writeln!(f, "Reserved block type 0b11"),
            Self::StoredLengthMismatch(len, nlen) =>
            {
                writeln!(
                    f,
                    "Stored block LEN {len:#06x} does not match complement of NLEN {nlen:#06x}"
                )
            }
            Self::DynamicHeader(field, value) =>
            {
                writeln!(f, "Dynamic block header field {field} has invalid count {value}")
            }
            Self::NoPreviousLength =>
            {
                writeln!(f, "Repeat code 16 appeared before any code length")
            }
            Self::RepeatOverflow(requested, available) =>
            {
                writeln!(
                    f,
                    "Repeat run of {requested} overruns the code length vector, {available} slots left"
                )
            }
            Self::InvalidLengths(length, limit) =>
            {
                writeln!(f, "Code length {length} exceeds alphabet limit {limit}")
            }
            Self::MalformedCodes => writeln!(f, "Malformed Huffman codes"),
            Self::InvalidSymbol(symbol) =>
            {
                writeln!(f, "Decoded symbol {symbol} lies outside its alphabet")
            }
            Self::InvalidLengthExtra =>
            {
                writeln!(f, "Length code 284 with extra value 31, length 258 is code 285")
            }
            Self::InvalidDistance(distance) =>
            {
                writeln!(f, "Back-reference distance {distance} reaches unwritten window slots")
            }
            Self::SinkWriteShort(expected, written) =>
            {
                writeln!(f, "Sink wrote {written} bytes when offered {expected}")
            }
            Self::SinkIo(err) => writeln!(f, "Sink write failed: {err}"),
            Self::ChecksumMismatch(expected, found) =>
            {
                writeln!(f, "Mismatched CRC, stored CRC is {expected} but computed {found}")
            }
            Self::SizeMismatch(expected, found) =>
            {
                writeln!(f, "Mismatched ISIZE, stored size is {expected} but emitted {found}")
            }
            Self::OutputLimitExceeded(limit, current) =>
            {
                writeln!(
                    f,
                    "Output limit exceeded, set limit was {limit} and output size is {current}"
                )
            }
        }
    }
}
