/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::io::Write;

use log::trace;

use crate::bitstream::BitReader;
use crate::constants::{
    DEFLATE_BLOCKTYPE_DYNAMIC_HUFFMAN, DEFLATE_BLOCKTYPE_STATIC, DEFLATE_BLOCKTYPE_UNCOMPRESSED,
    DEFLATE_DISTANCE_BASE, DEFLATE_DISTANCE_EXTRA_BITS, DEFLATE_END_OF_BLOCK, DEFLATE_LENGTH_BASE,
    DEFLATE_LENGTH_EXTRA_BITS, DEFLATE_MAX_CODEWORD_LENGTH, DEFLATE_MAX_PRE_CODEWORD_LENGTH,
    DEFLATE_NUM_LITLEN_SYMS, DEFLATE_NUM_OFFSET_SYMS, DEFLATE_NUM_PRECODE_SYMS,
    DEFLATE_PRECODE_LENS_PERMUTATION, GZIP_CM_DEFLATE, GZIP_FLAG_FCOMMENT, GZIP_FLAG_FEXTRA,
    GZIP_FLAG_FHCRC, GZIP_FLAG_FNAME, GZIP_FLAG_RESERVED, GZIP_ID1, GZIP_ID2
};
use crate::crc32::Crc32;
use crate::errors::{DecodeErrorStatus, GzipDecodeErrors};
use crate::huffman::DecodeTree;
use crate::window::{OutputPage, SlidingWindow};

/// Options controlling gzip decompression
///
/// To remove the annoyance of getters and setters
/// the options follow the builder pattern
#[derive(Debug, Copy, Clone)]
pub struct GzipOptions
{
    confirm_checksum: bool,
    limit:            usize
}

impl Default for GzipOptions
{
    fn default() -> GzipOptions
    {
        GzipOptions {
            confirm_checksum: true,
            limit:            usize::MAX
        }
    }
}

impl GzipOptions
{
    /// Whether the decoder verifies the trailer CRC-32 and ISIZE of every
    /// member against the bytes it emitted
    pub const fn get_confirm_checksum(&self) -> bool
    {
        self.confirm_checksum
    }

    /// Set whether the trailer CRC-32 and ISIZE are verified.
    ///
    /// Default is true. When disabled the trailer is parsed and skipped.
    pub fn set_confirm_checksum(mut self, yes: bool) -> GzipOptions
    {
        self.confirm_checksum = yes;
        self
    }

    /// Maximum number of bytes the decoder may emit before giving up
    pub const fn get_limit(&self) -> usize
    {
        self.limit
    }

    /// Cap the decompressed output at `limit` bytes.
    ///
    /// Useful against maliciously crafted inputs that inflate to
    /// unreasonable sizes. Default is no limit.
    pub fn set_limit(mut self, limit: usize) -> GzipOptions
    {
        self.limit = limit;
        self
    }
}

/// A gzip (RFC 1952) decompressor.
///
/// The decoder borrows the whole compressed file and decodes member by
/// member, block by block, into a caller supplied sink; see
/// [`decode_gzip`] for the common decode-to-vec case.
///
/// [`decode_gzip`]: GzipDecoder::decode_gzip
pub struct GzipDecoder<'a>
{
    data:    &'a [u8],
    options: GzipOptions
}

impl<'a> GzipDecoder<'a>
{
    /// Create a decoder over `data` with the default options
    pub fn new(data: &'a [u8]) -> GzipDecoder<'a>
    {
        GzipDecoder::new_with_options(data, GzipOptions::default())
    }

    /// Create a decoder over `data` that respects `options`
    pub fn new_with_options(data: &'a [u8], options: GzipOptions) -> GzipDecoder<'a>
    {
        GzipDecoder { data, options }
    }

    /// Decode every member of the stream and collect the output in a
    /// `Vec<u8>`
    pub fn decode_gzip(&mut self) -> Result<Vec<u8>, GzipDecodeErrors>
    {
        let mut out = Vec::new();

        self.decode_into(&mut out)?;

        Ok(out)
    }

    /// Decode every member of the stream into `sink`, returning the number
    /// of bytes written.
    ///
    /// On error the caller is responsible for discarding whatever partial
    /// output already reached the sink.
    pub fn decode_into<W: Write>(&mut self, sink: &mut W) -> Result<usize, GzipDecodeErrors>
    {
        let mut session = DecoderSession::new(self.data, self.options);

        match session.decode_all(sink)
        {
            Ok(written) => Ok(written),
            Err(error) => Err(GzipDecodeErrors::new(error, session.stream.position()))
        }
    }
}

/// Everything one decompression call owns: the bit stream cursor, the
/// back-reference window, the output page and the running member checksum
struct DecoderSession<'a>
{
    stream:      BitReader<'a>,
    window:      SlidingWindow,
    page:        OutputPage,
    checksum:    Crc32,
    member_size: u32,
    options:     GzipOptions
}

impl<'a> DecoderSession<'a>
{
    fn new(data: &'a [u8], options: GzipOptions) -> DecoderSession<'a>
    {
        DecoderSession {
            stream: BitReader::new(data),
            window: SlidingWindow::new(),
            page: OutputPage::new(),
            checksum: Crc32::new(),
            member_size: 0,
            options
        }
    }

    fn decode_all<W: Write>(&mut self, sink: &mut W) -> Result<usize, DecodeErrorStatus>
    {
        // a gzip file is one or more members back to back
        loop
        {
            self.decode_member(sink)?;

            if self.stream.at_end()
            {
                break;
            }
            trace!(
                "{} compressed bytes remain, expecting another member",
                self.stream.remaining_bytes()
            );
        }
        self.page.flush(sink)?;

        Ok(self.page.total())
    }

    fn decode_member<W: Write>(&mut self, sink: &mut W) -> Result<(), DecodeErrorStatus>
    {
        self.parse_header()?;

        // history never crosses a member boundary
        self.window.reset();
        self.checksum.reset();
        self.member_size = 0;

        loop
        {
            let is_final = self.stream.read_bit()? == 1;
            let block_type = self.stream.read_bits(2)?;

            trace!("Block: final={}, type={}", is_final, block_type);

            match block_type
            {
                DEFLATE_BLOCKTYPE_UNCOMPRESSED => self.decode_stored_block(sink)?,
                DEFLATE_BLOCKTYPE_STATIC => self.decode_fixed_block(sink)?,
                DEFLATE_BLOCKTYPE_DYNAMIC_HUFFMAN => self.decode_dynamic_block(sink)?,
                _ => return Err(DecodeErrorStatus::ReservedBlockType)
            }

            if is_final
            {
                break;
            }
        }
        self.parse_trailer()
    }

    /// Parse one member header, RFC 1952 section 2.3
    fn parse_header(&mut self) -> Result<(), DecodeErrorStatus>
    {
        let id1 = self.stream.read_u8()?;
        let id2 = self.stream.read_u8()?;

        if (id1, id2) != (GZIP_ID1, GZIP_ID2)
        {
            return Err(DecodeErrorStatus::BadMagic(id1, id2));
        }

        let method = self.stream.read_u8()?;

        if method != GZIP_CM_DEFLATE
        {
            return Err(DecodeErrorStatus::UnsupportedMethod(method));
        }

        let flags = self.stream.read_u8()?;

        if flags & GZIP_FLAG_RESERVED != 0
        {
            return Err(DecodeErrorStatus::ReservedFlagBits(flags));
        }

        let mtime = self.stream.read_u32_le()?;
        // XFL and OS carry no information we act on
        self.stream.skip_bytes(2)?;

        trace!("Gzip member: flags={:#07b}, mtime={}", flags, mtime);

        if flags & GZIP_FLAG_FEXTRA != 0
        {
            let xlen = self.stream.read_u16_le()?;

            self.stream.skip_bytes(usize::from(xlen))?;
        }
        if flags & GZIP_FLAG_FNAME != 0
        {
            self.skip_zero_terminated()?;
        }
        if flags & GZIP_FLAG_FCOMMENT != 0
        {
            self.skip_zero_terminated()?;
        }
        if flags & GZIP_FLAG_FHCRC != 0
        {
            self.stream.skip_bytes(2)?;
        }
        Ok(())
    }

    fn skip_zero_terminated(&mut self) -> Result<(), DecodeErrorStatus>
    {
        while self.stream.read_u8()? != 0
        {}
        Ok(())
    }

    /// Parse the 8 byte member trailer and, unless disabled, verify it
    /// against what we emitted
    fn parse_trailer(&mut self) -> Result<(), DecodeErrorStatus>
    {
        self.stream.align_to_byte();

        let stored_crc = self.stream.read_u32_le()?;
        let stored_size = self.stream.read_u32_le()?;

        if self.options.get_confirm_checksum()
        {
            let computed = self.checksum.finalize();

            if stored_crc != computed
            {
                return Err(DecodeErrorStatus::ChecksumMismatch(stored_crc, computed));
            }
            if stored_size != self.member_size
            {
                return Err(DecodeErrorStatus::SizeMismatch(stored_size, self.member_size));
            }
        }
        Ok(())
    }

    /// Send one decoded byte to the window and the output page
    #[inline(always)]
    fn emit<W: Write>(&mut self, sink: &mut W, byte: u8) -> Result<(), DecodeErrorStatus>
    {
        if self.page.total() >= self.options.limit
        {
            return Err(DecodeErrorStatus::OutputLimitExceeded(
                self.options.limit,
                self.page.total() + 1
            ));
        }
        self.window.push(byte);

        if self.options.get_confirm_checksum()
        {
            self.checksum.update(&[byte]);
        }
        self.member_size = self.member_size.wrapping_add(1);

        self.page.append(sink, byte)
    }

    /// Copy `length` bytes starting `distance` bytes back in the window.
    ///
    /// When `length > distance` the source overlaps the bytes this very
    /// copy emits, cyclically repeating the pattern just written; going one
    /// byte at a time gives that behavior for free.
    fn copy_match<W: Write>(
        &mut self, sink: &mut W, length: usize, distance: usize
    ) -> Result<(), DecodeErrorStatus>
    {
        if !self.window.has_distance(distance)
        {
            return Err(DecodeErrorStatus::InvalidDistance(distance));
        }
        for _ in 0..length
        {
            let byte = self.window.byte_back(distance);

            self.emit(sink, byte)?;
        }
        Ok(())
    }

    /// Uncompressed block: LEN, its complement, then LEN literal bytes.
    ///
    /// The literals still enter the window, a later block may reference
    /// them.
    fn decode_stored_block<W: Write>(&mut self, sink: &mut W) -> Result<(), DecodeErrorStatus>
    {
        self.stream.align_to_byte();

        let len = self.stream.read_u16_le()?;
        let nlen = self.stream.read_u16_le()?;

        if len != !nlen
        {
            return Err(DecodeErrorStatus::StoredLengthMismatch(len, nlen));
        }

        trace!("Stored block: {} bytes", len);

        let bytes = self.stream.take_bytes(usize::from(len))?;

        for &byte in bytes
        {
            self.emit(sink, byte)?;
        }
        Ok(())
    }

    /// Fixed Huffman block: code lengths are hardwired by RFC 1951 3.2.6
    fn decode_fixed_block<W: Write>(&mut self, sink: &mut W) -> Result<(), DecodeErrorStatus>
    {
        let mut lengths = [0_u8; DEFLATE_NUM_LITLEN_SYMS];

        lengths[0..144].fill(8);
        lengths[144..256].fill(9);
        lengths[256..280].fill(7);
        lengths[280..288].fill(8);

        let litlen_tree = DecodeTree::from_lengths(&lengths, DEFLATE_MAX_CODEWORD_LENGTH)?;
        let offset_tree = DecodeTree::from_lengths(
            &[5_u8; DEFLATE_NUM_OFFSET_SYMS],
            DEFLATE_MAX_CODEWORD_LENGTH
        )?;

        self.decode_huffman_block(sink, &litlen_tree, &offset_tree)
    }

    /// Dynamic Huffman block: the literal/length and distance code lengths
    /// are themselves compressed with a third, Huffman coded alphabet
    fn decode_dynamic_block<W: Write>(&mut self, sink: &mut W) -> Result<(), DecodeErrorStatus>
    {
        let litlen_count = 257 + usize::from(self.stream.read_bits(5)?);
        let offset_count = 1 + usize::from(self.stream.read_bits(5)?);
        let precode_count = 4 + usize::from(self.stream.read_bits(4)?);

        if litlen_count > 286
        {
            return Err(DecodeErrorStatus::DynamicHeader("HLIT", litlen_count));
        }
        if offset_count > DEFLATE_NUM_OFFSET_SYMS
        {
            return Err(DecodeErrorStatus::DynamicHeader("HDIST", offset_count));
        }
        if precode_count > DEFLATE_NUM_PRECODE_SYMS
        {
            return Err(DecodeErrorStatus::DynamicHeader("HCLEN", precode_count));
        }

        trace!(
            "Dynamic block: {} litlen, {} distance, {} precode lengths",
            litlen_count,
            offset_count,
            precode_count
        );

        let mut precode_lens = [0_u8; DEFLATE_NUM_PRECODE_SYMS];

        for &slot in DEFLATE_PRECODE_LENS_PERMUTATION.iter().take(precode_count)
        {
            precode_lens[usize::from(slot)] = self.stream.read_bits(3)? as u8;
        }

        let precode_tree =
            DecodeTree::from_lengths(&precode_lens, DEFLATE_MAX_PRE_CODEWORD_LENGTH)?;

        let lens = self.read_code_lengths(&precode_tree, litlen_count + offset_count)?;

        // only now does the flat sequence split into its two alphabets
        let litlen_tree =
            DecodeTree::from_lengths(&lens[..litlen_count], DEFLATE_MAX_CODEWORD_LENGTH)?;
        let offset_tree =
            DecodeTree::from_lengths(&lens[litlen_count..], DEFLATE_MAX_CODEWORD_LENGTH)?;

        self.decode_huffman_block(sink, &litlen_tree, &offset_tree)
    }

    /// Decode the run-length encoded code length sequence of a dynamic
    /// block.
    ///
    /// The sequence covers the literal/length and distance alphabets as one
    /// flat vector, and a repeat run may straddle the boundary between the
    /// two.
    fn read_code_lengths(
        &mut self, precode_tree: &DecodeTree, total: usize
    ) -> Result<Vec<u8>, DecodeErrorStatus>
    {
        let mut lens = Vec::with_capacity(total);

        while lens.len() < total
        {
            let symbol = precode_tree.decode_symbol(&mut self.stream)?;

            match symbol
            {
                0..=15 => lens.push(symbol as u8),
                16 =>
                {
                    let previous = match lens.last()
                    {
                        Some(previous) => *previous,
                        None => return Err(DecodeErrorStatus::NoPreviousLength)
                    };
                    let run = 3 + usize::from(self.stream.read_bits(2)?);

                    self.check_run(&lens, run, total)?;
                    lens.resize(lens.len() + run, previous);
                }
                17 =>
                {
                    let run = 3 + usize::from(self.stream.read_bits(3)?);

                    self.check_run(&lens, run, total)?;
                    lens.resize(lens.len() + run, 0);
                }
                18 =>
                {
                    let run = 11 + usize::from(self.stream.read_bits(7)?);

                    self.check_run(&lens, run, total)?;
                    lens.resize(lens.len() + run, 0);
                }
                _ => return Err(DecodeErrorStatus::InvalidSymbol(symbol))
            }
        }
        Ok(lens)
    }

    fn check_run(&self, lens: &[u8], run: usize, total: usize) -> Result<(), DecodeErrorStatus>
    {
        if lens.len() + run > total
        {
            return Err(DecodeErrorStatus::RepeatOverflow(run, total - lens.len()));
        }
        Ok(())
    }

    /// The symbol loop shared by fixed and dynamic blocks: literals, end of
    /// block, or a length/distance pair driving a window copy
    fn decode_huffman_block<W: Write>(
        &mut self, sink: &mut W, litlen_tree: &DecodeTree, offset_tree: &DecodeTree
    ) -> Result<(), DecodeErrorStatus>
    {
        loop
        {
            let symbol = litlen_tree.decode_symbol(&mut self.stream)?;

            if symbol < DEFLATE_END_OF_BLOCK
            {
                self.emit(sink, symbol as u8)?;
                continue;
            }
            if symbol == DEFLATE_END_OF_BLOCK
            {
                return Ok(());
            }
            if symbol > 285
            {
                return Err(DecodeErrorStatus::InvalidSymbol(symbol));
            }

            let length_slot = usize::from(symbol - 257);
            let extra = self
                .stream
                .read_bits(DEFLATE_LENGTH_EXTRA_BITS[length_slot])?;

            if symbol == 284 && extra == 31
            {
                // would alias length 258, which belongs to code 285
                return Err(DecodeErrorStatus::InvalidLengthExtra);
            }
            let length = usize::from(DEFLATE_LENGTH_BASE[length_slot]) + usize::from(extra);

            let offset_symbol = offset_tree.decode_symbol(&mut self.stream)?;

            if offset_symbol > 29
            {
                return Err(DecodeErrorStatus::InvalidSymbol(offset_symbol));
            }

            let offset_slot = usize::from(offset_symbol);
            let extra = self
                .stream
                .read_bits(DEFLATE_DISTANCE_EXTRA_BITS[offset_slot])?;
            let distance = usize::from(DEFLATE_DISTANCE_BASE[offset_slot]) + usize::from(extra);

            self.copy_match(sink, length, distance)?;
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::{GzipDecoder, GzipOptions};
    use crate::crc32::Crc32;
    use crate::errors::{DecodeErrorStatus, GzipDecodeErrors};

    /// Test-side mirror of the deflate bit packing rules: integers go in
    /// LSB-first, Huffman codes MSB-first
    struct BitWriter
    {
        bytes: Vec<u8>,
        bit:   u8
    }

    impl BitWriter
    {
        fn new() -> BitWriter
        {
            BitWriter {
                bytes: Vec::new(),
                bit:   0
            }
        }

        fn push_bit(&mut self, bit: u8)
        {
            if self.bit == 0
            {
                self.bytes.push(0);
            }
            *self.bytes.last_mut().unwrap() |= (bit & 1) << self.bit;
            self.bit = (self.bit + 1) & 7;
        }

        fn push_bits(&mut self, value: u16, count: u8)
        {
            for i in 0..count
            {
                self.push_bit(((value >> i) & 1) as u8);
            }
        }

        fn push_code(&mut self, pattern: u32, length: u8)
        {
            for i in (0..length).rev()
            {
                self.push_bit(((pattern >> i) & 1) as u8);
            }
        }

        fn finish(self) -> Vec<u8>
        {
            self.bytes
        }
    }

    /// Write the fixed Huffman code for a literal/length symbol
    fn push_fixed_litlen(writer: &mut BitWriter, symbol: u16)
    {
        match symbol
        {
            0..=143 => writer.push_code(0x30 + u32::from(symbol), 8),
            144..=255 => writer.push_code(0x190 + u32::from(symbol - 144), 9),
            256..=279 => writer.push_code(u32::from(symbol - 256), 7),
            _ => writer.push_code(0xc0 + u32::from(symbol - 280), 8)
        }
    }

    /// Wrap a raw deflate stream into a single well-formed gzip member
    fn wrap_member(deflate: &[u8], payload: &[u8]) -> Vec<u8>
    {
        let mut member = vec![0x1f, 0x8b, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x03];

        member.extend_from_slice(deflate);

        let mut crc = Crc32::new();
        crc.update(payload);

        member.extend_from_slice(&crc.finalize().to_le_bytes());
        member.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        member
    }

    fn decode(data: &[u8]) -> Result<Vec<u8>, GzipDecodeErrors>
    {
        GzipDecoder::new(data).decode_gzip()
    }

    fn stored_deflate(payload: &[u8]) -> Vec<u8>
    {
        let mut deflate = vec![0x01];
        let len = payload.len() as u16;

        deflate.extend_from_slice(&len.to_le_bytes());
        deflate.extend_from_slice(&(!len).to_le_bytes());
        deflate.extend_from_slice(payload);
        deflate
    }

    #[test]
    fn stored_member()
    {
        let file = wrap_member(&stored_deflate(b"hello"), b"hello");

        assert_eq!(decode(&file).unwrap(), b"hello");
    }

    #[test]
    fn fixed_literal()
    {
        let mut writer = BitWriter::new();

        writer.push_bits(1, 1); // BFINAL
        writer.push_bits(1, 2); // BTYPE = fixed
        push_fixed_litlen(&mut writer, u16::from(b'A'));
        push_fixed_litlen(&mut writer, 256);

        let deflate = writer.finish();

        // the canonical encoding of a lone 'A'
        assert_eq!(deflate, vec![0x73, 0x04, 0x00]);
        assert_eq!(decode(&wrap_member(&deflate, b"A")).unwrap(), b"A");
    }

    #[test]
    fn fixed_back_reference_extends_its_own_output()
    {
        let mut writer = BitWriter::new();

        writer.push_bits(1, 1);
        writer.push_bits(1, 2);
        push_fixed_litlen(&mut writer, u16::from(b'a'));
        push_fixed_litlen(&mut writer, 257); // length 3
        writer.push_code(0, 5); // distance code 0, distance 1
        push_fixed_litlen(&mut writer, 256);

        let file = wrap_member(&writer.finish(), b"aaaa");

        assert_eq!(decode(&file).unwrap(), b"aaaa");
    }

    #[test]
    fn reserved_block_type_is_rejected()
    {
        let mut writer = BitWriter::new();

        writer.push_bits(1, 1);
        writer.push_bits(3, 2); // BTYPE = 0b11

        let file = wrap_member(&writer.finish(), b"");
        let err = decode(&file).unwrap_err();

        assert!(matches!(err.error, DecodeErrorStatus::ReservedBlockType));
    }

    #[test]
    fn length_258_must_use_code_285()
    {
        let mut writer = BitWriter::new();

        writer.push_bits(1, 1);
        writer.push_bits(1, 2);
        push_fixed_litlen(&mut writer, u16::from(b'a'));
        push_fixed_litlen(&mut writer, 284);
        writer.push_bits(31, 5); // 227 + 31 aliases length 258

        let file = wrap_member(&writer.finish(), b"");
        let err = decode(&file).unwrap_err();

        assert!(matches!(err.error, DecodeErrorStatus::InvalidLengthExtra));
    }

    #[test]
    fn code_285_reaches_length_258()
    {
        let mut writer = BitWriter::new();

        writer.push_bits(1, 1);
        writer.push_bits(1, 2);
        push_fixed_litlen(&mut writer, u16::from(b'x'));
        push_fixed_litlen(&mut writer, 285); // length 258, no extra bits
        writer.push_code(0, 5); // distance 1
        push_fixed_litlen(&mut writer, 256);

        let payload: Vec<u8> = std::iter::repeat(b'x').take(259).collect();
        let file = wrap_member(&writer.finish(), &payload);

        assert_eq!(decode(&file).unwrap(), payload);
    }

    #[test]
    fn distance_before_window_start_is_rejected()
    {
        let mut writer = BitWriter::new();

        writer.push_bits(1, 1);
        writer.push_bits(1, 2);
        push_fixed_litlen(&mut writer, u16::from(b'a'));
        push_fixed_litlen(&mut writer, 257);
        writer.push_code(1, 5); // distance code 1, distance 2 but only 1 byte written

        let file = wrap_member(&writer.finish(), b"");
        let err = decode(&file).unwrap_err();

        assert!(matches!(err.error, DecodeErrorStatus::InvalidDistance(2)));
    }

    #[test]
    fn fixed_distance_symbols_30_and_31_are_rejected()
    {
        let mut writer = BitWriter::new();

        writer.push_bits(1, 1);
        writer.push_bits(1, 2);
        push_fixed_litlen(&mut writer, u16::from(b'a'));
        push_fixed_litlen(&mut writer, 257);
        writer.push_code(30, 5);

        let file = wrap_member(&writer.finish(), b"");
        let err = decode(&file).unwrap_err();

        assert!(matches!(err.error, DecodeErrorStatus::InvalidSymbol(30)));
    }

    #[test]
    fn dynamic_block_with_boundary_straddling_repeat()
    {
        let mut writer = BitWriter::new();

        writer.push_bits(1, 1); // BFINAL
        writer.push_bits(2, 2); // BTYPE = dynamic
        writer.push_bits(1, 5); // HLIT: 258 literal/length lengths
        writer.push_bits(1, 5); // HDIST: 2 distance lengths
        writer.push_bits(12, 4); // HCLEN: 16 precode lengths

        // precode lengths in permuted order: 16 -> 2, 18 -> 1, 2 -> 2,
        // giving codes 18 -> 0, 2 -> 10, 16 -> 11
        for length in [2, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2]
        {
            writer.push_bits(length, 3);
        }

        // flat sequence of 260 lengths: symbols 97, 98, 256 and 257 get
        // length 2, both distance codes get length 2 through a single
        // repeat run that starts at slot 257 and crosses into the distance
        // region
        writer.push_code(0, 1);
        writer.push_bits(86, 7); // 18: 97 zeros
        writer.push_code(2, 2); // length 2 for symbol 97 ('a')
        writer.push_code(2, 2); // length 2 for symbol 98 ('b')
        writer.push_code(0, 1);
        writer.push_bits(127, 7); // 18: 138 zeros
        writer.push_code(0, 1);
        writer.push_bits(8, 7); // 18: 19 zeros
        writer.push_code(2, 2); // length 2 for symbol 256
        writer.push_code(3, 2);
        writer.push_bits(0, 2); // 16: repeat length 2 three times

        // literal codes: 'a' -> 00, 'b' -> 01, 256 -> 10, 257 -> 11;
        // distance codes: 0 -> 00, 1 -> 01
        writer.push_code(0, 2); // 'a'
        writer.push_code(1, 2); // 'b'
        writer.push_code(3, 2); // length code 257, length 3
        writer.push_code(0, 2); // distance code 0, distance 1
        writer.push_code(2, 2); // end of block

        let file = wrap_member(&writer.finish(), b"abbbb");

        assert_eq!(decode(&file).unwrap(), b"abbbb");
    }

    #[test]
    fn repeat_before_any_length_is_rejected()
    {
        let mut writer = BitWriter::new();

        writer.push_bits(1, 1);
        writer.push_bits(2, 2);
        writer.push_bits(0, 5);
        writer.push_bits(0, 5);
        writer.push_bits(0, 4); // 4 precode lengths: 16, 17, 18, 0

        for length in [1, 0, 0, 1]
        {
            writer.push_bits(length, 3);
        }
        // codes: 0 -> 0, 16 -> 1; open with the repeat code
        writer.push_code(1, 1);
        writer.push_bits(0, 2);

        let file = wrap_member(&writer.finish(), b"");
        let err = decode(&file).unwrap_err();

        assert!(matches!(err.error, DecodeErrorStatus::NoPreviousLength));
    }

    #[test]
    fn repeat_runs_may_not_overrun_the_length_vector()
    {
        let mut writer = BitWriter::new();

        writer.push_bits(1, 1);
        writer.push_bits(2, 2);
        writer.push_bits(0, 5); // 257 literal/length lengths
        writer.push_bits(0, 5); // 1 distance length
        writer.push_bits(0, 4);

        for length in [0, 0, 1, 1]
        {
            writer.push_bits(length, 3);
        }
        // codes: 0 -> 0, 18 -> 1; two maximal zero runs overshoot 258
        writer.push_code(1, 1);
        writer.push_bits(127, 7);
        writer.push_code(1, 1);
        writer.push_bits(127, 7);

        let file = wrap_member(&writer.finish(), b"");
        let err = decode(&file).unwrap_err();

        assert!(matches!(
            err.error,
            DecodeErrorStatus::RepeatOverflow(138, 120)
        ));
    }

    #[test]
    fn hlit_over_286_is_rejected()
    {
        let mut writer = BitWriter::new();

        writer.push_bits(1, 1);
        writer.push_bits(2, 2);
        writer.push_bits(30, 5); // 287 literal/length codes do not exist
        writer.push_bits(0, 5);
        writer.push_bits(0, 4);

        let file = wrap_member(&writer.finish(), b"");
        let err = decode(&file).unwrap_err();

        assert!(matches!(
            err.error,
            DecodeErrorStatus::DynamicHeader("HLIT", 287)
        ));
    }

    #[test]
    fn stored_length_complement_is_checked()
    {
        let mut deflate = vec![0x01];

        deflate.extend_from_slice(&5_u16.to_le_bytes());
        deflate.extend_from_slice(&0x1234_u16.to_le_bytes());
        deflate.extend_from_slice(b"hello");

        let file = wrap_member(&deflate, b"hello");
        let err = decode(&file).unwrap_err();

        assert!(matches!(
            err.error,
            DecodeErrorStatus::StoredLengthMismatch(5, 0x1234)
        ));
    }

    #[test]
    fn stored_blocks_join_the_window_history()
    {
        // a non-final stored block followed by a fixed block whose
        // back-reference reaches into the stored bytes
        let mut deflate = vec![0x00]; // BFINAL=0, BTYPE=00, padding to the byte edge

        deflate.extend_from_slice(&3_u16.to_le_bytes());
        deflate.extend_from_slice(&(!3_u16).to_le_bytes());
        deflate.extend_from_slice(b"abc");

        let mut tail = BitWriter::new();

        tail.push_bits(1, 1); // final
        tail.push_bits(1, 2); // fixed
        push_fixed_litlen(&mut tail, 259); // length 5
        tail.push_code(2, 5); // distance code 2, distance 3
        push_fixed_litlen(&mut tail, 256);

        deflate.extend_from_slice(&tail.finish());

        let file = wrap_member(&deflate, b"abcabcab");

        assert_eq!(decode(&file).unwrap(), b"abcabcab");
    }

    #[test]
    fn members_concatenate()
    {
        let mut file = wrap_member(&stored_deflate(b"hello"), b"hello");

        let mut writer = BitWriter::new();
        writer.push_bits(1, 1);
        writer.push_bits(1, 2);
        push_fixed_litlen(&mut writer, u16::from(b'A'));
        push_fixed_litlen(&mut writer, 256);

        file.extend_from_slice(&wrap_member(&writer.finish(), b"A"));

        assert_eq!(decode(&file).unwrap(), b"helloA");
    }

    #[test]
    fn back_references_cannot_reach_into_a_previous_member()
    {
        let mut file = wrap_member(&stored_deflate(b"abc"), b"abc");

        // second member immediately asks for distance 1 with an empty
        // window; the bytes of member one must not satisfy it
        let mut writer = BitWriter::new();
        writer.push_bits(1, 1);
        writer.push_bits(1, 2);
        push_fixed_litlen(&mut writer, 257);
        writer.push_code(0, 5);

        file.extend_from_slice(&wrap_member(&writer.finish(), b""));
        let err = decode(&file).unwrap_err();

        assert!(matches!(err.error, DecodeErrorStatus::InvalidDistance(1)));
    }

    #[test]
    fn optional_header_fields_are_skipped()
    {
        // FEXTRA + FNAME + FCOMMENT + FHCRC all present
        let mut file = vec![0x1f, 0x8b, 0x08, 0b0001_1110, 0, 0, 0, 0, 0x00, 0x03];

        file.extend_from_slice(&3_u16.to_le_bytes());
        file.extend_from_slice(b"ex!"); // FEXTRA payload
        file.extend_from_slice(b"hi.txt\0"); // FNAME
        file.extend_from_slice(b"no comment\0"); // FCOMMENT
        file.extend_from_slice(&[0xaa, 0xbb]); // FHCRC

        file.extend_from_slice(&stored_deflate(b"hi"));

        let mut crc = Crc32::new();
        crc.update(b"hi");
        file.extend_from_slice(&crc.finalize().to_le_bytes());
        file.extend_from_slice(&2_u32.to_le_bytes());

        assert_eq!(decode(&file).unwrap(), b"hi");
    }

    #[test]
    fn header_rejects()
    {
        let err = decode(&[0x50, 0x4b, 0x03, 0x04]).unwrap_err();
        assert!(matches!(err.error, DecodeErrorStatus::BadMagic(0x50, 0x4b)));
        assert_eq!(err.offset, 2);

        let err = decode(&[0x1f, 0x8b, 0x07, 0x00]).unwrap_err();
        assert!(matches!(err.error, DecodeErrorStatus::UnsupportedMethod(7)));

        let err = decode(&[0x1f, 0x8b, 0x08, 0x80]).unwrap_err();
        assert!(matches!(
            err.error,
            DecodeErrorStatus::ReservedFlagBits(0x80)
        ));
    }

    #[test]
    fn truncation_is_reported_everywhere()
    {
        // empty input, cut header, cut deflate stream, cut trailer
        let whole = wrap_member(&stored_deflate(b"hello"), b"hello");

        for cut in [0, 4, 12, whole.len() - 3]
        {
            let err = decode(&whole[..cut]).unwrap_err();

            assert!(
                matches!(err.error, DecodeErrorStatus::Truncated),
                "cut at {cut} gave {:?}",
                err.error
            );
        }
    }

    #[test]
    fn trailer_crc_is_verified()
    {
        let mut file = wrap_member(&stored_deflate(b"hello"), b"hello");
        let crc_at = file.len() - 8;

        file[crc_at] ^= 0xff;

        let err = decode(&file).unwrap_err();
        assert!(matches!(err.error, DecodeErrorStatus::ChecksumMismatch(..)));

        // with confirmation off the trailer is parsed and skipped
        let options = GzipOptions::default().set_confirm_checksum(false);
        let decoded = GzipDecoder::new_with_options(&file, options)
            .decode_gzip()
            .unwrap();
        assert_eq!(decoded, b"hello");
    }

    #[test]
    fn trailer_isize_is_verified()
    {
        let mut file = wrap_member(&stored_deflate(b"hello"), b"hello");
        let size_at = file.len() - 4;

        file[size_at] = 99;

        let err = decode(&file).unwrap_err();
        assert!(matches!(err.error, DecodeErrorStatus::SizeMismatch(99, 5)));
    }

    #[test]
    fn output_limit_is_enforced()
    {
        let file = wrap_member(&stored_deflate(b"hello"), b"hello");
        let options = GzipOptions::default().set_limit(3);

        let err = GzipDecoder::new_with_options(&file, options)
            .decode_gzip()
            .unwrap_err();

        assert!(matches!(
            err.error,
            DecodeErrorStatus::OutputLimitExceeded(3, 4)
        ));
    }

    #[test]
    fn decode_into_reports_bytes_written()
    {
        let file = wrap_member(&stored_deflate(b"hello"), b"hello");
        let mut sink = Vec::new();

        let written = GzipDecoder::new(&file).decode_into(&mut sink).unwrap();

        assert_eq!(written, 5);
        assert_eq!(sink, b"hello");
    }
}
