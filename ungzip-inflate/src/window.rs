/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The 32 KiB sliding window back-references copy from, and the output page
//! decoded bytes are staged in before they reach the sink.

use std::io::Write;

use crate::errors::DecodeErrorStatus;

/// Size of the deflate sliding window
pub(crate) const WINDOW_SIZE: usize = 1 << 15;

const WINDOW_MASK: usize = WINDOW_SIZE - 1;

/// Size of the output staging page
pub(crate) const OUT_PAGE_SIZE: usize = 8192;

/// Cyclic buffer over the last 32768 emitted bytes.
///
/// Back-references read from here, never from the output page; slots that
/// were never written in the current member are not valid sources.
pub(crate) struct SlidingWindow
{
    buffer:  Vec<u8>,
    cursor:  usize,
    wrapped: bool
}

impl SlidingWindow
{
    pub fn new() -> SlidingWindow
    {
        SlidingWindow {
            buffer:  vec![0; WINDOW_SIZE],
            cursor:  0,
            wrapped: false
        }
    }

    /// Forget the byte history.
    ///
    /// Called at member boundaries so a back-reference can never reach into
    /// a previous member's tail.
    pub fn reset(&mut self)
    {
        self.cursor = 0;
        self.wrapped = false;
    }

    /// Append one emitted byte to the history
    #[inline(always)]
    pub fn push(&mut self, byte: u8)
    {
        self.buffer[self.cursor] = byte;
        self.cursor = (self.cursor + 1) & WINDOW_MASK;

        if self.cursor == 0
        {
            self.wrapped = true;
        }
    }

    /// Return true if the slot `distance` bytes behind the cursor has been
    /// written in this member
    pub const fn has_distance(&self, distance: usize) -> bool
    {
        self.wrapped || distance <= self.cursor
    }

    /// Read the byte `distance` positions behind the write cursor.
    ///
    /// Callers check [`has_distance`] first.
    ///
    /// [`has_distance`]: Self::has_distance
    #[inline(always)]
    pub fn byte_back(&self, distance: usize) -> u8
    {
        self.buffer[self.cursor.wrapping_sub(distance) & WINDOW_MASK]
    }
}

/// Fixed page decoded bytes are collected in before being written out.
///
/// Flushed when full and once more at end of stream; the decoder never
/// reads it back.
pub(crate) struct OutputPage
{
    page:   Vec<u8>,
    filled: usize,
    total:  usize
}

impl OutputPage
{
    pub fn new() -> OutputPage
    {
        OutputPage {
            page:   vec![0; OUT_PAGE_SIZE],
            filled: 0,
            total:  0
        }
    }

    /// Stage one byte, flushing to `sink` when the page fills up
    #[inline(always)]
    pub fn append<W: Write>(&mut self, sink: &mut W, byte: u8)
        -> Result<(), DecodeErrorStatus>
    {
        self.page[self.filled] = byte;
        self.filled += 1;
        self.total += 1;

        if self.filled == OUT_PAGE_SIZE
        {
            self.flush(sink)?;
        }
        Ok(())
    }

    /// Hand the filled part of the page to the sink in a single write.
    ///
    /// The sink accepting fewer bytes than offered is an error.
    pub fn flush<W: Write>(&mut self, sink: &mut W) -> Result<(), DecodeErrorStatus>
    {
        if self.filled == 0
        {
            return Ok(());
        }
        match sink.write(&self.page[..self.filled])
        {
            Ok(written) if written == self.filled =>
            {
                self.filled = 0;
                Ok(())
            }
            Ok(written) => Err(DecodeErrorStatus::SinkWriteShort(self.filled, written)),
            Err(err) => Err(DecodeErrorStatus::SinkIo(err))
        }
    }

    /// Total number of bytes appended over the whole stream
    pub const fn total(&self) -> usize
    {
        self.total
    }
}
