// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt::Debug;

use crate::error::{Error, Result};
use byteorder::{BigEndian, ByteOrder};

/// Reads bytes from a borrowed buffer, checking bounds on every access.
///
/// The position always stays within `0..=len`; any read that would go past
/// the end fails with [`Error::OutOfBounds`] and leaves the position unchanged.
#[derive(Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl Debug for ByteReader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ByteReader{{ data: [{} bytes], pos: {} }}",
            self.data.len(),
            self.pos
        )
    }
}

impl<'a> ByteReader<'a> {
    /// Constructs a ByteReader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> ByteReader<'a> {
        ByteReader { data, pos: 0 }
    }

    /// Returns the current read position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the total length of the underlying buffer, including bytes
    /// already read.
    pub fn total_len(&self) -> usize {
        self.data.len()
    }

    /// Returns the number of bytes that can still be read.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns true if no more bytes can be read.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the next byte without consuming it.
    pub fn peek(&self) -> Result<u8> {
        self.data.get(self.pos).copied().ok_or(Error::OutOfBounds)
    }

    /// Returns the next `n` bytes without consuming them.
    pub fn peek_bytes(&self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(n).ok_or(Error::OutOfBounds)?;
        self.data.get(self.pos..end).ok_or(Error::OutOfBounds)
    }

    /// Consumes `n` bytes and returns them.
    /// ```
    /// # use jfif::byte_reader::ByteReader;
    /// let mut br = ByteReader::new(&[1, 2, 3]);
    /// assert_eq!(br.advance(2)?, &[1, 2]);
    /// assert_eq!(br.position(), 2);
    /// assert!(br.advance(2).is_err());
    /// assert_eq!(br.position(), 2);
    /// # Ok::<(), jfif::error::Error>(())
    /// ```
    pub fn advance(&mut self, n: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(n)?;
        self.pos += n;
        Ok(bytes)
    }

    /// Reads one byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Ok(byte)
    }

    /// Reads a big-endian 16-bit value.
    /// ```
    /// # use jfif::byte_reader::ByteReader;
    /// let mut br = ByteReader::new(&[0x00, 0x43, 0xff]);
    /// assert_eq!(br.read_be16()?, 0x43);
    /// assert!(br.read_be16().is_err());
    /// assert_eq!(br.read_u8()?, 0xff);
    /// # Ok::<(), jfif::error::Error>(())
    /// ```
    pub fn read_be16(&mut self) -> Result<u16> {
        Ok(BigEndian::read_u16(self.advance(2)?))
    }

    /// Reads one byte and splits it into its high and low nibbles.
    pub fn read_nibbles(&mut self) -> Result<(u8, u8)> {
        let byte = self.read_u8()?;
        Ok((byte >> 4, byte & 0x0f))
    }

    /// Moves the position to `pos`, which may be at most the buffer length.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(Error::OutOfBounds);
        }
        self.pos = pos;
        Ok(())
    }

    /// Splits off a separate ByteReader covering exactly the next `n` bytes.
    /// `self` is advanced past them, independently of how much of the
    /// returned reader is consumed.
    /// ```
    /// # use jfif::byte_reader::ByteReader;
    /// let mut br = ByteReader::new(&[1, 2, 3, 4]);
    /// let mut segment = br.split_at(2)?;
    /// assert_eq!(segment.read_u8()?, 1);
    /// assert_eq!(br.read_u8()?, 3);
    /// assert!(segment.advance(2).is_err());
    /// # Ok::<(), jfif::error::Error>(())
    /// ```
    pub fn split_at(&mut self, n: usize) -> Result<ByteReader<'a>> {
        Ok(ByteReader::new(self.advance(n)?))
    }
}
