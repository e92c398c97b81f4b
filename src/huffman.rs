// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Decode tables for canonical JPEG Huffman codes.
//!
//! Codes of up to [`HUFFMAN_HASH_BITS`] bits are resolved with a single
//! lookup indexed by the next bits of the stream. Longer codes mark their
//! 9-bit prefix as a slow zone and are stored in per-length tables.

use std::fmt;

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::error::{Error, Result};

pub mod default_tables;

pub const HUFFMAN_HASH_BITS: usize = 9;
pub const HUFFMAN_HASH_SIZE: usize = 1 << HUFFMAN_HASH_BITS;
pub const HUFFMAN_MAX_BITS: usize = 16;
pub const HUFFMAN_MAX_SYMBOLS: usize = 256;
const NUM_SLOW_TABLES: usize = HUFFMAN_MAX_BITS - HUFFMAN_HASH_BITS;

/// Huffman table class, the `Tc` field of a DHT specification.
#[repr(u8)]
#[derive(Debug, FromPrimitive, Clone, Copy, PartialEq, Eq)]
pub enum TableClass {
    Dc = 0,
    Ac = 1,
}

impl TryFrom<u8> for TableClass {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::from_u8(value).ok_or(Error::InvalidHuffmanTableClass(value))
    }
}

impl fmt::Display for TableClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableClass::Dc => write!(f, "DC"),
            TableClass::Ac => write!(f, "AC"),
        }
    }
}

/// Code length counts and symbols of one table, as carried by a DHT segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanSpec<'a> {
    /// `counts[i]` is the number of codes of length `i + 1`.
    pub counts: [u8; HUFFMAN_MAX_BITS],
    pub symbols: &'a [u8],
}

impl HuffmanSpec<'_> {
    pub fn num_symbols(&self) -> usize {
        self.counts.iter().map(|&c| c as usize).sum()
    }

    pub fn build(&self) -> Result<HuffmanTable> {
        HuffmanTable::build(&self.counts, self.symbols)
    }
}

/// One slot of the fast lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FastEntry {
    /// No code starts with this prefix.
    #[default]
    Unused,
    /// A code of `length <= 9` bits is a prefix of this slot.
    Symbol { symbol: u8, length: u8 },
    /// Only codes longer than 9 bits start with this prefix.
    Slow,
}

/// Codes of one length above [`HUFFMAN_HASH_BITS`], in increasing order.
#[derive(Clone)]
struct SlowTable {
    codes: [u16; HUFFMAN_MAX_SYMBOLS],
    symbols: [u8; HUFFMAN_MAX_SYMBOLS],
    len: usize,
}

impl Default for SlowTable {
    fn default() -> Self {
        Self {
            codes: [0; HUFFMAN_MAX_SYMBOLS],
            symbols: [0; HUFFMAN_MAX_SYMBOLS],
            len: 0,
        }
    }
}

impl SlowTable {
    fn push(&mut self, code: u16, symbol: u8) {
        // The caller bounds the total number of symbols by HUFFMAN_MAX_SYMBOLS.
        self.codes[self.len] = code;
        self.symbols[self.len] = symbol;
        self.len += 1;
    }

    fn lookup(&self, code: u16) -> Option<u8> {
        self.codes[..self.len]
            .binary_search(&code)
            .ok()
            .map(|i| self.symbols[i])
    }
}

/// A decode table for one canonical Huffman code.
#[derive(Clone)]
pub struct HuffmanTable {
    fast_lookup: [FastEntry; HUFFMAN_HASH_SIZE],
    slow_tables: [SlowTable; NUM_SLOW_TABLES],
    num_symbols: usize,
    max_length: u8,
}

impl fmt::Debug for HuffmanTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HuffmanTable")
            .field("fast_lookup", &"(...)")
            .field(
                "slow_table_sizes",
                &self.slow_tables.iter().map(|t| t.len).collect::<Vec<_>>(),
            )
            .field("num_symbols", &self.num_symbols)
            .field("max_length", &self.max_length)
            .finish()
    }
}

impl Default for HuffmanTable {
    fn default() -> Self {
        Self {
            fast_lookup: [FastEntry::Unused; HUFFMAN_HASH_SIZE],
            slow_tables: array_init::array_init(|_| SlowTable::default()),
            num_symbols: 0,
            max_length: 0,
        }
    }
}

impl HuffmanTable {
    /// Builds the decode table from a DHT specification: `counts[i]` is the
    /// number of codes of length `i + 1`, and `symbols` lists the symbols in
    /// order of increasing code length.
    pub fn build(counts: &[u8; HUFFMAN_MAX_BITS], symbols: &[u8]) -> Result<HuffmanTable> {
        let total: usize = counts.iter().map(|&c| c as usize).sum();
        if total > HUFFMAN_MAX_SYMBOLS {
            return Err(Error::TooManyHuffmanSymbols(total));
        }
        if symbols.len() < total {
            return Err(Error::TruncatedHuffmanSymbols {
                expected: total,
                actual: symbols.len(),
            });
        }

        let mut table = HuffmanTable::default();
        let mut symbols = symbols[..total].iter();
        // Canonical assignment, ITU-T T.81 Annex C.
        let mut code = 0u32;
        for (length, &count) in (1..=HUFFMAN_MAX_BITS).zip(counts.iter()) {
            if code + count as u32 > 1 << length {
                return Err(Error::HuffmanCodeOverflow(length as u8));
            }
            for &symbol in symbols.by_ref().take(count as usize) {
                table.insert(code, length, symbol);
                code += 1;
            }
            if count != 0 {
                table.max_length = length as u8;
            }
            code <<= 1;
        }
        table.num_symbols = total;
        Ok(table)
    }

    fn insert(&mut self, code: u32, length: usize, symbol: u8) {
        if length <= HUFFMAN_HASH_BITS {
            let shift = HUFFMAN_HASH_BITS - length;
            let first = (code as usize) << shift;
            let entry = FastEntry::Symbol {
                symbol,
                length: length as u8,
            };
            self.fast_lookup[first..first + (1 << shift)].fill(entry);
        } else {
            let prefix = (code >> (length - HUFFMAN_HASH_BITS)) as usize;
            self.fast_lookup[prefix] = FastEntry::Slow;
            self.slow_tables[length - HUFFMAN_HASH_BITS - 1].push(code as u16, symbol);
        }
    }

    /// Decodes one symbol. `bits` holds the next 16 bits of the entropy-coded
    /// stream, most significant bit first. Returns the symbol and the length
    /// of its code, or `None` if no code is a prefix of `bits`.
    /// ```
    /// # use jfif::huffman::HuffmanTable;
    /// // Codes: 0 -> 'a', 10 -> 'b', 11 -> 'c'.
    /// let mut counts = [0u8; 16];
    /// counts[0] = 1;
    /// counts[1] = 2;
    /// let table = HuffmanTable::build(&counts, b"abc")?;
    /// assert_eq!(table.decode(0b0111_1111_1111_1111), Some((b'a', 1)));
    /// assert_eq!(table.decode(0b1000_0000_0000_0000), Some((b'b', 2)));
    /// assert_eq!(table.decode(0b1100_0000_0000_0000), Some((b'c', 2)));
    /// # Ok::<(), jfif::error::Error>(())
    /// ```
    pub fn decode(&self, bits: u16) -> Option<(u8, u8)> {
        let prefix = (bits >> (HUFFMAN_MAX_BITS - HUFFMAN_HASH_BITS)) as usize;
        match self.fast_lookup[prefix] {
            FastEntry::Symbol { symbol, length } => Some((symbol, length)),
            FastEntry::Unused => None,
            FastEntry::Slow => self.decode_slow(bits),
        }
    }

    #[cold]
    fn decode_slow(&self, bits: u16) -> Option<(u8, u8)> {
        (HUFFMAN_HASH_BITS + 1..=self.max_length as usize).find_map(|length| {
            let code = bits >> (HUFFMAN_MAX_BITS - length);
            self.slow_tables[length - HUFFMAN_HASH_BITS - 1]
                .lookup(code)
                .map(|symbol| (symbol, length as u8))
        })
    }

    /// Returns the fast lookup slot for a 9-bit prefix.
    pub fn fast_entry(&self, prefix: usize) -> FastEntry {
        self.fast_lookup[prefix & (HUFFMAN_HASH_SIZE - 1)]
    }

    /// Number of symbols in the code.
    pub fn num_symbols(&self) -> usize {
        self.num_symbols
    }

    /// Length in bits of the longest code, 0 for an empty table.
    pub fn max_length(&self) -> u8 {
        self.max_length
    }
}
