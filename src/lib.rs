// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Header parsing for baseline JPEG (JFIF) files.
//!
//! [`parse_header`] walks the marker segments of a file up to the start of
//! the first scan and returns a [`DecoderContext`] holding the frame
//! geometry, quantization tables, Huffman decode tables and restart interval
//! needed to decode the entropy-coded data that follows.

#![deny(unsafe_code)]
pub mod byte_reader;
pub mod context;
pub mod error;
pub mod huffman;
pub mod marker;
pub mod options;
pub mod scanner;
pub mod segments;
pub mod util;

pub use context::DecoderContext;
pub use error::{Error, ErrorKind, Result};
pub use options::ParseOptions;

use marker::{Marker, MARKER_PREFIX};
use scanner::MarkerScanner;

/// The magic bytes (an SOI marker) every JPEG file starts with.
pub const SIGNATURE: [u8; 2] = [MARKER_PREFIX, Marker::SOI];

/// Parses the header of a complete JPEG file with default options.
pub fn parse_header(data: &[u8]) -> Result<DecoderContext> {
    parse_header_with_options(data, &ParseOptions::default())
}

pub fn parse_header_with_options(data: &[u8], options: &ParseOptions) -> Result<DecoderContext> {
    match data {
        [a, b, rest @ ..] if [*a, *b] == SIGNATURE => {
            MarkerScanner::new(rest, SIGNATURE.len(), options.clone()).run()
        }
        [a, b, ..] => Err(Error::InvalidSignature(*a, *b)),
        _ => Err(Error::OutOfBounds),
    }
}
