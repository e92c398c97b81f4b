// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use thiserror::Error;

use crate::huffman::{TableClass, HUFFMAN_MAX_SYMBOLS};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // Container framing errors
    #[error("Read out of bounds")]
    OutOfBounds,
    #[error("Invalid signature {0:02x}{1:02x}, expected ffd8")]
    InvalidSignature(u8, u8),
    #[error("Expected marker prefix ff, found {0:02x}")]
    MissingMarkerPrefix(u8),
    #[error("Invalid marker code {0:02x}")]
    InvalidMarker(u8),
    #[error("Invalid segment length {0}")]
    InvalidSegmentLength(u16),
    #[error("End of image reached before start of scan")]
    UnexpectedEoi,
    #[error("Invalid DRI segment length {0}, expected 4")]
    InvalidRestartIntervalLength(u16),
    // Frame and scan header errors
    #[error("Invalid image size: {0}x{1}")]
    InvalidImageSize(u16, u16),
    #[error("Invalid sampling factors {h}x{v} for component {component}")]
    InvalidSamplingFactor { component: u8, h: u8, v: u8 },
    #[error("Invalid quantization table id {0}")]
    InvalidQuantTableId(u8),
    #[error("Invalid Huffman table id {0}")]
    InvalidHuffmanTableId(u8),
    #[error("Invalid Huffman table class {0}")]
    InvalidHuffmanTableClass(u8),
    #[error("Invalid number of scan components: {0}")]
    InvalidScanComponentCount(u8),
    #[error("Scan component {index} has id {found}, frame header declares {expected}")]
    ScanComponentMismatch { index: usize, expected: u8, found: u8 },
    #[error("Duplicate frame header")]
    DuplicateFrameHeader,
    // Features outside of baseline sequential DCT
    #[error("Unsupported marker {0:02x}")]
    UnsupportedMarker(u8),
    #[error("Unsupported sample precision: {0} bits")]
    UnsupportedPrecision(u8),
    #[error("Unsupported quantization table precision {0}")]
    UnsupportedQuantPrecision(u8),
    #[error("Unsupported number of components: {0}")]
    UnsupportedComponentCount(u8),
    #[error("Unsupported luma subsampling {0}x{1}")]
    UnsupportedSampling(u8, u8),
    #[error("Sampling factor check failed: {0}")]
    SamplingMismatch(&'static str),
    #[error("Image size too large: {0}x{1}")]
    ImageSizeTooLarge(usize, usize),
    // Huffman table specification errors
    #[error("Huffman table has {0} symbols, max is {max}", max = HUFFMAN_MAX_SYMBOLS)]
    TooManyHuffmanSymbols(usize),
    #[error("Huffman code space overflow at length {0}")]
    HuffmanCodeOverflow(u8),
    #[error("Huffman table declares {expected} symbols but only {actual} are present")]
    TruncatedHuffmanSymbols { expected: usize, actual: usize },
    #[error("Missing {class} Huffman table {id}")]
    MissingHuffmanTable { class: TableClass, id: u8 },
}

/// Coarse classification of [`Error`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The byte stream does not follow the segment structure, or a segment
    /// body is truncated or inconsistent.
    MalformedStream,
    /// The stream is well formed but uses something outside of baseline
    /// sequential JPEG.
    UnsupportedFeature,
    /// A DHT specification cannot form a valid canonical Huffman code.
    MalformedHuffmanSpec,
    /// A scan references a Huffman table that was never defined.
    MissingHuffmanTable,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        use Error::*;
        match self {
            OutOfBounds
            | InvalidSignature(..)
            | MissingMarkerPrefix(_)
            | InvalidMarker(_)
            | InvalidSegmentLength(_)
            | UnexpectedEoi
            | InvalidRestartIntervalLength(_)
            | InvalidImageSize(..)
            | InvalidSamplingFactor { .. }
            | InvalidQuantTableId(_)
            | InvalidHuffmanTableId(_)
            | InvalidHuffmanTableClass(_)
            | InvalidScanComponentCount(_)
            | ScanComponentMismatch { .. }
            | DuplicateFrameHeader => ErrorKind::MalformedStream,
            UnsupportedMarker(_)
            | UnsupportedPrecision(_)
            | UnsupportedQuantPrecision(_)
            | UnsupportedComponentCount(_)
            | UnsupportedSampling(..)
            | SamplingMismatch(_)
            | ImageSizeTooLarge(..) => ErrorKind::UnsupportedFeature,
            TooManyHuffmanSymbols(_)
            | HuffmanCodeOverflow(_)
            | TruncatedHuffmanSymbols { .. } => ErrorKind::MalformedHuffmanSpec,
            MissingHuffmanTable { .. } => ErrorKind::MissingHuffmanTable,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
