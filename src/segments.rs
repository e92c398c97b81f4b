// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Parsers for the segment payloads that populate a [`DecoderContext`].
//!
//! Each parser receives a [`ByteReader`] limited to the payload of one
//! segment, i.e. the bytes following the length field.
//!
//! [`DecoderContext`]: crate::context::DecoderContext
//! [`ByteReader`]: crate::byte_reader::ByteReader

pub mod frame;
pub mod huffman;
pub mod quant;
pub mod restart;
pub mod scan;

pub use frame::parse_frame_header;
pub use huffman::parse_huffman_tables;
pub use quant::parse_quant_tables;
pub use restart::parse_restart_interval;
pub use scan::parse_scan_header;
