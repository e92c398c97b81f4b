// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! The marker loop that walks the header segments up to the start of scan.

use crate::{
    byte_reader::ByteReader,
    context::DecoderContext,
    error::{Error, Result},
    marker::{Marker, MARKER_PREFIX},
    options::ParseOptions,
    segments,
    util::tracing_wrappers::*,
};

/// Size of the length field that starts every segment.
const SEGMENT_LENGTH_SIZE: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// No marker has been read yet.
    Searching,
    /// The given marker (and its segment, if any) has been consumed.
    SegmentParsed(Marker),
    /// The scan header has been parsed; entropy-coded data follows.
    ScanFound,
    /// Parsing stopped with an error.
    Failed,
}

/// Walks the markers of a JPEG stream, dispatching each segment to its parser.
///
/// After every segment the scanner resumes at the end declared by the
/// segment's length field, whatever the parser consumed.
pub struct MarkerScanner<'a> {
    br: ByteReader<'a>,
    base_offset: usize,
    options: ParseOptions,
    context: DecoderContext,
    state: ScanState,
    error: Option<Error>,
}

impl<'a> MarkerScanner<'a> {
    /// Creates a scanner over `data`, which starts right after the SOI
    /// marker. `base_offset` is the position of `data` in the file and is
    /// added to every offset the scanner reports.
    pub fn new(data: &'a [u8], base_offset: usize, options: ParseOptions) -> Self {
        Self {
            br: ByteReader::new(data),
            base_offset,
            options,
            context: DecoderContext::new(),
            state: ScanState::Searching,
            error: None,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Current position in the file.
    pub fn position(&self) -> usize {
        self.base_offset + self.br.position()
    }

    /// The context as populated so far.
    pub fn context(&self) -> &DecoderContext {
        &self.context
    }

    /// Consumes one marker and its segment.
    ///
    /// Once the scanner has reached [`ScanState::ScanFound`] further calls
    /// do nothing, and once it has failed they return the same error.
    pub fn step(&mut self) -> Result<ScanState> {
        match self.state {
            ScanState::ScanFound => return Ok(ScanState::ScanFound),
            ScanState::Failed => {
                return Err(self.error.clone().unwrap_or(Error::OutOfBounds));
            }
            ScanState::Searching | ScanState::SegmentParsed(_) => {}
        }
        match self.process_next_marker() {
            Ok(state) => {
                self.state = state;
                Ok(state)
            }
            Err(err) => {
                debug!("header parsing failed at {}: {err}", self.position());
                self.state = ScanState::Failed;
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Runs until the start of scan and returns the completed context.
    pub fn run(mut self) -> Result<DecoderContext> {
        while self.step()? != ScanState::ScanFound {}
        Ok(self.context)
    }

    /// Reads a marker, skipping any fill bytes before the marker code.
    fn read_marker(&mut self) -> Result<Marker> {
        let prefix = self.br.read_u8()?;
        if prefix != MARKER_PREFIX {
            return Err(Error::MissingMarkerPrefix(prefix));
        }
        let mut code = self.br.read_u8()?;
        while code == MARKER_PREFIX {
            code = self.br.read_u8()?;
        }
        Marker::try_from(code)
    }

    fn process_next_marker(&mut self) -> Result<ScanState> {
        let marker = self.read_marker()?;
        if marker == Marker::Eoi {
            return Err(Error::UnexpectedEoi);
        }
        if !marker.has_segment() {
            debug!("skipping standalone marker {marker}");
            return Ok(ScanState::SegmentParsed(marker));
        }
        if marker.is_unsupported() {
            return Err(Error::UnsupportedMarker(marker.code()));
        }

        let length = self.br.read_be16()?;
        if length < SEGMENT_LENGTH_SIZE {
            return Err(Error::InvalidSegmentLength(length));
        }
        let mut segment = self.br.split_at((length - SEGMENT_LENGTH_SIZE) as usize)?;
        trace!("{marker} segment, {length} bytes");

        let ctx = &mut self.context;
        match marker {
            Marker::Sof(_) => segments::parse_frame_header(&mut segment, ctx, &self.options)?,
            Marker::Dqt => segments::parse_quant_tables(&mut segment, ctx)?,
            Marker::Dht => {
                ctx.dht_seen = true;
                segments::parse_huffman_tables(&mut segment, ctx)?;
            }
            Marker::Dri => segments::parse_restart_interval(&mut segment, ctx)?,
            Marker::Sos => {
                if !ctx.dht_seen && self.options.default_huffman_tables {
                    ctx.install_default_huffman_tables()?;
                }
                segments::parse_scan_header(&mut segment, ctx)?;
                ctx.scan_data_offset = Some(self.base_offset + self.br.position());
                return Ok(ScanState::ScanFound);
            }
            _ => {
                debug!("skipping {marker} segment, {length} bytes");
            }
        }
        if !segment.is_empty() {
            trace!("{} unused bytes at the end of {marker}", segment.remaining());
        }
        Ok(ScanState::SegmentParsed(marker))
    }
}
