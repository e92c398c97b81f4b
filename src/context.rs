// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Header state shared between the segment parsers and the entropy decoder.

use crate::{
    error::{Error, Result},
    huffman::{default_tables, HuffmanTable, TableClass},
    util::{tracing_wrappers::*, ZIGZAG_TO_NATURAL},
};

pub const NUM_COMPONENTS: usize = 3;
pub const NUM_QUANT_TABLES: usize = 3;
pub const NUM_HUFFMAN_TABLES: usize = 4;
pub const BLOCK_SIZE: usize = 8;
pub const BLOCK_COEFFICIENTS: usize = BLOCK_SIZE * BLOCK_SIZE;

/// One image component (Y, Cb or Cr).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Component {
    /// Component identifier declared by the frame header
    pub id: u8,
    /// Horizontal sampling factor
    pub h_samp_factor: u8,
    /// Vertical sampling factor
    pub v_samp_factor: u8,
    /// Quantization table index
    pub quant_idx: u8,
    /// DC Huffman table index, set by the scan header
    pub dc_tbl_idx: u8,
    /// AC Huffman table index, set by the scan header
    pub ac_tbl_idx: u8,
    /// Predictor for DC differences; reset to 0 at every restart marker.
    pub previous_dc: i32,
}

/// De-quantization multipliers for one 8x8 block, in zig-zag order.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantTable {
    values: [f32; BLOCK_COEFFICIENTS],
}

impl QuantTable {
    pub fn new(values: [f32; BLOCK_COEFFICIENTS]) -> Self {
        Self { values }
    }

    pub fn from_bytes(bytes: &[u8; BLOCK_COEFFICIENTS]) -> Self {
        Self::new(bytes.map(f32::from))
    }

    /// Multipliers in zig-zag order, as stored in the DQT segment.
    pub fn values(&self) -> &[f32; BLOCK_COEFFICIENTS] {
        &self.values
    }

    /// Multipliers in row-major order.
    pub fn to_natural_order(&self) -> [f32; BLOCK_COEFFICIENTS] {
        let mut natural = [0.0; BLOCK_COEFFICIENTS];
        for (&value, &pos) in self.values.iter().zip(ZIGZAG_TO_NATURAL.iter()) {
            natural[pos] = value;
        }
        natural
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Sample precision in bits
    pub precision: u8,
    pub width: u16,
    pub height: u16,
}

/// Fields of the scan header other than the component bindings, which are
/// stored on the [`Component`]s themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanHeader {
    /// Number of components in this scan
    pub num_components: u8,
    /// Spectral selection start
    pub ss: u8,
    /// Spectral selection end
    pub se: u8,
    /// Successive approximation high bit
    pub ah: u8,
    /// Successive approximation low bit
    pub al: u8,
}

impl ScanHeader {
    /// Whether the scan codes DC coefficients.
    pub fn uses_dc(&self) -> bool {
        self.ss == 0
    }

    /// Whether the scan codes AC coefficients.
    pub fn uses_ac(&self) -> bool {
        self.se > 0
    }
}

/// MCU shape, determined by the luma sampling factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum McuLayout {
    /// One luma block per MCU, 8x8 pixels
    H1V1,
    /// Two luma blocks side by side, 16x8 pixels
    H2V1,
    /// Two luma blocks stacked, 8x16 pixels
    H1V2,
    /// Four luma blocks, 16x16 pixels
    H2V2,
}

impl McuLayout {
    pub fn from_sampling(h: u8, v: u8) -> Result<Self> {
        match (h, v) {
            (1, 1) => Ok(McuLayout::H1V1),
            (2, 1) => Ok(McuLayout::H2V1),
            (1, 2) => Ok(McuLayout::H1V2),
            (2, 2) => Ok(McuLayout::H2V2),
            _ => Err(Error::UnsupportedSampling(h, v)),
        }
    }

    /// Width and height of one MCU in pixels.
    pub fn mcu_size(self) -> (usize, usize) {
        match self {
            McuLayout::H1V1 => (BLOCK_SIZE, BLOCK_SIZE),
            McuLayout::H2V1 => (2 * BLOCK_SIZE, BLOCK_SIZE),
            McuLayout::H1V2 => (BLOCK_SIZE, 2 * BLOCK_SIZE),
            McuLayout::H2V2 => (2 * BLOCK_SIZE, 2 * BLOCK_SIZE),
        }
    }

    /// Number of luma blocks in one MCU.
    pub fn luma_blocks(self) -> usize {
        let (w, h) = self.mcu_size();
        (w / BLOCK_SIZE) * (h / BLOCK_SIZE)
    }
}

/// Everything the entropy decoder needs from the header segments.
///
/// A context is filled in segment by segment while scanning markers and is
/// only handed out once the start of scan has been reached.
#[derive(Debug, Clone)]
pub struct DecoderContext {
    pub(crate) components: [Component; NUM_COMPONENTS],
    pub(crate) quant_tables: [Option<QuantTable>; NUM_QUANT_TABLES],
    pub(crate) dc_tables: [Option<HuffmanTable>; NUM_HUFFMAN_TABLES],
    pub(crate) ac_tables: [Option<HuffmanTable>; NUM_HUFFMAN_TABLES],
    pub(crate) restart_interval: u16,
    pub(crate) frame: Option<FrameHeader>,
    pub(crate) scan: Option<ScanHeader>,
    pub(crate) scan_data_offset: Option<usize>,
    pub(crate) dht_seen: bool,
}

impl Default for DecoderContext {
    fn default() -> Self {
        Self {
            components: [Component::default(); NUM_COMPONENTS],
            quant_tables: array_init::array_init(|_| None),
            dc_tables: array_init::array_init(|_| None),
            ac_tables: array_init::array_init(|_| None),
            restart_interval: 0,
            frame: None,
            scan: None,
            scan_data_offset: None,
            dht_seen: false,
        }
    }
}

impl DecoderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn components(&self) -> &[Component; NUM_COMPONENTS] {
        &self.components
    }

    pub fn component(&self, index: usize) -> Option<&Component> {
        self.components.get(index)
    }

    pub fn frame_header(&self) -> Option<&FrameHeader> {
        self.frame.as_ref()
    }

    pub fn scan_header(&self) -> Option<&ScanHeader> {
        self.scan.as_ref()
    }

    /// Image width, 0 before a frame header has been parsed.
    pub fn width(&self) -> usize {
        self.frame.map_or(0, |f| f.width as usize)
    }

    /// Image height, 0 before a frame header has been parsed.
    pub fn height(&self) -> usize {
        self.frame.map_or(0, |f| f.height as usize)
    }

    /// Number of MCUs between restart markers, 0 if restarts are not used.
    pub fn restart_interval(&self) -> u16 {
        self.restart_interval
    }

    pub fn quant_table(&self, id: usize) -> Option<&QuantTable> {
        self.quant_tables.get(id)?.as_ref()
    }

    pub fn huffman_table(&self, class: TableClass, id: usize) -> Option<&HuffmanTable> {
        let tables = match class {
            TableClass::Dc => &self.dc_tables,
            TableClass::Ac => &self.ac_tables,
        };
        tables.get(id)?.as_ref()
    }

    pub fn dc_table(&self, id: usize) -> Option<&HuffmanTable> {
        self.huffman_table(TableClass::Dc, id)
    }

    pub fn ac_table(&self, id: usize) -> Option<&HuffmanTable> {
        self.huffman_table(TableClass::Ac, id)
    }

    /// Quantization table of the component at `index`.
    pub fn quant_table_for(&self, index: usize) -> Option<&QuantTable> {
        self.quant_table(self.components.get(index)?.quant_idx as usize)
    }

    /// DC Huffman table of the component at `index`.
    pub fn dc_table_for(&self, index: usize) -> Option<&HuffmanTable> {
        self.dc_table(self.components.get(index)?.dc_tbl_idx as usize)
    }

    /// AC Huffman table of the component at `index`.
    pub fn ac_table_for(&self, index: usize) -> Option<&HuffmanTable> {
        self.ac_table(self.components.get(index)?.ac_tbl_idx as usize)
    }

    /// Whether the start of scan has been reached.
    pub fn is_header_complete(&self) -> bool {
        self.scan_data_offset.is_some()
    }

    /// Offset of the first entropy-coded byte, counted from the start of the
    /// file, once the header is complete.
    pub fn scan_data_offset(&self) -> Option<usize> {
        self.scan_data_offset
    }

    /// Entropy-coded data following the scan header. `data` must be the same
    /// buffer the header was parsed from.
    pub fn scan_data<'a>(&self, data: &'a [u8]) -> Option<&'a [u8]> {
        data.get(self.scan_data_offset?..)
    }

    /// MCU shape for this frame's luma sampling factors.
    pub fn mcu_layout(&self) -> Result<McuLayout> {
        let y = &self.components[0];
        McuLayout::from_sampling(y.h_samp_factor, y.v_samp_factor)
    }

    /// Number of MCU columns and rows covering the image.
    pub fn mcu_count(&self) -> Result<(usize, usize)> {
        let (mcu_width, mcu_height) = self.mcu_layout()?.mcu_size();
        Ok((
            self.width().div_ceil(mcu_width),
            self.height().div_ceil(mcu_height),
        ))
    }

    /// Clears the DC predictors; called at the start of each restart interval.
    pub fn reset_previous_dc(&mut self) {
        for c in self.components.iter_mut() {
            c.previous_dc = 0;
        }
    }

    /// Checks that luma is sampled at least as densely as chroma and that
    /// both chroma components are 1x1.
    pub fn validate_sampling(&self) -> Result<()> {
        let [y, cb, cr] = &self.components;
        if y.h_samp_factor < cb.h_samp_factor || y.h_samp_factor < cr.h_samp_factor {
            return Err(Error::SamplingMismatch(
                "horizontal luma sampling below chroma",
            ));
        }
        if y.v_samp_factor < cb.v_samp_factor || y.v_samp_factor < cr.v_samp_factor {
            return Err(Error::SamplingMismatch(
                "vertical luma sampling below chroma",
            ));
        }
        if (cb.h_samp_factor, cb.v_samp_factor) != (1, 1) {
            return Err(Error::SamplingMismatch("Cb sampling is not 1x1"));
        }
        if (cr.h_samp_factor, cr.v_samp_factor) != (1, 1) {
            return Err(Error::SamplingMismatch("Cr sampling is not 1x1"));
        }
        Ok(())
    }

    pub(crate) fn set_quant_table(&mut self, id: u8, table: QuantTable) -> Result<()> {
        let slot = self
            .quant_tables
            .get_mut(id as usize)
            .ok_or(Error::InvalidQuantTableId(id))?;
        *slot = Some(table);
        Ok(())
    }

    pub(crate) fn set_huffman_table(
        &mut self,
        class: TableClass,
        id: u8,
        table: HuffmanTable,
    ) -> Result<()> {
        let tables = match class {
            TableClass::Dc => &mut self.dc_tables,
            TableClass::Ac => &mut self.ac_tables,
        };
        let slot = tables
            .get_mut(id as usize)
            .ok_or(Error::InvalidHuffmanTableId(id))?;
        *slot = Some(table);
        Ok(())
    }

    /// Whether a DHT segment has been seen so far, even one defining no
    /// tables.
    pub fn dht_seen(&self) -> bool {
        self.dht_seen
    }

    /// Installs the typical luminance tables in slot 0 and the chrominance
    /// tables in slot 1, for both classes.
    pub fn install_default_huffman_tables(&mut self) -> Result<()> {
        debug!("no DHT segment before SOS, using default Huffman tables");
        self.dc_tables[0] = Some(default_tables::DC_LUMINANCE.build()?);
        self.ac_tables[0] = Some(default_tables::AC_LUMINANCE.build()?);
        self.dc_tables[1] = Some(default_tables::DC_CHROMINANCE.build()?);
        self.ac_tables[1] = Some(default_tables::AC_CHROMINANCE.build()?);
        Ok(())
    }
}
