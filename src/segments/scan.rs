// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::{
    byte_reader::ByteReader,
    context::{DecoderContext, ScanHeader, NUM_COMPONENTS, NUM_HUFFMAN_TABLES},
    error::{Error, Result},
    huffman::TableClass,
    util::tracing_wrappers::*,
};

/// Parses a scan header and binds each scan component to its Huffman tables.
///
/// Scan components are matched in order against the frame components and
/// must carry the same ids. Without a frame header the scan ids are taken
/// as given and bound by position. Every table the scan needs (DC tables if it
/// codes DC coefficients, AC tables if it codes AC coefficients) must have
/// been defined by then.
pub fn parse_scan_header(br: &mut ByteReader, ctx: &mut DecoderContext) -> Result<()> {
    let num_components = br.read_u8()?;
    if num_components == 0 || num_components as usize > NUM_COMPONENTS {
        return Err(Error::InvalidScanComponentCount(num_components));
    }
    let has_frame = ctx.frame.is_some();
    let mut components = ctx.components;
    for (index, c) in components
        .iter_mut()
        .take(num_components as usize)
        .enumerate()
    {
        let id = br.read_u8()?;
        if !has_frame {
            c.id = id;
        } else if id != c.id {
            return Err(Error::ScanComponentMismatch {
                index,
                expected: c.id,
                found: id,
            });
        }
        let (dc_tbl_idx, ac_tbl_idx) = br.read_nibbles()?;
        for idx in [dc_tbl_idx, ac_tbl_idx] {
            if idx as usize >= NUM_HUFFMAN_TABLES {
                return Err(Error::InvalidHuffmanTableId(idx));
            }
        }
        c.dc_tbl_idx = dc_tbl_idx;
        c.ac_tbl_idx = ac_tbl_idx;
    }
    let ss = br.read_u8()?;
    let se = br.read_u8()?;
    let (ah, al) = br.read_nibbles()?;
    let scan = ScanHeader {
        num_components,
        ss,
        se,
        ah,
        al,
    };

    for c in components.iter().take(num_components as usize) {
        if scan.uses_dc() && ctx.dc_table(c.dc_tbl_idx as usize).is_none() {
            return Err(Error::MissingHuffmanTable {
                class: TableClass::Dc,
                id: c.dc_tbl_idx,
            });
        }
        if scan.uses_ac() && ctx.ac_table(c.ac_tbl_idx as usize).is_none() {
            return Err(Error::MissingHuffmanTable {
                class: TableClass::Ac,
                id: c.ac_tbl_idx,
            });
        }
    }

    trace!("scan {scan:?}");
    ctx.components = components;
    ctx.scan = Some(scan);
    Ok(())
}
