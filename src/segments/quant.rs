// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::{
    byte_reader::ByteReader,
    context::{DecoderContext, QuantTable, BLOCK_COEFFICIENTS, NUM_QUANT_TABLES},
    error::{Error, Result},
    util::tracing_wrappers::*,
};

/// Parses every quantization table in a DQT segment. Only 8-bit tables are
/// supported.
pub fn parse_quant_tables(br: &mut ByteReader, ctx: &mut DecoderContext) -> Result<()> {
    while !br.is_empty() {
        let (precision, id) = br.read_nibbles()?;
        if precision != 0 {
            return Err(Error::UnsupportedQuantPrecision(precision));
        }
        if id as usize >= NUM_QUANT_TABLES {
            return Err(Error::InvalidQuantTableId(id));
        }
        let values: &[u8; BLOCK_COEFFICIENTS] = br
            .advance(BLOCK_COEFFICIENTS)?
            .try_into()
            .map_err(|_| Error::OutOfBounds)?;
        trace!("quantization table {id}");
        ctx.set_quant_table(id, QuantTable::from_bytes(values))?;
    }
    Ok(())
}
