// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::{
    byte_reader::ByteReader,
    context::{Component, DecoderContext, FrameHeader, NUM_COMPONENTS, NUM_QUANT_TABLES},
    error::{Error, Result},
    options::ParseOptions,
    util::tracing_wrappers::*,
};

const BASELINE_PRECISION: u8 = 8;

/// Parses a baseline (SOF0) frame header: sample precision, image size and
/// the id, sampling factors and quantization table of each component.
pub fn parse_frame_header(
    br: &mut ByteReader,
    ctx: &mut DecoderContext,
    options: &ParseOptions,
) -> Result<()> {
    if ctx.frame.is_some() {
        return Err(Error::DuplicateFrameHeader);
    }
    let precision = br.read_u8()?;
    if precision != BASELINE_PRECISION {
        return Err(Error::UnsupportedPrecision(precision));
    }
    let height = br.read_be16()?;
    let width = br.read_be16()?;
    if width == 0 || height == 0 {
        return Err(Error::InvalidImageSize(width, height));
    }
    if let Some(limit) = options.pixel_limit {
        if width as usize * height as usize > limit {
            return Err(Error::ImageSizeTooLarge(width as usize, height as usize));
        }
    }

    let num_components = br.read_u8()?;
    if num_components as usize != NUM_COMPONENTS {
        return Err(Error::UnsupportedComponentCount(num_components));
    }
    let mut components = [Component::default(); NUM_COMPONENTS];
    for c in components.iter_mut() {
        let id = br.read_u8()?;
        let (h, v) = br.read_nibbles()?;
        if !(1..=4).contains(&h) || !(1..=4).contains(&v) {
            return Err(Error::InvalidSamplingFactor { component: id, h, v });
        }
        let quant_idx = br.read_u8()?;
        if quant_idx as usize >= NUM_QUANT_TABLES {
            return Err(Error::InvalidQuantTableId(quant_idx));
        }
        *c = Component {
            id,
            h_samp_factor: h,
            v_samp_factor: v,
            quant_idx,
            ..Component::default()
        };
    }

    ctx.components = components;
    ctx.frame = Some(FrameHeader {
        precision,
        width,
        height,
    });
    trace!("frame {width}x{height}, components {components:?}");

    if options.strict_sampling {
        ctx.validate_sampling()?;
    } else if let Err(_err) = ctx.validate_sampling() {
        warn!("accepting unusual sampling factors: {_err}");
    }
    Ok(())
}
