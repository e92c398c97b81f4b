// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::{
    byte_reader::ByteReader,
    context::DecoderContext,
    error::{Error, Result},
    util::tracing_wrappers::*,
};

const DRI_PAYLOAD_SIZE: usize = 2;

/// Parses a DRI segment. A later DRI replaces the interval of an earlier one.
pub fn parse_restart_interval(br: &mut ByteReader, ctx: &mut DecoderContext) -> Result<()> {
    if br.total_len() != DRI_PAYLOAD_SIZE {
        return Err(Error::InvalidRestartIntervalLength(
            (br.total_len() + 2).min(u16::MAX as usize) as u16,
        ));
    }
    ctx.restart_interval = br.read_be16()?;
    trace!("restart interval {}", ctx.restart_interval);
    Ok(())
}
