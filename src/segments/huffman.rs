// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::{
    byte_reader::ByteReader,
    context::{DecoderContext, NUM_HUFFMAN_TABLES},
    error::{Error, Result},
    huffman::{HuffmanSpec, TableClass, HUFFMAN_MAX_BITS, HUFFMAN_MAX_SYMBOLS},
    util::tracing_wrappers::*,
};

/// Reads one table specification, leaving `br` after its symbols.
fn read_spec<'a>(br: &mut ByteReader<'a>) -> Result<(TableClass, u8, HuffmanSpec<'a>)> {
    let (class, id) = br.read_nibbles()?;
    let class = TableClass::try_from(class)?;
    if id as usize >= NUM_HUFFMAN_TABLES {
        return Err(Error::InvalidHuffmanTableId(id));
    }
    let counts: [u8; HUFFMAN_MAX_BITS] = br
        .advance(HUFFMAN_MAX_BITS)?
        .try_into()
        .map_err(|_| Error::OutOfBounds)?;
    let mut spec = HuffmanSpec {
        counts,
        symbols: &[],
    };
    let num_symbols = spec.num_symbols();
    if num_symbols > HUFFMAN_MAX_SYMBOLS {
        return Err(Error::TooManyHuffmanSymbols(num_symbols));
    }
    // A short symbol list is reported by the table builder.
    spec.symbols = br.advance(num_symbols.min(br.remaining()))?;
    Ok((class, id, spec))
}

/// Parses every table specification in a DHT segment and builds the decode
/// tables. A table is only stored once it has been built successfully.
pub fn parse_huffman_tables(br: &mut ByteReader, ctx: &mut DecoderContext) -> Result<()> {
    while !br.is_empty() {
        let (class, id, spec) = read_spec(br)?;
        trace!("{class} Huffman table {id}, {} symbols", spec.symbols.len());
        let table = spec.build()?;
        ctx.set_huffman_table(class, id, table)?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use test_log::test;

    use super::*;
    use crate::{error::ErrorKind, huffman::default_tables, util::test::*};

    #[test]
    fn dc_and_ac_in_one_segment() {
        let mut payload = small_dht_payload(0, 0);
        payload.extend(dht_payload(
            1,
            3,
            &default_tables::AC_LUMINANCE.counts,
            default_tables::AC_LUMINANCE.symbols,
        ));
        let mut ctx = DecoderContext::new();
        parse_huffman_tables(&mut ByteReader::new(&payload), &mut ctx).unwrap();
        assert_eq!(ctx.dc_table(0).unwrap().decode(0x8000), Some((1, 2)));
        assert_eq!(ctx.ac_table(3).unwrap().num_symbols(), 162);
        assert!(ctx.ac_table(0).is_none());
    }

    #[test]
    fn too_many_symbols_keeps_previous_table() {
        let mut ctx = DecoderContext::new();
        let first = small_dht_payload(0, 1);
        parse_huffman_tables(&mut ByteReader::new(&first), &mut ctx).unwrap();

        let mut counts = [0u8; 16];
        counts[15] = 255;
        counts[14] = 2;
        let payload = dht_payload(0, 1, &counts, &[0; 257]);
        let err = parse_huffman_tables(&mut ByteReader::new(&payload), &mut ctx).unwrap_err();
        assert_eq!(err, Error::TooManyHuffmanSymbols(257));
        assert_eq!(err.kind(), ErrorKind::MalformedHuffmanSpec);
        assert_eq!(
            ctx.huffman_table(TableClass::Dc, 1).unwrap().num_symbols(),
            3
        );
    }

    #[test]
    fn truncated_symbols() {
        let mut counts = [0u8; 16];
        counts[3] = 6;
        let payload = dht_payload(1, 0, &counts, &[1, 2, 3]);
        let mut ctx = DecoderContext::new();
        let err = parse_huffman_tables(&mut ByteReader::new(&payload), &mut ctx).unwrap_err();
        assert_eq!(
            err,
            Error::TruncatedHuffmanSymbols {
                expected: 6,
                actual: 3
            }
        );
        assert!(ctx.ac_table(0).is_none());
    }

    #[test]
    fn invalid_class_and_id() {
        let mut ctx = DecoderContext::new();
        assert_eq!(
            parse_huffman_tables(&mut ByteReader::new(&small_dht_payload(2, 0)), &mut ctx),
            Err(Error::InvalidHuffmanTableClass(2))
        );
        assert_eq!(
            parse_huffman_tables(&mut ByteReader::new(&small_dht_payload(0, 4)), &mut ctx),
            Err(Error::InvalidHuffmanTableId(4))
        );
    }

    #[test]
    fn truncated_counts() {
        let payload = small_dht_payload(0, 0);
        let mut ctx = DecoderContext::new();
        assert_eq!(
            parse_huffman_tables(&mut ByteReader::new(&payload[..10]), &mut ctx),
            Err(Error::OutOfBounds)
        );
    }
}
