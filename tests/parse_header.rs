// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use jfif::{
    context::McuLayout, huffman::TableClass, parse_header, parse_header_with_options,
    scanner::MarkerScanner, Error, ErrorKind, ParseOptions,
};
use test_log::test;

fn segment(marker: u8, payload: &[u8]) -> Vec<u8> {
    let mut out = vec![0xff, marker];
    out.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(payload);
    out
}

fn dqt(id: u8) -> Vec<u8> {
    let mut payload = vec![id];
    payload.extend(1..=64u8);
    segment(0xdb, &payload)
}

/// DHT with one table whose codes are 0, 10 and 11.
fn dht(class: u8, id: u8) -> Vec<u8> {
    let mut payload = vec![(class << 4) | id, 1, 2];
    payload.extend([0u8; 14]);
    payload.extend([0, 1, 2]);
    segment(0xc4, &payload)
}

fn sof0(width: u16, height: u16, factors: [(u8, u8); 3]) -> Vec<u8> {
    let mut payload = vec![8];
    payload.extend(height.to_be_bytes());
    payload.extend(width.to_be_bytes());
    payload.push(3);
    for (i, (h, v)) in factors.into_iter().enumerate() {
        payload.extend([i as u8 + 1, (h << 4) | v, (i > 0) as u8]);
    }
    segment(0xc0, &payload)
}

fn sos_ycbcr() -> Vec<u8> {
    segment(0xda, &[3, 1, 0x00, 2, 0x11, 3, 0x11, 0, 63, 0])
}

fn jpeg(segments: &[Vec<u8>]) -> Vec<u8> {
    let mut out = vec![0xff, 0xd8];
    for s in segments {
        out.extend_from_slice(s);
    }
    out
}

#[test]
fn dqt_dht_sos() {
    let scan_bytes = [0x12, 0x34, 0xff, 0x00, 0x56];
    // No frame header; one component with id 1 on DC table 0, DC only.
    let mut data = jpeg(&[dqt(0), dht(0, 0), segment(0xda, &[1, 1, 0x00, 0, 0, 0])]);
    let header_len = data.len();
    data.extend(scan_bytes);

    let ctx = parse_header(&data).unwrap();
    assert!(ctx.is_header_complete());
    assert_eq!(ctx.scan_data_offset(), Some(header_len));
    assert_eq!(header_len, 2 + 69 + 24 + 10);
    assert_eq!(ctx.scan_data(&data), Some(&scan_bytes[..]));

    let quant = ctx.quant_table(0).unwrap();
    assert_eq!(quant.values()[0], 1.0);
    assert_eq!(quant.values()[63], 64.0);
    let dc = ctx.dc_table(0).unwrap();
    assert_eq!(dc.decode(0x0000), Some((0, 1)));
    assert_eq!(dc.decode(0xc000), Some((2, 2)));
    assert!(ctx.ac_table(0).is_none());
    assert!(ctx.dc_table(1).is_none());
    assert_eq!(ctx.components()[0].id, 1);
    assert_eq!(ctx.dc_table_for(0).unwrap().decode(0x8000), Some((1, 2)));
}

#[test]
fn baseline_ycbcr() {
    let data = jpeg(&[
        segment(0xe0, b"JFIF\0\x01\x02\0\0\x01\0\x01\0\0"),
        dqt(0),
        dqt(1),
        sof0(100, 50, [(2, 2), (1, 1), (1, 1)]),
        segment(0xdd, &[0, 4]),
        sos_ycbcr(),
    ]);
    let ctx = parse_header_with_options(&data, &ParseOptions::strict()).unwrap();
    assert_eq!((ctx.width(), ctx.height()), (100, 50));
    assert_eq!(ctx.restart_interval(), 4);
    assert_eq!(ctx.mcu_layout(), Ok(McuLayout::H2V2));
    assert_eq!(ctx.mcu_count(), Ok((7, 4)));
    assert_eq!(ctx.quant_table_for(2), ctx.quant_table(1));
    // No DHT, so the typical tables are in slots 0 and 1.
    assert_eq!(ctx.dc_table_for(0).unwrap().num_symbols(), 12);
    assert_eq!(ctx.ac_table_for(1).unwrap().num_symbols(), 162);
    assert_eq!(ctx.scan_data_offset(), Some(data.len()));
    assert_eq!(ctx.scan_data(&data), Some(&[] as &[u8]));
}

#[test]
fn comment_is_skipped() {
    let data = jpeg(&[
        dqt(0),
        segment(0xfe, b"a comment \xff\xd9 with marker-like bytes"),
        dht(0, 0),
        segment(0xda, &[1, 1, 0x00, 0, 0, 0]),
    ]);
    let ctx = parse_header(&data).unwrap();
    assert!(ctx.quant_table(0).is_some());
    assert_eq!(ctx.scan_data_offset(), Some(data.len()));
}

#[test]
fn no_dht_uses_defaults() {
    let data = jpeg(&[dqt(0), segment(0xda, &[1, 1, 0x00, 0, 63, 0])]);
    let ctx = parse_header(&data).unwrap();
    for id in 0..2 {
        assert!(ctx.dc_table(id).is_some());
        assert!(ctx.ac_table(id).is_some());
    }
    // 1010 is the luminance end-of-block code.
    assert_eq!(ctx.ac_table(0).unwrap().decode(0xa000), Some((0, 4)));
}

#[test]
fn empty_dht_disables_defaults() {
    let data = jpeg(&[
        dqt(0),
        segment(0xc4, &[]),
        segment(0xda, &[1, 1, 0x00, 0, 63, 0]),
    ]);
    let err = parse_header(&data).unwrap_err();
    assert_eq!(
        err,
        Error::MissingHuffmanTable {
            class: TableClass::Dc,
            id: 0
        }
    );
    assert_eq!(err.kind(), ErrorKind::MissingHuffmanTable);
}

#[test]
fn missing_prefix() {
    let mut data = jpeg(&[dqt(0)]);
    data.extend([0x12, 0xc4, 0x00]);
    let err = parse_header(&data).unwrap_err();
    assert_eq!(err, Error::MissingMarkerPrefix(0x12));
    assert_eq!(err.kind(), ErrorKind::MalformedStream);
}

#[test]
fn truncated_stream() {
    let data = jpeg(&[dqt(0)]);
    for len in 0..data.len() {
        let err = parse_header(&data[..len]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedStream, "{len}: {err}");
    }
    assert_eq!(parse_header(&data).unwrap_err(), Error::OutOfBounds);
}

#[test]
fn bad_signature() {
    assert_eq!(
        parse_header(&[0xff, 0xd9, 0xff, 0xd8]).unwrap_err(),
        Error::InvalidSignature(0xff, 0xd9)
    );
    assert_eq!(parse_header(&[0xff]).unwrap_err(), Error::OutOfBounds);
}

#[test]
fn oversized_huffman_table() {
    let mut payload = vec![0x00];
    let mut counts = [0u8; 16];
    counts[15] = 200;
    counts[14] = 57;
    payload.extend(counts);
    payload.extend([0u8; 257]);
    let data = jpeg(&[dht(0, 0), segment(0xc4, &payload), sos_ycbcr()]);

    let mut scanner = MarkerScanner::new(&data[2..], 2, ParseOptions::default());
    scanner.step().unwrap();
    let err = scanner.step().unwrap_err();
    assert_eq!(err, Error::TooManyHuffmanSymbols(257));
    assert_eq!(err.kind(), ErrorKind::MalformedHuffmanSpec);
    // The table from the first DHT is untouched.
    let dc = scanner.context().dc_table(0).unwrap();
    assert_eq!(dc.num_symbols(), 3);
    assert_eq!(dc.decode(0x8000), Some((1, 2)));
}

#[test]
fn unsupported_frames() {
    for marker in [0xc1, 0xc2, 0xc3, 0xc9, 0xcc] {
        let data = jpeg(&[segment(marker, &[8, 0, 8, 0, 8, 3])]);
        let err = parse_header(&data).unwrap_err();
        assert_eq!(err, Error::UnsupportedMarker(marker));
        assert_eq!(err.kind(), ErrorKind::UnsupportedFeature);
    }
}

#[test]
fn missing_huffman_table() {
    let data = jpeg(&[
        dqt(0),
        dqt(1),
        sof0(16, 16, [(1, 1), (1, 1), (1, 1)]),
        dht(0, 0),
        dht(1, 0),
        sos_ycbcr(),
    ]);
    let err = parse_header(&data).unwrap_err();
    assert_eq!(
        err,
        Error::MissingHuffmanTable {
            class: TableClass::Dc,
            id: 1
        }
    );
    assert_eq!(err.kind(), ErrorKind::MissingHuffmanTable);
}

#[test]
fn sampling_validation() {
    let data = jpeg(&[
        dqt(0),
        dqt(1),
        sof0(16, 16, [(1, 1), (2, 1), (1, 1)]),
        sos_ycbcr(),
    ]);
    assert!(parse_header(&data).is_ok());
    let err = parse_header_with_options(&data, &ParseOptions::strict()).unwrap_err();
    assert!(matches!(err, Error::SamplingMismatch(_)));
}

#[test]
fn eoi_before_scan() {
    let data = jpeg(&[dqt(0), vec![0xff, 0xd9]]);
    assert_eq!(parse_header(&data).unwrap_err(), Error::UnexpectedEoi);
}

#[test]
fn arbitrary_input_arb() {
    arbtest::arbtest(|u| {
        let mut data = vec![0xff, 0xd8];
        // Mostly well-formed segment boundaries with arbitrary payloads.
        while !u.is_empty() {
            let marker: u8 = u.arbitrary()?;
            let payload: Vec<u8> = u.arbitrary()?;
            if u.ratio(1, 8)? {
                data.extend(payload);
            } else {
                data.extend(segment(marker, &payload));
            }
        }
        if let Ok(ctx) = parse_header(&data) {
            let offset = ctx.scan_data_offset().unwrap();
            assert!(offset <= data.len());
        }
        Ok(())
    });
}
