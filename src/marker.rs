// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! JPEG marker codes (ITU-T T.81, Table B.1).

use std::fmt;

use crate::error::{Error, Result};

/// Byte that introduces every marker. Repeated occurrences are fill bytes.
pub const MARKER_PREFIX: u8 = 0xff;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Start of frame `SOFn`; `n` is the offset from `0xc0`. Only `SOF0`
    /// (baseline DCT) is supported.
    Sof(u8),
    /// Define Huffman table(s)
    Dht,
    /// Reserved for JPEG extensions (`0xc8`)
    Jpg,
    /// Define arithmetic coding conditioning(s)
    Dac,
    /// Restart with modulo 8 count `m`
    Rst(u8),
    /// Start of image
    Soi,
    /// End of image
    Eoi,
    /// Start of scan
    Sos,
    /// Define quantization table(s)
    Dqt,
    /// Define number of lines
    Dnl,
    /// Define restart interval
    Dri,
    /// Define hierarchical progression
    Dhp,
    /// Expand reference component(s)
    Exp,
    /// Application segment `APPn`
    App(u8),
    /// Reserved for JPEG extensions `JPGn`
    JpgN(u8),
    /// Comment
    Com,
    /// For temporary private use in arithmetic coding
    Tem,
    /// Reserved (`0x02..=0xbf`)
    Reserved(u8),
}

impl Marker {
    pub const SOF0: u8 = 0xc0;
    pub const DHT: u8 = 0xc4;
    pub const SOI: u8 = 0xd8;
    pub const EOI: u8 = 0xd9;
    pub const SOS: u8 = 0xda;
    pub const DQT: u8 = 0xdb;
    pub const DRI: u8 = 0xdd;
    pub const APP0: u8 = 0xe0;
    pub const COM: u8 = 0xfe;

    /// Decodes a marker code. `0x00` (a stuffed byte) and `0xff` (a fill
    /// byte) are not marker codes.
    pub fn from_u8(code: u8) -> Option<Marker> {
        use Marker::*;
        Some(match code {
            0x01 => Tem,
            0x02..=0xbf => Reserved(code),
            0xc4 => Dht,
            0xc8 => Jpg,
            0xcc => Dac,
            0xc0..=0xcf => Sof(code - 0xc0),
            0xd0..=0xd7 => Rst(code - 0xd0),
            0xd8 => Soi,
            0xd9 => Eoi,
            0xda => Sos,
            0xdb => Dqt,
            0xdc => Dnl,
            0xdd => Dri,
            0xde => Dhp,
            0xdf => Exp,
            0xe0..=0xef => App(code - 0xe0),
            0xf0..=0xfd => JpgN(code - 0xf0),
            0xfe => Com,
            0x00 | 0xff => return None,
        })
    }

    /// Returns the code byte that follows the `0xff` prefix.
    pub fn code(self) -> u8 {
        use Marker::*;
        match self {
            Sof(n) => 0xc0 + n,
            Dht => 0xc4,
            Jpg => 0xc8,
            Dac => 0xcc,
            Rst(m) => 0xd0 + m,
            Soi => 0xd8,
            Eoi => 0xd9,
            Sos => 0xda,
            Dqt => 0xdb,
            Dnl => 0xdc,
            Dri => 0xdd,
            Dhp => 0xde,
            Exp => 0xdf,
            App(n) => 0xe0 + n,
            JpgN(n) => 0xf0 + n,
            Com => 0xfe,
            Tem => 0x01,
            Reserved(code) => code,
        }
    }

    /// Whether the marker is followed by a length-prefixed segment.
    /// `SOI`, `EOI`, `RSTm` and `TEM` stand alone.
    pub fn has_segment(self) -> bool {
        !matches!(self, Marker::Soi | Marker::Eoi | Marker::Rst(_) | Marker::Tem)
    }

    /// Whether the marker introduces a coding process other than baseline
    /// sequential Huffman DCT.
    pub fn is_unsupported(self) -> bool {
        matches!(self, Marker::Sof(n) if n != 0) || self == Marker::Dac
    }
}

impl TryFrom<u8> for Marker {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        Self::from_u8(code).ok_or(Error::InvalidMarker(code))
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Marker::*;
        match *self {
            Sof(n) => write!(f, "SOF{n}"),
            Dht => write!(f, "DHT"),
            Jpg => write!(f, "JPG"),
            Dac => write!(f, "DAC"),
            Rst(m) => write!(f, "RST{m}"),
            Soi => write!(f, "SOI"),
            Eoi => write!(f, "EOI"),
            Sos => write!(f, "SOS"),
            Dqt => write!(f, "DQT"),
            Dnl => write!(f, "DNL"),
            Dri => write!(f, "DRI"),
            Dhp => write!(f, "DHP"),
            Exp => write!(f, "EXP"),
            App(n) => write!(f, "APP{n}"),
            JpgN(n) => write!(f, "JPG{n}"),
            Com => write!(f, "COM"),
            Tem => write!(f, "TEM"),
            Reserved(code) => write!(f, "RES({code:02x})"),
        }
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use super::*;

    #[test]
    fn code_roundtrip() {
        for code in 0x01..=0xfe {
            let marker = Marker::try_from(code).unwrap();
            assert_eq!(marker.code(), code, "{marker}");
        }
    }

    #[test]
    fn not_markers() {
        assert_eq!(Marker::try_from(0x00), Err(Error::InvalidMarker(0x00)));
        assert_eq!(Marker::from_u8(0xff), None);
    }

    #[test]
    fn frame_markers() {
        assert_eq!(Marker::from_u8(Marker::SOF0), Some(Marker::Sof(0)));
        assert_eq!(Marker::from_u8(0xc2), Some(Marker::Sof(2)));
        assert_eq!(Marker::from_u8(0xcf), Some(Marker::Sof(15)));
        assert_eq!(Marker::from_u8(Marker::DHT), Some(Marker::Dht));
        assert_eq!(Marker::from_u8(0xcc), Some(Marker::Dac));
        assert!(!Marker::Sof(0).is_unsupported());
        assert!(Marker::Sof(1).is_unsupported());
        assert!(Marker::Sof(2).is_unsupported());
        assert!(Marker::Dac.is_unsupported());
        assert!(!Marker::Dht.is_unsupported());
    }

    #[test]
    fn standalone_markers() {
        assert!(!Marker::Eoi.has_segment());
        assert!(!Marker::Rst(7).has_segment());
        assert!(Marker::App(0).has_segment());
        assert!(Marker::Com.has_segment());
        assert!(Marker::Sos.has_segment());
    }
}
