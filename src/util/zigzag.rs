// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

/// Maps the i-th coefficient in zig-zag order to its index in row-major
/// (natural) order within an 8x8 block.
#[rustfmt::skip]
pub const ZIGZAG_TO_NATURAL: [usize; 64] = [
     0,  1,  8, 16,  9,  2,  3, 10,
    17, 24, 32, 25, 18, 11,  4,  5,
    12, 19, 26, 33, 40, 48, 41, 34,
    27, 20, 13,  6,  7, 14, 21, 28,
    35, 42, 49, 56, 57, 50, 43, 36,
    29, 22, 15, 23, 30, 37, 44, 51,
    58, 59, 52, 45, 38, 31, 39, 46,
    53, 60, 61, 54, 47, 55, 62, 63,
];

#[cfg(test)]
mod test {
    use test_log::test;

    use super::ZIGZAG_TO_NATURAL;

    #[test]
    fn is_permutation() {
        let mut seen = [false; 64];
        for &i in ZIGZAG_TO_NATURAL.iter() {
            assert!(!seen[i]);
            seen[i] = true;
        }
    }

    #[test]
    fn walks_anti_diagonals() {
        // Consecutive entries are always neighbours along an anti-diagonal or
        // a step along the block border.
        for w in ZIGZAG_TO_NATURAL.windows(2) {
            let (r0, c0) = ((w[0] / 8) as i32, (w[0] % 8) as i32);
            let (r1, c1) = ((w[1] / 8) as i32, (w[1] % 8) as i32);
            assert!((r0 - r1).abs() <= 1 && (c0 - c1).abs() <= 1);
        }
    }
}
