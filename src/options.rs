// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

/// Options that control how strictly a header is validated.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct ParseOptions {
    /// Reject frames whose chroma components are not 1x1 or whose luma
    /// sampling factors are smaller than the chroma ones.
    /// Default: false
    pub strict_sampling: bool,
    /// Install the typical Huffman tables when a stream reaches its scan
    /// without any DHT segment.
    /// Default: true
    pub default_huffman_tables: bool,
    /// Maximum number of pixels (width * height) a frame may have.
    /// Set to `None` to disable the limit.
    /// Default: None
    pub pixel_limit: Option<usize>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            strict_sampling: false,
            default_huffman_tables: true,
            pixel_limit: None,
        }
    }
}

impl ParseOptions {
    /// Default options with the sampling factor checks enabled.
    pub fn strict() -> Self {
        Self {
            strict_sampling: true,
            ..Self::default()
        }
    }

    pub fn with_pixel_limit(mut self, limit: usize) -> Self {
        self.pixel_limit = Some(limit);
        self
    }

    pub fn without_default_huffman_tables(mut self) -> Self {
        self.default_huffman_tables = false;
        self
    }
}
