/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Global Decoder options

use crate::colorspace::ColorSpace;

/// Decoder options
///
/// Not all options are respected by decoders all decoders
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DecoderOptions {
    /// Maximum width for which decoders will
    /// not try to decode images larger than
    /// the specified width.
    ///
    /// - Default value: 16384
    max_width:      usize,
    /// Maximum height for which decoders will not
    /// try to decode images larger than the
    /// specified height
    ///
    /// - Default value: 16384
    max_height:     usize,
    /// Whether the decoder should error out on
    /// truncated or otherwise malformed data instead of
    /// recovering what it can.
    ///
    /// - Default value: false
    strict_mode:    bool,
    /// Colorspace three channel images should be returned in.
    ///
    /// Only `RGB` and `BGR` are honoured, everything else
    /// is treated as `RGB`.
    ///
    /// - Default value: `ColorSpace::RGB`
    out_colorspace: ColorSpace
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            max_width:      1 << 14,
            max_height:     1 << 14,
            strict_mode:    false,
            out_colorspace: ColorSpace::RGB
        }
    }
}

impl DecoderOptions {
    /// Options used by the command line.
    ///
    /// Allows larger images and returns color images in BGR order
    pub fn new_cmd() -> DecoderOptions {
        DecoderOptions::default()
            .set_max_width(1 << 16)
            .set_max_height(1 << 16)
            .set_out_colorspace(ColorSpace::BGR)
    }

    /// Get maximum width configured for which the decoder
    /// should not try to decode images greater than this width
    pub const fn max_width(&self) -> usize {
        self.max_width
    }

    /// Get maximum height configured for which the decoder should
    /// not try to decode images greater than this height
    pub const fn max_height(&self) -> usize {
        self.max_height
    }

    /// Return true whether the decoder should be in strict mode
    pub const fn strict_mode(&self) -> bool {
        self.strict_mode
    }

    /// Return the colorspace color images should be decoded to
    pub const fn out_colorspace(&self) -> ColorSpace {
        self.out_colorspace
    }

    /// Set maximum width for which the decoder should not try
    /// decoding images greater than that width
    ///
    /// # Arguments
    ///
    /// * `width`:  The maximum width allowed
    ///
    /// returns: DecoderOptions
    pub fn set_max_width(mut self, width: usize) -> Self {
        self.max_width = width;
        self
    }

    /// Set maximum height for which the decoder should not try
    /// decoding images greater than that height
    pub fn set_max_height(mut self, height: usize) -> Self {
        self.max_height = height;
        self
    }

    /// Set whether the decoder should be strict when
    /// it encounters malformed data
    pub fn set_strict_mode(mut self, yes: bool) -> Self {
        self.strict_mode = yes;
        self
    }

    pub fn set_out_colorspace(mut self, colorspace: ColorSpace) -> Self {
        self.out_colorspace = colorspace;
        self
    }
}

#[cfg(test)]
mod tests {
    use crate::colorspace::ColorSpace;
    use crate::options::DecoderOptions;

    #[test]
    fn builder_chains() {
        let options = DecoderOptions::default()
            .set_max_width(10)
            .set_max_height(20)
            .set_strict_mode(true);

        assert_eq!(options.max_width(), 10);
        assert_eq!(options.max_height(), 20);
        assert!(options.strict_mode());
        assert_eq!(options.out_colorspace(), ColorSpace::RGB);
        assert_eq!(DecoderOptions::new_cmd().out_colorspace(), ColorSpace::BGR);
    }
}
