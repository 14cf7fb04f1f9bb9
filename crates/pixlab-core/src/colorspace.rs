/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Image Colorspace information and manipulation utilities.

use std::str::FromStr;

/// All possible image colorspaces
/// Some of them aren't yet supported exist here.
#[allow(clippy::upper_case_acronyms)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
pub enum ColorSpace {
    /// Red, Green , Blue
    RGB,
    /// Red, Green, Blue, Alpha
    RGBA,
    /// Blue, Green, Red
    ///
    /// The channel order most of the tutorial programs
    /// work in
    BGR,
    /// Blue, Green, Red, Alpha
    BGRA,
    /// Monochrome
    Luma,
    /// Monochrome with alpha channel
    LumaA,
    /// Hue, Saturation, Value
    ///
    /// For 8 bit images hue is stored in the range 0..180,
    /// i.e degrees halved, so that it fits a byte.
    HSV,
    /// Luminance followed by red and blue difference
    YCrCb,
    /// CIE L*a*b*
    Lab,
    /// Unknown colorspace
    #[default]
    Unknown
}

impl ColorSpace {
    /// Number of color channels present for a certain colorspace
    ///
    /// E.g. RGB returns 3 since it contains R,G and B colors to make up a pixel
    pub const fn num_components(&self) -> usize {
        match self {
            Self::RGB | Self::BGR | Self::HSV | Self::YCrCb | Self::Lab => 3,
            Self::RGBA | Self::BGRA => 4,
            Self::Luma => 1,
            Self::LumaA => 2,
            Self::Unknown => 0
        }
    }

    /// Return true if the colorspace carries an alpha channel
    pub const fn has_alpha(&self) -> bool {
        matches!(self, Self::RGBA | Self::LumaA | Self::BGRA)
    }

    pub const fn is_grayscale(&self) -> bool {
        matches!(self, Self::LumaA | Self::Luma)
    }

    /// Returns true if the colorspace stores red, green and blue
    /// samples in any order, with or without alpha
    pub const fn is_rgb_family(&self) -> bool {
        matches!(self, Self::RGB | Self::RGBA | Self::BGR | Self::BGRA)
    }

    /// Returns the position of the alpha channel, if present
    pub const fn alpha_position(&self) -> Option<usize> {
        match self {
            Self::RGBA | Self::BGRA => Some(3),
            Self::LumaA => Some(1),
            _ => None
        }
    }

    /// Position of the red, green and blue channels for the rgb family
    ///
    /// Returns `None` for colorspaces that do not store rgb samples
    pub const fn rgb_positions(&self) -> Option<[usize; 3]> {
        match self {
            Self::RGB | Self::RGBA => Some([0, 1, 2]),
            Self::BGR | Self::BGRA => Some([2, 1, 0]),
            _ => None
        }
    }
}

/// Encapsulates all colorspaces supported by
/// the library
pub static ALL_COLORSPACES: [ColorSpace; 9] = [
    ColorSpace::RGB,
    ColorSpace::RGBA,
    ColorSpace::BGR,
    ColorSpace::BGRA,
    ColorSpace::Luma,
    ColorSpace::LumaA,
    ColorSpace::HSV,
    ColorSpace::YCrCb,
    ColorSpace::Lab
];

impl FromStr for ColorSpace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let colorspace = match s.to_ascii_lowercase().as_str() {
            "rgb" => ColorSpace::RGB,
            "rgba" => ColorSpace::RGBA,
            "bgr" => ColorSpace::BGR,
            "bgra" => ColorSpace::BGRA,
            "luma" | "gray" | "grayscale" => ColorSpace::Luma,
            "lumaa" | "graya" => ColorSpace::LumaA,
            "hsv" => ColorSpace::HSV,
            "ycrcb" => ColorSpace::YCrCb,
            "lab" => ColorSpace::Lab,
            _ => return Err(format!("Unknown colorspace {s}"))
        };
        Ok(colorspace)
    }
}

#[cfg(test)]
mod tests {
    use crate::colorspace::{ColorSpace, ALL_COLORSPACES};

    #[test]
    fn parse_names() {
        for colorspace in ALL_COLORSPACES {
            let name = format!("{colorspace:?}");
            assert_eq!(name.parse::<ColorSpace>().unwrap(), colorspace);
        }
        assert_eq!("gray".parse::<ColorSpace>().unwrap(), ColorSpace::Luma);
        assert!("cmyk".parse::<ColorSpace>().is_err());
    }

    #[test]
    fn alpha_positions() {
        for colorspace in ALL_COLORSPACES {
            assert_eq!(colorspace.has_alpha(), colorspace.alpha_position().is_some());
        }
    }
}
