/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fmt::Display;
use std::str::FromStr;

use clap::builder::PossibleValue;
use clap::ValueEnum;
use pixlab_core::colorspace::ColorSpace;
use pixlab_procs::histogram::EqualizeMode;

#[derive(Copy, Clone, Debug)]
#[allow(clippy::upper_case_acronyms)]
pub enum IColorSpace {
    RGB,
    RGBA,
    BGR,
    BGRA,
    Luma,
    LumaA,
    HSV,
    YCrCb,
    Lab
}

impl IColorSpace {
    pub const fn to_colorspace(self) -> ColorSpace {
        match self {
            IColorSpace::RGB => ColorSpace::RGB,
            IColorSpace::RGBA => ColorSpace::RGBA,
            IColorSpace::BGR => ColorSpace::BGR,
            IColorSpace::BGRA => ColorSpace::BGRA,
            IColorSpace::Luma => ColorSpace::Luma,
            IColorSpace::LumaA => ColorSpace::LumaA,
            IColorSpace::HSV => ColorSpace::HSV,
            IColorSpace::YCrCb => ColorSpace::YCrCb,
            IColorSpace::Lab => ColorSpace::Lab
        }
    }
}

impl ValueEnum for IColorSpace {
    fn value_variants<'a>() -> &'a [Self] {
        &[
            Self::RGB,
            Self::RGBA,
            Self::BGR,
            Self::BGRA,
            Self::Luma,
            Self::LumaA,
            Self::HSV,
            Self::YCrCb,
            Self::Lab
        ]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        Some(match self {
            Self::RGB => PossibleValue::new("rgb"),
            Self::RGBA => PossibleValue::new("rgba"),
            Self::BGR => PossibleValue::new("bgr"),
            Self::BGRA => PossibleValue::new("bgra"),
            Self::Luma => PossibleValue::new("luma").alias("grayscale"),
            Self::LumaA => PossibleValue::new("lumaA"),
            Self::HSV => PossibleValue::new("hsv"),
            Self::YCrCb => PossibleValue::new("ycrcb"),
            Self::Lab => PossibleValue::new("lab")
        })
    }
}

/// Tone curve presets
#[derive(Copy, Clone, Debug)]
pub enum ICurvePreset {
    Warming,
    Cooling
}

impl ValueEnum for ICurvePreset {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Warming, Self::Cooling]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        Some(match self {
            Self::Warming => PossibleValue::new("warming"),
            Self::Cooling => PossibleValue::new("cooling")
        })
    }
}

#[derive(Copy, Clone, Debug)]
pub enum IEqualizeMode {
    Luma,
    Channel,
    Value
}

impl IEqualizeMode {
    pub const fn to_equalize_mode(self) -> EqualizeMode {
        match self {
            IEqualizeMode::Luma => EqualizeMode::Luma,
            IEqualizeMode::Channel => EqualizeMode::PerChannel,
            IEqualizeMode::Value => EqualizeMode::Value
        }
    }
}

impl ValueEnum for IEqualizeMode {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Luma, Self::Channel, Self::Value]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        Some(match self {
            Self::Luma => PossibleValue::new("luma"),
            Self::Channel => PossibleValue::new("channel"),
            Self::Value => PossibleValue::new("value")
        })
    }
}

/// Split a `:` separated argument, checking the number of parts
pub fn split_args<'a>(
    value: &'a str, min: usize, max: usize, operation: &str
) -> Result<Vec<&'a str>, String> {
    let parts: Vec<&str> = value.split(':').map(str::trim).collect();

    if parts.len() < min || parts.len() > max {
        let expected = if min == max {
            min.to_string()
        } else {
            format!("{min} to {max}")
        };
        return Err(format!(
            "{operation} expected {expected} arguments separated by `:` in the command line, got {}",
            parts.len()
        ));
    }
    Ok(parts)
}

/// Parse one part of an argument, naming it in the error
pub fn parse_arg<T>(value: &str, name: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: Display
{
    value
        .parse::<T>()
        .map_err(|e| format!("Could not parse {name} from {value:?}, {e}"))
}

/// Parse a comma separated list such as `1,-2.5,3`
pub fn parse_list<T>(value: &str, name: &str) -> Result<Vec<T>, String>
where
    T: FromStr,
    T::Err: Display
{
    value
        .split(',')
        .map(|x| parse_arg::<T>(x.trim(), name))
        .collect()
}

/// Parse an `R:G:B` colour
pub fn parse_color(value: &str) -> Result<[u8; 3], String> {
    let parts = split_args(value, 3, 3, "Colour")?;

    Ok([
        parse_arg(parts[0], "red")?,
        parse_arg(parts[1], "green")?,
        parse_arg(parts[2], "blue")?
    ])
}

#[cfg(test)]
mod tests {
    use crate::cmd_args::arg_parsers::{parse_color, parse_list, split_args};

    #[test]
    fn splitting() {
        assert_eq!(split_args("1:binary", 2, 3, "Threshold").unwrap(), ["1", "binary"]);
        assert!(split_args("1", 2, 3, "Threshold").is_err());
        assert!(split_args("1:2:3:4", 2, 3, "Threshold").is_err());
    }

    #[test]
    fn lists_and_colours() {
        assert_eq!(parse_list::<f32>("0, -1,0.5", "weight").unwrap(), [0.0, -1.0, 0.5]);
        assert!(parse_list::<f32>("0,x", "weight").is_err());

        assert_eq!(parse_color("0:255:10").unwrap(), [0, 255, 10]);
        assert!(parse_color("0:256:10").is_err());
    }
}
