/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use clap::builder::PossibleValue;
use clap::{value_parser, Arg, ArgAction, ArgGroup, Command, ValueEnum};

use crate::cmd_args::arg_parsers::{ICurvePreset, IColorSpace, IEqualizeMode};
use crate::cmd_args::help_strings::{
    ADAPTIVE_THRESHOLD_HELP, BLEMISH_HELP, CHROMA_KEY_HELP, COLORSPACE_HELP, MANUAL_HELP,
    MORPH_HELP, THRESHOLD_HELP
};

pub mod arg_parsers;
pub mod help_strings;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MmapOptions {
    No,
    Always,
    Auto
}

impl ValueEnum for MmapOptions {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::No, Self::Auto, Self::Always]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        Some(match self {
            Self::No => PossibleValue::new("no"),
            Self::Always => PossibleValue::new("always"),
            Self::Auto => PossibleValue::new("auto")
        })
    }
}

#[rustfmt::skip]
pub fn create_cmd_args() -> Command {
    Command::new("pixlab")
        .about("Classic computer vision routines over netpbm images")
        .arg(Arg::new("in")
            .short('i')
            .help("Input file to read data from")
            .long("input")
            .action(ArgAction::Append)
            .required(true))
        .arg(Arg::new("out")
            .short('o')
            .long("output")
            .help("Output to write the data to")
            .action(ArgAction::Append)
            .required_unless_present("probe"))
        .args(add_logging_options())
        .args(add_settings())
        .args(add_operations())
        .args(add_filters())
        .group(ArgGroup::new("operations")
            .args(OPERATIONS)
            .multiple(true))
        .group(ArgGroup::new("filters")
            .args(FILTERS)
            .multiple(true))
}

const OPERATIONS: [&str; 22] = [
    "grayscale", "colorspace", "manual-grayscale", "manual-hsv", "threshold",
    "manual-threshold", "adaptive-threshold", "curves", "components", "equalize",
    "desaturate", "contrast", "brightness", "invert", "remove-blemish", "chroma-key",
    "crop", "depth", "in-range", "otsu", "resize", "scale"
];

const FILTERS: [&str; 11] = [
    "box-blur", "blur", "median", "bilateral", "convolve", "sharpen", "sobel", "laplacian",
    "morph", "pencil-sketch", "cartoonify"
];

#[rustfmt::skip]
fn add_logging_options() -> [Arg; 4] {
    [
        Arg::new("debug")
            .long("debug")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display debug information and higher"),
        Arg::new("trace")
            .long("trace")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display very verbose information"),
        Arg::new("warn")
            .long("warn")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display warnings and errors"),
        Arg::new("info")
            .long("info")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display information about the operations carried out")
    ]
}

#[rustfmt::skip]
fn add_settings() -> [Arg; 9] {
    [
        Arg::new("mmap")
            .long("mmap")
            .help_heading("ADVANCED")
            .help("Influence the use of memory maps")
            .long_help("Change use of memory maps and how they are used for decoding.\nMemory maps are preferred for large images to keep memory usage low.")
            .value_parser(value_parser!(MmapOptions)),
        Arg::new("max-width")
            .long("max-width")
            .help_heading("ADVANCED")
            .help("Maximum width of an image, larger images are rejected")
            .default_value("65536")
            .value_parser(value_parser!(usize)),
        Arg::new("max-height")
            .long("max-height")
            .help_heading("ADVANCED")
            .help("Maximum height of an image, larger images are rejected")
            .default_value("65536")
            .value_parser(value_parser!(usize)),
        Arg::new("strict")
            .long("strict")
            .help_heading("ADVANCED")
            .action(ArgAction::SetTrue)
            .help("Treat recoverable decoding problems as errors"),
        Arg::new("all-yes")
            .long("yes")
            .short('y')
            .action(ArgAction::SetTrue)
            .help("Overwrite output files without asking"),
        Arg::new("probe")
            .long("probe")
            .action(ArgAction::SetTrue)
            .help("Print input file metadata as JSON"),
        Arg::new("stats")
            .long("stats")
            .action(ArgAction::SetTrue)
            .help("Print histogram and sharpness statistics of the result as JSON"),
        Arg::new("key-background")
            .long("key-background")
            .help_heading("ADVANCED")
            .value_name("R:G:B")
            .default_value("0:0:0")
            .help("Colour shown through pixels removed by --chroma-key"),
        Arg::new("normalize")
            .long("normalize")
            .action(ArgAction::SetTrue)
            .help_heading("ADVANCED")
            .help("Make --contrast and --brightness divide by the maximum instead of clipping")
    ]
}

#[rustfmt::skip]
fn add_operations() -> Vec<Arg> {
    vec![
        Arg::new("grayscale")
            .long("grayscale")
            .help_heading("OPERATIONS")
            .action(ArgAction::SetTrue)
            .help("Convert the image to grayscale"),
        Arg::new("colorspace")
            .long("colorspace")
            .help_heading("OPERATIONS")
            .help("Convert the image to another colorspace")
            .long_help(COLORSPACE_HELP)
            .value_parser(value_parser!(IColorSpace)),
        Arg::new("depth")
            .long("depth")
            .help_heading("OPERATIONS")
            .help("Change the image bit depth, one of 8, 16 or 32")
            .value_parser(value_parser!(u8)),
        Arg::new("manual-grayscale")
            .long("manual-grayscale")
            .help_heading("OPERATIONS")
            .action(ArgAction::SetTrue)
            .help("Convert to grayscale with the hand written routine")
            .long_help(MANUAL_HELP),
        Arg::new("manual-hsv")
            .long("manual-hsv")
            .help_heading("OPERATIONS")
            .action(ArgAction::SetTrue)
            .help("Convert to HSV with the hand written routine")
            .long_help(MANUAL_HELP),
        Arg::new("threshold")
            .long("threshold")
            .help_heading("OPERATIONS")
            .value_name("T:MODE[:MAX]")
            .help("Threshold every channel")
            .long_help(THRESHOLD_HELP),
        Arg::new("otsu")
            .long("otsu")
            .help_heading("OPERATIONS")
            .value_name("MODE")
            .help("Threshold an 8 bit image at the level picked by Otsu's method"),
        Arg::new("manual-threshold")
            .long("manual-threshold")
            .help_heading("OPERATIONS")
            .value_name("T[:MAX]")
            .help("Binary threshold of a grayscale image with the hand written loop"),
        Arg::new("adaptive-threshold")
            .long("adaptive-threshold")
            .help_heading("OPERATIONS")
            .value_name("BLOCK:C[:METHOD]")
            .help("Threshold each pixel against its neighbourhood")
            .long_help(ADAPTIVE_THRESHOLD_HELP),
        Arg::new("in-range")
            .long("in-range")
            .help_heading("OPERATIONS")
            .value_name("LOW,..:HIGH,..")
            .help("Mask of pixels whose every channel lies in the given bounds"),
        Arg::new("curves")
            .long("curves")
            .help_heading("OPERATIONS")
            .help("Apply a tone curve preset")
            .value_parser(value_parser!(ICurvePreset)),
        Arg::new("components")
            .long("components")
            .help_heading("OPERATIONS")
            .action(ArgAction::SetTrue)
            .help("Label connected components of a binary image"),
        Arg::new("equalize")
            .long("equalize")
            .help_heading("OPERATIONS")
            .help("Equalize the histogram")
            .value_parser(value_parser!(IEqualizeMode)),
        Arg::new("desaturate")
            .long("desaturate")
            .help_heading("OPERATIONS")
            .help("Scale the saturation, 0 removes all colour")
            .value_parser(value_parser!(f32)),
        Arg::new("contrast")
            .long("contrast")
            .help_heading("OPERATIONS")
            .allow_negative_numbers(true)
            .help("Change contrast by a percentage")
            .value_parser(value_parser!(f32)),
        Arg::new("brightness")
            .long("brightness")
            .help_heading("OPERATIONS")
            .allow_negative_numbers(true)
            .help("Add an offset, in 8 bit units, to every sample")
            .value_parser(value_parser!(f32)),
        Arg::new("invert")
            .long("invert")
            .help_heading("OPERATIONS")
            .action(ArgAction::SetTrue)
            .help("Invert every colour sample"),
        Arg::new("remove-blemish")
            .long("remove-blemish")
            .help_heading("OPERATIONS")
            .value_name("X:Y[:RADIUS]")
            .help("Replace a blemish with the smoothest nearby patch")
            .long_help(BLEMISH_HELP),
        Arg::new("chroma-key")
            .long("chroma-key")
            .help_heading("OPERATIONS")
            .value_name("R:G:B[:TOL[:SOFT]]")
            .help("Replace pixels close to a key colour")
            .long_help(CHROMA_KEY_HELP),
        Arg::new("crop")
            .long("crop")
            .help_heading("OPERATIONS")
            .value_name("W:H:X:Y")
            .help("Crop a region out of the image"),
        Arg::new("resize")
            .long("resize")
            .help_heading("OPERATIONS")
            .value_name("W:H[:METHOD]")
            .help("Resize to W x H with nearest or bilinear (default) interpolation"),
        Arg::new("scale")
            .long("scale")
            .help_heading("OPERATIONS")
            .value_name("FX:FY[:METHOD]")
            .help("Scale width and height by factors, rounding the new size")
    ]
}

#[rustfmt::skip]
fn add_filters() -> Vec<Arg> {
    vec![
        Arg::new("box-blur")
            .long("box-blur")
            .help_heading("FILTERS")
            .help("Mean filter with an odd kernel size")
            .value_parser(value_parser!(usize)),
        Arg::new("blur")
            .long("blur")
            .help_heading("FILTERS")
            .value_name("K[:SIGMA]")
            .help("Gaussian blur, a size of 0 derives it from sigma"),
        Arg::new("median")
            .long("median")
            .help_heading("FILTERS")
            .help("Median filter with an odd kernel size")
            .value_parser(value_parser!(usize)),
        Arg::new("bilateral")
            .long("bilateral")
            .help_heading("FILTERS")
            .value_name("D:SIGMA_COLOR:SIGMA_SPACE")
            .help("Edge preserving bilateral filter"),
        Arg::new("convolve")
            .long("convolve")
            .help_heading("FILTERS")
            .allow_hyphen_values(true)
            .value_name("W1,W2,..")
            .help("Convolve with a square kernel given as comma separated weights"),
        Arg::new("sharpen")
            .long("sharpen")
            .help_heading("FILTERS")
            .action(ArgAction::SetTrue)
            .help("Sharpen with a 3x3 kernel"),
        Arg::new("sobel")
            .long("sobel")
            .help_heading("FILTERS")
            .action(ArgAction::SetTrue)
            .help("Sobel gradient magnitude"),
        Arg::new("laplacian")
            .long("laplacian")
            .help_heading("FILTERS")
            .action(ArgAction::SetTrue)
            .help("Absolute value of the 3x3 laplacian"),
        Arg::new("morph")
            .long("morph")
            .help_heading("FILTERS")
            .value_name("OP:SHAPE:SIZE[:ITERATIONS]")
            .help("Erode, dilate, open or close")
            .long_help(MORPH_HELP),
        Arg::new("pencil-sketch")
            .long("pencil-sketch")
            .help_heading("FILTERS")
            .action(ArgAction::SetTrue)
            .help("Pencil sketch effect"),
        Arg::new("cartoonify")
            .long("cartoonify")
            .help_heading("FILTERS")
            .action(ArgAction::SetTrue)
            .help("Cartoon effect")
    ]
}
