/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use clap::ArgMatches;
use log::debug;
use pixlab_core::bit_depth::BitDepth;
use pixlab_core::colorspace::ColorSpace;
use pixlab_image::core_filters::colorspace::ColorspaceConv;
use pixlab_image::core_filters::depth::Depth;
use pixlab_image::pipelines::Pipeline;
use pixlab_image::traits::IntoImage;
use pixlab_procs::bitwise::BitwiseNot;
use pixlab_procs::blemish::{BlemishRemoval, DEFAULT_RADIUS};
use pixlab_procs::chroma_key::{Background, ChromaKey};
use pixlab_procs::connected_components::{Connectivity, ConnectedComponents};
use pixlab_procs::crop::Crop;
use pixlab_procs::curves::Curves;
use pixlab_procs::desaturate::Desaturate;
use pixlab_procs::histogram::EqualizeHistogram;
use pixlab_procs::in_range::InRange;
use pixlab_procs::intensity::{Brightness, Contrast};
use pixlab_procs::manual_convert::{ManualGrayscale, ManualHsv};
use pixlab_procs::resize::{Resize, ResizeMethod};
use pixlab_procs::threshold::{
    AdaptiveMethod, AdaptiveThreshold, ManualThreshold, Threshold, ThresholdMethod
};

use crate::cmd_args::arg_parsers::{
    parse_arg, parse_color, parse_list, split_args, ICurvePreset, IColorSpace, IEqualizeMode
};
use crate::cmd_parsers::get_value;

pub fn parse_options<T: IntoImage>(
    workflow: &mut Pipeline<T>, argument: &str, args: &ArgMatches
) -> Result<(), String> {
    if argument == "grayscale" {
        debug!("Added grayscale operation");
        workflow.chain_operations(Box::new(ColorspaceConv::new(ColorSpace::Luma)));
    } else if argument == "colorspace" {
        let colorspace = get_value::<IColorSpace>(args, argument)?.to_colorspace();

        debug!("Added colorspace conversion from source colorspace to {colorspace:?}");
        workflow.chain_operations(Box::new(ColorspaceConv::new(colorspace)));
    } else if argument == "depth" {
        let value = *get_value::<u8>(args, argument)?;
        let depth = match value {
            8 => BitDepth::Eight,
            16 => BitDepth::Sixteen,
            32 => BitDepth::Float32,
            _ => {
                return Err(format!(
                    "Unknown depth value {value}, supported depths are 8, 16 and 32"
                ))
            }
        };
        debug!("Added depth operation with depth of {value}");
        workflow.chain_operations(Box::new(Depth::new(depth)));
    } else if argument == "manual-grayscale" {
        debug!("Added manual grayscale operation");
        workflow.chain_operations(Box::new(ManualGrayscale::new()));
    } else if argument == "manual-hsv" {
        debug!("Added manual hsv operation");
        workflow.chain_operations(Box::new(ManualHsv::new()));
    } else if argument == "threshold" {
        let values = split_args(get_value::<String>(args, argument)?, 2, 3, "Threshold")?;

        let thresh = parse_arg::<f32>(values[0], "threshold")?;
        let thresh_mode = ThresholdMethod::from_string_result(values[1])?;
        let max_value = match values.get(2) {
            Some(x) => parse_arg::<f32>(x, "maximum value")?,
            None => 255.0
        };
        workflow.chain_operations(Box::new(Threshold::new(thresh, max_value, thresh_mode)));

        debug!(
            "Added threshold operation with mode {:?} and value {:?}",
            thresh_mode, thresh
        );
    } else if argument == "otsu" {
        let thresh_mode = ThresholdMethod::from_string_result(get_value::<String>(args, argument)?)?;

        debug!("Added otsu threshold with mode {thresh_mode:?}");
        workflow.chain_operations(Box::new(Threshold::otsu(255.0, thresh_mode)));
    } else if argument == "manual-threshold" {
        let values = split_args(get_value::<String>(args, argument)?, 1, 2, "Manual threshold")?;

        let thresh = parse_arg::<u8>(values[0], "threshold")?;
        let max_value = match values.get(1) {
            Some(x) => parse_arg::<u8>(x, "maximum value")?,
            None => 255
        };
        debug!("Added manual threshold with value {thresh} and maximum {max_value}");
        workflow.chain_operations(Box::new(ManualThreshold::new(thresh, max_value)));
    } else if argument == "adaptive-threshold" {
        let values = split_args(get_value::<String>(args, argument)?, 2, 3, "Adaptive threshold")?;

        let block_size = parse_arg::<usize>(values[0], "block size")?;
        let c = parse_arg::<f32>(values[1], "constant")?;
        let method = match values.get(2).copied() {
            None | Some("mean") => AdaptiveMethod::Mean,
            Some("gaussian") => AdaptiveMethod::Gaussian,
            Some(other) => {
                return Err(format!(
                    "Unknown adaptive method {other}, accepted values are mean,gaussian"
                ))
            }
        };
        debug!("Added adaptive threshold with block {block_size}, c={c} and {method:?}");
        workflow.chain_operations(Box::new(AdaptiveThreshold::new(
            block_size, c, 255, method, false
        )));
    } else if argument == "in-range" {
        let values = split_args(get_value::<String>(args, argument)?, 2, 2, "In range")?;

        let lower = parse_list::<f32>(values[0], "lower bound")?;
        let upper = parse_list::<f32>(values[1], "upper bound")?;

        debug!("Added in range with lower={lower:?} upper={upper:?}");
        workflow.chain_operations(Box::new(InRange::new(lower, upper)));
    } else if argument == "curves" {
        let curves = match get_value::<ICurvePreset>(args, argument)? {
            ICurvePreset::Warming => Curves::warming(),
            ICurvePreset::Cooling => Curves::cooling()
        };
        debug!("Added curves {curves:?}");
        workflow.chain_operations(Box::new(curves));
    } else if argument == "components" {
        debug!("Added connected components");
        workflow.chain_operations(Box::new(ConnectedComponents::new(Connectivity::Eight)));
    } else if argument == "equalize" {
        let mode = get_value::<IEqualizeMode>(args, argument)?.to_equalize_mode();

        debug!("Added histogram equalization with mode {mode:?}");
        workflow.chain_operations(Box::new(EqualizeHistogram::new(mode)));
    } else if argument == "desaturate" {
        let scale = *get_value::<f32>(args, argument)?;

        debug!("Added desaturate with scale {scale}");
        workflow.chain_operations(Box::new(Desaturate::new(scale)));
    } else if argument == "contrast" {
        let value = *get_value::<f32>(args, argument)?;
        let normalize = args.get_flag("normalize");

        debug!("Added contrast filter with value {value}, normalize={normalize}");
        workflow.chain_operations(Box::new(Contrast::new(value, normalize)));
    } else if argument == "brightness" {
        let value = *get_value::<f32>(args, argument)?;
        let normalize = args.get_flag("normalize");

        debug!("Added brightness filter with value {value}, normalize={normalize}");
        workflow.chain_operations(Box::new(Brightness::new(value, normalize)));
    } else if argument == "invert" {
        debug!("Added invert operation");
        workflow.chain_operations(Box::new(BitwiseNot::new()));
    } else if argument == "remove-blemish" {
        let values = split_args(get_value::<String>(args, argument)?, 2, 3, "Blemish removal")?;

        let x = parse_arg::<usize>(values[0], "x")?;
        let y = parse_arg::<usize>(values[1], "y")?;
        let radius = match values.get(2) {
            Some(r) => parse_arg::<usize>(r, "radius")?,
            None => DEFAULT_RADIUS
        };
        debug!("Added blemish removal at ({x},{y}) with radius {radius}");
        workflow.chain_operations(Box::new(BlemishRemoval::new(x, y, radius)));
    } else if argument == "chroma-key" {
        let values = split_args(get_value::<String>(args, argument)?, 3, 5, "Chroma key")?;

        let key = parse_color(&values[..3].join(":"))?;
        let tolerance = match values.get(3) {
            Some(x) => parse_arg::<f32>(x, "tolerance")?,
            None => 40.0
        };
        let softness = match values.get(4) {
            Some(x) => parse_arg::<f32>(x, "softness")?,
            None => 20.0
        };
        let background = parse_color(get_value::<String>(args, "key-background")?)?;

        debug!(
            "Added chroma key for {key:?} with tolerance {tolerance}, softness {softness} over {background:?}"
        );
        workflow.chain_operations(Box::new(ChromaKey::new(
            key,
            tolerance,
            softness,
            Background::Color(background)
        )));
    } else if argument == "crop" {
        let values = split_args(get_value::<String>(args, argument)?, 4, 4, "Crop")?;

        let width = parse_arg::<usize>(values[0], "width")?;
        let height = parse_arg::<usize>(values[1], "height")?;
        let x = parse_arg::<usize>(values[2], "x")?;
        let y = parse_arg::<usize>(values[3], "y")?;

        debug!("Added crop with arguments width={width} height={height} x={x} y={y}");
        workflow.chain_operations(Box::new(Crop::new(width, height, x, y)));
    } else if argument == "resize" {
        let values = split_args(get_value::<String>(args, argument)?, 2, 3, "Resize")?;

        let width = parse_arg::<usize>(values[0], "width")?;
        let height = parse_arg::<usize>(values[1], "height")?;
        let method = resize_method(values.get(2))?;

        debug!("Added resize to {width}x{height} with {method:?}");
        workflow.chain_operations(Box::new(Resize::new(width, height, method)));
    } else if argument == "scale" {
        let values = split_args(get_value::<String>(args, argument)?, 2, 3, "Scale")?;

        let fx = parse_arg::<f64>(values[0], "fx")?;
        let fy = parse_arg::<f64>(values[1], "fy")?;
        let method = resize_method(values.get(2))?;

        debug!("Added scale by {fx}x{fy} with {method:?}");
        workflow.chain_operations(Box::new(Resize::scaled(fx, fy, method)));
    }

    Ok(())
}

fn resize_method(value: Option<&&str>) -> Result<ResizeMethod, String> {
    value.map_or(Ok(ResizeMethod::Bilinear), |x| ResizeMethod::from_string_result(x))
}
