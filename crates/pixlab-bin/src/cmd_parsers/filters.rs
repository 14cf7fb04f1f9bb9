/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use clap::ArgMatches;
use log::debug;
use pixlab_image::pipelines::Pipeline;
use pixlab_image::traits::IntoImage;
use pixlab_procs::bilateral_filter::BilateralFilter;
use pixlab_procs::box_blur::BoxBlur;
use pixlab_procs::convolve::Convolve;
use pixlab_procs::gaussian_blur::GaussianBlur;
use pixlab_procs::instagram::{Cartoonify, PencilSketch};
use pixlab_procs::laplacian::Laplacian;
use pixlab_procs::median::Median;
use pixlab_procs::morphology::{ElementShape, MorphOp, Morphology, StructuringElement};
use pixlab_procs::sobel::Sobel;

use crate::cmd_args::arg_parsers::{parse_arg, parse_list, split_args};
use crate::cmd_parsers::get_value;

pub fn parse_options<T: IntoImage>(
    workflow: &mut Pipeline<T>, argument: &str, args: &ArgMatches
) -> Result<(), String> {
    if argument == "box-blur" {
        let ksize = *get_value::<usize>(args, argument)?;
        debug!("Added box blur filter with size {}", ksize);

        workflow.chain_operations(Box::new(BoxBlur::new(ksize)));
    } else if argument == "blur" {
        let values = split_args(get_value::<String>(args, argument)?, 1, 2, "Blur")?;

        let ksize = parse_arg::<usize>(values[0], "kernel size")?;
        let sigma = match values.get(1) {
            Some(sigma) => parse_arg::<f32>(sigma, "sigma")?,
            None => 0.0
        };
        debug!("Added gaussian blur filter with size {ksize} and sigma {sigma}");

        workflow.chain_operations(Box::new(GaussianBlur::new(ksize, sigma)));
    } else if argument == "median" {
        let ksize = *get_value::<usize>(args, argument)?;
        debug!("Added median blur with size of {ksize}");

        workflow.chain_operations(Box::new(Median::new(ksize)));
    } else if argument == "bilateral" {
        let values = split_args(get_value::<String>(args, argument)?, 3, 3, "Bilateral")?;

        let diameter = parse_arg::<i32>(values[0], "diameter")?;
        let sigma_color = parse_arg::<f32>(values[1], "sigma color")?;
        let sigma_space = parse_arg::<f32>(values[2], "sigma space")?;

        debug!(
            "Added bilateral filter with diameter={} sigma_color={} sigma_space={}",
            diameter, sigma_color, sigma_space
        );
        workflow.chain_operations(Box::new(BilateralFilter::new(
            diameter,
            sigma_color,
            sigma_space
        )));
    } else if argument == "convolve" {
        debug!("Adding convolution filter");

        let weights = parse_list::<f32>(get_value::<String>(args, argument)?, "weight")?;
        let convolve = Convolve::square(weights).map_err(|e| e.to_string())?;

        workflow.chain_operations(Box::new(convolve));
    } else if argument == "sharpen" {
        debug!("Added sharpen filter");
        workflow.chain_operations(Box::new(Convolve::sharpen()));
    } else if argument == "sobel" {
        debug!("Added sobel filter");
        workflow.chain_operations(Box::new(Sobel::new()));
    } else if argument == "laplacian" {
        debug!("Added laplacian filter");
        workflow.chain_operations(Box::new(Laplacian::new(3)));
    } else if argument == "morph" {
        let values = split_args(get_value::<String>(args, argument)?, 3, 4, "Morphology")?;

        let operation = MorphOp::from_string_result(values[0])?;
        let shape = ElementShape::from_string_result(values[1])?;
        let size = parse_arg::<usize>(values[2], "element size")?;
        let iterations = match values.get(3) {
            Some(x) => parse_arg::<usize>(x, "iterations")?,
            None => 1
        };
        debug!("Added {operation:?} with a {size}x{size} {shape:?} element, {iterations} times");

        let element = StructuringElement::new(shape, size, size);
        workflow.chain_operations(Box::new(Morphology::new(operation, element, iterations)));
    } else if argument == "pencil-sketch" {
        debug!("Added pencil sketch filter");
        workflow.chain_operations(Box::new(PencilSketch::default()));
    } else if argument == "cartoonify" {
        debug!("Added cartoon filter");
        workflow.chain_operations(Box::new(Cartoonify::new()));
    }

    Ok(())
}
