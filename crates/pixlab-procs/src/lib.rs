/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Image processing routines for `pixlab`
//!
//! Every routine implements the `OperationsTrait` defined by pixlab-image,
//! most also expose a free function working on plain slices.
//!
//! # Example
//! - Threshold a grayscale image, writing 255 where it is brighter than 127
//! ```
//! use pixlab_core::colorspace::ColorSpace;
//! use pixlab_image::image::Image;
//! use pixlab_image::traits::OperationsTrait;
//! use pixlab_procs::threshold::{Threshold, ThresholdMethod};
//! let mut image = Image::fill::<u8>(200, ColorSpace::Luma, 100, 100);
//! let threshold = Threshold::new(127.0, 255.0, ThresholdMethod::Binary);
//! // execute the filter
//! threshold.execute(&mut image).unwrap();
//! ```
//!
//! # Features
//! - `threads`: Process channels in parallel
//! - `log`: Log through the `log` crate
#![warn(
    clippy::correctness,
    clippy::perf,
    clippy::pedantic,
    clippy::inline_always,
    clippy::missing_errors_doc,
    clippy::panic
)]
#![allow(
    clippy::needless_return,
    clippy::similar_names,
    clippy::inline_always,
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::too_many_arguments,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_possible_wrap
)]

pub mod bilateral_filter;
pub mod bitwise;
pub mod blemish;
pub mod box_blur;
pub mod chroma_key;
pub mod connected_components;
pub mod convolve;
pub mod crop;
pub mod curves;
pub mod desaturate;
pub mod focus;
pub mod gaussian_blur;
pub mod histogram;
pub mod in_range;
pub mod instagram;
pub mod intensity;
pub mod laplacian;
pub mod manual_convert;
pub mod median;
pub mod morphology;
pub mod overlay;
pub mod pad;
pub mod resize;
pub mod sobel;
pub mod spatial;
pub mod threshold;
pub mod traits;
pub mod utils;
