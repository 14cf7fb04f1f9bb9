/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Gaussian blur
//!
//! The blur is separable, a 1D kernel is run over the rows then the columns.
use pixlab_core::bit_depth::{BitDepth, BitType};
use pixlab_image::channel::Channel;
use pixlab_image::errors::ImageErrors;
use pixlab_image::image::Image;
use pixlab_image::traits::OperationsTrait;

use crate::convolve::convolve_separable;
use crate::pad::PadMethod;
use crate::traits::NumOps;
use crate::utils::{ensure, execute_on};

/// Pre-computed kernels used for small sizes when sigma is not given
const SMALL_KERNELS: [&[f32]; 4] = [
    &[1.0],
    &[0.25, 0.5, 0.25],
    &[0.0625, 0.25, 0.375, 0.25, 0.0625],
    &[
        0.031_25, 0.109_375, 0.218_75, 0.281_25, 0.218_75, 0.109_375, 0.031_25
    ]
];

/// Kernel size derived from sigma when none is given
///
/// 8 bit images use a 3 sigma radius, others 4 sigma
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn kernel_size_for_sigma(sigma: f32, depth: BitDepth) -> usize {
    let factor = if depth == BitDepth::Eight { 3.0 } else { 4.0 };
    let size = (sigma * factor * 2.0 + 1.0).round().max(1.0) as usize;

    size | 1
}

/// Build a normalized 1D gaussian kernel
///
/// When sigma is zero or negative it is derived from the size as
/// `0.3 * ((ksize - 1) * 0.5 - 1) + 0.8`
pub fn gaussian_kernel(ksize: usize, sigma: f32) -> Vec<f32> {
    if sigma <= 0.0 && ksize % 2 == 1 && ksize <= 7 {
        return SMALL_KERNELS[ksize / 2].to_vec();
    }
    let sigma = if sigma <= 0.0 {
        0.3 * ((ksize as f32 - 1.0) * 0.5 - 1.0) + 0.8
    } else {
        sigma
    };
    let scale = -0.5 / (sigma * sigma);
    let center = (ksize as f32 - 1.0) * 0.5;

    let mut kernel: Vec<f32> = (0..ksize)
        .map(|i| {
            let x = i as f32 - center;
            (scale * x * x).exp()
        })
        .collect();

    let sum: f32 = kernel.iter().sum();

    kernel.iter_mut().for_each(|x| *x /= sum);
    kernel
}

/// Blur a channel, writing into `out_channel`
pub fn gaussian_blur<T: NumOps<T>>(
    in_channel: &[T], out_channel: &mut [T], width: usize, height: usize, ksize: usize,
    sigma: f32, method: PadMethod
) {
    let plane: Vec<f32> = in_channel.iter().map(|x| x.to_f32()).collect();
    let result = gaussian_blur_f32(&plane, width, height, ksize, sigma, method);

    for (out, value) in out_channel.iter_mut().zip(result) {
        *out = T::from_f32(value);
    }
}

/// Blur an f32 plane, returning the blurred plane
pub fn gaussian_blur_f32(
    in_channel: &[f32], width: usize, height: usize, ksize: usize, sigma: f32, method: PadMethod
) -> Vec<f32> {
    let kernel = gaussian_kernel(ksize, sigma);

    convolve_separable(in_channel, width, height, &kernel, &kernel, method)
}

/// Blur an image with a gaussian kernel
#[derive(Copy, Clone, Debug)]
pub struct GaussianBlur {
    ksize: usize,
    sigma: f32
}

impl GaussianBlur {
    /// Create a new gaussian blur
    ///
    /// # Arguments
    /// - ksize: Odd kernel size, or zero to derive it from sigma
    /// - sigma: Standard deviation, zero or negative to derive it from ksize
    #[must_use]
    pub fn new(ksize: usize, sigma: f32) -> GaussianBlur {
        GaussianBlur { ksize, sigma }
    }
}

impl OperationsTrait for GaussianBlur {
    fn name(&self) -> &'static str {
        "Gaussian Blur"
    }

    fn execute_impl(&self, image: &mut Image) -> Result<(), ImageErrors> {
        ensure(self.ksize > 0 || self.sigma > 0.0, || {
            "Either ksize or sigma must be positive".to_string()
        })?;
        ensure(self.ksize == 0 || self.ksize % 2 == 1, || {
            format!("Gaussian kernel size must be odd, found {}", self.ksize)
        })?;
        let (width, height) = image.dimensions();
        let depth = image.depth();

        let ksize = if self.ksize == 0 {
            kernel_size_for_sigma(self.sigma, depth)
        } else {
            self.ksize
        };
        let sigma = self.sigma;

        let function = |channel: &mut Channel| -> Result<(), ImageErrors> {
            let mut out_channel = Channel::new_with_bit_type(channel.len(), depth.bit_type());

            match depth.bit_type() {
                BitType::U8 => gaussian_blur(
                    channel.reinterpret_as::<u8>()?,
                    out_channel.reinterpret_as_mut::<u8>()?,
                    width,
                    height,
                    ksize,
                    sigma,
                    PadMethod::Reflect101
                ),
                BitType::U16 => gaussian_blur(
                    channel.reinterpret_as::<u16>()?,
                    out_channel.reinterpret_as_mut::<u16>()?,
                    width,
                    height,
                    ksize,
                    sigma,
                    PadMethod::Reflect101
                ),
                BitType::F32 => gaussian_blur(
                    channel.reinterpret_as::<f32>()?,
                    out_channel.reinterpret_as_mut::<f32>()?,
                    width,
                    height,
                    ksize,
                    sigma,
                    PadMethod::Reflect101
                )
            }
            *channel = out_channel;
            Ok(())
        };
        execute_on(function, image, true)
    }

    fn supported_types(&self) -> &'static [BitType] {
        &[BitType::U8, BitType::U16, BitType::F32]
    }
}
