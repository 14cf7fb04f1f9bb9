/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Two dimensional convolution
//!
//! Like most image libraries this is really a correlation, the kernel is
//! not flipped before being applied.
//!
//! Borders are handled by [`PadMethod::Reflect101`] unless stated otherwise.
use pixlab_core::bit_depth::BitType;
use pixlab_image::channel::Channel;
use pixlab_image::errors::ImageErrors;
use pixlab_image::image::Image;
use pixlab_image::traits::OperationsTrait;

use crate::pad::{pad, PadMethod};
use crate::traits::NumOps;
use crate::utils::{ensure, execute_on};

/// Correlate a plane with a `kernel_width x kernel_height` kernel
///
/// Output keeps the native range of the input type and is not clamped.
///
/// # Arguments
/// - in_channel: Input samples, `width*height` long
/// - kernel: Row major kernel weights
/// - kernel_width, kernel_height: Odd kernel dimensions
/// - method: How pixels outside the image are produced
pub fn convolve_f32<T: NumOps<T>>(
    in_channel: &[T], width: usize, height: usize, kernel: &[f32], kernel_width: usize,
    kernel_height: usize, method: PadMethod
) -> Vec<f32> {
    let plane: Vec<f32> = in_channel.iter().map(|x| x.to_f32()).collect();

    let radius_x = kernel_width / 2;
    let radius_y = kernel_height / 2;

    let padded = pad(&plane, width, height, radius_x, radius_y, method);
    let padded_w = width + radius_x * 2;

    let mut out = vec![0.0; width * height];

    if width == 0 {
        return out;
    }
    for (y, out_row) in out.chunks_exact_mut(width).enumerate() {
        for (x, out_px) in out_row.iter_mut().enumerate() {
            let mut sum = 0.0;

            for (ky, k_row) in kernel.chunks_exact(kernel_width).enumerate() {
                let start = (y + ky) * padded_w + x;
                let in_row = &padded[start..start + kernel_width];

                sum += in_row.iter().zip(k_row).map(|(a, b)| a * b).sum::<f32>();
            }
            *out_px = sum;
        }
    }
    out
}

/// Convolve with a separable kernel, the row kernel is applied first
///
/// Both kernels must have odd lengths
pub fn convolve_separable(
    in_channel: &[f32], width: usize, height: usize, kernel_x: &[f32], kernel_y: &[f32],
    method: PadMethod
) -> Vec<f32> {
    let radius_x = kernel_x.len() / 2;
    let radius_y = kernel_y.len() / 2;

    let mut temp = vec![0.0; width * height];
    let mut out = vec![0.0; width * height];

    if width == 0 || height == 0 {
        return out;
    }
    // horizontal
    let padded = pad(in_channel, width, height, radius_x, 0, method);
    let padded_w = width + radius_x * 2;

    for (in_row, out_row) in padded
        .chunks_exact(padded_w)
        .zip(temp.chunks_exact_mut(width))
    {
        for (x, out_px) in out_row.iter_mut().enumerate() {
            *out_px = in_row[x..x + kernel_x.len()]
                .iter()
                .zip(kernel_x)
                .map(|(a, b)| a * b)
                .sum();
        }
    }
    // vertical
    let padded = pad(&temp, width, height, 0, radius_y, method);

    for (y, out_row) in out.chunks_exact_mut(width).enumerate() {
        for (ky, weight) in kernel_y.iter().enumerate() {
            let in_row = &padded[(y + ky) * width..(y + ky + 1) * width];

            for (out_px, in_px) in out_row.iter_mut().zip(in_row) {
                *out_px += in_px * weight;
            }
        }
    }
    out
}

/// Convolve a channel and store the result, saturated, into `out_channel`
///
/// `delta` is added to every output sample before saturation
pub fn convolve<T: NumOps<T>>(
    in_channel: &[T], out_channel: &mut [T], width: usize, height: usize, kernel: &[f32],
    kernel_width: usize, kernel_height: usize, delta: f32
) {
    let result = convolve_f32(
        in_channel,
        width,
        height,
        kernel,
        kernel_width,
        kernel_height,
        PadMethod::Reflect101
    );
    for (out, value) in out_channel.iter_mut().zip(result) {
        *out = T::from_f32(value + delta);
    }
}

/// Apply an arbitrary kernel to every colour channel
///
/// Results for integer images are rounded and saturated to the depth range
#[derive(Clone, Debug)]
pub struct Convolve {
    weights: Vec<f32>,
    width:   usize,
    height:  usize,
    delta:   f32
}

impl Convolve {
    /// Create a new convolve operation
    ///
    /// # Arguments
    /// - weights: Row major kernel, must be `width*height` long
    /// - width: Odd kernel width
    /// - height: Odd kernel height
    /// - delta: Offset added to every output sample
    #[must_use]
    pub fn new(weights: Vec<f32>, width: usize, height: usize, delta: f32) -> Convolve {
        Convolve {
            weights,
            width,
            height,
            delta
        }
    }

    /// Create a square kernel, the size is derived from the number of weights
    ///
    /// Returns an error if the number of weights is not an odd square
    pub fn square(weights: Vec<f32>) -> Result<Convolve, ImageErrors> {
        let size = (weights.len() as f64).sqrt() as usize;

        ensure(size * size == weights.len() && size % 2 == 1, || {
            format!(
                "A square kernel needs an odd squared number of weights, found {}",
                weights.len()
            )
        })?;
        Ok(Convolve::new(weights, size, size, 0.0))
    }

    /// The classic 3x3 sharpening kernel
    ///
    /// ```text
    ///  0 -1  0
    /// -1  5 -1
    ///  0 -1  0
    /// ```
    #[must_use]
    pub fn sharpen() -> Convolve {
        let weights = vec![0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0];
        Convolve::new(weights, 3, 3, 0.0)
    }
}

impl OperationsTrait for Convolve {
    fn name(&self) -> &'static str {
        "2D Convolution"
    }

    fn execute_impl(&self, image: &mut Image) -> Result<(), ImageErrors> {
        ensure(self.width % 2 == 1 && self.height % 2 == 1, || {
            format!(
                "Kernel dimensions must be odd, found {}x{}",
                self.width, self.height
            )
        })?;
        ensure(self.weights.len() == self.width * self.height, || {
            format!(
                "Kernel of {}x{} needs {} weights, found {}",
                self.width,
                self.height,
                self.width * self.height,
                self.weights.len()
            )
        })?;
        let (width, height) = image.dimensions();
        let depth = image.depth();

        let function = |channel: &mut Channel| -> Result<(), ImageErrors> {
            let mut out_channel = Channel::new_with_bit_type(channel.len(), depth.bit_type());

            match depth.bit_type() {
                BitType::U8 => convolve(
                    channel.reinterpret_as::<u8>()?,
                    out_channel.reinterpret_as_mut::<u8>()?,
                    width,
                    height,
                    &self.weights,
                    self.width,
                    self.height,
                    self.delta
                ),
                BitType::U16 => convolve(
                    channel.reinterpret_as::<u16>()?,
                    out_channel.reinterpret_as_mut::<u16>()?,
                    width,
                    height,
                    &self.weights,
                    self.width,
                    self.height,
                    self.delta
                ),
                BitType::F32 => convolve(
                    channel.reinterpret_as::<f32>()?,
                    out_channel.reinterpret_as_mut::<f32>()?,
                    width,
                    height,
                    &self.weights,
                    self.width,
                    self.height,
                    self.delta
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

#[cfg(test)]
mod tests {
    use pixlab_core::colorspace::ColorSpace;
    use pixlab_image::image::Image;
    use pixlab_image::traits::OperationsTrait;

    use crate::convolve::{convolve_f32, convolve_separable, Convolve};
    use crate::pad::PadMethod;

    #[test]
    fn identity_kernel() {
        let pixels: Vec<u8> = (0..25).collect();
        let mut kernel = [0.0; 9];
        kernel[4] = 1.0;

        let out = convolve_f32(&pixels, 5, 5, &kernel, 3, 3, PadMethod::Reflect101);
        let expected: Vec<f32> = (0_u8..25).map(f32::from).collect();
        assert_eq!(out, expected);
    }

    #[test]
    fn kernel_is_not_flipped() {
        // picks the right neighbour
        let row = [1_u8, 2, 3, 4];
        let out = convolve_f32(&row, 4, 1, &[0.0, 0.0, 1.0], 3, 1, PadMethod::Reflect101);
        assert_eq!(out, [2.0, 3.0, 4.0, 3.0]);
    }

    #[test]
    fn separable_matches_full() {
        let pixels: Vec<f32> = (0..48).map(|x| ((x * 7) % 13) as f32).collect();
        let k = [1.0, 2.0, 1.0];

        let mut full = [0.0; 9];
        for y in 0..3 {
            for x in 0..3 {
                full[y * 3 + x] = k[y] * k[x];
            }
        }
        let a = convolve_separable(&pixels, 8, 6, &k, &k, PadMethod::Reflect101);
        let b = convolve_f32(&pixels, 8, 6, &full, 3, 3, PadMethod::Reflect101);

        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).abs() < 1e-4);
        }
    }

    #[test]
    fn sharpen_flat_is_noop() {
        let mut image = Image::fill(100_u8, ColorSpace::BGR, 10, 10);
        let expected = image.clone();
        Convolve::sharpen().execute(&mut image).unwrap();
        assert_eq!(image, expected);
    }

    #[test]
    fn sharpen_saturates() {
        let mut pixels = vec![0_u8; 9];
        pixels[4] = 100;
        let mut image = Image::from_u8(&pixels, 3, 3, ColorSpace::Luma);
        Convolve::sharpen().execute(&mut image).unwrap();
        let out = image.flatten::<u8>().unwrap();
        assert_eq!(out[4], 255);
        assert_eq!(out[1], 0);
    }

    #[test]
    fn bad_kernels_are_rejected() {
        let mut image = Image::fill(1_u8, ColorSpace::Luma, 4, 4);
        assert!(Convolve::new(vec![1.0; 4], 2, 2, 0.0)
            .execute(&mut image)
            .is_err());
        assert!(Convolve::new(vec![1.0; 8], 3, 3, 0.0)
            .execute(&mut image)
            .is_err());
        assert!(Convolve::square(vec![1.0; 8]).is_err());
        assert!(Convolve::square(vec![1.0; 25]).is_ok());
    }
}
