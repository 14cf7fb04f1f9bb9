/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Thresholding, global, manual and adaptive
//!
//! Every method compares a sample against a threshold `t`
//!
//! |method      | `src > t` | otherwise |
//! |------------|-----------|-----------|
//! |Binary      | max       | 0         |
//! |BinaryInv   | 0         | max       |
//! |Trunc       | t         | src       |
//! |ToZero      | src       | 0         |
//! |ToZeroInv   | 0         | src       |
use pixlab_core::bit_depth::BitType;
use pixlab_core::colorspace::ColorSpace;
use pixlab_core::log::trace;
use pixlab_image::channel::Channel;
use pixlab_image::errors::ImageErrors;
use pixlab_image::image::Image;
use pixlab_image::traits::OperationsTrait;

use crate::box_blur::box_blur;
use crate::gaussian_blur::gaussian_blur;
use crate::histogram::{histogram, otsu_threshold};
use crate::pad::PadMethod;
use crate::traits::NumOps;
use crate::utils::{ensure, execute_on};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ThresholdMethod {
    Binary,
    BinaryInv,
    Trunc,
    ToZero,
    ToZeroInv
}

impl ThresholdMethod {
    pub fn from_string_result(input: &str) -> Result<Self, String> {
        match input {
            "binary" => Ok(Self::Binary),
            "binary_inv" => Ok(Self::BinaryInv),
            "trunc" | "thresh_trunc" => Ok(Self::Trunc),
            "tozero" | "thresh_to_zero" => Ok(Self::ToZero),
            "tozero_inv" | "thresh_to_zero_inv" => Ok(Self::ToZeroInv),
            _ => Err("Unknown threshold type,accepted values are binary,binary_inv,trunc,tozero,tozero_inv".to_string()),
        }
    }
}

/// Threshold a channel in place
///
/// # Arguments
/// - in_channel: Samples to threshold
/// - threshold: Value samples are compared against
/// - max_value: Value written by `Binary` and `BinaryInv`
/// - method: What to write, see the module docs
#[rustfmt::skip]
pub fn threshold<T>(in_channel: &mut [T], threshold: T, max_value: T, method: ThresholdMethod)
    where
        T: NumOps<T>
{
    let zero = T::min_val();

    match method
    {
        ThresholdMethod::Binary =>
            {
                for x in in_channel.iter_mut()
                {
                    *x = if *x > threshold { max_value } else { zero };
                }
            }
        ThresholdMethod::BinaryInv =>
            {
                for x in in_channel.iter_mut()
                {
                    *x = if *x > threshold { zero } else { max_value };
                }
            }
        ThresholdMethod::Trunc =>
            {
                for x in in_channel.iter_mut()
                {
                    *x = if *x > threshold { threshold } else { *x };
                }
            }
        ThresholdMethod::ToZero =>
            {
                for x in in_channel.iter_mut()
                {
                    *x = if *x > threshold { *x } else { zero };
                }
            }
        ThresholdMethod::ToZeroInv =>
            {
                for x in in_channel.iter_mut()
                {
                    *x = if *x > threshold { zero } else { *x };
                }
            }
    }
}

/// Binary threshold written as an explicit row and column loop
///
/// `dst[y][x] = max_value if src[y][x] > thresh else 0`
///
/// This is the hand rolled counterpart of [`threshold`] with
/// [`ThresholdMethod::Binary`], both produce identical output.
///
/// # Panics
/// If either slice is shorter than `width*height`
pub fn threshold_for_loop(
    src: &[u8], dst: &mut [u8], width: usize, height: usize, thresh: u8, max_value: u8
) {
    for y in 0..height {
        for x in 0..width {
            let offset = y * width + x;

            dst[offset] = if src[offset] > thresh { max_value } else { 0 };
        }
    }
}

/// Threshold unsigned samples against a threshold given in f32
///
/// Every sample lies above a negative threshold, so that case is resolved
/// without saturating the threshold to zero first
fn threshold_unsigned<T>(in_channel: &mut [T], thresh: f32, max_value: f32, method: ThresholdMethod)
where
    T: NumOps<T>
{
    if thresh >= 0.0 {
        threshold(in_channel, T::from_f32(thresh.floor()), T::from_f32(max_value), method);
        return;
    }
    match method {
        ThresholdMethod::Binary => in_channel.fill(T::from_f32(max_value)),
        ThresholdMethod::ToZero => (),
        // Trunc clamps to the threshold, which saturates to zero
        ThresholdMethod::BinaryInv | ThresholdMethod::Trunc | ThresholdMethod::ToZeroInv => {
            in_channel.fill(T::min_val());
        }
    }
}

/// Global threshold
///
/// Applied to every channel except alpha
#[derive(Copy, Clone, Debug)]
pub struct Threshold {
    method:    ThresholdMethod,
    threshold: f32,
    max_value: f32,
    use_otsu:  bool
}

impl Threshold {
    /// Create a new threshold operation
    ///
    /// # Arguments
    /// - threshold: Threshold in the native range of the image depth, e.g 0-255 for 8 bit
    /// - max_value: Value written for binary methods, in the same range
    /// - method: Threshold method
    #[must_use]
    pub fn new(threshold: f32, max_value: f32, method: ThresholdMethod) -> Threshold {
        Threshold {
            method,
            threshold,
            max_value,
            use_otsu: false
        }
    }

    /// Pick the threshold per channel with Otsu's method
    ///
    /// Only 8 bit images are supported
    #[must_use]
    pub fn otsu(max_value: f32, method: ThresholdMethod) -> Threshold {
        Threshold {
            method,
            threshold: 0.0,
            max_value,
            use_otsu: true
        }
    }
}

impl OperationsTrait for Threshold {
    fn name(&self) -> &'static str {
        "Threshold"
    }

    fn execute_impl(&self, image: &mut Image) -> Result<(), ImageErrors> {
        let depth = image.depth();

        if self.use_otsu && depth.bit_type() != BitType::U8 {
            return Err(ImageErrors::ImageOperationNotImplemented(
                "Otsu threshold",
                depth.bit_type()
            ));
        }
        let function = |channel: &mut Channel| -> Result<(), ImageErrors> {
            match depth.bit_type() {
                BitType::U8 => {
                    let data = channel.reinterpret_as_mut::<u8>()?;
                    if self.use_otsu {
                        let level = otsu_threshold(&histogram(data));
                        trace!("Otsu picked threshold {}", level);
                        threshold(data, level, u8::from_f32(self.max_value), self.method);
                    } else {
                        threshold_unsigned(data, self.threshold, self.max_value, self.method);
                    }
                }
                BitType::U16 => threshold_unsigned(
                    channel.reinterpret_as_mut::<u16>()?,
                    self.threshold,
                    self.max_value,
                    self.method
                ),
                BitType::F32 => threshold(
                    channel.reinterpret_as_mut::<f32>()?,
                    self.threshold,
                    self.max_value,
                    self.method
                )
            }
            Ok(())
        };
        execute_on(function, image, true)
    }

    fn supported_types(&self) -> &'static [BitType] {
        &[BitType::U8, BitType::U16, BitType::F32]
    }
}

/// Binary threshold of an 8 bit grayscale image using
/// [`threshold_for_loop`]
#[derive(Copy, Clone, Debug)]
pub struct ManualThreshold {
    threshold: u8,
    max_value: u8
}

impl ManualThreshold {
    #[must_use]
    pub fn new(threshold: u8, max_value: u8) -> ManualThreshold {
        ManualThreshold {
            threshold,
            max_value
        }
    }
}

impl OperationsTrait for ManualThreshold {
    fn name(&self) -> &'static str {
        "Manual Threshold"
    }

    fn execute_impl(&self, image: &mut Image) -> Result<(), ImageErrors> {
        let (width, height) = image.dimensions();

        for channel in image.channels_mut(false) {
            let mut new_channel = Channel::new_with_bit_type(channel.len(), BitType::U8);

            threshold_for_loop(
                channel.reinterpret_as::<u8>()?,
                new_channel.reinterpret_as_mut::<u8>()?,
                width,
                height,
                self.threshold,
                self.max_value
            );
            *channel = new_channel;
        }
        Ok(())
    }

    fn supported_types(&self) -> &'static [BitType] {
        &[BitType::U8]
    }

    fn supported_colorspaces(&self) -> &'static [ColorSpace] {
        &[ColorSpace::Luma]
    }
}

/// How the local threshold of adaptive thresholding is computed
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AdaptiveMethod {
    /// Mean of the block
    Mean,
    /// Gaussian weighted sum of the block
    Gaussian
}

/// Adaptive threshold
///
/// Each pixel is compared against the mean (or gaussian weighted mean)
/// of the `block_size x block_size` block around it minus `c`.
///
/// Only `Binary` and `BinaryInv` methods are meaningful here
#[derive(Copy, Clone, Debug)]
pub struct AdaptiveThreshold {
    block_size: usize,
    c:          f32,
    max_value:  u8,
    method:     AdaptiveMethod,
    inverse:    bool
}

impl AdaptiveThreshold {
    /// Create a new adaptive threshold
    ///
    /// # Arguments
    /// - block_size: Odd block size, at least 3
    /// - c: Constant subtracted from the local mean
    /// - max_value: Value written to pixels passing the test
    /// - method: Local mean to use
    /// - inverse: Use `BinaryInv` instead of `Binary`
    #[must_use]
    pub fn new(
        block_size: usize, c: f32, max_value: u8, method: AdaptiveMethod, inverse: bool
    ) -> AdaptiveThreshold {
        AdaptiveThreshold {
            block_size,
            c,
            max_value,
            method,
            inverse
        }
    }
}

/// Adaptive threshold of a single 8 bit plane
#[allow(clippy::cast_possible_truncation)]
pub fn adaptive_threshold(
    src: &[u8], dst: &mut [u8], width: usize, height: usize, block_size: usize, c: f32,
    max_value: u8, method: AdaptiveMethod, inverse: bool
) {
    let mut mean = vec![0_u8; src.len()];

    match method {
        AdaptiveMethod::Mean => box_blur(
            src,
            &mut mean,
            width,
            height,
            block_size,
            PadMethod::Replicate
        ),
        AdaptiveMethod::Gaussian => gaussian_blur(
            src,
            &mut mean,
            width,
            height,
            block_size,
            0.0,
            PadMethod::Replicate
        )
    }
    // compare src - mean against -c using the rounded delta
    let delta = if inverse { c.floor() } else { c.ceil() } as i32;

    for ((out, px), m) in dst.iter_mut().zip(src).zip(&mean) {
        let diff = i32::from(*px) - i32::from(*m);
        let passes = if inverse {
            diff <= -delta
        } else {
            diff > -delta
        };
        *out = if passes { max_value } else { 0 };
    }
}

impl OperationsTrait for AdaptiveThreshold {
    fn name(&self) -> &'static str {
        "Adaptive Threshold"
    }

    fn execute_impl(&self, image: &mut Image) -> Result<(), ImageErrors> {
        ensure(self.block_size % 2 == 1 && self.block_size > 1, || {
            format!("Block size must be odd and greater than 1, found {}", self.block_size)
        })?;
        let (width, height) = image.dimensions();

        for channel in image.channels_mut(false) {
            let mut new_channel = Channel::new_with_bit_type(channel.len(), BitType::U8);

            adaptive_threshold(
                channel.reinterpret_as::<u8>()?,
                new_channel.reinterpret_as_mut::<u8>()?,
                width,
                height,
                self.block_size,
                self.c,
                self.max_value,
                self.method,
                self.inverse
            );
            *channel = new_channel;
        }
        Ok(())
    }

    fn supported_types(&self) -> &'static [BitType] {
        &[BitType::U8]
    }

    fn supported_colorspaces(&self) -> &'static [ColorSpace] {
        &[ColorSpace::Luma]
    }
}

#[cfg(test)]
mod tests {
    use nanorand::Rng;
    use pixlab_core::colorspace::ColorSpace;
    use pixlab_image::image::Image;
    use pixlab_image::traits::OperationsTrait;

    use crate::threshold::{
        threshold, threshold_for_loop, AdaptiveMethod, AdaptiveThreshold, ManualThreshold,
        Threshold, ThresholdMethod
    };

    #[test]
    fn every_method() {
        let src = [10_u8, 100, 101, 200];
        let expected = [
            (ThresholdMethod::Binary, [0, 0, 250, 250]),
            (ThresholdMethod::BinaryInv, [250, 250, 0, 0]),
            (ThresholdMethod::Trunc, [10, 100, 100, 100]),
            (ThresholdMethod::ToZero, [0, 0, 101, 200]),
            (ThresholdMethod::ToZeroInv, [10, 100, 0, 0])
        ];
        for (method, result) in expected {
            let mut data = src;
            threshold(&mut data, 100, 250, method);
            assert_eq!(data, result, "{method:?}");
        }
    }

    #[test]
    fn loop_matches_library_threshold() {
        let (w, h) = (37, 23);
        let mut pixels = vec![0_u8; w * h];
        nanorand::WyRand::new().fill(&mut pixels);

        let mut manual = vec![0; w * h];
        threshold_for_loop(&pixels, &mut manual, w, h, 127, 255);

        let mut image = Image::from_u8(&pixels, w, h, ColorSpace::Luma);
        Threshold::new(127.0, 255.0, ThresholdMethod::Binary)
            .execute(&mut image)
            .unwrap();
        assert_eq!(image.flatten::<u8>().unwrap(), manual);

        let mut image = Image::from_u8(&pixels, w, h, ColorSpace::Luma);
        ManualThreshold::new(127, 255).execute(&mut image).unwrap();
        assert_eq!(image.flatten::<u8>().unwrap(), manual);
    }

    #[test]
    fn negative_threshold_keeps_every_sample() {
        let pixels = [0_u8, 5, 0, 255];

        let expected = [
            (ThresholdMethod::Binary, [255, 255, 255, 255]),
            (ThresholdMethod::BinaryInv, [0, 0, 0, 0]),
            (ThresholdMethod::Trunc, [0, 0, 0, 0]),
            (ThresholdMethod::ToZero, [0, 5, 0, 255]),
            (ThresholdMethod::ToZeroInv, [0, 0, 0, 0])
        ];
        for (method, result) in expected {
            let image = Image::from_u8(&pixels, 2, 2, ColorSpace::Luma);
            let out = Threshold::new(-1.0, 255.0, method)
                .clone_and_execute(&image)
                .unwrap();
            assert_eq!(out.flatten::<u8>().unwrap(), result, "{method:?}");
        }
        // 16 bit and float agree on the binary case
        let image = Image::fill(0_u16, ColorSpace::Luma, 2, 2);
        let out = Threshold::new(-0.5, 1000.0, ThresholdMethod::Binary)
            .clone_and_execute(&image)
            .unwrap();
        assert_eq!(out.flatten::<u16>().unwrap(), vec![1000; 4]);

        let image = Image::fill(0.0_f32, ColorSpace::Luma, 2, 2);
        let out = Threshold::new(-0.5, 1.0, ThresholdMethod::Binary)
            .clone_and_execute(&image)
            .unwrap();
        assert_eq!(out.flatten::<f32>().unwrap(), vec![1.0; 4]);
    }

    #[test]
    fn manual_threshold_needs_gray() {
        let mut image = Image::fill(1_u8, ColorSpace::BGR, 4, 4);
        assert!(ManualThreshold::new(0, 255).execute(&mut image).is_err());
    }

    #[test]
    fn threshold_keeps_alpha() {
        let mut image = Image::from_u8(&[50, 200, 10, 7], 2, 1, ColorSpace::LumaA);
        Threshold::new(100.0, 255.0, ThresholdMethod::Binary)
            .execute(&mut image)
            .unwrap();
        assert_eq!(image.flatten::<u8>().unwrap(), vec![0, 200, 0, 7]);
    }

    #[test]
    fn otsu_splits_two_levels() {
        let pixels: Vec<u8> = (0..100).map(|x| if x < 50 { 20 } else { 220 }).collect();
        let mut image = Image::from_u8(&pixels, 10, 10, ColorSpace::Luma);

        Threshold::otsu(255.0, ThresholdMethod::Binary)
            .execute(&mut image)
            .unwrap();
        let out = image.flatten::<u8>().unwrap();

        assert!(out[..50].iter().all(|x| *x == 0));
        assert!(out[50..].iter().all(|x| *x == 255));
    }

    #[test]
    fn adaptive_finds_local_edges() {
        // a dark square on a gradient background
        let image = Image::from_fn::<u8, _>(32, 32, ColorSpace::Luma, |x, y, px| {
            let inside = (10..20).contains(&x) && (10..20).contains(&y);
            px[0] = if inside { 10 } else { (100 + x * 4) as u8 };
        });
        let mut out = image.clone();
        AdaptiveThreshold::new(7, 7.0, 255, AdaptiveMethod::Mean, false)
            .execute(&mut out)
            .unwrap();
        let out = out.flatten::<u8>().unwrap();

        // background far from the square is flat enough to pass
        assert_eq!(out[2 * 32 + 2], 255);
        // the square's border is darker than its surroundings
        assert_eq!(out[10 * 32 + 10], 0);
    }
}
