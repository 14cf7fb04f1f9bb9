/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Histograms and operations built on them
use std::cell::RefCell;

use pixlab_core::bit_depth::{BitDepth, BitType};
use pixlab_core::colorspace::ColorSpace;
use pixlab_core::log::trace;
use pixlab_image::errors::ImageErrors;
use pixlab_image::image::Image;
use pixlab_image::traits::OperationsTrait;

use crate::utils::channel_to_f32;

/// Count occurrences of every 8 bit level
pub fn histogram(data: &[u8]) -> [u32; 256] {
    let mut hist = [0_u32; 256];

    for x in data {
        hist[usize::from(*x)] += 1;
    }
    hist
}

/// Pick the threshold maximising the between class variance
///
/// Pixels `<= threshold` form the first class. Ties keep the lowest level
pub fn otsu_threshold(hist: &[u32; 256]) -> u8 {
    let total: f64 = hist.iter().map(|x| f64::from(*x)).sum();

    if total == 0.0 {
        return 0;
    }
    let sum_all: f64 = hist
        .iter()
        .enumerate()
        .map(|(i, x)| i as f64 * f64::from(*x))
        .sum();

    let mut best = 0;
    let mut best_variance = 0.0;
    let mut weight_bg = 0.0;
    let mut sum_bg = 0.0;

    for (level, count) in hist.iter().enumerate() {
        weight_bg += f64::from(*count);
        sum_bg += level as f64 * f64::from(*count);

        let weight_fg = total - weight_bg;

        if weight_bg == 0.0 || weight_fg == 0.0 {
            continue;
        }
        let mean_bg = sum_bg / weight_bg;
        let mean_fg = (sum_all - sum_bg) / weight_fg;
        let variance = weight_bg * weight_fg * (mean_bg - mean_fg).powi(2);

        if variance > best_variance {
            best_variance = variance;
            best = level;
        }
    }
    best as u8
}

/// Equalize the histogram of an 8 bit plane in place
///
/// Levels are remapped with `(cdf - cdf_min) * 255 / (total - cdf_min)`
/// where `cdf_min` is the count of the darkest level present.
/// A constant plane is left untouched.
pub fn equalize(data: &mut [u8]) {
    let hist = histogram(data);
    let total = data.len() as u64;

    let Some(first) = hist.iter().position(|x| *x != 0) else {
        return;
    };
    let cdf_min = u64::from(hist[first]);

    if total == cdf_min {
        return;
    }
    let scale = 255.0 / (total - cdf_min) as f64;

    let mut lut = [0_u8; 256];
    let mut cdf = 0_u64;

    for (level, count) in hist.iter().enumerate().skip(first + 1) {
        cdf += u64::from(*count);
        lut[level] = (cdf as f64 * scale).round().min(255.0) as u8;
    }
    for x in data.iter_mut() {
        *x = lut[usize::from(*x)];
    }
}

/// Which channels [`EqualizeHistogram`] equalizes
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EqualizeMode {
    /// Equalize brightness only, colour images go through YCrCb
    Luma,
    /// Equalize every colour channel independently
    PerChannel,
    /// Equalize V in HSV
    Value
}

impl EqualizeMode {
    pub fn from_string_result(input: &str) -> Result<Self, String> {
        match input {
            "luma" => Ok(Self::Luma),
            "channel" | "per-channel" => Ok(Self::PerChannel),
            "value" => Ok(Self::Value),
            _ => Err(format!(
                "Unknown equalize mode {input}, accepted values are luma,channel,value"
            ))
        }
    }
}

/// Histogram equalization of 8 bit images
#[derive(Copy, Clone, Debug)]
pub struct EqualizeHistogram {
    mode: EqualizeMode
}

impl EqualizeHistogram {
    #[must_use]
    pub fn new(mode: EqualizeMode) -> EqualizeHistogram {
        EqualizeHistogram { mode }
    }
}

/// Convert to `target`, equalize channel `index`, convert back
/// keeping the original alpha channel
fn equalize_in(image: &mut Image, target: ColorSpace, index: usize) -> Result<(), ImageErrors> {
    let original = image.colorspace();
    let alpha = original
        .alpha_position()
        .map(|pos| image.channels_ref(false)[pos].clone());

    image.convert_color(target)?;
    equalize(image.channels_mut(false)[index].reinterpret_as_mut::<u8>()?);
    image.convert_color(original)?;

    if let (Some(alpha), Some(pos)) = (alpha, original.alpha_position()) {
        image.channels_mut(false)[pos] = alpha;
    }
    Ok(())
}

impl OperationsTrait for EqualizeHistogram {
    fn name(&self) -> &'static str {
        "Equalize Histogram"
    }

    fn execute_impl(&self, image: &mut Image) -> Result<(), ImageErrors> {
        let colorspace = image.colorspace();

        match self.mode {
            EqualizeMode::PerChannel => {
                for channel in image.channels_mut(true) {
                    equalize(channel.reinterpret_as_mut::<u8>()?);
                }
            }
            EqualizeMode::Luma if colorspace.is_grayscale() => {
                equalize(image.channels_mut(true)[0].reinterpret_as_mut::<u8>()?);
            }
            EqualizeMode::Luma => equalize_in(image, ColorSpace::YCrCb, 0)?,
            EqualizeMode::Value => equalize_in(image, ColorSpace::HSV, 2)?
        }
        Ok(())
    }

    fn supported_types(&self) -> &'static [BitType] {
        &[BitType::U8]
    }

    fn supported_colorspaces(&self) -> &'static [ColorSpace] {
        match self.mode {
            EqualizeMode::PerChannel => &pixlab_core::colorspace::ALL_COLORSPACES,
            EqualizeMode::Luma => &[
                ColorSpace::Luma,
                ColorSpace::LumaA,
                ColorSpace::RGB,
                ColorSpace::RGBA,
                ColorSpace::BGR,
                ColorSpace::BGRA
            ],
            EqualizeMode::Value => &[
                ColorSpace::RGB,
                ColorSpace::RGBA,
                ColorSpace::BGR,
                ColorSpace::BGRA
            ]
        }
    }
}

/// Compute a 256 bin histogram of every channel
///
/// The image is left untouched, results are read back with
/// [`histograms`](ChannelHistogram::histograms). Samples of deeper
/// images are scaled to 8 bits before counting.
#[derive(Debug, Default)]
pub struct ChannelHistogram {
    histograms: RefCell<Vec<[u32; 256]>>
}

impl ChannelHistogram {
    #[must_use]
    pub fn new() -> ChannelHistogram {
        ChannelHistogram::default()
    }

    /// Histograms from the last execution, one per channel
    pub fn histograms(&self) -> Vec<[u32; 256]> {
        self.histograms.borrow().clone()
    }
}

impl OperationsTrait for ChannelHistogram {
    fn name(&self) -> &'static str {
        "Channel Histogram"
    }

    fn execute_impl(&self, image: &mut Image) -> Result<(), ImageErrors> {
        let depth = image.depth();
        let mut results = vec![];

        for channel in image.channels_ref(false) {
            let hist = if depth == BitDepth::Eight {
                histogram(channel.reinterpret_as::<u8>()?)
            } else {
                let scale = 255.0 / f32::from(depth.max_value());
                let quantized: Vec<u8> = channel_to_f32(channel, depth)?
                    .iter()
                    .map(|x| (x * scale).round().clamp(0.0, 255.0) as u8)
                    .collect();
                histogram(&quantized)
            };
            results.push(hist);
        }
        trace!("Computed {} histograms", results.len());
        *self.histograms.borrow_mut() = results;

        Ok(())
    }

    fn supported_types(&self) -> &'static [BitType] {
        &[BitType::U8, BitType::U16, BitType::F32]
    }
}

fn to_hsv_u8(image: &Image) -> Result<Image, ImageErrors> {
    let mut hsv = image.clone();

    if hsv.depth() != BitDepth::Eight {
        hsv.convert_depth(BitDepth::Eight)?;
    }
    if hsv.colorspace() != ColorSpace::HSV {
        hsv.convert_color(ColorSpace::HSV)?;
    }
    Ok(hsv)
}

fn hue_counts(image: &Image, bins: usize, min_saturation: u8) -> Result<Vec<u32>, ImageErrors> {
    if bins == 0 {
        return Err(ImageErrors::GenericStr("Hue histogram needs at least one bin"));
    }
    let hsv = to_hsv_u8(image)?;
    let channels = hsv.channels_ref(false);

    let hue = channels[0].reinterpret_as::<u8>()?;
    let saturation = channels[1].reinterpret_as::<u8>()?;

    let mut counts = vec![0_u32; bins];

    for (h, s) in hue.iter().zip(saturation) {
        if *s < min_saturation {
            continue;
        }
        let bin = (usize::from(*h) * bins / 180).min(bins - 1);
        counts[bin] += 1;
    }
    Ok(counts)
}

/// Histogram of the 8 bit hue (`0..180`) split into `bins` equal bins
pub fn hue_histogram(image: &Image, bins: usize) -> Result<Vec<u32>, ImageErrors> {
    hue_counts(image, bins, 0)
}

/// Return the centre of the most populated hue bin, in 8 bit hue
/// units (`0..180`), considering only pixels with at least `min_saturation`
///
/// Returns `None` if no pixel is saturated enough
pub fn dominant_hue(
    image: &Image, bins: usize, min_saturation: u8
) -> Result<Option<f32>, ImageErrors> {
    let counts = hue_counts(image, bins, min_saturation)?;

    let mut best: Option<(usize, u32)> = None;

    for (bin, count) in counts.iter().enumerate() {
        if *count > 0 && best.map_or(true, |(_, c)| *count > c) {
            best = Some((bin, *count));
        }
    }
    let width = 180.0 / bins as f32;

    Ok(best.map(|(bin, _)| (bin as f32 + 0.5) * width))
}
