/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Hand written colour conversions
//!
//! These compute grayscale and HSV pixel by pixel from normalized input
//! and stretch every output channel to its full 8 bit range, so they only
//! agree with [`ColorspaceConv`](pixlab_image::core_filters::colorspace::ColorspaceConv)
//! when the input and output span their whole range.
//!
//! Input is normalized jointly over all three colour planes, the darkest
//! sample of the image maps to 0 and the brightest to 1.
use pixlab_core::bit_depth::BitType;
use pixlab_core::colorspace::ColorSpace;
use pixlab_image::channel::Channel;
use pixlab_image::errors::ImageErrors;
use pixlab_image::image::Image;
use pixlab_image::traits::OperationsTrait;

use crate::traits::NumOps;
use crate::utils::{min_max, normalize_min_max};

/// Normalize three planes jointly into `0.0..=1.0`
fn normalize_planes(blue: &[u8], green: &[u8], red: &[u8]) -> [Vec<f32>; 3] {
    let bounds = [blue, green, red]
        .into_iter()
        .filter_map(|p| min_max(p))
        .fold(None, |acc: Option<(u8, u8)>, (lo, hi)| {
            Some(acc.map_or((lo, hi), |(a, b)| (a.min(lo), b.max(hi))))
        });
    let (lo, hi) = bounds.map_or((0.0, 0.0), |(a, b)| (f32::from(a), f32::from(b)));
    let range = hi - lo;

    let scale = |plane: &[u8]| -> Vec<f32> {
        plane
            .iter()
            .map(|x| {
                if range > 0.0 {
                    (f32::from(*x) - lo) / range
                } else {
                    0.0
                }
            })
            .collect()
    };
    [scale(blue), scale(green), scale(red)]
}

fn to_u8(mut plane: Vec<f32>, max: f32) -> Vec<u8> {
    normalize_min_max(&mut plane, 0.0, max);

    plane.into_iter().map(u8::from_f32).collect()
}

/// Convert blue, green and red planes to grayscale
///
/// `gray = 0.299r + 0.587g + 0.114b` over normalized input, the result is
/// stretched to `0..=255`
pub fn bgr_to_gray_manual(blue: &[u8], green: &[u8], red: &[u8]) -> Vec<u8> {
    let [b, g, r] = normalize_planes(blue, green, red);

    let mut gray = vec![0.0_f32; b.len()];

    for (i, out) in gray.iter_mut().enumerate() {
        *out = 0.299 * r[i] + 0.587 * g[i] + 0.114 * b[i];
    }
    to_u8(gray, 255.0)
}

/// Convert blue, green and red planes to 8 bit HSV planes
///
/// Hue is computed in half degrees (`0..180`), saturation and value in
/// percent, then hue is stretched to `0..=179` and saturation and value
/// to `0..=255`.
pub fn bgr_to_hsv_manual(blue: &[u8], green: &[u8], red: &[u8]) -> [Vec<u8>; 3] {
    let [b, g, r] = normalize_planes(blue, green, red);

    let len = b.len();
    let mut hue = vec![0.0_f32; len];
    let mut saturation = vec![0.0_f32; len];
    let mut value = vec![0.0_f32; len];

    for i in 0..len {
        let (b, g, r) = (b[i], g[i], r[i]);

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let diff = max - min;

        hue[i] = if max == min {
            0.0
        } else if max == r {
            (30.0 * (g - b) / diff + 180.0) % 180.0
        } else if max == g {
            (30.0 * (b - r) / diff + 60.0) % 180.0
        } else {
            (30.0 * (r - g) / diff + 120.0) % 180.0
        };
        saturation[i] = if max == 0.0 { 0.0 } else { diff / max * 100.0 };
        value[i] = max * 100.0;
    }
    [
        to_u8(hue, 179.0),
        to_u8(saturation, 255.0),
        to_u8(value, 255.0)
    ]
}

/// Return the blue, green and red planes of an rgb family image
fn bgr_planes(image: &Image) -> Result<[&[u8]; 3], ImageErrors> {
    let Some([r, g, b]) = image.colorspace().rgb_positions() else {
        return Err(ImageErrors::GenericStr("Image does not store rgb samples"));
    };
    let channels = image.channels_ref(true);

    Ok([
        channels[b].reinterpret_as::<u8>()?,
        channels[g].reinterpret_as::<u8>()?,
        channels[r].reinterpret_as::<u8>()?
    ])
}

const RGB_FAMILY: [ColorSpace; 4] = [
    ColorSpace::RGB,
    ColorSpace::RGBA,
    ColorSpace::BGR,
    ColorSpace::BGRA
];

/// Convert an 8 bit colour image to grayscale with [`bgr_to_gray_manual`]
///
/// Alpha is dropped
#[derive(Default, Copy, Clone, Debug)]
pub struct ManualGrayscale;

impl ManualGrayscale {
    #[must_use]
    pub fn new() -> ManualGrayscale {
        Self
    }
}

impl OperationsTrait for ManualGrayscale {
    fn name(&self) -> &'static str {
        "Manual Grayscale"
    }

    fn execute_impl(&self, image: &mut Image) -> Result<(), ImageErrors> {
        let [b, g, r] = bgr_planes(image)?;
        let gray = bgr_to_gray_manual(b, g, r);

        *image.channels_vec() = vec![Channel::from_vec(gray)];
        image.set_colorspace(ColorSpace::Luma);

        Ok(())
    }

    fn supported_types(&self) -> &'static [BitType] {
        &[BitType::U8]
    }

    fn supported_colorspaces(&self) -> &'static [ColorSpace] {
        &RGB_FAMILY
    }
}

/// Convert an 8 bit colour image to HSV with [`bgr_to_hsv_manual`]
///
/// Alpha is dropped
#[derive(Default, Copy, Clone, Debug)]
pub struct ManualHsv;

impl ManualHsv {
    #[must_use]
    pub fn new() -> ManualHsv {
        Self
    }
}

impl OperationsTrait for ManualHsv {
    fn name(&self) -> &'static str {
        "Manual HSV"
    }

    fn execute_impl(&self, image: &mut Image) -> Result<(), ImageErrors> {
        let [b, g, r] = bgr_planes(image)?;
        let planes = bgr_to_hsv_manual(b, g, r);

        *image.channels_vec() = planes.into_iter().map(Channel::from_vec).collect();
        image.set_colorspace(ColorSpace::HSV);

        Ok(())
    }

    fn supported_types(&self) -> &'static [BitType] {
        &[BitType::U8]
    }

    fn supported_colorspaces(&self) -> &'static [ColorSpace] {
        &RGB_FAMILY
    }
}

#[cfg(test)]
mod tests {
    use nanorand::Rng;
    use pixlab_core::colorspace::ColorSpace;
    use pixlab_image::image::Image;
    use pixlab_image::traits::OperationsTrait;

    use crate::manual_convert::{bgr_to_gray_manual, bgr_to_hsv_manual, ManualGrayscale, ManualHsv};

    /// Random bgr pixels with anchors that make every output span its full range
    fn full_range_image() -> Image {
        let (w, h) = (32, 16);
        let mut pixels = vec![0_u8; w * h * 3];
        nanorand::WyRand::new_seed(42).fill(&mut pixels);

        #[rustfmt::skip]
        let anchors = [
            0, 0, 0,        // black
            255, 255, 255,  // white
            0, 0, 255,      // red, hue 0
            6, 0, 255,      // red leaning to magenta, hue close to 180
            128, 128, 128   // gray, zero saturation
        ];
        pixels[..anchors.len()].copy_from_slice(&anchors);

        Image::from_u8(&pixels, w, h, ColorSpace::BGR)
    }

    #[test]
    fn gray_matches_reference() {
        let image = full_range_image();

        let manual = ManualGrayscale::new().clone_and_execute(&image).unwrap();
        let mut reference = image.clone();
        reference.convert_color(ColorSpace::Luma).unwrap();

        assert_eq!(manual.colorspace(), ColorSpace::Luma);

        let a = manual.flatten::<u8>().unwrap();
        let b = reference.flatten::<u8>().unwrap();
        for (x, y) in a.iter().zip(&b) {
            assert!(x.abs_diff(*y) <= 1, "{x} {y}");
        }
    }

    #[test]
    fn hsv_matches_reference() {
        let image = full_range_image();

        let manual = ManualHsv::new().clone_and_execute(&image).unwrap();
        let mut reference = image.clone();
        reference.convert_color(ColorSpace::HSV).unwrap();

        let a = manual.flatten::<u8>().unwrap();
        let b = reference.flatten::<u8>().unwrap();

        for (p, q) in a.chunks_exact(3).zip(b.chunks_exact(3)) {
            // hue is circular
            let dh = p[0].abs_diff(q[0]);
            assert!(dh.min(180 - dh) <= 2, "{p:?} {q:?}");
            assert!(p[1].abs_diff(q[1]) <= 2, "{p:?} {q:?}");
            assert!(p[2].abs_diff(q[2]) <= 1, "{p:?} {q:?}");
        }
    }

    #[test]
    fn constant_image_maps_to_zero() {
        let flat = [90_u8; 6];
        assert_eq!(bgr_to_gray_manual(&flat, &flat, &flat), [0; 6]);

        let [h, s, v] = bgr_to_hsv_manual(&flat, &flat, &flat);
        assert!(h.iter().chain(&s).chain(&v).all(|x| *x == 0));
    }

    #[test]
    fn hue_order() {
        // red, green, blue
        let [h, _, _] = bgr_to_hsv_manual(&[0, 0, 255], &[0, 255, 0], &[255, 0, 0]);
        assert_eq!(h[0], 0);
        assert!(h[0] < h[1] && h[1] < h[2]);
    }

    #[test]
    fn rgba_is_accepted() {
        let mut image = Image::fill(10_u8, ColorSpace::RGBA, 3, 3);
        ManualHsv::new().execute(&mut image).unwrap();
        assert_eq!(image.colorspace(), ColorSpace::HSV);
        assert_eq!(image.channels_ref(false).len(), 3);

        let mut gray = Image::fill(10_u8, ColorSpace::Luma, 3, 3);
        assert!(ManualGrayscale::new().execute(&mut gray).is_err());
    }
}
