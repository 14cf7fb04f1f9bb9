/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Colorspace conversion routines
//!
//! Every conversion passes through normalized RGB, so any pair of
//! supported colorspaces can be converted.
//!
//! Samples are stored in the following units
//!
//!|Colorspace |u8                                 |f32                          |
//!|-----------|-------------------------------------|-----------------------------|
//!|Luma       |`0.299R + 0.587G + 0.114B`           |same, in `0.0..=1.0`         |
//!|HSV        |H in `0..180` (degrees / 2), S,V `0..=255` |H in `0.0..360.0`, S,V `0.0..=1.0`|
//!|YCrCb      |`Cr = (R-Y)*0.713+128`, `Cb = (B-Y)*0.564+128` |same with an offset of 0.5 |
//!|Lab        |`L*255/100`, `a+128`, `b+128`        |L in `0..=100`, raw a and b  |
//!
//! Sixteen bit images can only be converted between the RGB family and Luma.
use pixlab_core::bit_depth::BitType;
use pixlab_core::colorspace::ColorSpace;
use pixlab_core::log::trace;

use crate::channel::Channel;
use crate::errors::ImageErrors;
use crate::image::Image;
use crate::traits::OperationsTrait;

/// Luma weights for red, green and blue
pub const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

// D65 reference white
const WHITE_X: f32 = 0.950_456;
const WHITE_Z: f32 = 1.088_754;

/// Convert normalized rgb to luma
#[inline]
pub fn rgb_to_luma(r: f32, g: f32, b: f32) -> f32 {
    LUMA_WEIGHTS[0] * r + LUMA_WEIGHTS[1] * g + LUMA_WEIGHTS[2] * b
}

/// Convert normalized rgb to hsv
///
/// Returns hue in degrees `0.0..360.0`, saturation and value in `0.0..=1.0`
#[inline]
pub fn rgb_to_hsv(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = max - min;

    let s = if max > 0.0 { diff / max } else { 0.0 };

    let mut h = if diff == 0.0 {
        0.0
    } else if max == r {
        60.0 * (g - b) / diff
    } else if max == g {
        120.0 + 60.0 * (b - r) / diff
    } else {
        240.0 + 60.0 * (r - g) / diff
    };
    if h < 0.0 {
        h += 360.0;
    }
    (h, s, max)
}

/// Convert hsv (hue in degrees) to normalized rgb
#[inline]
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    if s <= 0.0 {
        return (v, v, v);
    }
    let h = h.rem_euclid(360.0) / 60.0;
    let sector = h.floor();
    let f = h - sector;

    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    match sector as u8 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q)
    }
}

/// Convert normalized rgb to YCrCb, the chroma components
/// are offset by 0.5
#[inline]
pub fn rgb_to_ycrcb(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let y = rgb_to_luma(r, g, b);
    let cr = (r - y) * 0.713 + 0.5;
    let cb = (b - y) * 0.564 + 0.5;
    (y, cr, cb)
}

#[inline]
fn ycrcb_to_rgb(y: f32, cr: f32, cb: f32) -> (f32, f32, f32) {
    let cr = cr - 0.5;
    let cb = cb - 0.5;

    let r = y + 1.403 * cr;
    let g = y - 0.714 * cr - 0.344 * cb;
    let b = y + 1.773 * cb;
    (r, g, b)
}

#[inline]
fn srgb_to_linear(x: f32) -> f32 {
    if x <= 0.04045 {
        x / 12.92
    } else {
        ((x + 0.055) / 1.055).powf(2.4)
    }
}

#[inline]
fn linear_to_srgb(x: f32) -> f32 {
    if x <= 0.003_130_8 {
        x * 12.92
    } else {
        1.055 * x.powf(1.0 / 2.4) - 0.055
    }
}

#[inline]
fn lab_f(t: f32) -> f32 {
    if t > 0.008_856 {
        t.cbrt()
    } else {
        7.787 * t + 16.0 / 116.0
    }
}

#[inline]
fn lab_f_inv(t: f32) -> f32 {
    let cube = t * t * t;
    if cube > 0.008_856 {
        cube
    } else {
        (t - 16.0 / 116.0) / 7.787
    }
}

/// Convert normalized sRGB to CIE L*a*b*, L in `0..=100`
#[inline]
pub fn rgb_to_lab(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let (r, g, b) = (srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b));

    let x = (0.412_453 * r + 0.357_580 * g + 0.180_423 * b) / WHITE_X;
    let y = 0.212_671 * r + 0.715_160 * g + 0.072_169 * b;
    let z = (0.019_334 * r + 0.119_193 * g + 0.950_227 * b) / WHITE_Z;

    let (fx, fy, fz) = (lab_f(x), lab_f(y), lab_f(z));

    let l = 116.0 * fy - 16.0;
    (l, 500.0 * (fx - fy), 200.0 * (fy - fz))
}

#[inline]
fn lab_to_rgb(l: f32, a: f32, b: f32) -> (f32, f32, f32) {
    let fy = (l + 16.0) / 116.0;
    let fx = fy + a / 500.0;
    let fz = fy - b / 200.0;

    let x = lab_f_inv(fx) * WHITE_X;
    let y = lab_f_inv(fy);
    let z = lab_f_inv(fz) * WHITE_Z;

    let r = 3.240_479 * x - 1.537_150 * y - 0.498_535 * z;
    let g = -0.969_256 * x + 1.875_992 * y + 0.041_556 * z;
    let b = 0.055_648 * x - 0.204_043 * y + 1.057_311 * z;

    (linear_to_srgb(r), linear_to_srgb(g), linear_to_srgb(b))
}

/// Normalized rgb planes plus an optional alpha plane
struct RgbPlanes {
    r:     Vec<f32>,
    g:     Vec<f32>,
    b:     Vec<f32>,
    alpha: Option<Vec<f32>>
}

fn map3(
    a: &[f32], b: &[f32], c: &[f32], func: impl Fn(f32, f32, f32) -> (f32, f32, f32)
) -> [Vec<f32>; 3] {
    let mut out = [vec![0.0; a.len()], vec![0.0; a.len()], vec![0.0; a.len()]];

    for (i, ((x, y), z)) in a.iter().zip(b).zip(c).enumerate() {
        let (p, q, r) = func(*x, *y, *z);
        out[0][i] = p;
        out[1][i] = q;
        out[2][i] = r;
    }
    out
}

/// Convert planes stored in `from` native units into normalized rgb
fn to_rgb(from: ColorSpace, mut planes: Vec<Vec<f32>>, max: f32, is_float: bool) -> RgbPlanes {
    let alpha = from.alpha_position().map(|pos| {
        let alpha = std::mem::take(&mut planes[pos]);
        alpha.into_iter().map(|x| x / max).collect()
    });
    let [r, g, b] = match from {
        ColorSpace::RGB | ColorSpace::RGBA | ColorSpace::BGR | ColorSpace::BGRA => {
            let [r, g, b] = from.rgb_positions().unwrap_or([0, 1, 2]);
            let norm = |pos: usize| planes[pos].iter().map(|x| x / max).collect::<Vec<f32>>();
            [norm(r), norm(g), norm(b)]
        }
        ColorSpace::Luma | ColorSpace::LumaA => {
            let luma: Vec<f32> = planes[0].iter().map(|x| x / max).collect();
            [luma.clone(), luma.clone(), luma]
        }
        ColorSpace::HSV => {
            let (h_scale, sv_scale) = if is_float { (1.0, 1.0) } else { (2.0, 255.0) };
            map3(&planes[0], &planes[1], &planes[2], |h, s, v| {
                hsv_to_rgb(h * h_scale, s / sv_scale, v / sv_scale)
            })
        }
        ColorSpace::YCrCb => map3(&planes[0], &planes[1], &planes[2], |y, cr, cb| {
            ycrcb_to_rgb(y / max, cr / max, cb / max)
        }),
        ColorSpace::Lab => {
            if is_float {
                map3(&planes[0], &planes[1], &planes[2], lab_to_rgb)
            } else {
                map3(&planes[0], &planes[1], &planes[2], |l, a, b| {
                    lab_to_rgb(l * 100.0 / 255.0, a - 128.0, b - 128.0)
                })
            }
        }
        ColorSpace::Unknown => [vec![], vec![], vec![]]
    };
    RgbPlanes { r, g, b, alpha }
}

/// Convert normalized rgb into planes in `to` native units
fn from_rgb(to: ColorSpace, rgb: RgbPlanes, max: f32, is_float: bool) -> Vec<Vec<f32>> {
    let RgbPlanes { r, g, b, alpha } = rgb;
    let scale = |v: Vec<f32>| v.into_iter().map(|x| x * max).collect::<Vec<f32>>();

    let mut planes = match to {
        ColorSpace::RGB | ColorSpace::RGBA => vec![scale(r), scale(g), scale(b)],
        ColorSpace::BGR | ColorSpace::BGRA => vec![scale(b), scale(g), scale(r)],
        ColorSpace::Luma | ColorSpace::LumaA => {
            let luma = r
                .iter()
                .zip(&g)
                .zip(&b)
                .map(|((r, g), b)| rgb_to_luma(*r, *g, *b) * max)
                .collect();
            vec![luma]
        }
        ColorSpace::HSV => {
            let [h, s, v] = map3(&r, &g, &b, |r, g, b| {
                let (h, s, v) = rgb_to_hsv(r, g, b);
                if is_float {
                    (h, s, v)
                } else {
                    // hue 360 rounds to 180, which wraps to 0
                    let h = h / 2.0;
                    let h = if h.round() >= 180.0 { h - 180.0 } else { h };
                    (h, s * 255.0, v * 255.0)
                }
            });
            vec![h, s, v]
        }
        ColorSpace::YCrCb => {
            let [y, cr, cb] = map3(&r, &g, &b, rgb_to_ycrcb);
            vec![scale(y), scale(cr), scale(cb)]
        }
        ColorSpace::Lab => {
            let [l, a, b] = map3(&r, &g, &b, |r, g, b| {
                let (l, a, b) = rgb_to_lab(r, g, b);
                if is_float {
                    (l, a, b)
                } else {
                    (l * 255.0 / 100.0, a + 128.0, b + 128.0)
                }
            });
            vec![l, a, b]
        }
        ColorSpace::Unknown => vec![]
    };
    if to.has_alpha() {
        let opaque = || vec![max; planes[0].len()];
        planes.push(alpha.map(scale).unwrap_or_else(opaque));
    }
    planes
}

fn planes_from_channels(image: &Image) -> Result<Vec<Vec<f32>>, ImageErrors> {
    let mut planes = Vec::with_capacity(image.channels_ref(false).len());

    for channel in image.channels_ref(false) {
        let plane = match channel.bit_type() {
            BitType::U8 => channel
                .reinterpret_as::<u8>()?
                .iter()
                .map(|x| f32::from(*x))
                .collect(),
            BitType::U16 => channel
                .reinterpret_as::<u16>()?
                .iter()
                .map(|x| f32::from(*x))
                .collect(),
            BitType::F32 => channel.reinterpret_as::<f32>()?.to_vec()
        };
        planes.push(plane);
    }
    Ok(planes)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn plane_to_channel(plane: Vec<f32>, bit_type: BitType) -> Channel {
    match bit_type {
        BitType::U8 => Channel::from_vec(
            plane
                .iter()
                .map(|x| x.round().clamp(0.0, 255.0) as u8)
                .collect::<Vec<u8>>()
        ),
        BitType::U16 => Channel::from_vec(
            plane
                .iter()
                .map(|x| x.round().clamp(0.0, 65535.0) as u16)
                .collect::<Vec<u16>>()
        ),
        BitType::F32 => Channel::from_vec(plane)
    }
}

/// Convert an image from one colorspace to another
#[derive(Copy, Clone)]
pub struct ColorspaceConv {
    to: ColorSpace
}

impl ColorspaceConv {
    pub fn new(to: ColorSpace) -> ColorspaceConv {
        ColorspaceConv { to }
    }
}

impl OperationsTrait for ColorspaceConv {
    fn name(&self) -> &'static str {
        "Colorspace conversion"
    }

    fn execute_impl(&self, image: &mut Image) -> Result<(), ImageErrors> {
        let from = image.colorspace();

        if from == self.to {
            trace!("Image already in {:?}, no-op", self.to);
            return Ok(());
        }
        if self.to == ColorSpace::Unknown {
            return Err(ImageErrors::UnsupportedColorspace(
                self.to,
                self.name(),
                self.supported_colorspaces()
            ));
        }
        let bit_type = image.depth().bit_type();
        let rgb_like = |c: ColorSpace| c.is_rgb_family() || c.is_grayscale();

        if bit_type == BitType::U16 && !(rgb_like(from) && rgb_like(self.to)) {
            return Err(ImageErrors::ImageOperationNotImplemented(
                self.name(),
                bit_type
            ));
        }
        let is_float = bit_type == BitType::F32;
        let max = f32::from(image.depth().max_value());

        let planes = planes_from_channels(image)?;
        let rgb = to_rgb(from, planes, max, is_float);
        let planes = from_rgb(self.to, rgb, max, is_float);

        let channels = image.channels_vec();
        channels.clear();
        channels.extend(planes.into_iter().map(|x| plane_to_channel(x, bit_type)));

        image.set_colorspace(self.to);
        trace!("Converted {:?} to {:?}", from, self.to);

        Ok(())
    }

    fn supported_types(&self) -> &'static [BitType] {
        &[BitType::U8, BitType::U16, BitType::F32]
    }
}

#[cfg(test)]
mod tests {
    use pixlab_core::colorspace::{ColorSpace, ALL_COLORSPACES};

    use crate::image::Image;

    #[test]
    fn bgr_to_gray() {
        // pure blue, green and red in bgr order
        let pixels = [255, 0, 0, 0, 255, 0, 0, 0, 255];
        let mut image = Image::from_u8(&pixels, 3, 1, ColorSpace::BGR);
        image.convert_color(ColorSpace::Luma).unwrap();

        assert_eq!(image.flatten::<u8>().unwrap(), vec![29, 150, 76]);
    }

    #[test]
    fn bgr_to_hsv_primaries() {
        let pixels = [0, 0, 255, 0, 255, 0, 255, 0, 0, 255, 255, 255];
        let mut image = Image::from_u8(&pixels, 4, 1, ColorSpace::BGR);
        image.convert_color(ColorSpace::HSV).unwrap();

        let hsv = image.flatten::<u8>().unwrap();
        assert_eq!(hsv, vec![0, 255, 255, 60, 255, 255, 120, 255, 255, 0, 0, 255]);
    }

    #[test]
    fn hue_near_360_wraps() {
        // r max, b slightly above g, hue ~ 359.8 degrees
        let mut image = Image::from_u8(&[255, 0, 1], 1, 1, ColorSpace::RGB);
        image.convert_color(ColorSpace::HSV).unwrap();
        let hsv = image.flatten::<u8>().unwrap();

        assert_eq!(hsv[0], 0);
    }

    #[test]
    fn every_colorspace_returns_close_to_source() {
        let image = Image::from_fn::<u8, _>(16, 16, ColorSpace::BGR, |x, y, px| {
            px[0] = (x * 16) as u8;
            px[1] = (y * 16) as u8;
            px[2] = 200;
        });
        for colorspace in ALL_COLORSPACES {
            if colorspace.is_grayscale() {
                continue;
            }
            let mut converted = image.clone();
            converted.convert_color(colorspace).unwrap();
            converted.convert_color(ColorSpace::BGR).unwrap();

            let before = image.flatten::<u8>().unwrap();
            let after = converted.flatten::<u8>().unwrap();

            for (a, b) in before.iter().zip(&after) {
                assert!(a.abs_diff(*b) <= 6, "{colorspace:?}: {a} vs {b}");
            }
        }
    }

    #[test]
    fn sixteen_bit_hsv_not_implemented() {
        let mut image = Image::from_u16(&[1, 2, 3], 1, 1, ColorSpace::RGB);
        assert!(image.convert_color(ColorSpace::HSV).is_err());
        assert!(image.convert_color(ColorSpace::Luma).is_ok());
    }

    #[test]
    fn alpha_is_added_opaque() {
        let mut image = Image::from_f32(&[0.1, 0.2, 0.3], 1, 1, ColorSpace::RGB);
        image.convert_color(ColorSpace::BGRA).unwrap();

        let out = image.flatten::<f32>().unwrap();
        assert!((out[0] - 0.3).abs() < 1e-6);
        assert_eq!(out[3], 1.0);
    }
}
