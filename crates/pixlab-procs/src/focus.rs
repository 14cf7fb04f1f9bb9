/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Sharpness measures and best focused frame selection
//!
//! Both measures work on a lightly blurred grayscale copy of the image in
//! 8 bit units, so scores are comparable across bit depths.
use pixlab_core::bit_depth::BitDepth;
use pixlab_core::log::{debug, info};
use pixlab_image::errors::ImageErrors;
use pixlab_image::image::Image;

use crate::convolve::convolve_f32;
use crate::gaussian_blur::gaussian_blur_f32;
use crate::laplacian::laplacian_f32;
use crate::pad::PadMethod;
use crate::utils::{luma_plane, Rect};

#[rustfmt::skip]
const SECOND_DERIVATIVE_X: [f32; 9] = [
     0.0, 0.0,  0.0,
    -1.0, 2.0, -1.0,
     0.0, 0.0,  0.0
];

#[rustfmt::skip]
const SECOND_DERIVATIVE_Y: [f32; 9] = [
    0.0, -1.0, 0.0,
    0.0,  2.0, 0.0,
    0.0, -1.0, 0.0
];

/// How the sharpness of a frame is measured
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FocusMeasure {
    /// Standard deviation of the absolute laplacian
    VarAbsLaplacian,
    /// Sum of absolute second derivatives in x and y
    SumModifiedLaplacian
}

impl FocusMeasure {
    pub fn from_string_result(input: &str) -> Result<Self, String> {
        match input {
            "var-abs-laplacian" | "val" => Ok(Self::VarAbsLaplacian),
            "sum-modified-laplacian" | "sml" => Ok(Self::SumModifiedLaplacian),
            _ => Err(format!(
                "Unknown focus measure {input}, accepted values are var-abs-laplacian,sum-modified-laplacian"
            ))
        }
    }

    /// Score an image, larger is sharper
    pub fn measure(self, image: &Image) -> Result<f64, ImageErrors> {
        match self {
            Self::VarAbsLaplacian => var_abs_laplacian(image),
            Self::SumModifiedLaplacian => sum_modified_laplacian(image)
        }
    }
}

/// Grayscale in 8 bit units, blurred by a 3x3 gaussian
///
/// 8 bit images are rounded after the blur like any 8 bit result would be
fn blurred_gray(image: &Image) -> Result<Vec<f32>, ImageErrors> {
    if image.is_empty() {
        return Err(ImageErrors::EmptyImage);
    }
    let (width, height) = image.dimensions();
    let depth = image.depth();

    let mut gray = luma_plane(image)?;
    let scale = 255.0 / f32::from(depth.max_value());

    if depth != BitDepth::Eight {
        gray.iter_mut().for_each(|x| *x *= scale);
    }
    let mut blurred = gaussian_blur_f32(&gray, width, height, 3, 0.0, PadMethod::Reflect101);

    if depth == BitDepth::Eight {
        blurred.iter_mut().for_each(|x| *x = x.round());
    }
    Ok(blurred)
}

/// Standard deviation of the absolute 3x3 laplacian
pub fn var_abs_laplacian(image: &Image) -> Result<f64, ImageErrors> {
    let (width, height) = image.dimensions();
    let blurred = blurred_gray(image)?;

    let laplacian = laplacian_f32(&blurred, width, height, 3)
        .ok_or(ImageErrors::GenericStr("Unsupported laplacian size"))?;

    let count = laplacian.len() as f64;
    let mean = laplacian.iter().map(|x| f64::from(x.abs())).sum::<f64>() / count;
    let variance = laplacian
        .iter()
        .map(|x| {
            let d = f64::from(x.abs()) - mean;
            d * d
        })
        .sum::<f64>()
        / count;

    Ok(variance.sqrt())
}

/// Sum over every pixel of `|d2/dx2| + |d2/dy2|`
pub fn sum_modified_laplacian(image: &Image) -> Result<f64, ImageErrors> {
    let (width, height) = image.dimensions();
    let blurred = blurred_gray(image)?;

    let dx = convolve_f32(
        &blurred,
        width,
        height,
        &SECOND_DERIVATIVE_X,
        3,
        3,
        PadMethod::Reflect101
    );
    let dy = convolve_f32(
        &blurred,
        width,
        height,
        &SECOND_DERIVATIVE_Y,
        3,
        3,
        PadMethod::Reflect101
    );
    Ok(dx
        .iter()
        .zip(&dy)
        .map(|(a, b)| f64::from(a.abs()) + f64::from(b.abs()))
        .sum())
}

/// Find the sharpest frame of a sequence
///
/// When `roi` is given only that region of each frame is scored.
/// Later frames must score strictly higher to replace an earlier one.
///
/// Returns the index and score of the best frame, `None` for an empty sequence
pub fn best_focused_frame(
    frames: &[Image], roi: Option<Rect>, measure: FocusMeasure
) -> Result<Option<(usize, f64)>, ImageErrors> {
    let mut best: Option<(usize, f64)> = None;

    for (index, frame) in frames.iter().enumerate() {
        let score = match roi {
            Some(r) => measure.measure(&frame.crop(r.x, r.y, r.width, r.height)?)?,
            None => measure.measure(frame)?
        };
        debug!("Frame {index} scored {score:.3} with {measure:?}");

        if best.map_or(true, |(_, s)| score > s) {
            best = Some((index, score));
        }
    }
    if let Some((index, score)) = best {
        info!("Sharpest frame is {index} with a score of {score:.3}");
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use pixlab_core::colorspace::ColorSpace;
    use pixlab_image::image::Image;
    use pixlab_image::traits::OperationsTrait;

    use crate::focus::{
        best_focused_frame, sum_modified_laplacian, var_abs_laplacian, FocusMeasure
    };
    use crate::gaussian_blur::GaussianBlur;
    use crate::utils::Rect;

    fn sharp() -> Image {
        Image::from_fn::<u8, _>(32, 32, ColorSpace::BGR, |x, _, px| {
            px.fill(if x % 16 < 8 { 40 } else { 220 });
        })
    }

    fn soft() -> Image {
        GaussianBlur::new(9, 0.0).clone_and_execute(&sharp()).unwrap()
    }

    #[test]
    fn flat_image_scores_zero() {
        let image = Image::fill(128_u8, ColorSpace::RGB, 16, 16);
        assert_eq!(var_abs_laplacian(&image).unwrap(), 0.0);
        assert_eq!(sum_modified_laplacian(&image).unwrap(), 0.0);

        let empty = Image::fill(0_u8, ColorSpace::RGB, 0, 0);
        assert!(var_abs_laplacian(&empty).is_err());
    }

    #[test]
    fn sharp_beats_soft() {
        let sharp = sharp();
        let soft = soft();

        for measure in [FocusMeasure::VarAbsLaplacian, FocusMeasure::SumModifiedLaplacian] {
            let a = measure.measure(&sharp).unwrap();
            let b = measure.measure(&soft).unwrap();
            assert!(a > b, "{measure:?} {a} {b}");
        }
    }

    #[test]
    fn picks_first_sharpest() {
        let frames = [soft(), sharp(), sharp(), soft()];

        let (index, _) = best_focused_frame(&frames, None, FocusMeasure::SumModifiedLaplacian)
            .unwrap()
            .unwrap();
        assert_eq!(index, 1);

        assert_eq!(
            best_focused_frame(&[], None, FocusMeasure::VarAbsLaplacian).unwrap(),
            None
        );
    }

    #[test]
    fn roi_restricts_scoring() {
        // sharp edges only in the right half of the second frame
        let left_edges = Image::from_fn::<u8, _>(32, 16, ColorSpace::Luma, |x, _, px| {
            px[0] = if x < 16 && x % 4 < 2 { 255 } else { 0 };
        });
        let right_edges = Image::from_fn::<u8, _>(32, 16, ColorSpace::Luma, |x, _, px| {
            px[0] = if x >= 16 && x % 4 < 2 { 255 } else { 0 };
        });
        let frames = [left_edges, right_edges];
        let roi = Some(Rect::new(16, 0, 16, 16));

        let best = best_focused_frame(&frames, roi, FocusMeasure::VarAbsLaplacian).unwrap();
        assert_eq!(best.map(|(i, _)| i), Some(1));

        let outside = Some(Rect::new(20, 0, 16, 16));
        assert!(best_focused_frame(&frames, outside, FocusMeasure::VarAbsLaplacian).is_err());
    }

    #[test]
    fn measure_names() {
        assert_eq!(
            FocusMeasure::from_string_result("sml"),
            Ok(FocusMeasure::SumModifiedLaplacian)
        );
        assert!(FocusMeasure::from_string_result("sharpness").is_err());
    }
}
