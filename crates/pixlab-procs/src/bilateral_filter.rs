/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Edge preserving bilateral filter
//!
//! Each output pixel is a weighted mean of its neighbours inside a circle of
//! radius `diameter/2`, where the weight of a neighbour is the product of
//!
//! - a spatial gaussian on the distance to the centre
//! - a colour gaussian on the L1 distance between the two pixels
//!
//! The colour distance is summed across all colour channels so the filter
//! smooths flat regions while leaving strong edges intact.
use pixlab_core::bit_depth::BitType;
use pixlab_core::log::trace;
use pixlab_image::errors::ImageErrors;
use pixlab_image::image::Image;
use pixlab_image::traits::OperationsTrait;

use crate::pad::{pad, PadMethod};
use crate::utils::{channel_to_f32, f32_to_channel};

#[derive(Copy, Clone, Debug)]
pub struct BilateralFilter {
    diameter:    i32,
    sigma_color: f32,
    sigma_space: f32
}

impl BilateralFilter {
    /// Create a new bilateral filter
    ///
    /// # Arguments
    /// - diameter: Neighbourhood diameter, if zero or negative it is derived from `sigma_space`
    /// - sigma_color: Colour sigma in 8 bit units, larger values mix more colours
    /// - sigma_space: Spatial sigma in pixels
    #[must_use]
    pub fn new(diameter: i32, sigma_color: f32, sigma_space: f32) -> BilateralFilter {
        BilateralFilter {
            diameter,
            sigma_color,
            sigma_space
        }
    }

    fn radius(&self) -> usize {
        let sigma_space = if self.sigma_space <= 0.0 { 1.0 } else { self.sigma_space };

        let radius = if self.diameter <= 0 {
            (sigma_space * 1.5).round() as usize
        } else {
            (self.diameter / 2) as usize
        };
        radius.max(1)
    }
}

/// Filter a set of planes jointly
///
/// # Arguments
/// - planes: Colour planes, all `width*height` long
/// - radius: Radius of the circular neighbourhood
/// - sigma_color: Colour sigma, in the units of the planes after multiplying by `scale`
/// - sigma_space: Spatial sigma in pixels
/// - scale: Factor converting plane values into colour sigma units
pub fn bilateral_filter(
    planes: &[Vec<f32>], width: usize, height: usize, radius: usize, sigma_color: f32,
    sigma_space: f32, scale: f32
) -> Vec<Vec<f32>> {
    let sigma_color = if sigma_color <= 0.0 { 1.0 } else { sigma_color };
    let sigma_space = if sigma_space <= 0.0 { 1.0 } else { sigma_space };

    let color_coeff = -0.5 / (sigma_color * sigma_color);
    let space_coeff = -0.5 / (sigma_space * sigma_space);

    let r = radius as isize;
    let mut offsets = vec![];

    for dy in -r..=r {
        for dx in -r..=r {
            let distance = ((dx * dx + dy * dy) as f32).sqrt();

            if distance > radius as f32 {
                continue;
            }
            offsets.push((dx, dy, (distance * distance * space_coeff).exp()));
        }
    }
    trace!("Bilateral filter uses {} neighbours", offsets.len());

    let padded: Vec<Vec<f32>> = planes
        .iter()
        .map(|x| pad(x, width, height, radius, radius, PadMethod::Reflect101))
        .collect();
    let padded_w = (width + 2 * radius) as isize;

    let mut output = vec![vec![0.0; width * height]; planes.len()];
    let mut sums = vec![0.0_f32; planes.len()];

    for y in 0..height {
        for x in 0..width {
            let center = (y + radius) as isize * padded_w + (x + radius) as isize;

            sums.fill(0.0);
            let mut weight_sum = 0.0;

            for (dx, dy, space_weight) in &offsets {
                let pos = (center + dy * padded_w + dx) as usize;

                let distance: f32 = padded
                    .iter()
                    .map(|p| (p[pos] - p[center as usize]).abs())
                    .sum::<f32>()
                    * scale;

                let weight = space_weight * (distance * distance * color_coeff).exp();

                for (sum, plane) in sums.iter_mut().zip(&padded) {
                    *sum += plane[pos] * weight;
                }
                weight_sum += weight;
            }
            for (out, sum) in output.iter_mut().zip(&sums) {
                out[y * width + x] = sum / weight_sum;
            }
        }
    }
    output
}

impl OperationsTrait for BilateralFilter {
    fn name(&self) -> &'static str {
        "Bilateral Filter"
    }

    fn execute_impl(&self, image: &mut Image) -> Result<(), ImageErrors> {
        let (width, height) = image.dimensions();
        let depth = image.depth();
        let scale = 255.0 / f32::from(depth.max_value());

        let planes = image
            .channels_ref(true)
            .iter()
            .map(|c| channel_to_f32(c, depth))
            .collect::<Result<Vec<_>, _>>()?;

        let filtered = bilateral_filter(
            &planes,
            width,
            height,
            self.radius(),
            self.sigma_color,
            self.sigma_space,
            scale
        );
        for (channel, plane) in image.channels_mut(true).iter_mut().zip(filtered) {
            *channel = f32_to_channel(&plane, depth)?;
        }
        Ok(())
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

    use crate::bilateral_filter::BilateralFilter;

    #[test]
    fn keeps_strong_edge() {
        // left half black, right half white
        let image = Image::from_fn::<u8, _>(16, 8, ColorSpace::BGR, |x, _, px| {
            px.fill(if x < 8 { 0 } else { 255 });
        });
        let mut out = image.clone();
        BilateralFilter::new(5, 20.0, 5.0).execute(&mut out).unwrap();
        assert_eq!(out, image);
    }

    #[test]
    fn smooths_small_noise() {
        let image = Image::from_fn::<u8, _>(9, 9, ColorSpace::Luma, |x, y, px| {
            px[0] = if (x + y) % 2 == 0 { 100 } else { 110 };
        });
        let mut out = image.clone();
        BilateralFilter::new(5, 300.0, 300.0).execute(&mut out).unwrap();
        let out = out.flatten::<u8>().unwrap();
        assert!(out.iter().all(|x| (102..=108).contains(x)));
    }

    #[test]
    fn radius_from_sigma() {
        assert_eq!(BilateralFilter::new(0, 1.0, 4.0).radius(), 6);
        assert_eq!(BilateralFilter::new(9, 1.0, 4.0).radius(), 4);
        assert_eq!(BilateralFilter::new(-1, 1.0, 0.0).radius(), 2);
    }
}
