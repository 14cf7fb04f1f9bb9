/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Range masks
use pixlab_core::bit_depth::{BitDepth, BitType};
use pixlab_core::colorspace::ColorSpace;
use pixlab_image::channel::Channel;
use pixlab_image::errors::ImageErrors;
use pixlab_image::image::Image;
use pixlab_image::traits::OperationsTrait;

use crate::utils::{channel_to_f32, ensure};

/// Turn an image into a grayscale mask that is 255 where every colour
/// channel lies inside `lower..=upper` and 0 elsewhere
///
/// Bounds are in the native units of the image, for 8 bit HSV the hue
/// runs from 0 to 179. A hue range whose lower bound exceeds its upper
/// bound wraps around red, e.g `170..=10`.
#[derive(Clone, Debug)]
pub struct InRange {
    lower: Vec<f32>,
    upper: Vec<f32>
}

impl InRange {
    #[must_use]
    pub fn new(lower: Vec<f32>, upper: Vec<f32>) -> InRange {
        InRange { lower, upper }
    }
}

impl OperationsTrait for InRange {
    fn name(&self) -> &'static str {
        "In Range"
    }

    fn execute_impl(&self, image: &mut Image) -> Result<(), ImageErrors> {
        let colorspace = image.colorspace();
        let depth = image.depth();
        let components = image.channels_ref(true).len();

        ensure(
            self.lower.len() == components && self.upper.len() == components,
            || {
                format!(
                    "Expected {components} bounds for {colorspace:?}, found {} lower and {} upper",
                    self.lower.len(),
                    self.upper.len()
                )
            }
        )?;

        let planes = image
            .channels_ref(true)
            .iter()
            .map(|c| channel_to_f32(c, depth))
            .collect::<Result<Vec<_>, _>>()?;

        let mut mask = vec![255_u8; image.width() * image.height()];

        for (i, plane) in planes.iter().enumerate() {
            let (lo, hi) = (self.lower[i], self.upper[i]);
            let wraps = colorspace == ColorSpace::HSV && i == 0 && lo > hi;

            for (m, v) in mask.iter_mut().zip(plane) {
                let inside = if wraps {
                    *v >= lo || *v <= hi
                } else {
                    (lo..=hi).contains(v)
                };
                if !inside {
                    *m = 0;
                }
            }
        }
        *image.channels_vec() = vec![Channel::from_vec(mask)];
        image.set_colorspace(ColorSpace::Luma);
        image.set_depth(BitDepth::Eight);

        Ok(())
    }

    fn supported_types(&self) -> &'static [BitType] {
        &[BitType::U8, BitType::U16, BitType::F32]
    }
}

#[cfg(test)]
mod tests {
    use pixlab_core::bit_depth::BitDepth;
    use pixlab_core::colorspace::ColorSpace;
    use pixlab_image::image::Image;
    use pixlab_image::traits::OperationsTrait;

    use crate::in_range::InRange;

    #[test]
    fn bounds_are_inclusive() {
        let pixels = [10_u8, 20, 30, 9, 20, 30, 10, 20, 31];
        let mut image = Image::from_u8(&pixels, 3, 1, ColorSpace::BGR);
        InRange::new(vec![10.0, 0.0, 0.0], vec![255.0, 255.0, 30.0])
            .execute(&mut image)
            .unwrap();

        assert_eq!(image.colorspace(), ColorSpace::Luma);
        assert_eq!(image.depth(), BitDepth::Eight);
        assert_eq!(image.flatten::<u8>().unwrap(), [255, 0, 0]);
    }

    #[test]
    fn hue_wraps_around_red() {
        let pixels = [175_u8, 200, 200, 5, 200, 200, 90, 200, 200];
        let mut image = Image::from_u8(&pixels, 3, 1, ColorSpace::HSV);
        InRange::new(vec![170.0, 100.0, 100.0], vec![10.0, 255.0, 255.0])
            .execute(&mut image)
            .unwrap();
        assert_eq!(image.flatten::<u8>().unwrap(), [255, 255, 0]);
    }

    #[test]
    fn wrong_bound_count() {
        let mut image = Image::fill(0_u8, ColorSpace::RGBA, 2, 2);
        assert!(InRange::new(vec![0.0; 4], vec![1.0; 4])
            .execute(&mut image)
            .is_err());
    }
}
