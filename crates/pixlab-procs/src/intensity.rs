/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Contrast and brightness adjustments
//!
//! Both work on values normalized to `0.0..=1.0` whatever the image depth,
//! so an offset of 100 brightens an 8 bit and a 16 bit image by the same amount.
//!
//! Results above one are either clipped, or with `normalize` the whole
//! image is divided by its maximum.
use pixlab_core::bit_depth::BitType;
use pixlab_image::errors::ImageErrors;
use pixlab_image::image::Image;
use pixlab_image::traits::OperationsTrait;

use crate::utils::{channel_to_f32, f32_to_channel};

/// Apply `function` to every normalized colour sample, then clip or normalize
fn adjust<F: Fn(f32) -> f32>(
    image: &mut Image, normalize: bool, function: F
) -> Result<(), ImageErrors> {
    let depth = image.depth();
    let max_value = f32::from(depth.max_value());

    let mut planes = image
        .channels_ref(true)
        .iter()
        .map(|c| channel_to_f32(c, depth))
        .collect::<Result<Vec<_>, _>>()?;

    let mut max_seen = 0.0_f32;

    for plane in &mut planes {
        for x in plane.iter_mut() {
            *x = function(*x / max_value);
            max_seen = max_seen.max(*x);
        }
    }
    let divisor = if normalize && max_seen > 1.0 { max_seen } else { 1.0 };

    for (channel, plane) in image.channels_mut(true).iter_mut().zip(&mut planes) {
        for x in plane.iter_mut() {
            *x = (*x / divisor).clamp(0.0, 1.0) * max_value;
        }
        *channel = f32_to_channel(plane, depth)?;
    }
    Ok(())
}

/// Intensity scaling, every sample is multiplied by `1 + percentage/100`
#[derive(Copy, Clone, Debug)]
pub struct Contrast {
    percentage: f32,
    normalize:  bool
}

impl Contrast {
    /// Create a new contrast adjustment
    ///
    /// # Arguments
    /// - percentage: Contrast change in percent, negative values reduce contrast
    /// - normalize: Divide by the maximum instead of clipping
    #[must_use]
    pub fn new(percentage: f32, normalize: bool) -> Contrast {
        Contrast {
            percentage,
            normalize
        }
    }
}

impl OperationsTrait for Contrast {
    fn name(&self) -> &'static str {
        "Contrast"
    }

    fn execute_impl(&self, image: &mut Image) -> Result<(), ImageErrors> {
        let factor = 1.0 + self.percentage / 100.0;

        adjust(image, self.normalize, |x| x * factor)
    }

    fn supported_types(&self) -> &'static [BitType] {
        &[BitType::U8, BitType::U16, BitType::F32]
    }
}

/// Brightness offset, `offset/255` is added to every normalized sample
#[derive(Copy, Clone, Debug)]
pub struct Brightness {
    offset:    f32,
    normalize: bool
}

impl Brightness {
    /// Create a new brightness adjustment
    ///
    /// # Arguments
    /// - offset: Offset in 8 bit units, negative values darken
    /// - normalize: Divide by the maximum instead of clipping
    #[must_use]
    pub fn new(offset: f32, normalize: bool) -> Brightness {
        Brightness { offset, normalize }
    }
}

impl OperationsTrait for Brightness {
    fn name(&self) -> &'static str {
        "Brightness"
    }

    fn execute_impl(&self, image: &mut Image) -> Result<(), ImageErrors> {
        let offset = self.offset / 255.0;

        adjust(image, self.normalize, |x| x + offset)
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

    use crate::intensity::{Brightness, Contrast};

    #[test]
    fn contrast_clips() {
        let mut image = Image::from_u8(&[100, 200, 0], 3, 1, ColorSpace::Luma);
        Contrast::new(50.0, false).execute(&mut image).unwrap();
        assert_eq!(image.flatten::<u8>().unwrap(), [150, 255, 0]);
    }

    #[test]
    fn contrast_normalizes() {
        let mut image = Image::from_u8(&[50, 200, 0], 3, 1, ColorSpace::Luma);
        Contrast::new(50.0, true).execute(&mut image).unwrap();
        // 75/300 and 300/300
        assert_eq!(image.flatten::<u8>().unwrap(), [64, 255, 0]);
    }

    #[test]
    fn brightness_on_sixteen_bit() {
        let mut image = Image::from_u16(&[0, 65535], 2, 1, ColorSpace::Luma);
        Brightness::new(51.0, false).execute(&mut image).unwrap();
        assert_eq!(image.flatten::<u16>().unwrap(), [13107, 65535]);
    }

    #[test]
    fn brightness_keeps_alpha() {
        let mut image = Image::from_u8(&[10, 20], 1, 1, ColorSpace::LumaA);
        Brightness::new(-100.0, true).execute(&mut image).unwrap();
        assert_eq!(image.flatten::<u8>().unwrap(), [0, 20]);
    }
}
