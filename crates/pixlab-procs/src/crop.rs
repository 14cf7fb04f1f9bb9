/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use pixlab_core::bit_depth::BitType;
use pixlab_image::errors::ImageErrors;
use pixlab_image::image::Image;
use pixlab_image::traits::OperationsTrait;

use crate::utils::Rect;

/// Crop an image
///
/// # Example
///
/// ```
/// use pixlab_core::colorspace::ColorSpace;
/// use pixlab_image::image::Image;
/// use pixlab_image::traits::OperationsTrait;
/// use pixlab_procs::crop::Crop;
///
/// let mut image = Image::fill(0_u8, ColorSpace::BGR, 100, 100);
/// Crop::new(50, 50, 10, 10).execute(&mut image).unwrap();
/// assert_eq!(image.dimensions(), (50, 50));
/// ```
#[derive(Copy, Clone, Debug)]
pub struct Crop {
    region: Rect
}

impl Crop {
    /// Create a new crop operation
    ///
    /// # Arguments
    /// - width: Width of the cropped region
    /// - height: Height of the cropped region
    /// - x: Column where the region starts
    /// - y: Row where the region starts
    #[must_use]
    pub fn new(width: usize, height: usize, x: usize, y: usize) -> Crop {
        Crop {
            region: Rect::new(x, y, width, height)
        }
    }
}

impl OperationsTrait for Crop {
    fn name(&self) -> &'static str {
        "Crop"
    }

    fn execute_impl(&self, image: &mut Image) -> Result<(), ImageErrors> {
        let r = self.region;

        *image = image.crop(r.x, r.y, r.width, r.height)?;
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

    use crate::crop::Crop;

    #[test]
    fn crop_region() {
        let mut image = Image::from_fn::<u8, _>(4, 4, ColorSpace::Luma, |x, y, px| {
            px[0] = (y * 4 + x) as u8;
        });
        Crop::new(2, 2, 1, 2).execute(&mut image).unwrap();
        assert_eq!(image.flatten::<u8>().unwrap(), [9, 10, 13, 14]);
    }

    #[test]
    fn crop_outside_fails() {
        let mut image = Image::fill(0_u8, ColorSpace::Luma, 4, 4);
        assert!(Crop::new(4, 4, 1, 0).execute(&mut image).is_err());
    }
}
