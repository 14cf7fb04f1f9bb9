/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Alpha compositing of an overlay, e.g a pair of sunglasses over a face
use pixlab_core::bit_depth::{BitDepth, BitType};
use pixlab_core::colorspace::ColorSpace;
use pixlab_image::errors::{ImageErrors, ImageOperationsErrors};
use pixlab_image::image::Image;
use pixlab_image::traits::OperationsTrait;

/// Composite an 8 bit RGBA or BGRA overlay onto an image
///
/// Each output sample is `image*(1-a) + overlay*a` where `a` is the
/// overlay alpha divided by 255. The overlay's top left corner lands at
/// `(x,y)` and anything falling outside the image is dropped.
#[derive(Clone, Debug)]
pub struct AlphaOverlay {
    overlay: Image,
    x:       usize,
    y:       usize
}

impl AlphaOverlay {
    #[must_use]
    pub fn new(overlay: Image, x: usize, y: usize) -> AlphaOverlay {
        AlphaOverlay { overlay, x, y }
    }
}

impl OperationsTrait for AlphaOverlay {
    fn name(&self) -> &'static str {
        "Alpha Overlay"
    }

    fn execute_impl(&self, image: &mut Image) -> Result<(), ImageErrors> {
        let overlay_cs = self.overlay.colorspace();

        if !matches!(overlay_cs, ColorSpace::RGBA | ColorSpace::BGRA)
            || self.overlay.depth() != BitDepth::Eight
        {
            return Err(ImageOperationsErrors::InvalidParameter(format!(
                "Overlay must be 8 bit RGBA or BGRA, found {:?} {:?}",
                self.overlay.depth(),
                overlay_cs
            ))
            .into());
        }
        let (Some(dst_pos), Some(src_pos), Some(alpha_pos)) = (
            image.colorspace().rgb_positions(),
            overlay_cs.rgb_positions(),
            overlay_cs.alpha_position()
        ) else {
            return Err(ImageErrors::GenericStr("Overlay needs rgb images"));
        };
        let (width, height) = image.dimensions();
        let (ow, oh) = self.overlay.dimensions();

        if self.x >= width || self.y >= height {
            return Ok(());
        }
        let cols = ow.min(width - self.x);
        let rows = oh.min(height - self.y);

        let overlay_channels = self.overlay.channels_ref(false);
        let alpha = overlay_channels[alpha_pos].reinterpret_as::<u8>()?;

        let channels = image.channels_mut(false);

        for (dst_idx, src_idx) in dst_pos.iter().zip(src_pos) {
            let src = overlay_channels[src_idx].reinterpret_as::<u8>()?;
            let dst = channels[*dst_idx].reinterpret_as_mut::<u8>()?;

            for row in 0..rows {
                let src_row = row * ow;
                let dst_row = (row + self.y) * width + self.x;

                for col in 0..cols {
                    let a = f32::from(alpha[src_row + col]) / 255.0;
                    let bg = f32::from(dst[dst_row + col]);
                    let fg = f32::from(src[src_row + col]);

                    dst[dst_row + col] = (bg * (1.0 - a) + fg * a).round() as u8;
                }
            }
        }
        Ok(())
    }

    fn supported_types(&self) -> &'static [BitType] {
        &[BitType::U8]
    }

    fn supported_colorspaces(&self) -> &'static [ColorSpace] {
        &[
            ColorSpace::RGB,
            ColorSpace::RGBA,
            ColorSpace::BGR,
            ColorSpace::BGRA
        ]
    }
}

#[cfg(test)]
mod tests {
    use pixlab_core::colorspace::ColorSpace;
    use pixlab_image::image::Image;
    use pixlab_image::traits::OperationsTrait;

    use crate::overlay::AlphaOverlay;

    #[test]
    fn blends_by_alpha() {
        // red, opaque then half transparent then invisible
        let overlay = Image::from_u8(
            &[255, 0, 0, 255, 255, 0, 0, 128, 255, 0, 0, 0],
            3,
            1,
            ColorSpace::RGBA
        );
        let mut image = Image::fill(0_u8, ColorSpace::BGR, 3, 1);
        AlphaOverlay::new(overlay, 0, 0).execute(&mut image).unwrap();

        assert_eq!(
            image.flatten::<u8>().unwrap(),
            [0, 0, 255, 0, 0, 128, 0, 0, 0]
        );
    }

    #[test]
    fn clipped_at_border() {
        let overlay = Image::fill(255_u8, ColorSpace::BGRA, 4, 4);
        let mut image = Image::fill(0_u8, ColorSpace::BGR, 5, 5);
        AlphaOverlay::new(overlay.clone(), 3, 3)
            .execute(&mut image)
            .unwrap();
        let out = image.flatten::<u8>().unwrap();
        assert_eq!(out.iter().filter(|x| **x == 255).count(), 4 * 3);

        // fully outside is a no-op
        AlphaOverlay::new(overlay, 10, 0)
            .execute(&mut image)
            .unwrap();
        assert_eq!(image.flatten::<u8>().unwrap(), out);
    }

    #[test]
    fn overlay_needs_alpha() {
        let overlay = Image::fill(255_u8, ColorSpace::BGR, 2, 2);
        let mut image = Image::fill(0_u8, ColorSpace::BGR, 5, 5);
        assert!(AlphaOverlay::new(overlay, 0, 0).execute(&mut image).is_err());
    }
}
