/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Desaturation in HSV
use pixlab_core::bit_depth::BitType;
use pixlab_core::colorspace::ColorSpace;
use pixlab_core::log::debug;
use pixlab_image::errors::ImageErrors;
use pixlab_image::image::Image;
use pixlab_image::traits::OperationsTrait;

use crate::traits::NumOps;
use crate::utils::{ensure, min_max};

/// Scale the saturation of an image
///
/// The image is taken to HSV, saturation is multiplied by `scale` and
/// clipped to the saturation range the image had before, then converted
/// back. Scales below one give a faded look.
#[derive(Copy, Clone, Debug)]
pub struct Desaturate {
    scale: f32
}

impl Desaturate {
    #[must_use]
    pub fn new(scale: f32) -> Desaturate {
        Desaturate { scale }
    }
}

fn scale_clipped<T: NumOps<T>>(data: &mut [T], scale: f32) {
    let Some((min, max)) = min_max(data) else {
        return;
    };
    let (min, max) = (min.to_f32(), max.to_f32());

    debug!("Saturation before scaling spans {min}..={max}");

    for x in data.iter_mut() {
        *x = T::from_f32((x.to_f32() * scale).clamp(min, max));
    }
}

impl OperationsTrait for Desaturate {
    fn name(&self) -> &'static str {
        "Desaturate"
    }

    fn execute_impl(&self, image: &mut Image) -> Result<(), ImageErrors> {
        ensure(self.scale >= 0.0, || {
            format!("Saturation scale cannot be negative, found {}", self.scale)
        })?;
        let original = image.colorspace();
        let alpha = original
            .alpha_position()
            .map(|pos| image.channels_ref(false)[pos].clone());

        image.convert_color(ColorSpace::HSV)?;

        let bit_type = image.depth().bit_type();
        let saturation = &mut image.channels_mut(false)[1];

        match bit_type {
            BitType::U8 => scale_clipped(saturation.reinterpret_as_mut::<u8>()?, self.scale),
            BitType::F32 => scale_clipped(saturation.reinterpret_as_mut::<f32>()?, self.scale),
            BitType::U16 => {
                return Err(ImageErrors::ImageOperationNotImplemented(
                    self.name(),
                    BitType::U16
                ))
            }
        }
        image.convert_color(original)?;

        if let (Some(alpha), Some(pos)) = (alpha, original.alpha_position()) {
            image.channels_mut(false)[pos] = alpha;
        }
        Ok(())
    }

    fn supported_types(&self) -> &'static [BitType] {
        &[BitType::U8, BitType::F32]
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

    use crate::desaturate::Desaturate;

    fn colourful() -> Image {
        Image::from_fn::<u8, _>(8, 8, ColorSpace::BGR, |x, y, px| {
            px[0] = (x * 30) as u8;
            px[1] = (y * 30) as u8;
            px[2] = 200;
        })
    }

    #[test]
    fn unit_scale_is_close_to_identity() {
        let image = colourful();
        let out = Desaturate::new(1.0).clone_and_execute(&image).unwrap();

        let a = image.flatten::<u8>().unwrap();
        let b = out.flatten::<u8>().unwrap();
        assert!(a.iter().zip(&b).all(|(x, y)| x.abs_diff(*y) <= 6));
    }

    #[test]
    fn lower_scale_reduces_spread() {
        let image = colourful();
        let out = Desaturate::new(0.01).clone_and_execute(&image).unwrap();

        let spread = |img: &Image| -> u32 {
            img.flatten::<u8>()
                .unwrap()
                .chunks_exact(3)
                .map(|p| u32::from(*p.iter().max().unwrap() - *p.iter().min().unwrap()))
                .sum()
        };
        assert!(spread(&out) < spread(&image));
        assert!(Desaturate::new(-1.0).clone_and_execute(&image).is_err());
    }
}
