/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Mean (box) blur
use pixlab_core::bit_depth::BitType;
use pixlab_image::channel::Channel;
use pixlab_image::errors::ImageErrors;
use pixlab_image::image::Image;
use pixlab_image::traits::OperationsTrait;

use crate::convolve::convolve_separable;
use crate::pad::PadMethod;
use crate::traits::NumOps;
use crate::utils::{ensure, execute_on};

/// Replace every pixel with the mean of the `ksize x ksize` window around it
pub fn box_blur<T: NumOps<T>>(
    in_channel: &[T], out_channel: &mut [T], width: usize, height: usize, ksize: usize,
    method: PadMethod
) {
    let kernel = vec![1.0 / ksize as f32; ksize];
    let plane: Vec<f32> = in_channel.iter().map(|x| x.to_f32()).collect();

    let result = convolve_separable(&plane, width, height, &kernel, &kernel, method);

    for (out, value) in out_channel.iter_mut().zip(result) {
        *out = T::from_f32(value);
    }
}

/// Box blur filter
#[derive(Copy, Clone, Debug)]
pub struct BoxBlur {
    ksize: usize
}

impl BoxBlur {
    /// Create a new box blur, `ksize` must be odd
    #[must_use]
    pub fn new(ksize: usize) -> BoxBlur {
        BoxBlur { ksize }
    }
}

impl OperationsTrait for BoxBlur {
    fn name(&self) -> &'static str {
        "Box blur"
    }

    fn execute_impl(&self, image: &mut Image) -> Result<(), ImageErrors> {
        ensure(self.ksize % 2 == 1, || {
            format!("Box blur size must be odd, found {}", self.ksize)
        })?;
        let (width, height) = image.dimensions();
        let depth = image.depth();

        let function = |channel: &mut Channel| -> Result<(), ImageErrors> {
            let mut out_channel = Channel::new_with_bit_type(channel.len(), depth.bit_type());

            match depth.bit_type() {
                BitType::U8 => box_blur(
                    channel.reinterpret_as::<u8>()?,
                    out_channel.reinterpret_as_mut::<u8>()?,
                    width,
                    height,
                    self.ksize,
                    PadMethod::Reflect101
                ),
                BitType::U16 => box_blur(
                    channel.reinterpret_as::<u16>()?,
                    out_channel.reinterpret_as_mut::<u16>()?,
                    width,
                    height,
                    self.ksize,
                    PadMethod::Reflect101
                ),
                BitType::F32 => box_blur(
                    channel.reinterpret_as::<f32>()?,
                    out_channel.reinterpret_as_mut::<f32>()?,
                    width,
                    height,
                    self.ksize,
                    PadMethod::Reflect101
                )
            }
            *channel = out_channel;
            Ok(())
        };
        execute_on(function, image, true)
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

    use crate::box_blur::BoxBlur;

    #[test]
    fn averages_window() {
        #[rustfmt::skip]
        let pixels = [
            0_u8, 0, 0,
            0, 90, 0,
            0, 0, 0
        ];
        let mut image = Image::from_u8(&pixels, 3, 3, ColorSpace::Luma);
        BoxBlur::new(3).execute(&mut image).unwrap();
        assert_eq!(image.flatten::<u8>().unwrap()[4], 10);
    }

    #[test]
    fn size_one_is_identity() {
        let pixels: Vec<u16> = (0..20).map(|x| x * 1000).collect();
        let mut image = Image::from_u16(&pixels, 5, 4, ColorSpace::Luma);
        BoxBlur::new(1).execute(&mut image).unwrap();
        assert_eq!(image.flatten::<u16>().unwrap(), pixels);
    }
}
