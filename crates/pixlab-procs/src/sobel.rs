/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Sobel derivatives
use pixlab_core::bit_depth::BitType;
use pixlab_image::channel::Channel;
use pixlab_image::errors::ImageErrors;
use pixlab_image::image::Image;
use pixlab_image::traits::OperationsTrait;

use crate::convolve::convolve_f32;
use crate::pad::{pad, PadMethod};
use crate::spatial::spatial_NxN;
use crate::traits::NumOps;
use crate::utils::{channel_to_f32, f32_to_channel};

#[rustfmt::skip]
pub const SOBEL_X: [f32; 9] = [
    -1.0, 0.0, 1.0,
    -2.0, 0.0, 2.0,
    -1.0, 0.0, 1.0
];

#[rustfmt::skip]
pub const SOBEL_Y: [f32; 9] = [
    -1.0, -2.0, -1.0,
     0.0,  0.0,  0.0,
     1.0,  2.0,  1.0
];

/// Return the horizontal and vertical 3x3 Sobel derivatives of a plane
///
/// Values are signed and in the native range of `T`
pub fn sobel_gradients<T: NumOps<T>>(
    in_channel: &[T], width: usize, height: usize
) -> (Vec<f32>, Vec<f32>) {
    let gx = convolve_f32(
        in_channel,
        width,
        height,
        &SOBEL_X,
        3,
        3,
        PadMethod::Reflect101
    );
    let gy = convolve_f32(
        in_channel,
        width,
        height,
        &SOBEL_Y,
        3,
        3,
        PadMethod::Reflect101
    );
    (gx, gy)
}

#[inline(always)]
fn sobel_magnitude(window: &[f32; 9]) -> f32 {
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;

    for ((px, wx), wy) in window.iter().zip(&SOBEL_X).zip(&SOBEL_Y) {
        sum_x += px * wx;
        sum_y += px * wy;
    }
    sum_x.hypot(sum_y)
}

/// Sobel gradient magnitude of a plane
pub fn sobel_f32(in_channel: &[f32], out_channel: &mut [f32], width: usize, height: usize) {
    let padded = pad(in_channel, width, height, 1, 1, PadMethod::Reflect101);

    spatial_NxN::<_, _, 1, 9>(&padded, out_channel, width, height, sobel_magnitude);
}

/// Replace every colour channel with its Sobel gradient magnitude
///
/// Results are saturated to the image range
#[derive(Default, Copy, Clone, Debug)]
pub struct Sobel;

impl Sobel {
    #[must_use]
    pub fn new() -> Sobel {
        Self
    }
}

impl OperationsTrait for Sobel {
    fn name(&self) -> &'static str {
        "Sobel"
    }

    fn execute_impl(&self, image: &mut Image) -> Result<(), ImageErrors> {
        let (width, height) = image.dimensions();
        let depth = image.depth();

        for channel in image.channels_mut(true) {
            let plane = channel_to_f32(channel, depth)?;
            let mut out = vec![0.0; plane.len()];

            sobel_f32(&plane, &mut out, width, height);

            let new_channel: Channel = f32_to_channel(&out, depth)?;
            *channel = new_channel;
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

    use crate::sobel::{sobel_gradients, Sobel};

    #[test]
    fn vertical_edge() {
        #[rustfmt::skip]
        let pixels = [
            0_u8, 0, 10, 10,
            0, 0, 10, 10,
            0, 0, 10, 10
        ];
        let (gx, gy) = sobel_gradients(&pixels, 4, 3);

        assert_eq!(gx[5], 40.0);
        assert_eq!(gx[4], 0.0);
        assert!(gy.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn magnitude_saturates() {
        let image = Image::from_fn::<u8, _>(6, 6, ColorSpace::Luma, |x, _, px| {
            px[0] = if x < 3 { 0 } else { 255 };
        });
        let mut out = image.clone();
        Sobel::new().execute(&mut out).unwrap();
        let out = out.flatten::<u8>().unwrap();

        assert_eq!(out[2], 255);
        assert_eq!(out[0], 0);
    }
}
