/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Laplacian, the sum of second derivatives
use pixlab_core::bit_depth::BitType;
use pixlab_image::errors::ImageErrors;
use pixlab_image::image::Image;
use pixlab_image::traits::OperationsTrait;

use crate::convolve::convolve_f32;
use crate::pad::PadMethod;
use crate::traits::NumOps;
use crate::utils::{channel_to_f32, ensure, f32_to_channel};

#[rustfmt::skip]
const LAPLACIAN_1: [f32; 9] = [
    0.0,  1.0, 0.0,
    1.0, -4.0, 1.0,
    0.0,  1.0, 0.0
];

#[rustfmt::skip]
const LAPLACIAN_3: [f32; 9] = [
    2.0,  0.0, 2.0,
    0.0, -8.0, 0.0,
    2.0,  0.0, 2.0
];

/// Signed laplacian of a plane
///
/// `ksize` selects the aperture, 1 for the 4-neighbour kernel and 3 for
/// the diagonal kernel. Any other size returns `None`
pub fn laplacian_f32<T: NumOps<T>>(
    in_channel: &[T], width: usize, height: usize, ksize: usize
) -> Option<Vec<f32>> {
    let kernel = match ksize {
        1 => &LAPLACIAN_1,
        3 => &LAPLACIAN_3,
        _ => return None
    };
    Some(convolve_f32(
        in_channel,
        width,
        height,
        kernel,
        3,
        3,
        PadMethod::Reflect101
    ))
}

/// Replace every colour channel with the absolute value of its laplacian
#[derive(Copy, Clone, Debug)]
pub struct Laplacian {
    ksize: usize
}

impl Laplacian {
    /// Create a new laplacian, `ksize` must be 1 or 3
    #[must_use]
    pub fn new(ksize: usize) -> Laplacian {
        Laplacian { ksize }
    }
}

impl OperationsTrait for Laplacian {
    fn name(&self) -> &'static str {
        "Laplacian"
    }

    fn execute_impl(&self, image: &mut Image) -> Result<(), ImageErrors> {
        ensure(matches!(self.ksize, 1 | 3), || {
            format!("Laplacian size must be 1 or 3, found {}", self.ksize)
        })?;
        let (width, height) = image.dimensions();
        let depth = image.depth();

        for channel in image.channels_mut(true) {
            let plane = channel_to_f32(channel, depth)?;

            let mut result = laplacian_f32(&plane, width, height, self.ksize)
                .ok_or(ImageErrors::GenericStr("Unsupported laplacian size"))?;

            result.iter_mut().for_each(|x| *x = x.abs());

            *channel = f32_to_channel(&result, depth)?;
        }
        Ok(())
    }

    fn supported_types(&self) -> &'static [BitType] {
        &[BitType::U8, BitType::U16, BitType::F32]
    }
}
