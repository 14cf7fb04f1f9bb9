/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Bitwise operations
use pixlab_core::bit_depth::{BitDepth, BitType};
use pixlab_core::colorspace::ColorSpace;
use pixlab_image::channel::Channel;
use pixlab_image::errors::{ImageErrors, ImageOperationsErrors};
use pixlab_image::image::Image;
use pixlab_image::traits::OperationsTrait;

use crate::utils::execute_on;

/// Invert every colour channel
///
/// Integers are flipped bitwise, floats become `1.0 - x`
#[derive(Default, Copy, Clone, Debug)]
pub struct BitwiseNot;

impl BitwiseNot {
    #[must_use]
    pub fn new() -> BitwiseNot {
        Self
    }
}

impl OperationsTrait for BitwiseNot {
    fn name(&self) -> &'static str {
        "Bitwise Not"
    }

    fn execute_impl(&self, image: &mut Image) -> Result<(), ImageErrors> {
        let depth = image.depth();

        let function = |channel: &mut Channel| -> Result<(), ImageErrors> {
            match depth.bit_type() {
                BitType::U8 => channel
                    .reinterpret_as_mut::<u8>()?
                    .iter_mut()
                    .for_each(|x| *x = !*x),
                BitType::U16 => channel
                    .reinterpret_as_mut::<u16>()?
                    .iter_mut()
                    .for_each(|x| *x = !*x),
                BitType::F32 => channel
                    .reinterpret_as_mut::<f32>()?
                    .iter_mut()
                    .for_each(|x| *x = 1.0 - *x)
            }
            Ok(())
        };
        execute_on(function, image, true)
    }

    fn supported_types(&self) -> &'static [BitType] {
        &[BitType::U8, BitType::U16, BitType::F32]
    }
}

fn zero_where_masked<T: Copy + Default>(data: &mut [T], mask: &[u8]) {
    for (x, m) in data.iter_mut().zip(mask) {
        if *m == 0 {
            *x = T::default();
        }
    }
}

/// Keep pixels where `mask` is non zero and zero every channel elsewhere
///
/// The mask must be an 8 bit grayscale image of the same size
pub fn apply_mask(image: &mut Image, mask: &Image) -> Result<(), ImageErrors> {
    if mask.colorspace() != ColorSpace::Luma || mask.depth() != BitDepth::Eight {
        return Err(ImageOperationsErrors::InvalidParameter(format!(
            "Mask must be 8 bit Luma, found {:?} {:?}",
            mask.depth(),
            mask.colorspace()
        ))
        .into());
    }
    if mask.dimensions() != image.dimensions() {
        return Err(ImageOperationsErrors::InvalidParameter(format!(
            "Mask is {:?} but image is {:?}",
            mask.dimensions(),
            image.dimensions()
        ))
        .into());
    }
    let mask = mask.channels_ref(false)[0].reinterpret_as::<u8>()?;
    let depth = image.depth();

    for channel in image.channels_mut(false) {
        match depth.bit_type() {
            BitType::U8 => zero_where_masked(channel.reinterpret_as_mut::<u8>()?, mask),
            BitType::U16 => zero_where_masked(channel.reinterpret_as_mut::<u16>()?, mask),
            BitType::F32 => zero_where_masked(channel.reinterpret_as_mut::<f32>()?, mask)
        }
    }
    Ok(())
}

/// [`apply_mask`] as an operation
#[derive(Clone, Debug)]
pub struct ApplyMask {
    mask: Image
}

impl ApplyMask {
    #[must_use]
    pub fn new(mask: Image) -> ApplyMask {
        ApplyMask { mask }
    }
}

impl OperationsTrait for ApplyMask {
    fn name(&self) -> &'static str {
        "Apply Mask"
    }

    fn execute_impl(&self, image: &mut Image) -> Result<(), ImageErrors> {
        apply_mask(image, &self.mask)
    }

    fn supported_types(&self) -> &'static [BitType] {
        &[BitType::U8, BitType::U16, BitType::F32]
    }
}
