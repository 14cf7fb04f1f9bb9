/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Depth conversion routines
//!
//! Bit depths are associated with native representations,
//! the following mapping indicates the types and range
//!
//!|BitDepth         |native type    |range      |
//!|-----------------|---------------|-----------|
//!|BitDepth::Eight  | [`u8`]        |0   - 255  |
//!|BitDepth::Sixteen| [`u16`]       |0   - 65535|
//!|BitDepth::Float32| [`f32`]       |0.0 - 1.0  |
//!
//! Conversions rescale linearly, e.g. moving from `BitDepth::Eight` to
//! `BitDepth::Float32` divides every sample by `255.0`.
//! Float samples outside `0.0..=1.0` are clamped when converting to integers.
use pixlab_core::bit_depth::{BitDepth, BitType};
use pixlab_core::log::trace;

use crate::channel::Channel;
use crate::errors::ImageErrors;
use crate::image::Image;
use crate::traits::OperationsTrait;

/// Convert u16 samples to u8, mapping 65535 to 255
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn depth_u16_to_u8(from: &[u16], to: &mut [u8]) {
    for (old, new) in from.iter().zip(to.iter_mut()) {
        // (x + 128) / 257 rounds to nearest
        *new = ((u32::from(*old) + 128) / 257) as u8;
    }
}

/// Convert u8 samples to u16, mapping 255 to 65535
pub(crate) fn depth_u8_to_u16(from: &[u8], to: &mut [u16]) {
    for (old, new) in from.iter().zip(to.iter_mut()) {
        *new = u16::from(*old) * 257;
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn depth_f32_to_int<T: Copy>(from: &[f32], to: &mut [T], max: f32, convert: fn(f32) -> T) {
    for (old, new) in from.iter().zip(to.iter_mut()) {
        *new = convert((old * max).clamp(0.0, max).round());
    }
}

fn depth_int_to_f32<T: Copy + Into<f32>>(from: &[T], to: &mut [f32], max: f32) {
    let recip = 1.0 / max;

    for (old, new) in from.iter().zip(to.iter_mut()) {
        *new = (*old).into() * recip;
    }
}

/// Change the image's bit depth from it's initial
/// value to the one specified by this operation.
#[derive(Copy, Clone)]
pub struct Depth {
    depth: BitDepth
}

impl Depth {
    pub fn new(depth: BitDepth) -> Depth {
        Depth { depth }
    }
}

impl OperationsTrait for Depth {
    fn name(&self) -> &'static str {
        "Depth"
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn execute_impl(&self, image: &mut Image) -> Result<(), ImageErrors> {
        let image_depth = image.depth();

        if image_depth == self.depth {
            trace!("Image depth already matches requested, no-op");
            return Ok(());
        }
        if self.depth == BitDepth::Unknown {
            return Err(ImageErrors::GenericStr("Cannot convert to an unknown depth"));
        }

        for channel in image.channels_mut(false) {
            let length = channel.len();
            let mut new_channel = Channel::new_with_bit_type(length, self.depth.bit_type());

            match (image_depth.bit_type(), self.depth.bit_type()) {
                (BitType::U8, BitType::U16) => {
                    depth_u8_to_u16(channel.reinterpret_as()?, new_channel.reinterpret_as_mut()?)
                }
                (BitType::U16, BitType::U8) => {
                    depth_u16_to_u8(channel.reinterpret_as()?, new_channel.reinterpret_as_mut()?)
                }
                (BitType::F32, BitType::U8) => depth_f32_to_int::<u8>(
                    channel.reinterpret_as()?,
                    new_channel.reinterpret_as_mut()?,
                    255.0,
                    |x| x as u8
                ),
                (BitType::F32, BitType::U16) => depth_f32_to_int::<u16>(
                    channel.reinterpret_as()?,
                    new_channel.reinterpret_as_mut()?,
                    65535.0,
                    |x| x as u16
                ),
                (BitType::U8, BitType::F32) => depth_int_to_f32::<u8>(
                    channel.reinterpret_as()?,
                    new_channel.reinterpret_as_mut()?,
                    255.0
                ),
                (BitType::U16, BitType::F32) => depth_int_to_f32::<u16>(
                    channel.reinterpret_as()?,
                    new_channel.reinterpret_as_mut()?,
                    65535.0
                ),
                (from, to) => {
                    let msg = format!("Unknown depth conversion from {from:?} to {to:?}");
                    return Err(ImageErrors::GenericString(msg));
                }
            }
            *channel = new_channel;
        }
        trace!("Converted depth from {:?} to {:?}", image_depth, self.depth);
        image.set_depth(self.depth);

        Ok(())
    }

    fn supported_types(&self) -> &'static [BitType] {
        &[BitType::U8, BitType::U16, BitType::F32]
    }
}
