/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Median blur
use std::cmp::Ordering;

use pixlab_core::bit_depth::BitType;
use pixlab_image::channel::Channel;
use pixlab_image::errors::ImageErrors;
use pixlab_image::image::Image;
use pixlab_image::traits::OperationsTrait;

use crate::pad::{pad, PadMethod};
use crate::spatial::spatial;
use crate::traits::NumOps;
use crate::utils::{ensure, execute_on};

/// Median filter
///
/// Replaces every pixel with the median of the `ksize x ksize` window
/// around it, edge pixels are replicated.
#[derive(Copy, Clone, Debug)]
pub struct Median {
    ksize: usize
}

impl Median {
    #[must_use]
    pub fn new(ksize: usize) -> Median {
        Median { ksize }
    }
}

impl OperationsTrait for Median {
    fn name(&self) -> &'static str {
        "Median Filter"
    }

    fn execute_impl(&self, image: &mut Image) -> Result<(), ImageErrors> {
        ensure(self.ksize % 2 == 1, || {
            format!("Median kernel size must be odd, found {}", self.ksize)
        })?;
        let (width, height) = image.dimensions();
        let depth = image.depth();
        let radius = self.ksize / 2;

        let function = |channel: &mut Channel| -> Result<(), ImageErrors> {
            let mut out_channel = Channel::new_with_bit_type(channel.len(), depth.bit_type());

            match depth.bit_type() {
                BitType::U8 => median(
                    channel.reinterpret_as::<u8>()?,
                    out_channel.reinterpret_as_mut::<u8>()?,
                    radius,
                    width,
                    height
                ),
                BitType::U16 => median(
                    channel.reinterpret_as::<u16>()?,
                    out_channel.reinterpret_as_mut::<u16>()?,
                    radius,
                    width,
                    height
                ),
                BitType::F32 => median(
                    channel.reinterpret_as::<f32>()?,
                    out_channel.reinterpret_as_mut::<f32>()?,
                    radius,
                    width,
                    height
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

/// Median filter a single channel
pub fn median<T: NumOps<T>>(
    in_channel: &[T], out_channel: &mut [T], radius: usize, width: usize, height: usize
) {
    let padded = pad(in_channel, width, height, radius, radius, PadMethod::Replicate);

    spatial(&padded, out_channel, radius, width, height, find_median);
}

fn find_median<T: NumOps<T>>(window: &mut [T]) -> T {
    let middle = window.len() / 2;

    *window
        .select_nth_unstable_by(middle, |a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
        .1
}
