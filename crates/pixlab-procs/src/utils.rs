/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Helpers shared by the operations
use pixlab_core::bit_depth::BitDepth;
use pixlab_core::colorspace::ColorSpace;
use pixlab_image::channel::Channel;
use pixlab_image::errors::{ImageErrors, ImageOperationsErrors};
use pixlab_image::image::Image;

use crate::traits::NumOps;

/// A rectangular region of an image
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Rect {
    pub x:      usize,
    pub y:      usize,
    pub width:  usize,
    pub height: usize
}

impl Rect {
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Rect {
        Rect {
            x,
            y,
            width,
            height
        }
    }

    /// Return true if the region lies completely inside a `width*height` image
    pub const fn fits(&self, width: usize, height: usize) -> bool {
        self.x + self.width <= width && self.y + self.height <= height
    }
}

/// Run `function` on every channel of the image, spreading
/// channels across threads when the `threads` feature is on
///
/// # Arguments
/// - function: Function to run on each channel
/// - image: Image whose channels are modified
/// - ignore_alpha: Whether the alpha channel should be left untouched
pub fn execute_on<F>(function: F, image: &mut Image, ignore_alpha: bool) -> Result<(), ImageErrors>
where
    F: Fn(&mut Channel) -> Result<(), ImageErrors> + Send + Sync
{
    #[cfg(feature = "threads")]
    {
        let function = &function;

        std::thread::scope(|s| {
            let mut results = vec![];

            for channel in image.channels_mut(ignore_alpha) {
                let result = s.spawn(move || function(channel));
                results.push(result);
            }
            results
                .into_iter()
                .map(|x| {
                    x.join()
                        .unwrap_or(Err(ImageErrors::GenericStr("Worker thread panicked")))
                })
                .collect::<Result<Vec<()>, ImageErrors>>()
        })?;
    }
    #[cfg(not(feature = "threads"))]
    {
        for channel in image.channels_mut(ignore_alpha) {
            function(channel)?;
        }
    }
    Ok(())
}

/// Return the minimum and maximum of a slice, or `None` if it is empty
pub fn min_max<T: NumOps<T>>(data: &[T]) -> Option<(T, T)> {
    let first = *data.first()?;

    Some(data.iter().fold((first, first), |(min, max), x| {
        let min = if *x < min { *x } else { min };
        let max = if *x > max { *x } else { max };
        (min, max)
    }))
}

/// Stretch `data` linearly so that its minimum maps to `new_min` and its maximum to `new_max`
///
/// A constant slice maps to `new_min`
pub fn normalize_min_max(data: &mut [f32], new_min: f32, new_max: f32) {
    let Some((min, max)) = min_max(data) else {
        return;
    };
    let range = max - min;

    if range <= f32::EPSILON {
        data.fill(new_min);
        return;
    }
    let scale = (new_max - new_min) / range;

    for x in data.iter_mut() {
        *x = (*x - min) * scale + new_min;
    }
}

/// Return the luma plane of an image as f32 values in the native range
/// of its depth, e.g 0..=255 for 8 bit images
pub fn luma_plane(image: &Image) -> Result<Vec<f32>, ImageErrors> {
    let mut gray = image.clone();

    if gray.colorspace() != ColorSpace::Luma {
        gray.convert_color(ColorSpace::Luma)?;
    }
    channel_to_f32(&gray.channels_ref(false)[0], gray.depth())
}

/// Copy a channel into a vector of f32, keeping the native range
pub fn channel_to_f32(channel: &Channel, depth: BitDepth) -> Result<Vec<f32>, ImageErrors> {
    let plane = match depth {
        BitDepth::Eight => channel.reinterpret_as::<u8>()?.iter().map(|x| x.to_f32()).collect(),
        BitDepth::Sixteen => channel
            .reinterpret_as::<u16>()?
            .iter()
            .map(|x| x.to_f32())
            .collect(),
        BitDepth::Float32 => channel.reinterpret_as::<f32>()?.to_vec(),
        BitDepth::Unknown => return Err(ImageErrors::GenericStr("Unknown depth"))
    };
    Ok(plane)
}

/// Build a channel of the given depth from f32 values, saturating integers
pub fn f32_to_channel(plane: &[f32], depth: BitDepth) -> Result<Channel, ImageErrors> {
    let channel = match depth {
        BitDepth::Eight => Channel::from_vec(plane.iter().map(|x| u8::from_f32(*x)).collect()),
        BitDepth::Sixteen => {
            Channel::from_vec(plane.iter().map(|x| u16::from_f32(*x)).collect::<Vec<u16>>())
        }
        BitDepth::Float32 => Channel::from_vec(plane.to_vec()),
        BitDepth::Unknown => return Err(ImageErrors::GenericStr("Unknown depth"))
    };
    Ok(channel)
}

/// Return an error unless `condition` holds
pub(crate) fn ensure(condition: bool, reason: impl FnOnce() -> String) -> Result<(), ImageErrors> {
    if condition {
        Ok(())
    } else {
        Err(ImageOperationsErrors::InvalidParameter(reason()).into())
    }
}

#[cfg(test)]
mod tests {
    use crate::utils::{min_max, normalize_min_max, Rect};

    #[test]
    fn normalize_stretches() {
        let mut data = [2.0, 4.0, 6.0];
        normalize_min_max(&mut data, 0.0, 255.0);
        assert_eq!(data, [0.0, 127.5, 255.0]);

        let mut flat = [3.0; 4];
        normalize_min_max(&mut flat, 0.0, 255.0);
        assert_eq!(flat, [0.0; 4]);
    }

    #[test]
    fn min_max_of_slice() {
        assert_eq!(min_max(&[3_u8, 9, 1]), Some((1, 9)));
        assert_eq!(min_max::<u8>(&[]), None);
    }

    #[test]
    fn rect_fits() {
        assert!(Rect::new(2, 2, 3, 3).fits(5, 5));
        assert!(!Rect::new(3, 2, 3, 3).fits(5, 5));
    }
}
