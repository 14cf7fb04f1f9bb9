/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Resize an image to new dimensions
//!
//! The output size is either given directly or derived from scale factors,
//! in which case it is `round(fx * width) x round(fy * height)`.
use pixlab_core::bit_depth::BitType;
use pixlab_core::log::debug;
use pixlab_image::channel::Channel;
use pixlab_image::errors::ImageErrors;
use pixlab_image::image::Image;
use pixlab_image::traits::OperationsTrait;

use crate::traits::NumOps;
use crate::utils::{ensure, execute_on};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ResizeMethod {
    /// Copy the closest source pixel
    Nearest,
    /// Weight the four surrounding source pixels, pixel centres are aligned
    Bilinear
}

impl ResizeMethod {
    pub fn from_string_result(input: &str) -> Result<Self, String> {
        match input {
            "nearest" => Ok(Self::Nearest),
            "bilinear" | "linear" => Ok(Self::Bilinear),
            _ => Err("Unknown resize method, accepted values are nearest,bilinear".to_string())
        }
    }
}

/// Resize a single channel
///
/// # Panics
/// - `in_width*in_height` does not match `in_channel.len()`.
/// - `out_width*out_height` does not match `out_channel.len()`.
pub fn resize<T>(
    in_channel: &[T], out_channel: &mut [T], method: ResizeMethod, in_width: usize,
    in_height: usize, out_width: usize, out_height: usize
) where
    T: NumOps<T>
{
    assert_eq!(in_channel.len(), in_width * in_height);
    assert_eq!(out_channel.len(), out_width * out_height);

    if in_channel.is_empty() || out_channel.is_empty() {
        return;
    }
    let w_ratio = in_width as f32 / out_width as f32;
    let h_ratio = in_height as f32 / out_height as f32;

    match method {
        ResizeMethod::Nearest => {
            for (y, out_row) in out_channel.chunks_exact_mut(out_width).enumerate() {
                let sy = ((y as f32 * h_ratio) as usize).min(in_height - 1);
                let in_row = &in_channel[sy * in_width..(sy + 1) * in_width];

                for (x, out) in out_row.iter_mut().enumerate() {
                    let sx = ((x as f32 * w_ratio) as usize).min(in_width - 1);
                    *out = in_row[sx];
                }
            }
        }
        ResizeMethod::Bilinear => {
            // source coordinate of an output pixel centre and its two neighbours
            let source = |pos: usize, ratio: f32, len: usize| -> (usize, usize, f32) {
                let s = ((pos as f32 + 0.5) * ratio - 0.5).max(0.0);
                let s0 = (s as usize).min(len - 1);
                let s1 = (s0 + 1).min(len - 1);
                (s0, s1, s - s0 as f32)
            };

            for (y, out_row) in out_channel.chunks_exact_mut(out_width).enumerate() {
                let (y0, y1, b) = source(y, h_ratio, in_height);

                for (x, out) in out_row.iter_mut().enumerate() {
                    let (x0, x1, a) = source(x, w_ratio, in_width);

                    let p00 = in_channel[y0 * in_width + x0].to_f32();
                    let p10 = in_channel[y0 * in_width + x1].to_f32();
                    let p01 = in_channel[y1 * in_width + x0].to_f32();
                    let p11 = in_channel[y1 * in_width + x1].to_f32();

                    let value = p00 * (1.0 - a) * (1.0 - b)
                        + p10 * a * (1.0 - b)
                        + p01 * (1.0 - a) * b
                        + p11 * a * b;

                    *out = T::from_f32(value);
                }
            }
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum ResizeTarget {
    Size(usize, usize),
    Factor(f64, f64)
}

/// Resize an image, alpha included
#[derive(Copy, Clone, Debug)]
pub struct Resize {
    target: ResizeTarget,
    method: ResizeMethod
}

impl Resize {
    /// Resize to `width x height`
    #[must_use]
    pub fn new(width: usize, height: usize, method: ResizeMethod) -> Resize {
        Resize {
            target: ResizeTarget::Size(width, height),
            method
        }
    }

    /// Scale the width by `fx` and the height by `fy`
    #[must_use]
    pub fn scaled(fx: f64, fy: f64, method: ResizeMethod) -> Resize {
        Resize {
            target: ResizeTarget::Factor(fx, fy),
            method
        }
    }

    /// Output dimensions for an input of `width x height`
    pub fn output_dimensions(
        &self, width: usize, height: usize
    ) -> Result<(usize, usize), ImageErrors> {
        let (out_width, out_height) = match self.target {
            ResizeTarget::Size(w, h) => (w, h),
            ResizeTarget::Factor(fx, fy) => {
                ensure(fx.is_finite() && fy.is_finite() && fx > 0.0 && fy > 0.0, || {
                    format!("Scale factors must be positive, found {fx} and {fy}")
                })?;
                (
                    (fx * width as f64).round() as usize,
                    (fy * height as f64).round() as usize
                )
            }
        };
        ensure(out_width > 0 && out_height > 0, || {
            format!("Cannot resize to an empty {out_width}x{out_height} image")
        })?;
        Ok((out_width, out_height))
    }
}

impl OperationsTrait for Resize {
    fn name(&self) -> &'static str {
        "Resize"
    }

    fn execute_impl(&self, image: &mut Image) -> Result<(), ImageErrors> {
        let (width, height) = image.dimensions();
        let (new_width, new_height) = self.output_dimensions(width, height)?;
        let bit_type = image.depth().bit_type();

        debug!("Resizing {width}x{height} to {new_width}x{new_height} with {:?}", self.method);

        let method = self.method;
        let new_length = new_width * new_height;

        let function = |channel: &mut Channel| -> Result<(), ImageErrors> {
            let resized = match bit_type {
                BitType::U8 => {
                    let mut out = vec![0_u8; new_length];
                    let data = channel.reinterpret_as::<u8>()?;
                    resize(data, &mut out, method, width, height, new_width, new_height);
                    Channel::from_vec(out)
                }
                BitType::U16 => {
                    let mut out = vec![0_u16; new_length];
                    let data = channel.reinterpret_as::<u16>()?;
                    resize(data, &mut out, method, width, height, new_width, new_height);
                    Channel::from_vec(out)
                }
                BitType::F32 => {
                    let mut out = vec![0_f32; new_length];
                    let data = channel.reinterpret_as::<f32>()?;
                    resize(data, &mut out, method, width, height, new_width, new_height);
                    Channel::from_vec(out)
                }
            };
            *channel = resized;
            Ok(())
        };
        execute_on(function, image, false)?;
        image.set_dimensions(new_width, new_height);

        Ok(())
    }

    fn supported_types(&self) -> &'static [BitType] {
        &[BitType::U8, BitType::U16, BitType::F32]
    }
}

#[cfg(test)]
mod tests {
    use pixlab_core::colorspace::ColorSpace;
    use nanorand::Rng;
    use pixlab_image::image::Image;
    use pixlab_image::traits::OperationsTrait;

    use crate::resize::{resize, Resize, ResizeMethod};

    #[test]
    fn nearest_doubles_pixels() {
        let mut out = [0_u8; 16];
        resize(&[1, 2, 3, 4], &mut out, ResizeMethod::Nearest, 2, 2, 4, 4);
        assert_eq!(out, [1, 1, 2, 2, 1, 1, 2, 2, 3, 3, 4, 4, 3, 3, 4, 4]);
    }

    #[test]
    fn bilinear_aligns_pixel_centres() {
        let mut down = [0_u8; 2];
        resize(&[0, 10, 20, 30], &mut down, ResizeMethod::Bilinear, 4, 1, 2, 1);
        assert_eq!(down, [5, 25]);

        let mut up = [0_u8; 4];
        resize(&[0, 100], &mut up, ResizeMethod::Bilinear, 2, 1, 4, 1);
        assert_eq!(up, [0, 25, 75, 100]);
    }

    #[test]
    fn random_flat_image_stays_flat() {
        let mut value = [0_u8; 1];
        nanorand::WyRand::new_seed(3).fill(&mut value);

        let image = Image::fill(value[0], ColorSpace::BGR, 13, 7);

        for method in [ResizeMethod::Nearest, ResizeMethod::Bilinear] {
            let out = Resize::new(29, 3, method).clone_and_execute(&image).unwrap();
            assert_eq!(out.dimensions(), (29, 3));
            assert!(out.flatten::<u8>().unwrap().iter().all(|x| *x == value[0]));
        }
    }

    #[test]
    fn scale_factors_round_the_size() {
        let image = Image::fill(9_u16, ColorSpace::RGBA, 10, 5);
        let out = Resize::scaled(0.6, 1.5, ResizeMethod::Bilinear)
            .clone_and_execute(&image)
            .unwrap();

        // 7.5 rounds away from zero
        assert_eq!(out.dimensions(), (6, 8));
        assert_eq!(out.channels_ref(false).len(), 4);
        assert!(out.flatten::<u16>().unwrap().iter().all(|x| *x == 9));
    }

    #[test]
    fn empty_output_fails() {
        let image = Image::fill(0_u8, ColorSpace::Luma, 4, 4);
        assert!(Resize::new(0, 4, ResizeMethod::Nearest).clone_and_execute(&image).is_err());
        assert!(Resize::scaled(0.1, 1.0, ResizeMethod::Nearest).clone_and_execute(&image).is_err());
        assert!(Resize::scaled(-1.0, 1.0, ResizeMethod::Nearest).clone_and_execute(&image).is_err());
    }
}
