/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Chroma keying, replacing a green (or any colour) screen
//!
//! Pixels are compared to the key colour on their chroma only, the
//! `(Cr, Cb)` pair of YCrCb, so shadows and highlights on the screen are
//! keyed out as well. The distance decides how much of the foreground survives
//!
//! ```text
//! distance <= tolerance            -> background
//! distance >= tolerance + softness -> foreground
//! in between                       -> linear blend
//! ```
use pixlab_core::bit_depth::BitType;
use pixlab_core::colorspace::ColorSpace;
use pixlab_core::log::trace;
use pixlab_image::core_filters::colorspace::rgb_to_ycrcb;
use pixlab_image::errors::{ImageErrors, ImageOperationsErrors};
use pixlab_image::image::Image;
use pixlab_image::traits::OperationsTrait;

use crate::utils::ensure;

/// What replaces keyed pixels
#[derive(Clone, Debug)]
pub enum Background {
    /// A solid colour, in R, G, B order
    Color([u8; 3]),
    /// An image of the same dimensions, any rgb family colorspace
    Image(Image)
}

#[derive(Clone, Debug)]
pub struct ChromaKey {
    key:        [u8; 3],
    tolerance:  f32,
    softness:   f32,
    background: Background
}

impl ChromaKey {
    /// Create a new chroma key
    ///
    /// # Arguments
    /// - key: Screen colour in R, G, B order
    /// - tolerance: Chroma distance, in 8 bit units, below which pixels are fully replaced
    /// - softness: Width of the blend band after `tolerance`
    /// - background: What shows through keyed pixels
    #[must_use]
    pub fn new(key: [u8; 3], tolerance: f32, softness: f32, background: Background) -> ChromaKey {
        ChromaKey {
            key,
            tolerance,
            softness,
            background
        }
    }

    /// Weight of the foreground for a pixel with the given chroma distance
    fn foreground_weight(&self, distance: f32) -> f32 {
        if distance <= self.tolerance {
            0.0
        } else if self.softness <= 0.0 || distance >= self.tolerance + self.softness {
            1.0
        } else {
            (distance - self.tolerance) / self.softness
        }
    }
}

fn chroma(r: u8, g: u8, b: u8) -> (f32, f32) {
    let (_, cr, cb) = rgb_to_ycrcb(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0
    );
    (cr * 255.0, cb * 255.0)
}

/// Background pixels as `[r, g, b]` planes of the image size
fn background_planes(
    background: &Background, width: usize, height: usize
) -> Result<[Vec<u8>; 3], ImageErrors> {
    match background {
        Background::Color(rgb) => Ok(rgb.map(|c| vec![c; width * height])),
        Background::Image(image) => {
            if image.dimensions() != (width, height) {
                return Err(ImageOperationsErrors::InvalidParameter(format!(
                    "Background is {:?} but image is {:?}",
                    image.dimensions(),
                    (width, height)
                ))
                .into());
            }
            let mut image = image.clone();

            if image.depth().bit_type() != BitType::U8 {
                image.convert_depth(pixlab_core::bit_depth::BitDepth::Eight)?;
            }
            if image.colorspace() != ColorSpace::RGB {
                image.convert_color(ColorSpace::RGB)?;
            }
            let channels = image.channels_ref(false);

            Ok([
                channels[0].reinterpret_as::<u8>()?.to_vec(),
                channels[1].reinterpret_as::<u8>()?.to_vec(),
                channels[2].reinterpret_as::<u8>()?.to_vec()
            ])
        }
    }
}

impl OperationsTrait for ChromaKey {
    fn name(&self) -> &'static str {
        "Chroma Key"
    }

    fn execute_impl(&self, image: &mut Image) -> Result<(), ImageErrors> {
        ensure(self.tolerance >= 0.0 && self.softness >= 0.0, || {
            format!(
                "Tolerance and softness cannot be negative, found {} and {}",
                self.tolerance, self.softness
            )
        })?;
        let (width, height) = image.dimensions();
        let Some(positions) = image.colorspace().rgb_positions() else {
            return Err(ImageErrors::GenericStr("Chroma keying needs an rgb image"));
        };
        let background = background_planes(&self.background, width, height)?;
        let (key_cr, key_cb) = chroma(self.key[0], self.key[1], self.key[2]);

        trace!("Key chroma is ({key_cr:.1},{key_cb:.1})");

        let channels = image.channels_mut(true);

        let weights: Vec<f32> = {
            let r = channels[positions[0]].reinterpret_as::<u8>()?;
            let g = channels[positions[1]].reinterpret_as::<u8>()?;
            let b = channels[positions[2]].reinterpret_as::<u8>()?;

            r.iter()
                .zip(g)
                .zip(b)
                .map(|((r, g), b)| {
                    let (cr, cb) = chroma(*r, *g, *b);
                    self.foreground_weight((cr - key_cr).hypot(cb - key_cb))
                })
                .collect()
        };

        for (pos, bg) in positions.iter().zip(&background) {
            let data = channels[*pos].reinterpret_as_mut::<u8>()?;

            for ((fg, bg), w) in data.iter_mut().zip(bg).zip(&weights) {
                let blended = f32::from(*fg) * w + f32::from(*bg) * (1.0 - w);
                *fg = blended.round().clamp(0.0, 255.0) as u8;
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

    use crate::chroma_key::{Background, ChromaKey};

    const GREEN: [u8; 3] = [0, 255, 0];

    #[test]
    fn replaces_screen_keeps_subject() {
        // bgr: green screen, dark green and red
        let pixels = [0, 255, 0, 0, 120, 0, 0, 0, 200];
        let mut image = Image::from_u8(&pixels, 3, 1, ColorSpace::BGR);

        ChromaKey::new(GREEN, 40.0, 10.0, Background::Color([0, 0, 255]))
            .execute(&mut image)
            .unwrap();
        let out = image.flatten::<u8>().unwrap();

        assert_eq!(&out[0..3], [255, 0, 0]);
        // a dark green carries far less chroma than the screen
        assert_eq!(&out[3..6], [0, 120, 0]);
        assert_eq!(&out[6..9], [0, 0, 200]);
    }

    #[test]
    fn soft_band_blends() {
        let key = ChromaKey::new(GREEN, 10.0, 20.0, Background::Color([0; 3]));
        assert_eq!(key.foreground_weight(5.0), 0.0);
        assert_eq!(key.foreground_weight(20.0), 0.5);
        assert_eq!(key.foreground_weight(30.0), 1.0);

        let hard = ChromaKey::new(GREEN, 10.0, 0.0, Background::Color([0; 3]));
        assert_eq!(hard.foreground_weight(10.5), 1.0);
    }

    #[test]
    fn image_background() {
        let mut image = Image::fill(0_u8, ColorSpace::RGB, 2, 2);
        // fill green
        for (i, channel) in image.channels_mut(false).iter_mut().enumerate() {
            channel.fill(if i == 1 { 255_u8 } else { 0 }).unwrap();
        }
        let background = Image::fill(77_u8, ColorSpace::BGR, 2, 2);

        ChromaKey::new(GREEN, 30.0, 0.0, Background::Image(background))
            .execute(&mut image)
            .unwrap();
        assert!(image.flatten::<u8>().unwrap().iter().all(|x| *x == 77));

        let small = Image::fill(77_u8, ColorSpace::RGB, 1, 1);
        assert!(ChromaKey::new(GREEN, 30.0, 0.0, Background::Image(small))
            .execute(&mut image)
            .is_err());
    }
}
