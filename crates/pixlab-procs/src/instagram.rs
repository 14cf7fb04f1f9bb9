/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Photo filters built out of the simpler operations
use pixlab_core::bit_depth::BitType;
use pixlab_core::colorspace::ColorSpace;
use pixlab_core::log::trace;
use pixlab_image::channel::Channel;
use pixlab_image::errors::ImageErrors;
use pixlab_image::image::Image;
use pixlab_image::traits::OperationsTrait;

use crate::bilateral_filter::BilateralFilter;
use crate::bitwise::apply_mask;
use crate::gaussian_blur::gaussian_blur;
use crate::pad::PadMethod;
use crate::threshold::{adaptive_threshold, AdaptiveMethod};
use crate::utils::ensure;

const COLOR_AND_GRAY: [ColorSpace; 6] = [
    ColorSpace::Luma,
    ColorSpace::LumaA,
    ColorSpace::RGB,
    ColorSpace::RGBA,
    ColorSpace::BGR,
    ColorSpace::BGRA
];

/// 8 bit grayscale copy of an image
fn gray_u8(image: &Image) -> Result<Vec<u8>, ImageErrors> {
    let mut gray = image.clone();

    if gray.colorspace() != ColorSpace::Luma {
        gray.convert_color(ColorSpace::Luma)?;
    }
    Ok(gray.channels_ref(false)[0].reinterpret_as::<u8>()?.to_vec())
}

/// Colour dodge, `gray * 255 / (255 - blur)` saturated, zero where `blur` is 255
fn dodge(gray: &[u8], blur: &[u8]) -> Vec<u8> {
    gray.iter()
        .zip(blur)
        .map(|(g, b)| {
            let denominator = 255 - u16::from(*b);

            if denominator == 0 {
                0
            } else {
                let value = (f32::from(*g) * 255.0 / f32::from(denominator)).round();
                value.min(255.0) as u8
            }
        })
        .collect()
}

/// Pencil sketch look
///
/// The grayscale image is divided by a blurred copy of its inverse, which
/// washes out flat regions and keeps the dark strokes along edges.
/// Every colour channel receives the sketch, alpha is left as is
#[derive(Copy, Clone, Debug)]
pub struct PencilSketch {
    ksize: usize
}

impl PencilSketch {
    /// Create a new pencil sketch, `ksize` is the odd size of the blur
    #[must_use]
    pub fn new(ksize: usize) -> PencilSketch {
        PencilSketch { ksize }
    }
}

impl Default for PencilSketch {
    fn default() -> Self {
        PencilSketch::new(21)
    }
}

impl OperationsTrait for PencilSketch {
    fn name(&self) -> &'static str {
        "Pencil Sketch"
    }

    fn execute_impl(&self, image: &mut Image) -> Result<(), ImageErrors> {
        ensure(self.ksize % 2 == 1, || {
            format!("Sketch blur size must be odd, found {}", self.ksize)
        })?;
        let (width, height) = image.dimensions();

        let gray = gray_u8(image)?;
        let inverted: Vec<u8> = gray.iter().map(|x| 255 - x).collect();
        let mut blurred = vec![0; inverted.len()];

        gaussian_blur(
            &inverted,
            &mut blurred,
            width,
            height,
            self.ksize,
            0.0,
            PadMethod::Reflect101
        );
        let sketch = dodge(&gray, &blurred);

        for channel in image.channels_mut(true) {
            *channel = Channel::from_vec(sketch.clone());
        }
        Ok(())
    }

    fn supported_types(&self) -> &'static [BitType] {
        &[BitType::U8]
    }

    fn supported_colorspaces(&self) -> &'static [ColorSpace] {
        &COLOR_AND_GRAY
    }
}

/// Cartoon look
///
/// Colours are flattened with a strong bilateral filter and edges found by an
/// adaptive mean threshold of the grayscale image are painted black.
#[derive(Copy, Clone, Debug)]
pub struct Cartoonify {
    block_size:  usize,
    c:           f32,
    diameter:    i32,
    sigma_color: f32,
    sigma_space: f32
}

impl Cartoonify {
    #[must_use]
    pub fn new() -> Cartoonify {
        Cartoonify {
            block_size:  7,
            c:           7.0,
            diameter:    7,
            sigma_color: 300.0,
            sigma_space: 300.0
        }
    }

    /// Change the adaptive threshold finding the edges
    #[must_use]
    pub fn with_edges(mut self, block_size: usize, c: f32) -> Cartoonify {
        self.block_size = block_size;
        self.c = c;
        self
    }

    /// Change the bilateral filter flattening the colours
    #[must_use]
    pub fn with_smoothing(mut self, diameter: i32, sigma_color: f32, sigma_space: f32) -> Cartoonify {
        self.diameter = diameter;
        self.sigma_color = sigma_color;
        self.sigma_space = sigma_space;
        self
    }
}

impl Default for Cartoonify {
    fn default() -> Self {
        Cartoonify::new()
    }
}

impl OperationsTrait for Cartoonify {
    fn name(&self) -> &'static str {
        "Cartoonify"
    }

    fn execute_impl(&self, image: &mut Image) -> Result<(), ImageErrors> {
        ensure(self.block_size % 2 == 1 && self.block_size > 1, || {
            format!("Block size must be odd and greater than 1, found {}", self.block_size)
        })?;
        let (width, height) = image.dimensions();

        let gray = gray_u8(image)?;
        let mut edges = vec![0; gray.len()];

        adaptive_threshold(
            &gray,
            &mut edges,
            width,
            height,
            self.block_size,
            self.c,
            255,
            AdaptiveMethod::Mean,
            false
        );
        trace!(
            "Cartoon edges cover {} pixels",
            edges.iter().filter(|x| **x == 0).count()
        );

        BilateralFilter::new(self.diameter, self.sigma_color, self.sigma_space)
            .execute_impl(image)?;

        let mask = Image::from_u8(&edges, width, height, ColorSpace::Luma);

        apply_mask(image, &mask)
    }

    fn supported_types(&self) -> &'static [BitType] {
        &[BitType::U8]
    }

    fn supported_colorspaces(&self) -> &'static [ColorSpace] {
        &COLOR_AND_GRAY
    }
}

#[cfg(test)]
mod tests {
    use pixlab_core::colorspace::ColorSpace;
    use pixlab_image::image::Image;
    use pixlab_image::traits::OperationsTrait;

    use crate::instagram::{dodge, Cartoonify, PencilSketch};

    #[test]
    fn dodge_saturates() {
        assert_eq!(dodge(&[100, 100, 200, 50], &[0, 155, 155, 255]), [100, 255, 255, 0]);
    }

    #[test]
    fn flat_image_sketches_white() {
        let mut image = Image::fill(90_u8, ColorSpace::BGR, 24, 24);
        PencilSketch::default().execute(&mut image).unwrap();
        assert!(image.flatten::<u8>().unwrap().iter().all(|x| *x == 255));
    }

    #[test]
    fn edges_stay_dark() {
        // dark square on a light background
        let mut image = Image::from_fn::<u8, _>(40, 40, ColorSpace::RGB, |x, y, px| {
            let inside = (10..30).contains(&x) && (10..30).contains(&y);
            px.fill(if inside { 30 } else { 200 });
        });
        PencilSketch::new(7).execute(&mut image).unwrap();
        let out = image.flatten::<u8>().unwrap();

        // far from the edge the sketch is blank, just inside it is darker
        assert_eq!(out[(2 * 40 + 2) * 3], 255);
        assert!(out[(20 * 40 + 10) * 3] < out[(20 * 40 + 20) * 3]);
        assert!(PencilSketch::new(4).execute(&mut image).is_err());
    }

    #[test]
    fn cartoon_outlines_edges() {
        let mut image = Image::from_fn::<u8, _>(30, 30, ColorSpace::BGRA, |x, _, px| {
            px[..3].fill(if x < 15 { 40 } else { 220 });
            px[3] = 255;
        });
        Cartoonify::new().execute(&mut image).unwrap();
        let out = image.flatten::<u8>().unwrap();

        // the dark side of the edge is painted black, flat areas keep their colour
        assert_eq!(&out[(15 * 30 + 14) * 4..][..3], [0, 0, 0]);
        assert_eq!(out[(15 * 30 + 2) * 4], 40);
        assert_eq!(out[(15 * 30 + 27) * 4], 220);

        let bad = Cartoonify::new().with_edges(4, 7.0);
        assert!(bad.execute(&mut image).is_err());
    }
}
