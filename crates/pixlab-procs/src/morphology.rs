/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Morphological operations
//!
//! Erosion takes the minimum under a structuring element, dilation the maximum.
//! Pixels outside the image are ignored so borders never leak in.
use pixlab_core::bit_depth::BitType;
use pixlab_image::channel::Channel;
use pixlab_image::errors::ImageErrors;
use pixlab_image::image::Image;
use pixlab_image::traits::OperationsTrait;

use crate::traits::NumOps;
use crate::utils::{ensure, execute_on};

/// Shape of a structuring element
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ElementShape {
    Rect,
    Ellipse,
    Cross
}

impl ElementShape {
    pub fn from_string_result(input: &str) -> Result<Self, String> {
        match input {
            "rect" => Ok(Self::Rect),
            "ellipse" => Ok(Self::Ellipse),
            "cross" => Ok(Self::Cross),
            _ => Err(format!(
                "Unknown structuring element {input}, accepted values are rect,ellipse,cross"
            ))
        }
    }
}

/// A binary mask selecting the neighbours a morphological
/// operation looks at
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StructuringElement {
    width:  usize,
    height: usize,
    mask:   Vec<bool>
}

impl StructuringElement {
    /// Create a structuring element of the given shape
    ///
    /// Dimensions must be odd so the anchor lies in the middle
    pub fn new(shape: ElementShape, width: usize, height: usize) -> StructuringElement {
        let mut mask = vec![false; width * height];
        let (cx, cy) = (width / 2, height / 2);

        match shape {
            ElementShape::Rect => mask.fill(true),
            ElementShape::Cross => {
                for y in 0..height {
                    for x in 0..width {
                        mask[y * width + x] = x == cx || y == cy;
                    }
                }
            }
            ElementShape::Ellipse => {
                let r = cy as f64;
                let c = cx as f64;
                let inv_r2 = if r > 0.0 { 1.0 / (r * r) } else { 0.0 };

                for y in 0..height {
                    let dy = y as f64 - r;
                    let dx = if dy.abs() <= r {
                        (c * (r * r - dy * dy).max(0.0).sqrt() * inv_r2.sqrt()).round() as usize
                    } else {
                        0
                    };
                    let (start, end) = (cx.saturating_sub(dx), (cx + dx + 1).min(width));

                    for x in start..end {
                        mask[y * width + x] = true;
                    }
                }
            }
        }
        StructuringElement {
            width,
            height,
            mask
        }
    }

    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn mask(&self) -> &[bool] {
        &self.mask
    }
}

/// Morphological operation to run
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MorphOp {
    Erode,
    Dilate,
    /// Erosion followed by dilation
    Open,
    /// Dilation followed by erosion
    Close
}

impl MorphOp {
    pub fn from_string_result(input: &str) -> Result<Self, String> {
        match input {
            "erode" => Ok(Self::Erode),
            "dilate" => Ok(Self::Dilate),
            "open" => Ok(Self::Open),
            "close" => Ok(Self::Close),
            _ => Err(format!(
                "Unknown morphology operation {input}, accepted values are erode,dilate,open,close"
            ))
        }
    }
}

/// Erode (`use_max = false`) or dilate (`use_max = true`) a single channel
pub fn morph_channel<T: NumOps<T>>(
    in_channel: &[T], out_channel: &mut [T], width: usize, height: usize,
    element: &StructuringElement, use_max: bool
) {
    let (ew, eh) = element.dimensions();
    let (ax, ay) = ((ew / 2) as isize, (eh / 2) as isize);

    let offsets: Vec<(isize, isize)> = element
        .mask()
        .iter()
        .enumerate()
        .filter(|(_, set)| **set)
        .map(|(i, _)| ((i % ew) as isize - ax, (i / ew) as isize - ay))
        .collect();

    for y in 0..height {
        for x in 0..width {
            let mut result = in_channel[y * width + x];

            for (dx, dy) in &offsets {
                let (nx, ny) = (x as isize + dx, y as isize + dy);

                if nx < 0 || ny < 0 || nx >= width as isize || ny >= height as isize {
                    continue;
                }
                let value = in_channel[ny as usize * width + nx as usize];

                if (use_max && value > result) || (!use_max && value < result) {
                    result = value;
                }
            }
            out_channel[y * width + x] = result;
        }
    }
}

/// Apply a morphological operation to every colour channel
#[derive(Clone, Debug)]
pub struct Morphology {
    operation:  MorphOp,
    element:    StructuringElement,
    iterations: usize
}

impl Morphology {
    #[must_use]
    pub fn new(operation: MorphOp, element: StructuringElement, iterations: usize) -> Morphology {
        Morphology {
            operation,
            element,
            iterations
        }
    }
}

fn run_passes<T: NumOps<T>>(
    data: &mut [T], width: usize, height: usize, element: &StructuringElement, passes: &[bool],
    iterations: usize
) {
    let mut scratch = vec![T::default(); data.len()];

    for use_max in passes {
        for _ in 0..iterations {
            morph_channel(data, &mut scratch, width, height, element, *use_max);
            data.copy_from_slice(&scratch);
        }
    }
}

impl OperationsTrait for Morphology {
    fn name(&self) -> &'static str {
        "Morphology"
    }

    fn execute_impl(&self, image: &mut Image) -> Result<(), ImageErrors> {
        let (ew, eh) = self.element.dimensions();

        ensure(ew % 2 == 1 && eh % 2 == 1, || {
            format!("Structuring element dimensions must be odd, found {ew}x{eh}")
        })?;
        let (width, height) = image.dimensions();
        let depth = image.depth();

        let passes: &[bool] = match self.operation {
            MorphOp::Erode => &[false],
            MorphOp::Dilate => &[true],
            MorphOp::Open => &[false, true],
            MorphOp::Close => &[true, false]
        };
        let iterations = self.iterations.max(1);

        let function = |channel: &mut Channel| -> Result<(), ImageErrors> {
            match depth.bit_type() {
                BitType::U8 => run_passes(
                    channel.reinterpret_as_mut::<u8>()?,
                    width,
                    height,
                    &self.element,
                    passes,
                    iterations
                ),
                BitType::U16 => run_passes(
                    channel.reinterpret_as_mut::<u16>()?,
                    width,
                    height,
                    &self.element,
                    passes,
                    iterations
                ),
                BitType::F32 => run_passes(
                    channel.reinterpret_as_mut::<f32>()?,
                    width,
                    height,
                    &self.element,
                    passes,
                    iterations
                )
            }
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

    use crate::morphology::{ElementShape, MorphOp, Morphology, StructuringElement};

    #[test]
    fn element_shapes() {
        let cross = StructuringElement::new(ElementShape::Cross, 3, 3);
        #[rustfmt::skip]
        let expected = [
            false, true, false,
            true,  true, true,
            false, true, false
        ];
        assert_eq!(cross.mask(), expected);

        let ellipse = StructuringElement::new(ElementShape::Ellipse, 5, 5);
        #[rustfmt::skip]
        let expected = [
            false, false, true, false, false,
            true,  true,  true, true,  true,
            true,  true,  true, true,  true,
            true,  true,  true, true,  true,
            false, false, true, false, false
        ];
        assert_eq!(ellipse.mask(), expected);

        let rect = StructuringElement::new(ElementShape::Rect, 3, 1);
        assert!(rect.mask().iter().all(|x| *x));
    }

    fn dot_image() -> Image {
        Image::from_fn::<u8, _>(7, 7, ColorSpace::Luma, |x, y, px| {
            px[0] = if x == 3 && y == 3 { 255 } else { 0 };
        })
    }

    #[test]
    fn dilate_then_erode() {
        let element = StructuringElement::new(ElementShape::Rect, 3, 3);

        let mut image = dot_image();
        Morphology::new(MorphOp::Dilate, element.clone(), 1)
            .execute(&mut image)
            .unwrap();
        let out = image.flatten::<u8>().unwrap();
        assert_eq!(out.iter().filter(|x| **x == 255).count(), 9);

        // opening removes the single dot
        let mut image = dot_image();
        Morphology::new(MorphOp::Open, element.clone(), 1)
            .execute(&mut image)
            .unwrap();
        assert!(image.flatten::<u8>().unwrap().iter().all(|x| *x == 0));

        // closing keeps it
        let mut image = dot_image();
        Morphology::new(MorphOp::Close, element, 1)
            .execute(&mut image)
            .unwrap();
        assert_eq!(image, dot_image());
    }

    #[test]
    fn iterations_grow_the_dilation() {
        let element = StructuringElement::new(ElementShape::Cross, 3, 3);
        let mut image = dot_image();
        Morphology::new(MorphOp::Dilate, element, 2)
            .execute(&mut image)
            .unwrap();
        // a diamond of radius 2
        let out = image.flatten::<u8>().unwrap();
        assert_eq!(out.iter().filter(|x| **x == 255).count(), 13);
    }

    #[test]
    fn border_is_ignored() {
        let mut image = Image::fill(200_u8, ColorSpace::Luma, 4, 4);
        let element = StructuringElement::new(ElementShape::Rect, 5, 5);
        Morphology::new(MorphOp::Erode, element, 1)
            .execute(&mut image)
            .unwrap();
        assert!(image.flatten::<u8>().unwrap().iter().all(|x| *x == 200));
    }
}
