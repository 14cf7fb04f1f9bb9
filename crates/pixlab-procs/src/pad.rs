/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Methods used for duplicating pixels around the border
//!
//! This contains functions that make borders with specific types, such as constant values
//! or replicating values across the border
//!

/// Padding method to use
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PadMethod {
    /// Create a border with a constant (zero) value
    Constant,
    /// Create a border that duplicates the current pixel
    /// at the original image border to the new border
    ///
    /// ```text
    ///  a,b,c
    ///  d,e,f
    /// ```
    /// Becomes
    /// ```text
    ///   a,b,c
    /// a a,b,c c
    /// d d,e,f f
    ///   d,e,f
    /// ```
    Replicate,
    /// Mirror pixels around the border without repeating the edge pixel
    ///
    /// ```text
    /// c b | a b c d | c b
    /// ```
    ///
    /// This is what most filters use by default
    Reflect101
}

/// Map a possibly out of range coordinate into `0..n` using `method`
///
/// Returns `None` for coordinates outside the image when the
/// method is `Constant`
#[inline]
pub fn border_index(i: isize, n: usize, method: PadMethod) -> Option<usize> {
    let last = n as isize - 1;

    if (0..=last).contains(&i) {
        return Some(i as usize);
    }
    match method {
        PadMethod::Constant => None,
        PadMethod::Replicate => Some(i.clamp(0, last) as usize),
        PadMethod::Reflect101 => {
            if last == 0 {
                return Some(0);
            }
            let mut i = i;
            // a border wider than the image bounces more than once
            while !(0..=last).contains(&i) {
                if i < 0 {
                    i = -i;
                }
                if i > last {
                    i = 2 * last - i;
                }
            }
            Some(i as usize)
        }
    }
}

/// Pad pixels creating a buffer around actual pixels
///
/// This is mainly useful for convolutions and anything that
/// has conditions for edge pixels
///
///```text
///    padded width ──────────────────────────────►
/// │ ┌─────────────────────────────────────┐
/// │ │          PADDING                    │
/// │ │   (x,y)     out width               │
/// │ │     ┌────────────────────┐          │
/// │ │   o │                    │          │
/// │ │   u │                    │          │
/// │ │   t │     IMAGE          │          │
/// │ │   h │                    │          │
/// │ │     └────────────────────┘          │
/// ▼ │                                     │
///   └─────────────────────────────────────┘
/// ```
///
/// # Arguments
///  - pixels:Un-padded raw pixels
///  - width: Width of raw pixels
///  - height : Height of raw pixels
///  - pad_x: Number of columns to increase the width by.
///     The width is increased on both sides i.e left is padded by
///     pad_x and so is the right.
///  - pad_y: Number of rows to increase the height by
///  - method: Method to use for pad pixels.
///
/// # Returns:
///  - A vec containing padded pixels.
pub fn pad<T: Copy + Default>(
    pixels: &[T], width: usize, height: usize, pad_x: usize, pad_y: usize, method: PadMethod
) -> Vec<T> {
    let padded_w = width + pad_x * 2;
    let padded_h = height + pad_y * 2;

    let mut out_pixels = vec![T::default(); padded_h * padded_w];

    if width == 0 || height == 0 {
        return out_pixels;
    }
    // column lookup is the same for every row
    let columns: Vec<Option<usize>> = (0..padded_w)
        .map(|x| border_index(x as isize - pad_x as isize, width, method))
        .collect();

    for (y, out) in out_pixels.chunks_exact_mut(padded_w).enumerate() {
        let Some(src_y) = border_index(y as isize - pad_y as isize, height, method) else {
            continue;
        };
        let in_row = &pixels[src_y * width..(src_y + 1) * width];

        // middle of the row is a straight copy
        out[pad_x..pad_x + width].copy_from_slice(in_row);

        for (x, column) in columns.iter().enumerate() {
            if x >= pad_x && x < pad_x + width {
                continue;
            }
            if let Some(src_x) = column {
                out[x] = in_row[*src_x];
            }
        }
    }
    out_pixels
}

#[cfg(test)]
mod tests {
    use crate::pad::{border_index, pad, PadMethod};

    #[test]
    fn replicate_pad() {
        let pixels = [1, 2, 3, 4];
        let padded = pad(&pixels, 2, 2, 1, 1, PadMethod::Replicate);

        #[rustfmt::skip]
        let expected = [
            1, 1, 2, 2,
            1, 1, 2, 2,
            3, 3, 4, 4,
            3, 3, 4, 4
        ];
        assert_eq!(padded, expected);
    }

    #[test]
    fn constant_pad() {
        let pixels = [5_u8; 1];
        let padded = pad(&pixels, 1, 1, 1, 1, PadMethod::Constant);
        assert_eq!(padded, [0, 0, 0, 0, 5, 0, 0, 0, 0]);
    }

    #[test]
    fn reflect_101() {
        // c b | a b c d | c b
        let row = [1, 2, 3, 4];
        let padded = pad(&row, 4, 1, 2, 0, PadMethod::Reflect101);
        assert_eq!(padded, [3, 2, 1, 2, 3, 4, 3, 2]);

        assert_eq!(border_index(-5, 3, PadMethod::Reflect101), Some(1));
        assert_eq!(border_index(4, 1, PadMethod::Reflect101), Some(0));
        assert_eq!(border_index(-1, 3, PadMethod::Constant), None);
    }
}
