/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Blemish removal by patch replacement
//!
//! The eight patches one radius away from the blemish are scored by how much
//! texture they carry, measured with Sobel gradients on the grayscale image.
//! The smoothest one is copied over the blemish with a feathered circular mask.
use pixlab_core::bit_depth::BitType;
use pixlab_core::log::{debug, warn};
use pixlab_image::errors::ImageErrors;
use pixlab_image::image::Image;
use pixlab_image::traits::OperationsTrait;

use crate::sobel::sobel_gradients;
use crate::utils::{channel_to_f32, ensure, f32_to_channel, luma_plane, Rect};

/// Default radius of the patch around a blemish
pub const DEFAULT_RADIUS: usize = 15;

/// Offsets of the candidate patches in units of the radius
const NEIGHBOURS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1)
];

/// Region of the `2r x 2r` patch centred on `(x,y)`, if it lies fully inside the image
fn patch_region(
    width: usize, height: usize, x: isize, y: isize, radius: usize
) -> Option<Rect> {
    let r = isize::try_from(radius).ok()?;
    let side = radius.checked_mul(2)?;

    if radius == 0 || x < r || y < r {
        return None;
    }
    let rect = Rect::new((x - r) as usize, (y - r) as usize, side, side);

    rect.fits(width, height).then_some(rect)
}

/// Score the texture of the `2r x 2r` patch centred on `(x,y)`
///
/// The score is the mean absolute horizontal Sobel derivative plus the
/// mean absolute vertical one, computed on the patch alone. Lower is smoother.
///
/// Returns `None` when the patch does not fit inside the image
pub fn patch_score(
    gray: &[f32], width: usize, height: usize, x: isize, y: isize, radius: usize
) -> Option<f64> {
    let rect = patch_region(width, height, x, y, radius)?;

    let mut patch = Vec::with_capacity(rect.width * rect.height);

    for row in gray[rect.y * width..].chunks_exact(width).take(rect.height) {
        patch.extend_from_slice(&row[rect.x..rect.x + rect.width]);
    }
    let (gx, gy) = sobel_gradients(&patch, rect.width, rect.height);

    let mean_abs = |data: &[f32]| -> f64 {
        data.iter().map(|x| f64::from(x.abs())).sum::<f64>() / data.len() as f64
    };
    Some(mean_abs(&gx) + mean_abs(&gy))
}

/// Find the centre of the smoothest neighbouring patch of a blemish at `(x,y)`
///
/// Candidates are centred one radius away horizontally, vertically and
/// diagonally. Candidates whose patch leaves the image are skipped, ties go
/// to the first candidate checked.
///
/// Returns `None` when no candidate fits
pub fn best_patch(
    gray: &[f32], width: usize, height: usize, x: usize, y: usize, radius: usize
) -> Option<(usize, usize)> {
    let r = isize::try_from(radius).ok()?;
    let (x, y) = (isize::try_from(x).ok()?, isize::try_from(y).ok()?);
    let mut best: Option<((usize, usize), f64)> = None;

    for (dx, dy) in NEIGHBOURS {
        // centres beyond isize cannot fit any image
        let Some(cx) = (dx * r).checked_add(x) else {
            continue;
        };
        let Some(cy) = (dy * r).checked_add(y) else {
            continue;
        };
        let Some(score) = patch_score(gray, width, height, cx, cy, radius) else {
            continue;
        };
        debug!("Patch at ({cx},{cy}) scored {score:.3}");

        if best.map_or(true, |(_, s)| score < s) {
            best = Some(((cx as usize, cy as usize), score));
        }
    }
    best.map(|(centre, _)| centre)
}

/// Weight of the replacement patch at distance `d` from the blemish centre
///
/// Full weight in the inner half of the circle, falling linearly to zero at the edge
fn feather(distance: f32, radius: f32) -> f32 {
    let inner = radius * 0.5;

    if distance <= inner {
        1.0
    } else {
        ((radius - distance) / (radius - inner)).clamp(0.0, 1.0)
    }
}

/// Remove a blemish centred at `(x,y)`
///
/// Does nothing, with a warning, when no neighbouring patch fits inside the image
#[derive(Copy, Clone, Debug)]
pub struct BlemishRemoval {
    x:      usize,
    y:      usize,
    radius: usize
}

impl BlemishRemoval {
    #[must_use]
    pub fn new(x: usize, y: usize, radius: usize) -> BlemishRemoval {
        BlemishRemoval { x, y, radius }
    }
}

impl OperationsTrait for BlemishRemoval {
    fn name(&self) -> &'static str {
        "Blemish Removal"
    }

    fn execute_impl(&self, image: &mut Image) -> Result<(), ImageErrors> {
        let (width, height) = image.dimensions();

        ensure(self.radius > 0, || "Blemish radius must be positive".to_string())?;
        ensure(self.x < width && self.y < height, || {
            format!(
                "Blemish at ({},{}) is outside the {width}x{height} image",
                self.x, self.y
            )
        })?;

        let gray = luma_plane(image)?;

        let Some((bx, by)) = best_patch(&gray, width, height, self.x, self.y, self.radius) else {
            warn!(
                "No patch of radius {} fits around ({},{}), leaving image untouched",
                self.radius, self.x, self.y
            );
            return Ok(());
        };
        debug!("Replacing blemish at ({},{}) with patch at ({bx},{by})", self.x, self.y);

        let depth = image.depth();
        let r = self.radius as isize;

        for channel in image.channels_mut(true) {
            let mut plane = channel_to_f32(channel, depth)?;
            let source = plane.clone();

            for dy in -r..r {
                for dx in -r..r {
                    let (tx, ty) = (self.x as isize + dx, self.y as isize + dy);

                    if tx < 0 || ty < 0 || tx >= width as isize || ty >= height as isize {
                        continue;
                    }
                    let weight = feather(((dx * dx + dy * dy) as f32).sqrt(), r as f32);

                    if weight <= 0.0 {
                        continue;
                    }
                    let (sx, sy) = ((bx as isize + dx) as usize, (by as isize + dy) as usize);

                    let target = ty as usize * width + tx as usize;
                    let patch = source[sy * width + sx];

                    plane[target] = patch * weight + source[target] * (1.0 - weight);
                }
            }
            *channel = f32_to_channel(&plane, depth)?;
        }
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

    use crate::blemish::{best_patch, feather, patch_score, BlemishRemoval};

    /// Random texture everywhere except the `20x20` block at columns 40..60, rows 30..50
    fn textured(width: usize, height: usize) -> Vec<f32> {
        let mut noise = vec![0_u8; width * height];
        nanorand::WyRand::new_seed(7).fill(&mut noise);

        let mut gray: Vec<f32> = noise.iter().map(|x| f32::from(*x)).collect();

        for y in 30..50 {
            gray[y * width + 40..y * width + 60].fill(128.0);
        }
        gray
    }

    #[test]
    fn flat_patch_scores_zero() {
        let gray = vec![50.0; 400];
        assert_eq!(patch_score(&gray, 20, 20, 10, 10, 5), Some(0.0));
        // leaves the image
        assert_eq!(patch_score(&gray, 20, 20, 3, 10, 5), None);
        assert_eq!(patch_score(&gray, 20, 20, 16, 10, 5), None);
        // touching the border still fits
        assert!(patch_score(&gray, 20, 20, 15, 15, 5).is_some());
    }

    #[test]
    fn picks_flattest_neighbour() {
        let (w, h) = (80, 80);
        let gray = textured(w, h);
        // the patch right of the blemish covers exactly the flat block
        assert_eq!(patch_score(&gray, w, h, 50, 40, 10), Some(0.0));
        assert!(patch_score(&gray, w, h, 30, 30, 10).unwrap() > 1.0);
        assert!(patch_score(&gray, w, h, 50, 50, 10).unwrap() > 0.0);
        assert_eq!(best_patch(&gray, w, h, 40, 40, 10), Some((50, 40)));
    }

    #[test]
    fn huge_radius_does_not_overflow() {
        let gray = vec![0.0; 4];
        assert_eq!(patch_score(&gray, 2, 2, 1, 1, usize::MAX / 2 + 1), None);
        assert_eq!(best_patch(&gray, 2, 2, 1, 1, usize::MAX / 2), None);
        assert_eq!(best_patch(&gray, 2, 2, 1, 1, usize::MAX), None);

        let image = Image::fill(9_u8, ColorSpace::Luma, 1, 1);
        let out = BlemishRemoval::new(0, 0, usize::MAX / 2)
            .clone_and_execute(&image)
            .unwrap();
        assert_eq!(out, image);
    }

    #[test]
    fn skips_out_of_bounds_candidates() {
        let gray = vec![10.0; 60 * 60];
        // only candidates to the right and below fit
        assert_eq!(best_patch(&gray, 60, 60, 15, 15, 15), Some((15, 30)));
        assert_eq!(best_patch(&gray, 20, 20, 10, 10, 15), None);
    }

    #[test]
    fn feather_profile() {
        assert_eq!(feather(0.0, 10.0), 1.0);
        assert_eq!(feather(5.0, 10.0), 1.0);
        assert_eq!(feather(7.5, 10.0), 0.5);
        assert_eq!(feather(10.0, 10.0), 0.0);
    }

    #[test]
    fn removes_a_dark_spot() {
        let mut image = Image::from_fn::<u8, _>(64, 64, ColorSpace::BGR, |x, y, px| {
            let spot = (x as i32 - 32).pow(2) + (y as i32 - 32).pow(2) < 9;
            px.fill(if spot { 0 } else { 180 });
        });
        BlemishRemoval::new(32, 32, 8).execute(&mut image).unwrap();
        let out = image.flatten::<u8>().unwrap();
        assert_eq!(out[(32 * 64 + 32) * 3], 180);
    }

    #[test]
    fn no_candidate_is_a_noop() {
        let image = Image::fill(7_u8, ColorSpace::RGB, 10, 10);
        let out = BlemishRemoval::new(5, 5, 15).clone_and_execute(&image).unwrap();
        assert_eq!(out, image);

        assert!(BlemishRemoval::new(50, 5, 3).clone_and_execute(&image).is_err());
    }
}
