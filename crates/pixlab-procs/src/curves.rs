/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Tone curves
//!
//! A curve is described by a handful of pivot points `(x, y)`, every 8 bit
//! level is mapped by linear interpolation between the two pivots around it.
//! The resulting 256 entry table is then applied to a channel.
use pixlab_core::bit_depth::BitType;
use pixlab_core::colorspace::ColorSpace;
use pixlab_core::log::trace;
use pixlab_image::channel::Channel;
use pixlab_image::errors::ImageErrors;
use pixlab_image::image::Image;
use pixlab_image::traits::OperationsTrait;

use crate::utils::{ensure, execute_on};

/// Pivot levels shared by the warming and cooling presets
const PRESET_X: [f32; 6] = [0.0, 50.0, 100.0, 150.0, 200.0, 255.0];
/// Curve raising a channel
const PRESET_UP: [f32; 6] = [0.0, 80.0, 150.0, 190.0, 220.0, 255.0];
/// Curve lowering a channel
const PRESET_DOWN: [f32; 6] = [0.0, 20.0, 40.0, 75.0, 150.0, 255.0];

/// Build a lookup table by piecewise linear interpolation through the pivots
///
/// Levels hitting a pivot take its value exactly, every other level lies on
/// the line through the pivots on either side. Results are rounded and
/// clipped to `0..=255`.
///
/// # Errors
/// - Fewer than two pivots
/// - `x_pivots` and `y_pivots` differ in length
/// - `x_pivots` is not strictly increasing
/// - The pivots do not cover `0..=255`
pub fn interpolate_lut(x_pivots: &[f32], y_pivots: &[f32]) -> Result<[u8; 256], ImageErrors> {
    ensure(x_pivots.len() >= 2, || {
        format!("A curve needs at least two pivots, found {}", x_pivots.len())
    })?;
    ensure(x_pivots.len() == y_pivots.len(), || {
        format!(
            "Pivot counts differ, {} x values and {} y values",
            x_pivots.len(),
            y_pivots.len()
        )
    })?;
    ensure(x_pivots.windows(2).all(|w| w[0] < w[1]), || {
        format!("Pivot levels must be strictly increasing, found {x_pivots:?}")
    })?;
    ensure(x_pivots[0] <= 0.0 && x_pivots[x_pivots.len() - 1] >= 255.0, || {
        format!("Pivot levels must cover 0..=255, found {x_pivots:?}")
    })?;

    Ok(interpolate(x_pivots, y_pivots))
}

/// Interpolation behind [`interpolate_lut`], pivots must already be valid
fn interpolate(x_pivots: &[f32], y_pivots: &[f32]) -> [u8; 256] {
    let mut lut = [0_u8; 256];
    let mut j = 0;

    for (level, entry) in lut.iter_mut().enumerate() {
        let a = level as f32;

        while a > x_pivots[j] {
            j += 1;
        }
        let value = if a == x_pivots[j] {
            y_pivots[j]
        } else {
            let slope = (y_pivots[j] - y_pivots[j - 1]) / (x_pivots[j] - x_pivots[j - 1]);
            y_pivots[j - 1] + slope * (a - x_pivots[j - 1])
        };
        *entry = value.round().clamp(0.0, 255.0) as u8;
    }
    lut
}

fn apply_lut(data: &mut [u8], lut: &[u8; 256]) {
    for x in data.iter_mut() {
        *x = lut[usize::from(*x)];
    }
}

/// Apply separate tone curves to the red, green and blue channels
///
/// Channels without a curve are left untouched
#[derive(Clone, Debug, Default)]
pub struct Curves {
    red:   Option<[u8; 256]>,
    green: Option<[u8; 256]>,
    blue:  Option<[u8; 256]>
}

impl Curves {
    /// Create curves that change nothing
    #[must_use]
    pub fn new() -> Curves {
        Curves::default()
    }

    /// Set the red curve
    pub fn with_red(mut self, x_pivots: &[f32], y_pivots: &[f32]) -> Result<Curves, ImageErrors> {
        self.red = Some(interpolate_lut(x_pivots, y_pivots)?);
        Ok(self)
    }

    /// Set the green curve
    pub fn with_green(
        mut self, x_pivots: &[f32], y_pivots: &[f32]
    ) -> Result<Curves, ImageErrors> {
        self.green = Some(interpolate_lut(x_pivots, y_pivots)?);
        Ok(self)
    }

    /// Set the blue curve
    pub fn with_blue(
        mut self, x_pivots: &[f32], y_pivots: &[f32]
    ) -> Result<Curves, ImageErrors> {
        self.blue = Some(interpolate_lut(x_pivots, y_pivots)?);
        Ok(self)
    }

    /// Warm look, red raised and blue lowered
    #[must_use]
    pub fn warming() -> Curves {
        Curves::preset(&PRESET_UP, &PRESET_DOWN)
    }

    /// Cool look, blue raised and red lowered
    #[must_use]
    pub fn cooling() -> Curves {
        Curves::preset(&PRESET_DOWN, &PRESET_UP)
    }

    fn preset(red: &[f32; 6], blue: &[f32; 6]) -> Curves {
        Curves {
            red:   Some(interpolate(&PRESET_X, red)),
            green: None,
            blue:  Some(interpolate(&PRESET_X, blue))
        }
    }
}

impl OperationsTrait for Curves {
    fn name(&self) -> &'static str {
        "Curves"
    }

    fn execute_impl(&self, image: &mut Image) -> Result<(), ImageErrors> {
        let Some(positions) = image.colorspace().rgb_positions() else {
            return Err(ImageErrors::GenericStr("Curves need an rgb image"));
        };
        let channels = image.channels_mut(true);

        for (pos, lut) in positions.iter().zip([&self.red, &self.green, &self.blue]) {
            if let Some(lut) = lut {
                trace!("Applying curve to channel {pos}");
                apply_lut(channels[*pos].reinterpret_as_mut::<u8>()?, lut);
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

/// Map every colour sample of an 8 bit image through a 256 entry table
#[derive(Clone, Debug)]
pub struct LookupTable {
    table: [u8; 256]
}

impl LookupTable {
    #[must_use]
    pub fn new(table: [u8; 256]) -> LookupTable {
        LookupTable { table }
    }

    /// Create a table from curve pivots, see [`interpolate_lut`]
    pub fn from_pivots(x_pivots: &[f32], y_pivots: &[f32]) -> Result<LookupTable, ImageErrors> {
        Ok(LookupTable::new(interpolate_lut(x_pivots, y_pivots)?))
    }
}

impl OperationsTrait for LookupTable {
    fn name(&self) -> &'static str {
        "Lookup Table"
    }

    fn execute_impl(&self, image: &mut Image) -> Result<(), ImageErrors> {
        let function = |channel: &mut Channel| -> Result<(), ImageErrors> {
            apply_lut(channel.reinterpret_as_mut::<u8>()?, &self.table);
            Ok(())
        };
        execute_on(function, image, true)
    }

    fn supported_types(&self) -> &'static [BitType] {
        &[BitType::U8]
    }
}

#[cfg(test)]
mod tests {
    use pixlab_core::colorspace::ColorSpace;
    use pixlab_image::image::Image;
    use pixlab_image::traits::OperationsTrait;

    use crate::curves::{interpolate_lut, Curves, LookupTable, PRESET_DOWN, PRESET_UP, PRESET_X};

    #[test]
    fn hits_pivots_exactly() {
        let lut = interpolate_lut(&PRESET_X, &PRESET_UP).unwrap();
        for (x, y) in PRESET_X.iter().zip(&PRESET_UP) {
            assert_eq!(lut[*x as usize], *y as u8);
        }
        // halfway between 0 and 50 on the way to 80
        assert_eq!(lut[25], 40);
    }

    #[test]
    fn monotonic_between_pivots() {
        for curve in [&PRESET_UP, &PRESET_DOWN] {
            let lut = interpolate_lut(&PRESET_X, curve).unwrap();
            assert!(lut.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn values_are_clipped() {
        let lut = interpolate_lut(&[0.0, 255.0], &[-100.0, 400.0]).unwrap();
        assert_eq!(lut[0], 0);
        assert_eq!(lut[255], 255);
        assert!(lut.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn invalid_pivots() {
        assert!(interpolate_lut(&[0.0], &[0.0]).is_err());
        assert!(interpolate_lut(&[0.0, 255.0], &[0.0]).is_err());
        assert!(interpolate_lut(&[0.0, 100.0, 100.0, 255.0], &[0.0; 4]).is_err());
        assert!(interpolate_lut(&[10.0, 255.0], &[0.0, 255.0]).is_err());
        assert!(interpolate_lut(&[0.0, 200.0], &[0.0, 255.0]).is_err());
    }

    #[test]
    fn presets_match_interpolation() {
        let warm = Curves::warming();
        assert_eq!(warm.red, Some(interpolate_lut(&PRESET_X, &PRESET_UP).unwrap()));
        assert_eq!(warm.blue, Some(interpolate_lut(&PRESET_X, &PRESET_DOWN).unwrap()));

        let cool = Curves::cooling();
        assert_eq!(cool.red, warm.blue);
        assert_eq!(cool.blue, warm.red);
    }

    #[test]
    fn warming_respects_channel_order() {
        let mut bgr = Image::from_u8(&[100, 100, 100], 1, 1, ColorSpace::BGR);
        Curves::warming().execute(&mut bgr).unwrap();
        assert_eq!(bgr.flatten::<u8>().unwrap(), [40, 100, 150]);

        let mut rgb = Image::from_u8(&[100, 100, 100], 1, 1, ColorSpace::RGB);
        Curves::warming().execute(&mut rgb).unwrap();
        assert_eq!(rgb.flatten::<u8>().unwrap(), [150, 100, 40]);
    }

    #[test]
    fn custom_curves_and_table() {
        let mut image = Image::from_u8(&[0, 128, 255], 1, 1, ColorSpace::RGB);
        Curves::new()
            .with_green(&[0.0, 255.0], &[255.0, 0.0])
            .unwrap()
            .execute(&mut image)
            .unwrap();
        assert_eq!(image.flatten::<u8>().unwrap(), [0, 127, 255]);

        let mut table = [0_u8; 256];
        table[255] = 1;
        let mut image = Image::from_u8(&[255, 3, 255, 9], 2, 1, ColorSpace::LumaA);
        LookupTable::new(table).execute(&mut image).unwrap();
        assert_eq!(image.flatten::<u8>().unwrap(), [1, 3, 1, 9]);
        assert!(LookupTable::from_pivots(&[0.0], &[0.0]).is_err());
    }
}
