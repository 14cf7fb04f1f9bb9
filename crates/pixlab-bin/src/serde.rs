/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::ffi::OsString;

use pixlab_core::bit_depth::BitDepth;
use pixlab_core::colorspace::ColorSpace;
use pixlab_image::codecs::ImageFormat;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Header information of an input file
pub struct Metadata {
    pub file:       OsString,
    pub size:       u64,
    pub format:     ImageFormat,
    pub width:      usize,
    pub height:     usize,
    pub colorspace: ColorSpace,
    pub depth:      BitDepth
}

impl Serialize for Metadata {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        let mut state = serializer.serialize_struct("Metadata", 7)?;

        state.serialize_field("file", &self.file.to_string_lossy())?;
        state.serialize_field("size", &self.size)?;
        state.serialize_field("format", &self.format)?;
        state.serialize_field("width", &self.width)?;
        state.serialize_field("height", &self.height)?;
        state.serialize_field("colorspace", &self.colorspace)?;
        state.serialize_field("depth", &self.depth)?;

        state.end()
    }
}

/// Statistics of a processed image
pub struct Stats {
    pub file:                   OsString,
    pub colorspace:             ColorSpace,
    pub histograms:             Vec<[u32; 256]>,
    pub var_abs_laplacian:      f64,
    pub sum_modified_laplacian: f64,
    pub dominant_hue:           Option<f32>
}

impl Serialize for Stats {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        let histograms: Vec<&[u32]> = self.histograms.iter().map(|x| &x[..]).collect();

        let mut state = serializer.serialize_struct("Stats", 6)?;

        state.serialize_field("file", &self.file.to_string_lossy())?;
        state.serialize_field("colorspace", &self.colorspace)?;
        state.serialize_field("histograms", &histograms)?;
        state.serialize_field("var_abs_laplacian", &self.var_abs_laplacian)?;
        state.serialize_field("sum_modified_laplacian", &self.sum_modified_laplacian)?;
        state.serialize_field("dominant_hue", &self.dominant_hue)?;

        state.end()
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use pixlab_core::bit_depth::BitDepth;
    use pixlab_core::colorspace::ColorSpace;
    use pixlab_image::codecs::ImageFormat;

    use crate::serde::{Metadata, Stats};

    #[test]
    fn metadata_json() {
        let metadata = Metadata {
            file:       OsString::from("a.ppm"),
            size:       20,
            format:     ImageFormat::Netpbm,
            width:      2,
            height:     3,
            colorspace: ColorSpace::BGR,
            depth:      BitDepth::Eight
        };
        let json: serde_json::Value = serde_json::to_value(&metadata).unwrap();

        assert_eq!(json["file"], "a.ppm");
        assert_eq!(json["format"], "Netpbm");
        assert_eq!(json["colorspace"], "BGR");
        assert_eq!(json["depth"], "Eight");
    }

    #[test]
    fn stats_json() {
        let mut hist = [0; 256];
        hist[7] = 4;
        let stats = Stats {
            file:                   OsString::from("b.pgm"),
            colorspace:             ColorSpace::Luma,
            histograms:             vec![hist],
            var_abs_laplacian:      1.5,
            sum_modified_laplacian: 10.0,
            dominant_hue:           None
        };
        let json: serde_json::Value = serde_json::to_value(&stats).unwrap();

        assert_eq!(json["histograms"][0].as_array().unwrap().len(), 256);
        assert_eq!(json["histograms"][0][7], 4);
        assert!(json["dominant_hue"].is_null());
    }
}
