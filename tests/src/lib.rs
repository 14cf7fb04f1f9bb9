/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![allow(unused_imports, unused)]

use std::fs::read;
use std::path::{Path, PathBuf};

use pixlab_core::colorspace::ColorSpace;
use pixlab_image::image::Image;
use serde::de::DeserializeOwned;
use serde::Deserialize;

mod netpbm;
mod procs;

#[derive(Copy, Clone, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonColorspace {
    RGB,
    RGBA,
    BGR,
    BGRA,
    Luma,
    LumaA,
    HSV
}

impl JsonColorspace {
    pub fn to_colorspace(self) -> ColorSpace {
        match self {
            Self::RGB => ColorSpace::RGB,
            Self::RGBA => ColorSpace::RGBA,
            Self::BGR => ColorSpace::BGR,
            Self::BGRA => ColorSpace::BGRA,
            Self::Luma => ColorSpace::Luma,
            Self::LumaA => ColorSpace::LumaA,
            Self::HSV => ColorSpace::HSV
        }
    }
}

/// An 8 bit image written out sample by sample
#[derive(Clone, Deserialize, Debug)]
pub struct JsonImage {
    pub width:      usize,
    pub height:     usize,
    pub colorspace: JsonColorspace,
    pub pixels:     Vec<u8>
}

impl JsonImage {
    pub fn to_image(&self) -> Image {
        Image::from_u8(
            &self.pixels,
            self.width,
            self.height,
            self.colorspace.to_colorspace()
        )
    }
}

/// Directory holding the json case files
pub fn cases_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests")
}

/// Read every entry of a json case file
pub fn load_cases<T: DeserializeOwned>(name: &str) -> Vec<T> {
    let file = cases_path().join(name);
    let json_file = read(&file).unwrap_or_else(|e| panic!("Could not read {file:?}, {e}"));

    serde_json::from_slice(&json_file).unwrap()
}
