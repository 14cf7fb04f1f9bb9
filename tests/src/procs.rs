/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use pixlab_core::colorspace::ColorSpace;
use pixlab_image::core_filters::colorspace::ColorspaceConv;
use pixlab_image::image::Image;
use pixlab_image::traits::OperationsTrait;
use pixlab_procs::bitwise::BitwiseNot;
use pixlab_procs::blemish::BlemishRemoval;
use pixlab_procs::connected_components::{ConnectedComponents, Connectivity};
use pixlab_procs::crop::Crop;
use pixlab_procs::curves::{Curves, LookupTable};
use pixlab_procs::in_range::InRange;
use pixlab_procs::manual_convert::{ManualGrayscale, ManualHsv};
use pixlab_procs::threshold::{ManualThreshold, Threshold, ThresholdMethod};
use serde::Deserialize;

use crate::{load_cases, JsonImage};

#[derive(Clone, Deserialize, Debug)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum JsonOperation {
    Threshold {
        thresh: f32,
        max:    f32,
        method: String
    },
    ManualThreshold {
        thresh: u8,
        max:    u8
    },
    ManualGrayscale,
    ManualHsv,
    LookupTable {
        x: Vec<f32>,
        y: Vec<f32>
    },
    Curves {
        preset: String
    },
    InRange {
        lower: Vec<f32>,
        upper: Vec<f32>
    },
    Invert,
    Crop {
        width:  usize,
        height: usize,
        x:      usize,
        y:      usize
    },
    Components {
        eight: bool
    }
}

impl JsonOperation {
    fn to_operation(&self) -> Box<dyn OperationsTrait> {
        match self {
            Self::Threshold {
                thresh,
                max,
                method
            } => {
                let method = ThresholdMethod::from_string_result(method).unwrap();
                Box::new(Threshold::new(*thresh, *max, method))
            }
            Self::ManualThreshold { thresh, max } => Box::new(ManualThreshold::new(*thresh, *max)),
            Self::ManualGrayscale => Box::new(ManualGrayscale::new()),
            Self::ManualHsv => Box::new(ManualHsv::new()),
            Self::LookupTable { x, y } => Box::new(LookupTable::from_pivots(x, y).unwrap()),
            Self::Curves { preset } => match preset.as_str() {
                "warming" => Box::new(Curves::warming()),
                "cooling" => Box::new(Curves::cooling()),
                other => panic!("Unknown curve preset {other}")
            },
            Self::InRange { lower, upper } => {
                Box::new(InRange::new(lower.clone(), upper.clone()))
            }
            Self::Invert => Box::new(BitwiseNot::new()),
            Self::Crop {
                width,
                height,
                x,
                y
            } => Box::new(Crop::new(*width, *height, *x, *y)),
            Self::Components { eight } => {
                let connectivity = if *eight {
                    Connectivity::Eight
                } else {
                    Connectivity::Four
                };
                Box::new(ConnectedComponents::new(connectivity))
            }
        }
    }
}

#[derive(Clone, Deserialize, Debug)]
pub struct ProcEntry {
    pub name:      String,
    pub input:     JsonImage,
    pub operation: JsonOperation,
    pub expected:  Vec<u8>,
    pub comment:   Option<String>
}

#[test]
#[allow(clippy::uninlined_format_args)]
fn test_procs() {
    let entries: Vec<ProcEntry> = load_cases("procs.json");

    let mut error = false;
    let mut failed = Vec::new();

    for entry in &entries {
        let image = entry.input.to_image();
        let operation = entry.operation.to_operation();

        let output = match operation.clone_and_execute(&image) {
            Ok(output) => output.flatten_to_u8().unwrap(),
            Err(e) => {
                error = true;
                eprintln!("{} failed with {:?}\n", entry.name, e);
                failed.push(entry.name.clone());
                continue;
            }
        };
        if output != entry.expected {
            error = true;
            failed.push(entry.name.clone());
            let err = format!(
                "Output mismatch for {}\nExpected {:?} but found {:?}\nConfig:{:#?}",
                entry.name, entry.expected, output, entry
            );
            eprintln!("{}\n", err);
        }
    }
    if error {
        panic!("Errors found while running operations\n {:#?}", failed);
    }
}

#[test]
fn manual_threshold_agrees_with_library() {
    let pixels: Vec<u8> = (0..=255).collect();
    let image = Image::from_u8(&pixels, 16, 16, ColorSpace::Luma);

    for thresh in [0, 1, 64, 127, 200, 254, 255] {
        let manual = ManualThreshold::new(thresh, 255)
            .clone_and_execute(&image)
            .unwrap();
        let library = Threshold::new(f32::from(thresh), 255.0, ThresholdMethod::Binary)
            .clone_and_execute(&image)
            .unwrap();

        assert_eq!(
            manual.flatten_to_u8().unwrap(),
            library.flatten_to_u8().unwrap(),
            "threshold {thresh}"
        );
    }
}

#[test]
fn blemish_takes_its_patch_from_clean_skin() {
    let (w, h) = (90, 90);
    let skin = [150, 170, 210];
    let in_spot = |x: usize, y: usize| {
        let dx = x as f32 - 45.0;
        let dy = y as f32 - 45.0;
        dx * dx + dy * dy <= 16.0
    };
    let mut image = Image::from_fn(w, h, ColorSpace::BGR, |x, y, px: &mut [u8]| {
        if in_spot(x, y) {
            px.copy_from_slice(&[30, 30, 60]);
        } else {
            px.copy_from_slice(&skin);
        }
    });
    BlemishRemoval::new(45, 45, 15).execute(&mut image).unwrap();

    let pixels = image.flatten_to_u8().unwrap();

    for (i, px) in pixels.chunks_exact(3).enumerate() {
        if in_spot(i % w, i / w) {
            assert_eq!(px, skin, "pixel ({},{})", i % w, i / w);
        }
    }
    assert_eq!(h * w * 3, pixels.len());
}

#[test]
fn manual_gray_pipeline_feeds_threshold() {
    let pixels = [0, 0, 0, 255, 255, 255, 0, 0, 255, 255, 0, 0];
    let image = Image::from_u8(&pixels, 4, 1, ColorSpace::BGR);

    let mut gray = ManualGrayscale::new().clone_and_execute(&image).unwrap();
    ManualThreshold::new(50, 255).execute(&mut gray).unwrap();

    // black, white, red and blue
    assert_eq!(gray.flatten_to_u8().unwrap(), [0, 255, 255, 0]);
}

#[test]
fn library_gray_handles_rgba() {
    let image = Image::fill(200_u8, ColorSpace::RGBA, 3, 3);
    let out = ColorspaceConv::new(ColorSpace::Luma)
        .clone_and_execute(&image)
        .unwrap();

    assert_eq!(out.colorspace(), ColorSpace::Luma);
    assert!(out.flatten_to_u8().unwrap().iter().all(|x| *x == 200));
}
