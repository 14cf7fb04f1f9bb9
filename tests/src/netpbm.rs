/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use pixlab_core::colorspace::ColorSpace;
use pixlab_core::options::DecoderOptions;
use pixlab_image::codecs::netpbm::{PpmDecoder, PpmEncoder};
use pixlab_image::codecs::{guess_format, ImageFormat};
use pixlab_image::image::Image;
use pixlab_image::pipelines::Pipeline;
use pixlab_image::traits::DecoderTrait;
use pixlab_procs::threshold::ManualThreshold;
use serde::Deserialize;

use crate::{load_cases, JsonColorspace};

#[derive(Clone, Deserialize, Debug)]
pub struct NetpbmEntry {
    pub name:       String,
    /// File contents, ascii netpbm variants only
    pub data:       String,
    /// Decode to bgr instead of rgb
    pub bgr:        bool,
    pub strict:     bool,
    pub width:      usize,
    pub height:     usize,
    pub colorspace: JsonColorspace,
    /// Expected samples, `None` when decoding should fail
    pub pixels:     Option<Vec<u8>>,
    pub comment:    Option<String>
}

#[test]
#[allow(clippy::uninlined_format_args)]
fn test_netpbm() {
    let entries: Vec<NetpbmEntry> = load_cases("netpbm.json");

    let mut error = false;
    let mut failed = Vec::new();

    for entry in &entries {
        let mut options = DecoderOptions::default().set_strict_mode(entry.strict);
        if entry.bgr {
            options = options.set_out_colorspace(ColorSpace::BGR);
        }
        let mut decoder = PpmDecoder::new_with_options(entry.data.as_bytes(), options);
        let result = decoder.decode();

        let ok = match (&result, &entry.pixels) {
            (Ok(image), Some(pixels)) => {
                image.dimensions() == (entry.width, entry.height)
                    && image.colorspace() == entry.colorspace.to_colorspace()
                    && image.flatten_to_u8().unwrap() == *pixels
            }
            (Err(_), None) => true,
            _ => false
        };
        if !ok {
            error = true;
            failed.push(entry.name.clone());
            eprintln!("Mismatch for {}\nDecoded {:?}\nConfig:{:#?}\n", entry.name, result, entry);
        }
    }
    if error {
        panic!("Errors found during test decoding\n {:#?}", failed);
    }
}

#[test]
fn decode_process_encode() {
    let data = b"P2\n3 1\n255\n10 100 200\n";
    assert_eq!(guess_format(data), Some(ImageFormat::Netpbm));

    let mut pipeline = Pipeline::new();
    pipeline
        .chain_decoder(PpmDecoder::new(data))
        .chain_operations(Box::new(ManualThreshold::new(50, 255)))
        .chain_encoder(Box::new(PpmEncoder::new()));

    pipeline.advance_to_end().unwrap();

    let encoded = pipeline.encoded()[0].data();
    assert_eq!(encoded, b"P5\n3 1\n255\n\x00\xff\xff");

    let image = Image::read(encoded, DecoderOptions::default()).unwrap();
    assert_eq!(image.flatten_to_u8().unwrap(), [0, 255, 255]);
}
