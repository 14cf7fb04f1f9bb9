/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::ffi::OsStr;
use std::path::Path;

use clap::ArgMatches;
use log::warn;
use pixlab_core::options::DecoderOptions;
use pixlab_image::codecs::netpbm::PpmDecoder;
use pixlab_image::codecs::{guess_format, ImageFormat};
use pixlab_image::errors::ImageErrors;
use pixlab_image::traits::DecoderTrait;

use crate::serde::Metadata;

/// Probe input files, extract metadata, and print to standard output.
pub fn probe_input_files(args: &ArgMatches) -> Result<(), ImageErrors> {
    if !args.get_flag("probe") {
        return Ok(());
    }
    let Some(inputs) = args.get_raw("in") else {
        return Ok(());
    };
    for in_file in inputs {
        match probe_file(in_file)? {
            Some(metadata) => {
                let json = serde_json::to_string_pretty(&metadata)
                    .map_err(|e| ImageErrors::GenericString(e.to_string()))?;
                println!("{json}");
            }
            None => warn!("Could not probe {:?}, unknown format", in_file)
        }
    }
    Ok(())
}

/// Read the headers of a single file
pub fn probe_file(in_file: &OsStr) -> Result<Option<Metadata>, ImageErrors> {
    if !Path::new(in_file).exists() {
        return Err(ImageErrors::GenericString(format!(
            "Path {in_file:?} does not exist"
        )));
    }
    let data = std::fs::read(in_file)?;

    if guess_format(&data) != Some(ImageFormat::Netpbm) {
        return Ok(None);
    }
    // only headers are read, so lift the size limits
    let options = DecoderOptions::new_cmd()
        .set_max_height(usize::MAX)
        .set_max_width(usize::MAX);

    let mut decoder = PpmDecoder::new_with_options(&data, options);
    decoder.decode_headers()?;

    let (width, height) = decoder
        .dimensions()
        .ok_or(ImageErrors::GenericStr("Headers were not decoded"))?;

    Ok(Some(Metadata {
        file: in_file.to_os_string(),
        size: data.len() as u64,
        format: ImageFormat::Netpbm,
        width,
        height,
        colorspace: decoder.out_colorspace(),
        depth: decoder.bit_depth().unwrap_or_default()
    }))
}
