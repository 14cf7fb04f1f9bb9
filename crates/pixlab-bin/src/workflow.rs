/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::ffi::OsStr;
use std::fs::OpenOptions;
use std::io::{stdin, BufRead, BufWriter, Write};
use std::path::Path;

use clap::ArgMatches;
use log::{debug, info};
use pixlab_image::codecs::netpbm::PpmEncoder;
use pixlab_image::codecs::ImageFormat;
use pixlab_image::errors::ImageErrors;
use pixlab_image::image::Image;
use pixlab_image::pipelines::Pipeline;
use pixlab_image::traits::{IntoImage, OperationsTrait};
use pixlab_procs::focus::{sum_modified_laplacian, var_abs_laplacian};
use pixlab_procs::histogram::{dominant_hue, ChannelHistogram};

use crate::cmd_parsers::global_options::CmdOptions;
use crate::cmd_parsers::{fill_args, filters, get_decoder_options, operations};
use crate::file_io::PixlabFile;
use crate::probe_files::probe_input_files;
use crate::serde::Stats;

/// Bins used when looking for the dominant hue
const HUE_BINS: usize = 18;
/// Pixels less saturated than this carry no hue
const MIN_HUE_SATURATION: u8 = 40;

pub fn create_and_exec_workflow_from_cmd(
    args: &ArgMatches, cmd_opts: &CmdOptions
) -> Result<(), ImageErrors> {
    if args.get_flag("probe") {
        return probe_input_files(args);
    }
    info!("Creating workflows from input");

    let inputs = args
        .get_raw("in")
        .ok_or(ImageErrors::GenericStr("No input files given"))?;
    let outputs = args
        .get_raw("out")
        .ok_or(ImageErrors::GenericStr("No output files given"))?;

    if inputs.len() != outputs.len() {
        return Err(ImageErrors::GenericString(format!(
            "Expected one output per input, got {} inputs and {} outputs",
            inputs.len(),
            outputs.len()
        )));
    }

    for (in_file, out_file) in inputs.zip(outputs) {
        verify_file_paths(in_file, out_file, cmd_opts)?;

        let mut workflow: Pipeline<PixlabFile> = Pipeline::new();

        workflow.chain_decoder(PixlabFile::new(
            in_file.to_os_string(),
            get_decoder_options(cmd_opts),
            cmd_opts.mmap
        ));

        add_operations(args, &mut workflow)?;

        match Path::new(out_file).extension() {
            Some(ext) if ImageFormat::from_extension(&ext.to_string_lossy()) == ImageFormat::Netpbm => {
                debug!("Treating {:?} as a netpbm file", out_file);
                workflow.chain_encoder(Box::new(PpmEncoder::new()));
            }
            _ => {
                return Err(ImageErrors::GenericString(format!(
                    "Unknown output format for {out_file:?}, expected a .ppm, .pgm or .pnm extension"
                )))
            }
        }

        workflow.advance_to_end()?;

        let encoded = workflow
            .encoded()
            .first()
            .ok_or(ImageErrors::NoImageForEncoding)?;

        let file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(out_file)?;

        let mut writer = BufWriter::new(file);
        writer.write_all(encoded.data())?;
        writer.flush()?;

        info!("Wrote {} bytes to {:?}", encoded.data().len(), out_file);

        if args.get_flag("stats") {
            let image = workflow
                .images()
                .first()
                .ok_or(ImageErrors::NoImageForOperations)?;

            print_stats(in_file, image)?;
        }
    }

    Ok(())
}

fn print_stats(file: &OsStr, image: &Image) -> Result<(), ImageErrors> {
    let histogram = ChannelHistogram::new();
    histogram.clone_and_execute(image)?;

    let stats = Stats {
        file:                   file.to_os_string(),
        colorspace:             image.colorspace(),
        histograms:             histogram.histograms(),
        var_abs_laplacian:      var_abs_laplacian(image)?,
        sum_modified_laplacian: sum_modified_laplacian(image)?,
        // hue is undefined for grayscale images
        dominant_hue:           dominant_hue(image, HUE_BINS, MIN_HUE_SATURATION)
            .ok()
            .flatten()
    };
    let json =
        serde_json::to_string_pretty(&stats).map_err(|e| ImageErrors::GenericString(e.to_string()))?;
    println!("{json}");

    Ok(())
}

fn verify_file_paths(p0: &OsStr, p1: &OsStr, options: &CmdOptions) -> Result<(), ImageErrors> {
    if p0 == p1 {
        return Err(ImageErrors::GenericString(format!(
            "Cannot use {p0:?} as both input and output"
        )));
    }
    let in_path = Path::new(p0);
    let out_path = Path::new(p1);

    if !in_path.exists() {
        return Err(ImageErrors::GenericString(format!(
            "Path {in_path:?}, does not exist"
        )));
    }

    if !in_path.is_file() {
        return Err(ImageErrors::GenericString(format!(
            "Path {in_path:?} is not a file"
        )));
    }

    if out_path.exists() {
        if options.override_files {
            info!("Overwriting path {:?} ", p1);
        } else {
            println!("File {out_path:?} exists, overwrite [y/N]");
            let mut result = String::new();

            stdin().lock().read_line(&mut result)?;

            if result.trim() != "y" {
                return Err(ImageErrors::GenericString(format!(
                    "Not overwriting file {out_path:?}"
                )));
            }
        }
    }
    Ok(())
}

/// Chain operations in the order they appear on the command line
pub fn add_operations<T: IntoImage>(
    args: &ArgMatches, workflow: &mut Pipeline<T>
) -> Result<(), ImageErrors> {
    for argument in fill_args(args) {
        operations::parse_options(workflow, &argument, args)?;
        filters::parse_options(workflow, &argument, args)?;
    }
    Ok(())
}
