/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use clap::parser::ValueSource;
use clap::ArgMatches;
use pixlab_core::options::DecoderOptions;

use crate::cmd_parsers::global_options::CmdOptions;

pub mod global_options;

pub mod filters;
pub mod operations;

/// Fill arguments into a Vec according to the
/// order which they were specified in the command line
pub fn fill_args(options: &ArgMatches) -> Vec<String> {
    let mut map = Vec::with_capacity(20);

    for id in options.ids() {
        if options.try_get_many::<clap::Id>(id.as_str()).is_ok() {
            // ignore groups
            continue;
        }
        if options.value_source(id.as_str()) != Some(ValueSource::CommandLine) {
            // ignore things not passed via command line
            continue;
        }
        map.push(id.to_string());
    }
    map
}

pub fn get_decoder_options(options: &CmdOptions) -> DecoderOptions {
    DecoderOptions::new_cmd()
        .set_max_height(options.max_height)
        .set_max_width(options.max_width)
        .set_strict_mode(options.strict_mode)
}

/// Value of an argument, the parsers only call this for arguments present on the command line
pub fn get_value<'a, T>(args: &'a ArgMatches, id: &str) -> Result<&'a T, String>
where
    T: std::any::Any + Clone + Send + Sync + 'static
{
    args.get_one::<T>(id)
        .ok_or_else(|| format!("Missing value for --{id}"))
}
