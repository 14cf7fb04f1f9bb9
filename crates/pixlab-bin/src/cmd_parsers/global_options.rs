/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use clap::parser::ValueSource;
use clap::ArgMatches;
use log::{info, Level};

use crate::cmd_args::MmapOptions;

#[derive(Debug, Copy, Clone)]
pub struct CmdOptions {
    pub mmap:           MmapOptions,
    pub max_width:      usize,
    pub max_height:     usize,
    pub strict_mode:    bool,
    pub override_files: bool
}

impl CmdOptions {
    pub fn new() -> CmdOptions {
        CmdOptions {
            mmap:           MmapOptions::Auto,
            max_width:      0,
            max_height:     0,
            strict_mode:    false,
            override_files: false
        }
    }
}

pub fn parse_options(options: &ArgMatches) -> CmdOptions {
    let mut cmd_options = CmdOptions::new();

    if options.value_source("mmap") == Some(ValueSource::CommandLine) {
        if let Some(mmap) = options.get_one::<MmapOptions>("mmap") {
            info!("Setting mmap to be {:?}", mmap);
            cmd_options.mmap = *mmap;
        }
    }
    if let Some(width) = options.get_one::<usize>("max-width") {
        cmd_options.max_width = *width;
    }
    if let Some(height) = options.get_one::<usize>("max-height") {
        cmd_options.max_height = *height;
    }
    if options.get_flag("strict") {
        info!("Decoding in strict mode");
        cmd_options.strict_mode = true;
    }
    if options.get_flag("all-yes") {
        info!("Setting all commands to yes");
        cmd_options.override_files = true;
    }
    cmd_options
}

/// Set up logging options
pub fn setup_logger(options: &ArgMatches) {
    let log_level = if options.get_flag("debug") {
        Level::Debug
    } else if options.get_flag("trace") {
        Level::Trace
    } else if options.get_flag("info") {
        Level::Info
    } else {
        Level::Warn
    };

    if let Err(e) = simple_logger::init_with_level(log_level) {
        eprintln!("Could not initialize logger, {e}");
        return;
    }
    info!("Initialized logger");
    info!("Log level :{}", log_level);
}

#[cfg(test)]
mod tests {
    use crate::cmd_args::{create_cmd_args, MmapOptions};
    use crate::cmd_parsers::global_options::parse_options;

    #[test]
    fn defaults_and_overrides() {
        let matches = create_cmd_args()
            .try_get_matches_from(["pixlab", "-i", "a.ppm", "-o", "b.ppm"])
            .unwrap();
        let options = parse_options(&matches);
        assert_eq!(options.mmap, MmapOptions::Auto);
        assert_eq!(options.max_width, 65536);
        assert!(!options.override_files);

        let matches = create_cmd_args()
            .try_get_matches_from([
                "pixlab", "-i", "a.ppm", "-o", "b.ppm", "--mmap", "no", "--max-width", "10", "-y",
                "--strict"
            ])
            .unwrap();
        let options = parse_options(&matches);
        assert_eq!(options.mmap, MmapOptions::No);
        assert_eq!(options.max_width, 10);
        assert!(options.override_files && options.strict_mode);
    }
}
