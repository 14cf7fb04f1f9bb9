/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::ffi::OsString;
use std::fs::File;
use std::io::Read;

use log::info;
use memmap2::Mmap;
use pixlab_core::options::DecoderOptions;
use pixlab_image::errors::ImageErrors;
use pixlab_image::image::Image;
use pixlab_image::traits::IntoImage;

use crate::cmd_args::MmapOptions;

/// Files at least this large are memory mapped when mmap is `auto`
const AUTO_MMAP_SIZE: u64 = 1 << 20;

pub struct PixlabFile {
    file_path: OsString,
    options:   DecoderOptions,
    mmap:      MmapOptions
}

impl PixlabFile {
    pub fn new(file_path: OsString, options: DecoderOptions, mmap: MmapOptions) -> PixlabFile {
        PixlabFile {
            file_path,
            options,
            mmap
        }
    }
}

impl IntoImage for PixlabFile {
    fn into_image(self) -> Result<Image, ImageErrors> {
        let mut fd = File::open(&self.file_path)?;
        let size = fd.metadata()?.len();

        let use_mmap = match self.mmap {
            MmapOptions::No => false,
            MmapOptions::Always => true,
            MmapOptions::Auto => size >= AUTO_MMAP_SIZE
        };
        if use_mmap {
            info!("Reading {:?} via memory maps", self.file_path);
            // SAFETY: the map is only read while decoding and dropped right after
            let mmap = unsafe { Mmap::map(&fd)? };

            Image::read(&mmap, self.options)
        } else {
            info!("Reading {:?} to memory", self.file_path);
            let mut buf = Vec::with_capacity(size as usize);
            fd.read_to_end(&mut buf)?;

            Image::read(&buf, self.options)
        }
    }
}
