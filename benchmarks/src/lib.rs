/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use nanorand::{Rng, WyRand};
use pixlab_core::colorspace::ColorSpace;
use pixlab_image::image::Image;

/// Width and height of the images benchmarks run on
pub const BENCH_SIZE: (usize, usize) = (1280, 720);

/// A noisy 8 bit image, the same for every run
pub fn sample_image(colorspace: ColorSpace) -> Image {
    let (width, height) = BENCH_SIZE;
    let mut pixels = vec![0_u8; width * height * colorspace.num_components()];

    WyRand::new_seed(0xdead_beef).fill(&mut pixels);

    Image::from_u8(&pixels, width, height, colorspace)
}

/// Size in bytes of [`sample_image`], used as bench throughput
pub fn sample_size(colorspace: ColorSpace) -> u64 {
    (BENCH_SIZE.0 * BENCH_SIZE.1 * colorspace.num_components()) as u64
}
