/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Spatial operations on images
//!
//! spatial goes through each pixel on an image collecting its neighbors and picking one
//! based on the function provided.
//!
//! The parameter radius corresponds to the radius of the neighbor area to be searched,
//! for example a radius of R will result in a search window length of 2R+1 for each dimension.
//!
//! Both functions expect input that was already padded by `radius` on every side,
//! see [`pad`](crate::pad::pad).

/// Run `function` over every `(2*radius+1)^2` window of a padded image
///
/// # Arguments
/// - in_channel: Padded input, `(width + 2*radius) * (height + 2*radius)` long
/// - out_channel: Output, `width * height` long
/// - radius: Window radius
/// - function: Called with the window, row by row
pub fn spatial<T, F>(
    in_channel: &[T], out_channel: &mut [T], radius: usize, width: usize, height: usize,
    function: F
) where
    T: Default + Copy,
    F: Fn(&mut [T]) -> T
{
    let old_width = width;
    let height = (radius * 2) + height;
    let width = (radius * 2) + width;

    let radius_size = (2 * radius) + 1;

    let mut local_storage = vec![T::default(); radius_size * radius_size];

    for y in radius..height - radius {
        for x in radius..width - radius {
            let iy = y - radius;
            let ix = x - radius;

            let mut i = 0;

            for ky in 0..radius_size {
                let iy_i = iy + ky;

                let in_slice = &in_channel[(iy_i * width) + ix..(iy_i * width) + ix + radius_size];
                local_storage[i..i + radius_size].copy_from_slice(in_slice);

                i += radius_size;
            }
            let result = function(&mut local_storage);

            out_channel[iy * old_width + ix] = result;
        }
    }
}

/// A specialized spatial function for fixed window sizes
///
/// `OUT_SIZE` must be `(2*RADIUS+1)^2`, the window is handed over
/// as an array so the compiler can unroll the callback.
#[allow(non_snake_case)]
pub fn spatial_NxN<T, F, const RADIUS: usize, const OUT_SIZE: usize>(
    in_channel: &[T], out_channel: &mut [T], width: usize, height: usize, function: F
) where
    T: Default + Copy,
    F: Fn(&[T; OUT_SIZE]) -> T
{
    let old_width = width;
    let height = (RADIUS * 2) + height;
    let width = (RADIUS * 2) + width;

    assert_eq!(OUT_SIZE, (2 * RADIUS + 1) * (2 * RADIUS + 1));

    let radius_size = (2 * RADIUS) + 1;

    let mut local_storage = [T::default(); OUT_SIZE];

    for y in RADIUS..height - RADIUS {
        for x in RADIUS..width - RADIUS {
            let iy = y - RADIUS;
            let ix = x - RADIUS;

            let mut i = 0;

            for ky in 0..radius_size {
                let iy_i = iy + ky;

                let in_slice = &in_channel[(iy_i * width) + ix..(iy_i * width) + ix + radius_size];
                local_storage[i..i + radius_size].copy_from_slice(in_slice);

                i += radius_size;
            }
            out_channel[iy * old_width + ix] = function(&local_storage);
        }
    }
}
