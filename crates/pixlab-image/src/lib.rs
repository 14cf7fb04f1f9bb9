/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! An image library for the pixlab tools
//!
//! It provides the raster buffer ([`Image`](image::Image)) every routine
//! manipulates, the errors and traits shared by operations, the reference
//! colorspace and depth conversions and a netpbm decoder and encoder.
//!
//! # Features
//! - `log`: Emit log statements through the `log` crate
//! - `serde-support`: Serialize image metadata
pub mod channel;
pub mod codecs;
pub mod core_filters;
pub mod errors;
pub mod image;
pub mod pipelines;
mod serde;
pub mod traits;
