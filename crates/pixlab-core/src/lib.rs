/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Core routines shared by the pixlab crates
//!
//! It currently contains
//!
//! - Colorspace and bit depth information shared by images
//! - Image decoder options
//! - Logging macros that compile away when the `log` feature is off
//!
//! # Features
//!  - `log`: Route the logging macros to the `log` crate.
//!
//!  - `serde`: Enables serializing of some of the data structures
//!     present in the crate
//!
#![macro_use]

pub mod bit_depth;
pub mod colorspace;
pub mod log;
pub mod options;
mod serde;
