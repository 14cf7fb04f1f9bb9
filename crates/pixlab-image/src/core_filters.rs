/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Core filters required by the image itself
//!
//! These are conversions every other operation leans on, bit depth
//! changes and colorspace changes, and thus live next to the image.
pub mod colorspace;
pub mod depth;
