/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Entry point for all supported codecs the library understands
//!
//! Only the Netpbm family is supported, it is the interchange
//! format the command line reads and writes.
pub mod netpbm;

/// All supported image formats
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ImageFormat {
    /// Portable gray/pix map, P2, P3, P5 and P6
    Netpbm,
    /// Any unknown format
    Unknown
}

impl ImageFormat {
    /// Map a file extension to a format
    pub fn from_extension(ext: &str) -> ImageFormat {
        match ext.to_ascii_lowercase().as_str() {
            "ppm" | "pgm" | "pnm" | "pbm" => ImageFormat::Netpbm,
            _ => ImageFormat::Unknown
        }
    }
}

/// Guess the format of an image based on its magic bytes
///
/// Returns `None` when no supported format matches
pub fn guess_format(bytes: &[u8]) -> Option<ImageFormat> {
    match bytes {
        [b'P', b'2' | b'3' | b'5' | b'6', next, ..] if next.is_ascii_whitespace() => {
            Some(ImageFormat::Netpbm)
        }
        _ => None
    }
}

#[cfg(test)]
mod tests {
    use crate::codecs::{guess_format, ImageFormat};

    #[test]
    fn magic_bytes() {
        assert_eq!(guess_format(b"P6\n1 1\n255\n"), Some(ImageFormat::Netpbm));
        assert_eq!(guess_format(b"P5 1 1 255 "), Some(ImageFormat::Netpbm));
        assert_eq!(guess_format(b"P7\n"), None);
        assert_eq!(guess_format(b"\x89PNG"), None);
        assert_eq!(ImageFormat::from_extension("PGM"), ImageFormat::Netpbm);
    }
}
