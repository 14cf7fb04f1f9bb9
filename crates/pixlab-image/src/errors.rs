/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors possible during image processing
use std::fmt::{Debug, Display, Formatter};

use pixlab_core::bit_depth::BitType;
use pixlab_core::colorspace::ColorSpace;

use crate::channel::ChannelErrors;
use crate::codecs::netpbm::PpmDecodeErrors;

/// All possible image errors that can occur.
///
/// This is the grandfather of image errors and contains
/// all decoding, processing and encoding errors possible
pub enum ImageErrors {
    /// The image has no pixels, e.g it failed to load
    EmptyImage,
    /// Channel lengths or counts do not match the image dimensions
    DimensionsMisMatch(usize, usize),
    /// The image colorspace is not supported by an operation,
    /// contains the colorspace found, the operation name and the supported colorspaces
    UnsupportedColorspace(ColorSpace, &'static str, &'static [ColorSpace]),
    /// The operation has no implementation for this depth
    ImageOperationNotImplemented(&'static str, BitType),
    ChannelErrors(ChannelErrors),
    OperationsError(ImageOperationsErrors),
    ImageDecodeErrors(String),
    EncodeErrors(ImgEncodeErrors),
    IoErrors(std::io::Error),
    NoImageForOperations,
    NoImageForEncoding,
    GenericString(String),
    GenericStr(&'static str)
}

/// Errors that may occur during image operations
pub enum ImageOperationsErrors {
    /// The colorspace is wrong, contains (expected, found)
    WrongColorspace(ColorSpace, ColorSpace),
    /// Wrong number of components, contains (expected, found)
    WrongComponents(usize, usize),
    /// A parameter of the operation is out of range
    InvalidParameter(String),
    Generic(&'static str)
}

/// Errors that may occur during image encoding
pub enum ImgEncodeErrors {
    Generic(String),
    UnsupportedColorspace(ColorSpace, &'static [ColorSpace])
}

impl Debug for ImageErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyImage => {
                writeln!(f, "Image is empty, it may have failed to load")
            }
            Self::DimensionsMisMatch(expected, found) => {
                writeln!(
                    f,
                    "Dimensions mismatch, expected {expected} but found {found}"
                )
            }
            Self::UnsupportedColorspace(present, operation, supported) => {
                writeln!(
                    f,
                    "Unsupported colorspace {present:?}, for the operation {operation}\nSupported colorspaces are {supported:?}"
                )
            }
            Self::ImageOperationNotImplemented(operation, depth) => {
                writeln!(
                    f,
                    "Image operation {operation} not implemented for depth {depth:?}"
                )
            }
            Self::ChannelErrors(err) => writeln!(f, "{err:?}"),
            Self::OperationsError(err) => writeln!(f, "{err:?}"),
            Self::ImageDecodeErrors(err) => writeln!(f, "{err}"),
            Self::EncodeErrors(err) => writeln!(f, "{err:?}"),
            Self::IoErrors(err) => writeln!(f, "{err}"),
            Self::NoImageForOperations => {
                writeln!(f, "No image found for which we can execute operations")
            }
            Self::NoImageForEncoding => {
                writeln!(f, "No image found for which we can encode")
            }
            Self::GenericString(err) => writeln!(f, "{err}"),
            Self::GenericStr(err) => writeln!(f, "{err}")
        }
    }
}

impl Debug for ImageOperationsErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WrongColorspace(expected, found) => {
                writeln!(
                    f,
                    "Expected {expected:?} colorspace but found {found:?}"
                )
            }
            Self::WrongComponents(expected, found) => {
                writeln!(
                    f,
                    "Expected {expected} components but found {found}"
                )
            }
            Self::InvalidParameter(reason) => writeln!(f, "Invalid parameter: {reason}"),
            Self::Generic(reason) => writeln!(f, "{reason}")
        }
    }
}

impl Debug for ImgEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Generic(reason) => writeln!(f, "{reason}"),
            Self::UnsupportedColorspace(found, supported) => {
                writeln!(
                    f,
                    "Cannot encode image with colorspace {found:?} into desired format, encoder supports {supported:?}"
                )
            }
        }
    }
}

impl Display for ImageErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{self:?}")
    }
}

impl Display for ImageOperationsErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{self:?}")
    }
}

impl Display for ImgEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{self:?}")
    }
}

impl std::error::Error for ImageErrors {}

impl std::error::Error for ImageOperationsErrors {}

impl std::error::Error for ImgEncodeErrors {}

impl From<ImageOperationsErrors> for ImageErrors {
    fn from(from: ImageOperationsErrors) -> Self {
        ImageErrors::OperationsError(from)
    }
}

impl From<ImgEncodeErrors> for ImageErrors {
    fn from(from: ImgEncodeErrors) -> Self {
        ImageErrors::EncodeErrors(from)
    }
}

impl From<ChannelErrors> for ImageErrors {
    fn from(from: ChannelErrors) -> Self {
        ImageErrors::ChannelErrors(from)
    }
}

impl From<std::io::Error> for ImageErrors {
    fn from(from: std::io::Error) -> Self {
        ImageErrors::IoErrors(from)
    }
}

impl From<PpmDecodeErrors> for ImageErrors {
    fn from(from: PpmDecodeErrors) -> Self {
        if matches!(from, PpmDecodeErrors::ZeroDimensions) {
            return ImageErrors::EmptyImage;
        }
        ImageErrors::ImageDecodeErrors(format!("ppm: {from:?}"))
    }
}

impl From<String> for ImageErrors {
    fn from(from: String) -> Self {
        ImageErrors::GenericString(from)
    }
}

impl From<&'static str> for ImageErrors {
    fn from(from: &'static str) -> Self {
        ImageErrors::GenericStr(from)
    }
}
