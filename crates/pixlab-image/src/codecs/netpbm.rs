/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Netpbm decoding and encoding
//!
//! The decoder understands P2, P3 (ascii) and P5, P6 (binary) files
//! with max values up to 65535, the encoder writes P5 and P6.
//!
//! Sixteen bit samples are stored big endian, as netpbm requires.
use std::fmt::{Debug, Formatter};

use pixlab_core::bit_depth::{BitDepth, BitType};
use pixlab_core::colorspace::ColorSpace;
use pixlab_core::log::{info, warn};
use pixlab_core::options::DecoderOptions;

use crate::channel::Channel;
use crate::errors::{ImageErrors, ImgEncodeErrors};
use crate::image::Image;
use crate::traits::{DecoderTrait, EncoderTrait, IntoImage};

pub enum PpmDecodeErrors {
    Generic(String),
    GenericStatic(&'static str),
    InvalidHeader(String),
    /// Contains (limit, found)
    LargeDimensions(usize, usize),
    /// Contains (expected, found)
    NotEnoughData(usize, usize),
    /// Width or height in the header is zero
    ZeroDimensions
}

impl Debug for PpmDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Generic(val) => writeln!(f, "{val}"),
            Self::GenericStatic(val) => writeln!(f, "{val}"),
            Self::InvalidHeader(val) => {
                writeln!(f, "Invalid header, reason: {val}")
            }
            Self::LargeDimensions(expected, found) => {
                writeln!(
                    f,
                    "Too large dimensions, expected a value less than {expected} but found {found}"
                )
            }
            Self::NotEnoughData(expected, found) => {
                writeln!(f, "Expected {expected} samples but found {found}")
            }
            Self::ZeroDimensions => writeln!(f, "Image has zero width or height")
        }
    }
}

/// A small cursor over the input
struct ByteReader<'a> {
    data:     &'a [u8],
    position: usize
}

impl<'a> ByteReader<'a> {
    fn new(data: &'a [u8]) -> ByteReader<'a> {
        ByteReader { data, position: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.data.get(self.position).copied()
    }

    fn get_u8(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.position += 1;
        Some(byte)
    }

    fn remaining(&self) -> &'a [u8] {
        &self.data[self.position.min(self.data.len())..]
    }

    /// Skip all whitespace characters and comments
    /// until one hits a character that isn't a space or
    /// we reach eof
    fn skip_spaces(&mut self) {
        while let Some(byte) = self.peek() {
            if byte == b'#' {
                // skip the whole comment
                while let Some(byte) = self.get_u8() {
                    if byte == b'\n' {
                        break;
                    }
                }
            } else if byte.is_ascii_whitespace() {
                self.position += 1;
            } else {
                break;
            }
        }
    }

    /// Read an unsigned ascii integer, skipping leading whitespace and comments
    fn get_integer(&mut self) -> Option<usize> {
        self.skip_spaces();

        let mut value = 0_usize;
        let mut digits = 0;

        while let Some(byte) = self.peek() {
            if !byte.is_ascii_digit() {
                break;
            }
            value = value
                .checked_mul(10)?
                .checked_add(usize::from(byte - b'0'))?;
            digits += 1;
            self.position += 1;
        }
        (digits > 0).then_some(value)
    }
}

/// An instance of a PPM decoder
pub struct PpmDecoder<'a> {
    width:           usize,
    height:          usize,
    max_value:       usize,
    ascii:           bool,
    decoded_headers: bool,
    reader:          ByteReader<'a>,
    colorspace:      ColorSpace,
    bit_depth:       BitDepth,
    options:         DecoderOptions
}

impl<'a> PpmDecoder<'a> {
    /// Create a new ppm decoder with default options
    ///
    /// # Example
    /// ```
    /// use pixlab_image::codecs::netpbm::PpmDecoder;
    /// use pixlab_image::traits::DecoderTrait;
    /// let mut decoder = PpmDecoder::new(b"NOT VALID PPM");
    ///
    /// assert!(decoder.decode().is_err());
    /// ```
    pub fn new(data: &'a [u8]) -> PpmDecoder<'a> {
        PpmDecoder::new_with_options(data, DecoderOptions::default())
    }

    /// Create a new PPM decoder with the specified options
    pub fn new_with_options(data: &'a [u8], options: DecoderOptions) -> PpmDecoder<'a> {
        PpmDecoder {
            width: 0,
            height: 0,
            max_value: 255,
            ascii: false,
            decoded_headers: false,
            reader: ByteReader::new(data),
            colorspace: ColorSpace::Unknown,
            bit_depth: BitDepth::Eight,
            options
        }
    }

    /// Read PPM headers and store them in internal state
    pub fn decode_headers(&mut self) -> Result<(), PpmDecodeErrors> {
        if self.decoded_headers {
            return Ok(());
        }
        let (p, version) = match (self.reader.get_u8(), self.reader.get_u8()) {
            (Some(p), Some(version)) => (p, version),
            _ => return Err(PpmDecodeErrors::GenericStatic("Not enough bytes for a header"))
        };
        if p != b'P' {
            let msg = format!("Expected P as first PPM byte but got '{}'", p as char);
            return Err(PpmDecodeErrors::InvalidHeader(msg));
        }
        let (colorspace, ascii) = match version {
            b'2' => (ColorSpace::Luma, true),
            b'3' => (ColorSpace::RGB, true),
            b'5' => (ColorSpace::Luma, false),
            b'6' => (ColorSpace::RGB, false),
            _ => {
                let msg = format!("Unsupported netpbm version P{}", version as char);
                return Err(PpmDecodeErrors::InvalidHeader(msg));
            }
        };
        let width = self
            .reader
            .get_integer()
            .ok_or(PpmDecodeErrors::GenericStatic("Could not read width"))?;

        if width > self.options.max_width() {
            return Err(PpmDecodeErrors::LargeDimensions(
                self.options.max_width(),
                width
            ));
        }
        let height = self
            .reader
            .get_integer()
            .ok_or(PpmDecodeErrors::GenericStatic("Could not read height"))?;

        if height > self.options.max_height() {
            return Err(PpmDecodeErrors::LargeDimensions(
                self.options.max_height(),
                height
            ));
        }
        if width == 0 || height == 0 {
            return Err(PpmDecodeErrors::ZeroDimensions);
        }
        let max_value = self
            .reader
            .get_integer()
            .ok_or(PpmDecodeErrors::GenericStatic("Could not read max value"))?;

        if max_value == 0 || max_value > usize::from(u16::MAX) {
            let msg = format!("Max value {max_value} not in range 1..=65535");
            return Err(PpmDecodeErrors::InvalidHeader(msg));
        }
        // exactly one whitespace separates the header from binary data
        if !ascii && !self.reader.get_u8().is_some_and(|x| x.is_ascii_whitespace()) {
            return Err(PpmDecodeErrors::InvalidHeader(
                "Expected whitespace after max value".to_string()
            ));
        }
        self.width = width;
        self.height = height;
        self.max_value = max_value;
        self.ascii = ascii;
        self.colorspace = colorspace;
        self.bit_depth = if max_value > 255 {
            BitDepth::Sixteen
        } else {
            BitDepth::Eight
        };
        self.decoded_headers = true;

        info!("Width: {}, height: {}", self.width, self.height);
        info!("Colorspace: {:?}", self.colorspace);
        info!("Depth: {:?}", self.bit_depth);

        Ok(())
    }

    /// Return the image bit depth or none if headers
    /// are not decoded
    pub const fn bit_depth(&self) -> Option<BitDepth> {
        if self.decoded_headers {
            Some(self.bit_depth)
        } else {
            None
        }
    }

    fn read_samples(&mut self) -> Result<Vec<u16>, PpmDecodeErrors> {
        let count = self
            .width
            .checked_mul(self.height)
            .and_then(|x| x.checked_mul(self.colorspace.num_components()))
            .ok_or(PpmDecodeErrors::GenericStatic("Image dimensions overflow"))?;

        let available = if self.ascii {
            // at least one byte per sample
            self.reader.remaining().len()
        } else {
            self.reader.remaining().len() / self.bit_depth.size_of()
        };
        if !self.ascii && available < count && self.options.strict_mode() {
            return Err(PpmDecodeErrors::NotEnoughData(count, available));
        }
        let mut samples = Vec::with_capacity(count.min(available));

        if self.ascii {
            while samples.len() < count {
                match self.reader.get_integer() {
                    Some(value) => samples.push(value.min(self.max_value) as u16),
                    None => break
                }
            }
        } else if self.bit_depth == BitDepth::Eight {
            let remaining = self.reader.remaining();
            samples.extend(remaining.iter().take(count).map(|x| u16::from(*x)));
        } else {
            let remaining = self.reader.remaining();
            samples.extend(
                remaining
                    .chunks_exact(2)
                    .take(count)
                    .map(|x| u16::from_be_bytes([x[0], x[1]]))
            );
        }
        if samples.len() < count {
            if self.options.strict_mode() {
                return Err(PpmDecodeErrors::NotEnoughData(count, samples.len()));
            }
            warn!(
                "Expected {} samples but found {}, padding with zeroes",
                count,
                samples.len()
            );
            samples.resize(count, 0);
        }
        Ok(samples)
    }

    fn decode_image(&mut self) -> Result<Image, PpmDecodeErrors> {
        self.decode_headers()?;

        let samples = self.read_samples()?;
        let components = self.colorspace.num_components();
        let size = self.width * self.height;
        let full_scale = usize::from(self.bit_depth.max_value());
        let max_value = self.max_value;

        let rescale = |x: u16| -> u16 {
            let x = usize::from(x).min(max_value);
            if max_value == full_scale {
                x as u16
            } else {
                ((x * full_scale + max_value / 2) / max_value) as u16
            }
        };

        let mut channels = Vec::with_capacity(components);

        for component in 0..components {
            let plane = samples.iter().skip(component).step_by(components).take(size);

            let channel = match self.bit_depth.bit_type() {
                BitType::U8 => Channel::from_vec(plane.map(|x| rescale(*x) as u8).collect()),
                _ => Channel::from_vec(plane.map(|x| rescale(*x)).collect::<Vec<u16>>())
            };
            channels.push(channel);
        }
        let mut colorspace = self.colorspace;

        if colorspace == ColorSpace::RGB && self.options.out_colorspace() == ColorSpace::BGR {
            channels.swap(0, 2);
            colorspace = ColorSpace::BGR;
        }
        Ok(Image::new(
            channels,
            self.bit_depth,
            self.width,
            self.height,
            colorspace
        ))
    }
}

impl<'a> DecoderTrait for PpmDecoder<'a> {
    fn decode(&mut self) -> Result<Image, ImageErrors> {
        Ok(self.decode_image()?)
    }

    fn dimensions(&self) -> Option<(usize, usize)> {
        if self.decoded_headers {
            Some((self.width, self.height))
        } else {
            None
        }
    }

    fn out_colorspace(&self) -> ColorSpace {
        if self.colorspace == ColorSpace::RGB && self.options.out_colorspace() == ColorSpace::BGR {
            return ColorSpace::BGR;
        }
        self.colorspace
    }

    fn name(&self) -> &'static str {
        "PPM Decoder"
    }
}

impl<'a> IntoImage for PpmDecoder<'a> {
    fn into_image(mut self) -> Result<Image, ImageErrors> {
        self.decode()
    }
}

/// Netpbm encoder
///
/// Grayscale images are written as P5, everything else is
/// converted to RGB and written as P6.
#[derive(Default)]
pub struct PpmEncoder;

impl PpmEncoder {
    pub fn new() -> PpmEncoder {
        PpmEncoder
    }
}

impl EncoderTrait for PpmEncoder {
    fn name(&self) -> &'static str {
        "PPM Encoder"
    }

    fn encode(&mut self, image: &Image) -> Result<Vec<u8>, ImageErrors> {
        if image.is_empty() {
            return Err(ImageErrors::EmptyImage);
        }
        let mut image = image.clone();

        let target = if image.colorspace().is_grayscale() {
            ColorSpace::Luma
        } else {
            ColorSpace::RGB
        };
        if image.depth() == BitDepth::Float32 {
            image.convert_depth(BitDepth::Eight)?;
        }
        if image.colorspace() != target {
            info!("Converting {:?} to {:?} for encoding", image.colorspace(), target);
            image.convert_color(target)?;
        }
        let version = match target {
            ColorSpace::Luma => "P5",
            ColorSpace::RGB => "P6",
            found => {
                return Err(ImgEncodeErrors::UnsupportedColorspace(
                    found,
                    self.supported_colorspaces()
                )
                .into())
            }
        };
        let (width, height) = image.dimensions();
        let header = format!(
            "{version}\n{width} {height}\n{}\n",
            image.depth().max_value()
        );
        let mut out = header.into_bytes();

        match image.depth().bit_type() {
            BitType::U8 => out.extend(image.flatten::<u8>()?),
            BitType::U16 => {
                for sample in image.flatten::<u16>()? {
                    out.extend_from_slice(&sample.to_be_bytes());
                }
            }
            BitType::F32 => {
                return Err(ImgEncodeErrors::Generic(
                    "Float images should have been converted".to_string()
                )
                .into())
            }
        }
        Ok(out)
    }

    fn supported_colorspaces(&self) -> &'static [ColorSpace] {
        &[ColorSpace::Luma, ColorSpace::RGB]
    }

    fn supported_bit_depth(&self) -> &'static [BitDepth] {
        &[BitDepth::Eight, BitDepth::Sixteen]
    }
}
