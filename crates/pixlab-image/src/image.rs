/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! This module represents a single image, the raster buffer every
//! operation in the workspace manipulates.
//!
//! Pixels are stored planar, one [`Channel`] per color component,
//! so that most routines can be written against a plain `&[T]`.
//!
use std::path::Path;

use pixlab_core::bit_depth::{BitDepth, BitType};
use pixlab_core::colorspace::ColorSpace;
use pixlab_core::options::DecoderOptions;

use crate::channel::{Channel, ChannelType};
use crate::codecs::netpbm::{PpmDecoder, PpmEncoder};
use crate::codecs::{guess_format, ImageFormat};
use crate::core_filters::colorspace::ColorspaceConv;
use crate::core_filters::depth::Depth;
use crate::errors::{ImageErrors, ImageOperationsErrors};
use crate::traits::{DecoderTrait, EncoderTrait, OperationsTrait};

/// Represents a single image
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    channels:   Vec<Channel>,
    width:      usize,
    height:     usize,
    depth:      BitDepth,
    colorspace: ColorSpace
}

impl Image {
    /// Create a new image from planar channels
    ///
    /// No validation is carried out, see [`try_new`](Image::try_new)
    /// for a checked variant
    pub fn new(
        channels: Vec<Channel>, depth: BitDepth, width: usize, height: usize,
        colorspace: ColorSpace
    ) -> Image {
        Image {
            channels,
            width,
            height,
            depth,
            colorspace
        }
    }

    /// Create a new image confirming that the channels agree
    /// with the dimensions, depth and colorspace given
    pub fn try_new(
        channels: Vec<Channel>, depth: BitDepth, width: usize, height: usize,
        colorspace: ColorSpace
    ) -> Result<Image, ImageErrors> {
        let image = Image::new(channels, depth, width, height, colorspace);
        image.validate()?;
        Ok(image)
    }

    fn from_interleaved<T: ChannelType>(
        pixels: &[T], width: usize, height: usize, colorspace: ColorSpace
    ) -> Image {
        let components = colorspace.num_components();

        assert_eq!(
            pixels.len(),
            width * height * components,
            "Length mismatch, expected {}x{}x{}",
            width,
            height,
            components
        );
        let mut channels = vec![Vec::with_capacity(width * height); components];

        for pixel in pixels.chunks_exact(components) {
            for (channel, sample) in channels.iter_mut().zip(pixel) {
                channel.push(*sample);
            }
        }
        let channels = channels.into_iter().map(Channel::from_vec).collect();

        Image::new(channels, T::BIT_TYPE.to_depth(), width, height, colorspace)
    }

    /// Create an image from interleaved u8 pixels
    ///
    /// # Panics
    /// If `pixels.len()` is not `width*height*colorspace.num_components()`
    ///
    /// # Example
    /// ```
    /// use pixlab_core::colorspace::ColorSpace;
    /// use pixlab_image::image::Image;
    /// let image = Image::from_u8(&[0, 0, 255, 255, 0, 0], 2, 1, ColorSpace::BGR);
    /// assert_eq!(image.dimensions(), (2, 1));
    /// ```
    pub fn from_u8(pixels: &[u8], width: usize, height: usize, colorspace: ColorSpace) -> Image {
        Image::from_interleaved(pixels, width, height, colorspace)
    }

    /// Create an image from interleaved u16 pixels
    ///
    /// # Panics
    /// If `pixels.len()` is not `width*height*colorspace.num_components()`
    pub fn from_u16(
        pixels: &[u16], width: usize, height: usize, colorspace: ColorSpace
    ) -> Image {
        Image::from_interleaved(pixels, width, height, colorspace)
    }

    /// Create an image from interleaved f32 pixels
    ///
    /// # Panics
    /// If `pixels.len()` is not `width*height*colorspace.num_components()`
    pub fn from_f32(
        pixels: &[f32], width: usize, height: usize, colorspace: ColorSpace
    ) -> Image {
        Image::from_interleaved(pixels, width, height, colorspace)
    }

    /// Create an image where every sample is `pixel`
    pub fn fill<T: ChannelType>(
        pixel: T, colorspace: ColorSpace, width: usize, height: usize
    ) -> Image {
        let channels = (0..colorspace.num_components())
            .map(|_| Channel::from_elm(width * height, pixel))
            .collect();

        Image::new(channels, T::BIT_TYPE.to_depth(), width, height, colorspace)
    }

    /// Create an image by calling `func(x, y, pixel)` for every pixel,
    /// where pixel is a slice holding one sample per component
    ///
    /// # Example
    /// ```
    /// use pixlab_core::colorspace::ColorSpace;
    /// use pixlab_image::image::Image;
    /// // horizontal gradient
    /// let image = Image::from_fn::<u8, _>(256, 1, ColorSpace::Luma, |x, _, px| px[0] = x as u8);
    /// assert_eq!(image.channels_ref(false)[0].reinterpret_as::<u8>().unwrap()[255], 255);
    /// ```
    pub fn from_fn<T, F>(width: usize, height: usize, colorspace: ColorSpace, mut func: F) -> Image
    where
        T: ChannelType,
        F: FnMut(usize, usize, &mut [T])
    {
        let components = colorspace.num_components();
        let mut pixels = vec![T::default(); width * height * components];

        if pixels.is_empty() {
            return Image::fill(T::default(), colorspace, width, height);
        }
        for (y, row) in pixels.chunks_exact_mut(width * components).enumerate() {
            for (x, pixel) in row.chunks_exact_mut(components).enumerate() {
                func(x, y, pixel);
            }
        }
        Image::from_interleaved(&pixels, width, height, colorspace)
    }

    /// Get image dimensions as a tuple of (width,height)
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    /// Get the image depth of this image
    pub const fn depth(&self) -> BitDepth {
        self.depth
    }

    /// Set image depth
    ///
    /// This only changes the tag, channels must be converted by the caller
    pub fn set_depth(&mut self, depth: BitDepth) {
        self.depth = depth;
    }

    /// Get image colorspace
    pub const fn colorspace(&self) -> ColorSpace {
        self.colorspace
    }

    /// Set the image colorspace
    ///
    /// This only changes the tag, channels must be converted by the caller
    pub fn set_colorspace(&mut self, colorspace: ColorSpace) {
        self.colorspace = colorspace;
    }

    /// Set new image dimensions
    ///
    /// This only changes the tags, channels must be resized by the caller
    pub fn set_dimensions(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    /// Return true if the image holds no pixels
    ///
    /// This is the state of an image that failed to load
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.channels.is_empty()
    }

    /// Return a reference to the image channels
    ///
    /// # Arguments
    /// - ignore_alpha: If true, the alpha channel (if present) is left out
    pub fn channels_ref(&self, ignore_alpha: bool) -> &[Channel] {
        let end = self.channel_end(ignore_alpha);
        &self.channels[..end]
    }

    /// Return a mutable reference to the image channels
    ///
    /// # Arguments
    /// - ignore_alpha: If true, the alpha channel (if present) is left out
    pub fn channels_mut(&mut self, ignore_alpha: bool) -> &mut [Channel] {
        let end = self.channel_end(ignore_alpha);
        &mut self.channels[..end]
    }

    /// Return the vector holding the channels, for operations
    /// that add or remove channels
    pub fn channels_vec(&mut self) -> &mut Vec<Channel> {
        &mut self.channels
    }

    fn channel_end(&self, ignore_alpha: bool) -> usize {
        // alpha always sits at the end
        if ignore_alpha && self.colorspace.has_alpha() {
            self.channels.len().saturating_sub(1)
        } else {
            self.channels.len()
        }
    }

    /// Confirm the image invariants hold
    ///
    /// - The number of channels matches the colorspace
    /// - Every channel holds `width*height` samples
    /// - Every channel stores the type of the image depth
    pub fn validate(&self) -> Result<(), ImageErrors> {
        let expected = self.colorspace.num_components();

        if self.colorspace != ColorSpace::Unknown && self.channels.len() != expected {
            return Err(ImageOperationsErrors::WrongComponents(expected, self.channels.len()).into());
        }
        let size = self.width * self.height;

        for channel in &self.channels {
            if channel.len() != size {
                return Err(ImageErrors::DimensionsMisMatch(size, channel.len()));
            }
            if self.depth != BitDepth::Unknown && channel.bit_type() != self.depth.bit_type() {
                return Err(ImageErrors::GenericString(format!(
                    "Channel stores {:?} but image depth is {:?}",
                    channel.bit_type(),
                    self.depth
                )));
            }
        }
        Ok(())
    }

    /// Return interleaved pixels of type `T`
    ///
    /// # Errors
    /// If `T` is not the type the image stores
    pub fn flatten<T: ChannelType>(&self) -> Result<Vec<T>, ImageErrors> {
        let channels = self
            .channels
            .iter()
            .map(|c| c.reinterpret_as::<T>())
            .collect::<Result<Vec<&[T]>, _>>()?;

        let size = self.width * self.height;
        let mut out = Vec::with_capacity(size * channels.len());

        for i in 0..size {
            out.extend(channels.iter().map(|c| c[i]));
        }
        Ok(out)
    }

    /// Return interleaved 8 bit pixels, converting
    /// the depth if the image is not 8 bit
    pub fn flatten_to_u8(&self) -> Result<Vec<u8>, ImageErrors> {
        if self.depth == BitDepth::Eight {
            self.flatten::<u8>()
        } else {
            let mut image = self.clone();
            image.convert_depth(BitDepth::Eight)?;
            image.flatten::<u8>()
        }
    }

    /// Convert the image to a new bit depth
    pub fn convert_depth(&mut self, to: BitDepth) -> Result<(), ImageErrors> {
        Depth::new(to).execute(self)
    }

    /// Convert the image to a new colorspace
    ///
    /// See [`ColorspaceConv`] for the units each colorspace is stored in
    pub fn convert_color(&mut self, to: ColorSpace) -> Result<(), ImageErrors> {
        ColorspaceConv::new(to).execute(self)
    }

    /// Copy a `width*height` region whose top left corner is at `(x,y)`
    /// into a new image
    ///
    /// # Errors
    /// If the region does not lie inside the image
    pub fn crop(&self, x: usize, y: usize, width: usize, height: usize) -> Result<Image, ImageErrors> {
        if x + width > self.width || y + height > self.height {
            return Err(ImageOperationsErrors::InvalidParameter(format!(
                "Region {width}x{height} at ({x},{y}) is outside the {}x{} image",
                self.width, self.height
            ))
            .into());
        }
        let mut channels = Vec::with_capacity(self.channels.len());

        for channel in &self.channels {
            let new_channel = match self.depth.bit_type() {
                BitType::U8 => crop_plane::<u8>(channel, self.width, x, y, width, height)?,
                BitType::U16 => crop_plane::<u16>(channel, self.width, x, y, width, height)?,
                BitType::F32 => crop_plane::<f32>(channel, self.width, x, y, width, height)?
            };
            channels.push(new_channel);
        }
        Ok(Image::new(channels, self.depth, width, height, self.colorspace))
    }

    /// Write `src` into this image with its top left corner at `(x,y)`,
    /// clipping whatever falls outside.
    ///
    /// # Errors
    /// If the images differ in depth or colorspace
    pub fn paste(&mut self, src: &Image, x: usize, y: usize) -> Result<(), ImageErrors> {
        if src.colorspace != self.colorspace {
            return Err(
                ImageOperationsErrors::WrongColorspace(self.colorspace, src.colorspace).into()
            );
        }
        if src.depth != self.depth {
            return Err(ImageErrors::GenericString(format!(
                "Cannot paste a {:?} image into a {:?} image",
                src.depth, self.depth
            )));
        }
        let (width, height) = (self.width, self.height);

        for (dst, src_channel) in self.channels.iter_mut().zip(&src.channels) {
            match src.depth.bit_type() {
                BitType::U8 => paste_plane::<u8>(src_channel, src.width, dst, width, height, x, y)?,
                BitType::U16 => {
                    paste_plane::<u16>(src_channel, src.width, dst, width, height, x, y)?
                }
                BitType::F32 => {
                    paste_plane::<f32>(src_channel, src.width, dst, width, height, x, y)?
                }
            }
        }
        Ok(())
    }

    /// Decode an image already in memory
    pub fn read(data: &[u8], options: DecoderOptions) -> Result<Image, ImageErrors> {
        match guess_format(data) {
            Some(ImageFormat::Netpbm) => PpmDecoder::new_with_options(data, options).decode(),
            _ => Err(ImageErrors::ImageDecodeErrors(
                "Unknown or unsupported image format".to_string()
            ))
        }
    }

    /// Open and decode an image from a file path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Image, ImageErrors> {
        Image::open_with_options(path, DecoderOptions::default())
    }

    /// Open and decode an image from a file path with custom options
    pub fn open_with_options<P: AsRef<Path>>(
        path: P, options: DecoderOptions
    ) -> Result<Image, ImageErrors> {
        let data = std::fs::read(path)?;
        Image::read(&data, options)
    }

    /// Encode the image into the format `format`
    pub fn write_to_vec(&self, format: ImageFormat) -> Result<Vec<u8>, ImageErrors> {
        match format {
            ImageFormat::Netpbm => PpmEncoder::new().encode(self),
            ImageFormat::Unknown => Err(ImageErrors::GenericStr("Cannot encode to unknown format"))
        }
    }

    /// Encode and save the image, the format is chosen from the file extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ImageErrors> {
        let path = path.as_ref();
        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(ImageFormat::from_extension)
            .unwrap_or(ImageFormat::Unknown);

        if format == ImageFormat::Unknown {
            return Err(ImageErrors::GenericString(format!(
                "Cannot determine format to save {} in",
                path.display()
            )));
        }
        let data = self.write_to_vec(format)?;
        std::fs::write(path, data)?;
        Ok(())
    }
}

fn crop_plane<T: ChannelType>(
    channel: &Channel, stride: usize, x: usize, y: usize, width: usize, height: usize
) -> Result<Channel, ImageErrors> {
    let src = channel.reinterpret_as::<T>()?;
    let mut out = Vec::with_capacity(width * height);

    if stride == 0 {
        return Ok(Channel::from_vec(out));
    }

    for row in src.chunks_exact(stride).skip(y).take(height) {
        out.extend_from_slice(&row[x..x + width]);
    }
    Ok(Channel::from_vec(out))
}

fn paste_plane<T: ChannelType>(
    src: &Channel, src_width: usize, dst: &mut Channel, dst_width: usize, dst_height: usize,
    x: usize, y: usize
) -> Result<(), ImageErrors> {
    let src = src.reinterpret_as::<T>()?;
    let dst = dst.reinterpret_as_mut::<T>()?;

    if x >= dst_width || y >= dst_height || src_width == 0 {
        return Ok(());
    }
    let copy_width = src_width.min(dst_width - x);

    for (src_row, dst_row) in src
        .chunks_exact(src_width)
        .zip(dst.chunks_exact_mut(dst_width).skip(y))
    {
        dst_row[x..x + copy_width].copy_from_slice(&src_row[..copy_width]);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pixlab_core::bit_depth::BitDepth;
    use pixlab_core::colorspace::ColorSpace;

    use crate::channel::Channel;
    use crate::image::Image;

    #[test]
    fn interleave_round_trip() {
        let pixels: Vec<u8> = (0..24).collect();
        let image = Image::from_u8(&pixels, 4, 2, ColorSpace::RGB);

        assert_eq!(image.channels_ref(false)[1].reinterpret_as::<u8>().unwrap()[0], 1);
        assert_eq!(image.flatten::<u8>().unwrap(), pixels);
    }

    #[test]
    fn try_new_rejects_bad_lengths() {
        let channels = vec![Channel::new_with_length::<u8>(5)];
        assert!(Image::try_new(channels, BitDepth::Eight, 2, 2, ColorSpace::Luma).is_err());

        let channels = vec![Channel::new_with_length::<u16>(4)];
        assert!(Image::try_new(channels, BitDepth::Eight, 2, 2, ColorSpace::Luma).is_err());

        let channels = vec![Channel::new_with_length::<u8>(4)];
        assert!(Image::try_new(channels, BitDepth::Eight, 2, 2, ColorSpace::RGB).is_err());
    }

    #[test]
    fn ignore_alpha_hides_last_channel() {
        let mut image = Image::fill(1_u8, ColorSpace::BGRA, 2, 2);

        assert_eq!(image.channels_ref(true).len(), 3);
        assert_eq!(image.channels_mut(false).len(), 4);
    }

    #[test]
    fn crop_then_paste() {
        let image = Image::from_fn::<u8, _>(4, 4, ColorSpace::Luma, |x, y, px| {
            px[0] = (y * 4 + x) as u8;
        });
        let region = image.crop(1, 1, 2, 2).unwrap();

        assert_eq!(region.flatten::<u8>().unwrap(), vec![5, 6, 9, 10]);

        let mut blank = Image::fill(0_u8, ColorSpace::Luma, 4, 4);
        blank.paste(&region, 3, 3).unwrap();
        // only the top left sample fits
        assert_eq!(blank.flatten::<u8>().unwrap()[15], 5);
        assert!(image.crop(3, 3, 2, 2).is_err());
    }

    #[test]
    fn empty_image() {
        let image = Image::fill(0_u8, ColorSpace::RGB, 0, 10);
        assert!(image.is_empty());
    }
}
