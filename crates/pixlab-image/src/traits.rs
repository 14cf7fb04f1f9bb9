/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Traits implemented by decoders, operations and encoders
use pixlab_core::bit_depth::{BitDepth, BitType};
use pixlab_core::colorspace::{ColorSpace, ALL_COLORSPACES};
use pixlab_core::log::trace;

use crate::errors::ImageErrors;
use crate::image::Image;

/// Encapsulates an image decoder.
///
/// All supported image decoders must implement this class
pub trait DecoderTrait {
    /// Decode the buffer the decoder was created with
    ///
    /// # Returns
    /// - OK(Image) -> The decoded image
    ///
    /// # Errors
    ///  - Any image decoding errors will be propagated to the caller.
    fn decode(&mut self) -> Result<Image, ImageErrors>;

    /// Get width and height of the image
    ///
    /// # Returns
    /// - Some(width,height)
    /// - None -> If image headers haven't been decoded and we can't extract
    ///  the width and height.
    fn dimensions(&self) -> Option<(usize, usize)>;

    /// Get the colorspace that the decoded pixels
    /// are stored in.
    fn out_colorspace(&self) -> ColorSpace;

    /// Get the name of the decoder
    fn name(&self) -> &'static str;
}

/// Anything that can be turned into an image
///
/// Used by the pipeline to accept either decoders or
/// ready made images
pub trait IntoImage {
    fn into_image(self) -> Result<Image, ImageErrors>;
}

impl IntoImage for Image {
    fn into_image(self) -> Result<Image, ImageErrors> {
        Ok(self)
    }
}

/// This encapsulates an image operation.
///
/// All operations that can be stored in a pipeline
/// need to implement this trait.
pub trait OperationsTrait {
    /// Get the name of this operation
    fn name(&self) -> &'static str;

    /// Execute the operation on the image, without any checks
    ///
    /// Call [`execute`](OperationsTrait::execute) instead, it confirms the
    /// image is something the operation can handle before calling this.
    fn execute_impl(&self, image: &mut Image) -> Result<(), ImageErrors>;

    /// Bit types this operation has an implementation for
    fn supported_types(&self) -> &'static [BitType];

    /// Colorspaces this operation can work on
    ///
    /// The default is every colorspace
    fn supported_colorspaces(&self) -> &'static [ColorSpace] {
        &ALL_COLORSPACES
    }

    /// Execute a simple operation on the image
    /// manipulating the image struct
    ///
    /// # Arguments
    /// - image: A mutable reference to an image which
    ///   this operation will manipulate
    ///
    /// # Errors
    /// - `EmptyImage` if the image holds no pixels
    /// - `ImageOperationNotImplemented` if the depth is unsupported
    /// - `UnsupportedColorspace` if the colorspace is unsupported
    /// - Any error from the operation itself
    fn execute(&self, image: &mut Image) -> Result<(), ImageErrors> {
        if image.is_empty() {
            return Err(ImageErrors::EmptyImage);
        }
        let depth = image.depth();

        if depth == BitDepth::Unknown || !self.supported_types().contains(&depth.bit_type()) {
            let bit_type = if depth == BitDepth::Unknown {
                BitType::U8
            } else {
                depth.bit_type()
            };
            return Err(ImageErrors::ImageOperationNotImplemented(
                self.name(),
                bit_type
            ));
        }
        let colorspace = image.colorspace();

        if !self.supported_colorspaces().contains(&colorspace) {
            return Err(ImageErrors::UnsupportedColorspace(
                colorspace,
                self.name(),
                self.supported_colorspaces()
            ));
        }
        image.validate()?;

        self.execute_impl(image)?;

        trace!("Validating image after {}", self.name());
        image.validate()
    }

    /// Run the operation on a copy of `image`, leaving it untouched
    fn clone_and_execute(&self, image: &Image) -> Result<Image, ImageErrors> {
        let mut new_img = image.clone();
        self.execute(&mut new_img)?;
        Ok(new_img)
    }
}

/// Encapsulates an image encoder
pub trait EncoderTrait {
    /// Get the name of the encoder
    fn name(&self) -> &'static str;

    /// Encode the image, returning encoded bytes
    ///
    /// # Errors
    /// Any encoding error is propagated to the caller
    fn encode(&mut self, image: &Image) -> Result<Vec<u8>, ImageErrors>;

    /// Colorspaces the encoder writes natively,
    /// anything else is converted before encoding
    fn supported_colorspaces(&self) -> &'static [ColorSpace];

    /// Depths the encoder writes natively
    fn supported_bit_depth(&self) -> &'static [BitDepth];
}
