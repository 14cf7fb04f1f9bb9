/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Pipelines, batch image processing support
//!
use std::time::Instant;

use pixlab_core::log::{debug, trace};

use crate::errors::ImageErrors;
use crate::image::Image;
use crate::traits::{EncoderTrait, IntoImage, OperationsTrait};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum PipelineState {
    /// Initial state, the struct has been defined
    Initialized,
    /// The pipeline is ready to carry out image decoding
    Decode,
    /// The pipeline is ready to carry out image processing routines
    Operations,
    /// The pipeline is ready to carry out image encoding
    Encode,
    /// The pipeline is done.
    Finished
}

impl PipelineState {
    pub fn next(self) -> Option<Self> {
        match self {
            PipelineState::Initialized => Some(PipelineState::Decode),
            PipelineState::Decode => Some(PipelineState::Operations),
            PipelineState::Operations => Some(PipelineState::Encode),
            PipelineState::Encode => Some(PipelineState::Finished),
            PipelineState::Finished => None
        }
    }
}

/// The result of running one encoder over one image
pub struct EncodeResult {
    encoder: &'static str,
    data:    Vec<u8>
}

impl EncodeResult {
    /// Return the raw encoded bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Name of the encoder that produced this result
    pub fn encoder(&self) -> &'static str {
        self.encoder
    }
}

/// Pipeline, batch image processing
///
/// A pipeline loads an image (from a decoder or directly), applies every
/// chained operation in order and then runs every chained encoder.
///
/// Each stage is timed and reported at debug level.
pub struct Pipeline<T: IntoImage> {
    state:      Option<PipelineState>,
    decode:     Option<T>,
    image:      Vec<Image>,
    operations: Vec<Box<dyn OperationsTrait>>,
    encoders:   Vec<Box<dyn EncoderTrait>>,
    encoded:    Vec<EncodeResult>
}

impl<T> Pipeline<T>
where
    T: IntoImage
{
    /// Create a new, empty pipeline
    #[allow(clippy::new_without_default)]
    pub fn new() -> Pipeline<T> {
        Pipeline {
            image:      vec![],
            state:      Some(PipelineState::Initialized),
            decode:     None,
            operations: vec![],
            encoders:   vec![],
            encoded:    vec![]
        }
    }

    /// Add an image to this chain.
    pub fn chain_image(&mut self, image: Image) -> &mut Pipeline<T> {
        self.image.push(image);
        self
    }

    /// Override the decoder present in the pipeline with a different
    /// decoder.
    ///
    /// There can only be one decoder in a pipeline, so the last decoder
    /// is the one that will be considered.
    pub fn chain_decoder(&mut self, decoder: T) -> &mut Pipeline<T> {
        self.decode = Some(decoder);
        self
    }

    /// Add a new operation to the pipeline.
    ///
    /// Operations run in the order they were added
    ///
    /// # Example
    /// ```
    /// use pixlab_core::colorspace::ColorSpace;
    /// use pixlab_core::bit_depth::BitDepth;
    /// use pixlab_image::core_filters::colorspace::ColorspaceConv;
    /// use pixlab_image::core_filters::depth::Depth;
    /// use pixlab_image::image::Image;
    /// use pixlab_image::pipelines::Pipeline;
    ///
    /// let mut pipeline = Pipeline::<Image>::new();
    /// pipeline
    ///     .chain_image(Image::fill(128_u8, ColorSpace::BGR, 4, 4))
    ///     .chain_operations(Box::new(ColorspaceConv::new(ColorSpace::Luma)))
    ///     .chain_operations(Box::new(Depth::new(BitDepth::Float32)));
    ///
    /// pipeline.advance_to_end().unwrap();
    /// assert_eq!(pipeline.images()[0].colorspace(), ColorSpace::Luma);
    /// ```
    pub fn chain_operations(&mut self, operations: Box<dyn OperationsTrait>) -> &mut Pipeline<T> {
        self.operations.push(operations);
        self
    }

    /// Add an encoder, each image is encoded by every encoder
    pub fn chain_encoder(&mut self, encoder: Box<dyn EncoderTrait>) -> &mut Pipeline<T> {
        self.encoders.push(encoder);
        self
    }

    pub fn images(&self) -> &[Image] {
        self.image.as_ref()
    }

    /// Return all images in the pipeline as mutable references
    pub fn images_mut(&mut self) -> &mut [Image] {
        self.image.as_mut()
    }

    /// Results of the encode stage, one per image per encoder
    pub fn encoded(&self) -> &[EncodeResult] {
        &self.encoded
    }

    /// Advance the pipeline one state forward
    ///
    /// The pipeline advance is as follows
    ///
    /// 1. Decode
    /// 2. One or more operations [ all ran at once]
    /// 3. One or more encodes [all ran at once]
    /// 4. Finish
    pub fn advance(&mut self) -> Result<(), ImageErrors> {
        let state = match self.state {
            Some(state) => state,
            None => return Ok(())
        };
        match state {
            PipelineState::Decode => {
                if let Some(decoder) = self.decode.take() {
                    trace!("Current state: {:?}", state);
                    let start = Instant::now();

                    self.image.push(decoder.into_image()?);

                    debug!("Finished decoding in {} ms", start.elapsed().as_millis());
                } else if self.image.is_empty() {
                    return Err(ImageErrors::NoImageForOperations);
                } else {
                    trace!("Image already present, no need to decode");
                }
            }
            PipelineState::Operations => {
                if self.image.is_empty() {
                    return Err(ImageErrors::NoImageForOperations);
                }
                trace!("Current state: {:?}", state);

                for image in self.image.iter_mut() {
                    for operation in &self.operations {
                        let operation_name = operation.name();

                        trace!("Running {}", operation_name);

                        let start = Instant::now();

                        operation.execute(image)?;

                        debug!(
                            "Finished running `{operation_name}` in {} ms",
                            start.elapsed().as_millis()
                        );
                    }
                }
            }
            PipelineState::Encode => {
                if !self.encoders.is_empty() && self.image.is_empty() {
                    return Err(ImageErrors::NoImageForEncoding);
                }
                for image in &self.image {
                    for encoder in self.encoders.iter_mut() {
                        let start = Instant::now();
                        let data = encoder.encode(image)?;

                        debug!(
                            "Finished encoding with `{}` in {} ms",
                            encoder.name(),
                            start.elapsed().as_millis()
                        );
                        self.encoded.push(EncodeResult {
                            encoder: encoder.name(),
                            data
                        });
                    }
                }
            }
            PipelineState::Initialized => (),
            PipelineState::Finished => {
                trace!("Finished operations for this pipeline");
            }
        }
        self.state = state.next();
        Ok(())
    }

    /// Advance the operations in this pipeline up until
    /// we finish.
    ///
    /// This will run a decoder, all operations and all encoders
    /// for this particular pipeline
    pub fn advance_to_end(&mut self) -> Result<(), ImageErrors> {
        while self.state.is_some() {
            self.advance()?;
        }
        Ok(())
    }
}
