/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Image bit depth, information and manipulations

/// The image bit depth.
///
/// Each depth is paired with a native storage type, see [`BitType`]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
pub enum BitDepth {
    /// Eight bit depth.
    ///
    /// Images with such bit depth use [`u8`] to store
    /// pixels and use the whole range from 0-255.
    Eight,
    /// Sixteen bit depth
    ///
    /// Images with such bit depths use [`u16`] to store values and use the whole range
    /// i.e 0-65535
    ///
    /// Data is stored and processed in native endian.
    Sixteen,
    /// Floating point depth
    ///
    /// Images with this depth store [`f32`] values, nominally
    /// in the range 0.0-1.0 but operations may leave values outside it.
    Float32,
    /// Bit depth information is unknown
    #[default]
    Unknown
}

/// The underlying bit representation of the image
///
/// This represents the rust type used to store
/// pixels inside a `Channel`
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BitType {
    /// Images represented using a [`u8`] as their
    /// underlying pixel storage
    U8,
    /// Images represented using a [`u16`] as their
    /// underlying pixel storage.
    U16,
    /// Images represented using a [`f32`] as their
    /// underlying pixel storage.
    F32
}

impl BitType {
    /// Return the bit depth that natively maps to this type
    pub const fn to_depth(self) -> BitDepth {
        match self {
            BitType::U8 => BitDepth::Eight,
            BitType::U16 => BitDepth::Sixteen,
            BitType::F32 => BitDepth::Float32
        }
    }
}

impl BitDepth {
    /// Get the max value supported by the bit depth
    ///
    /// During conversion from one bit depth to another
    /// larger values should be clamped to this bit depth.
    ///
    /// Float images report `1`
    pub const fn max_value(self) -> u16 {
        match self {
            Self::Eight => 255,
            Self::Sixteen => u16::MAX,
            Self::Float32 => 1,
            Self::Unknown => 0
        }
    }

    /// Return the rust type used to store pixels of this depth
    ///
    /// # Panics
    /// On `BitDepth::Unknown`, which no decoded image carries.
    ///
    /// # Example
    ///
    /// ```
    /// use pixlab_core::bit_depth::{BitDepth, BitType};
    /// assert_eq!(BitDepth::Eight.bit_type(),BitType::U8);
    /// assert_eq!(BitDepth::Float32.bit_type(),BitType::F32);
    /// ```
    pub const fn bit_type(self) -> BitType {
        match self {
            Self::Eight => BitType::U8,
            Self::Sixteen => BitType::U16,
            Self::Float32 => BitType::F32,
            Self::Unknown => panic!("Unknown bit type")
        }
    }

    /// Get the number of bytes needed to store a single sample of this depth
    pub const fn size_of(self) -> usize {
        match self {
            Self::Eight => 1,
            Self::Sixteen => 2,
            Self::Float32 => 4,
            Self::Unknown => 0
        }
    }
}
