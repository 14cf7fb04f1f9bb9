/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! This module encapsulates a single image channel instance
//!
//! A channel is a planar buffer holding one sample per pixel.
//! It remembers the type it was created with, and only hands out
//! slices of that type, so a `u8` channel can never be read as `f32`.
//!
use std::fmt::{Debug, Display, Formatter};

use bytemuck::Pod;
use pixlab_core::bit_depth::BitType;

/// Encapsulates errors that can occur
/// when manipulating channels
#[derive(Copy, Clone, PartialEq, Eq)]
pub enum ChannelErrors {
    /// The channel was asked for a type it wasn't created with,
    /// contains (expected, found)
    DifferentType(BitType, BitType)
}

impl Debug for ChannelErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelErrors::DifferentType(expected, found) => {
                writeln!(
                    f,
                    "Channel stores {found:?} but was reinterpreted as {expected:?}, this indicates you are converting a channel to a type it wasn't instantiated with"
                )
            }
        }
    }
}

impl Display for ChannelErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{self:?}")
    }
}

impl std::error::Error for ChannelErrors {}

#[derive(Clone, PartialEq)]
enum ChannelData {
    U8(Vec<u8>),
    U16(Vec<u16>),
    F32(Vec<f32>)
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for u8 {}

    impl Sealed for u16 {}

    impl Sealed for f32 {}
}

/// Types a channel can store.
///
/// Implemented for `u8`, `u16` and `f32`, the native types of
/// [`BitDepth::Eight`](pixlab_core::bit_depth::BitDepth::Eight),
/// [`BitDepth::Sixteen`](pixlab_core::bit_depth::BitDepth::Sixteen) and
/// [`BitDepth::Float32`](pixlab_core::bit_depth::BitDepth::Float32)
pub trait ChannelType: Pod + Default + Send + Sync + sealed::Sealed {
    /// The bit type this rust type represents
    const BIT_TYPE: BitType;

    #[doc(hidden)]
    fn wrap(data: Vec<Self>) -> ChannelStorage;
    #[doc(hidden)]
    fn view(data: &ChannelStorage) -> Option<&[Self]>;
    #[doc(hidden)]
    fn view_mut(data: &mut ChannelStorage) -> Option<&mut [Self]>;
}

/// Opaque storage behind a channel, only exposed
/// so that [`ChannelType`] can name it
#[doc(hidden)]
#[derive(Clone, PartialEq)]
pub struct ChannelStorage(ChannelData);

macro_rules! channel_type {
    ($ty:ty, $variant:ident, $bit_type:expr) => {
        impl ChannelType for $ty {
            const BIT_TYPE: BitType = $bit_type;

            fn wrap(data: Vec<Self>) -> ChannelStorage {
                ChannelStorage(ChannelData::$variant(data))
            }

            fn view(data: &ChannelStorage) -> Option<&[Self]> {
                match &data.0 {
                    ChannelData::$variant(v) => Some(v),
                    _ => None
                }
            }

            fn view_mut(data: &mut ChannelStorage) -> Option<&mut [Self]> {
                match &mut data.0 {
                    ChannelData::$variant(v) => Some(v),
                    _ => None
                }
            }
        }
    };
}

channel_type!(u8, U8, BitType::U8);
channel_type!(u16, U16, BitType::U16);
channel_type!(f32, F32, BitType::F32);

/// Encapsulates an image channel
///
/// A channel has the same semantics as a `Vec<T>`,
/// with the type chosen at runtime.
///
/// Most of the operations in the channel work by calling
/// `reinterpret` methods, both as reference and as mutable.
#[derive(Clone, PartialEq)]
pub struct Channel {
    data: ChannelStorage
}

impl Debug for Channel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Channel({:?}, len: {})", self.bit_type(), self.len())
    }
}

impl Channel {
    /// Create a new zero filled channel of `length` elements of type `T`
    pub fn new_with_length<T: ChannelType>(length: usize) -> Channel {
        Channel::from_elm(length, T::default())
    }

    /// Create a new zero filled channel of `length` elements whose
    /// type is decided at runtime
    pub fn new_with_bit_type(length: usize, bit_type: BitType) -> Channel {
        match bit_type {
            BitType::U8 => Channel::new_with_length::<u8>(length),
            BitType::U16 => Channel::new_with_length::<u16>(length),
            BitType::F32 => Channel::new_with_length::<f32>(length)
        }
    }

    /// Create a channel with `length` copies of `elm`
    ///
    /// # Example
    /// ```
    /// use pixlab_image::channel::Channel;
    /// let c = Channel::from_elm(10, 255_u8);
    /// assert_eq!(c.reinterpret_as::<u8>().unwrap(), &[255; 10]);
    /// ```
    pub fn from_elm<T: ChannelType>(length: usize, elm: T) -> Channel {
        Channel::from_vec(vec![elm; length])
    }

    /// Take ownership of a vector and store it as a channel
    pub fn from_vec<T: ChannelType>(data: Vec<T>) -> Channel {
        Channel { data: T::wrap(data) }
    }

    /// Number of elements stored, regardless of their type
    pub fn len(&self) -> usize {
        match &self.data.0 {
            ChannelData::U8(v) => v.len(),
            ChannelData::U16(v) => v.len(),
            ChannelData::F32(v) => v.len()
        }
    }

    /// Return true whether this channel length is zero
    ///
    /// # Example
    /// ```
    /// use pixlab_image::channel::Channel;
    /// let c = Channel::new_with_length::<u8>(0);
    /// assert!(c.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the type this channel was created with
    pub fn bit_type(&self) -> BitType {
        match &self.data.0 {
            ChannelData::U8(_) => BitType::U8,
            ChannelData::U16(_) => BitType::U16,
            ChannelData::F32(_) => BitType::F32
        }
    }

    /// Reinterpret a channel as a slice of `T`
    ///
    /// # Errors
    /// If `T` isn't the type the channel stores
    pub fn reinterpret_as<T: ChannelType>(&self) -> Result<&[T], ChannelErrors> {
        let found = self.bit_type();
        T::view(&self.data).ok_or(ChannelErrors::DifferentType(T::BIT_TYPE, found))
    }

    /// Reinterpret a channel as a mutable slice of `T`
    ///
    /// # Errors
    /// If `T` isn't the type the channel stores
    pub fn reinterpret_as_mut<T: ChannelType>(&mut self) -> Result<&mut [T], ChannelErrors> {
        let found = self.bit_type();
        T::view_mut(&mut self.data).ok_or(ChannelErrors::DifferentType(T::BIT_TYPE, found))
    }

    /// Return the raw bytes of the channel in native endian
    pub fn as_bytes(&self) -> &[u8] {
        match &self.data.0 {
            ChannelData::U8(v) => v,
            ChannelData::U16(v) => bytemuck::cast_slice(v),
            ChannelData::F32(v) => bytemuck::cast_slice(v)
        }
    }

    /// Set every element of the channel to `value`
    pub fn fill<T: ChannelType>(&mut self, value: T) -> Result<(), ChannelErrors> {
        self.reinterpret_as_mut::<T>()?.fill(value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pixlab_core::bit_depth::BitType;

    use crate::channel::{Channel, ChannelErrors};

    #[test]
    fn reinterpret_checks_type() {
        let mut channel = Channel::new_with_bit_type(4, BitType::U16);

        assert!(channel.reinterpret_as::<u16>().is_ok());
        assert_eq!(
            channel.reinterpret_as::<u8>().unwrap_err(),
            ChannelErrors::DifferentType(BitType::U8, BitType::U16)
        );
        assert!(channel.reinterpret_as_mut::<f32>().is_err());
    }

    #[test]
    fn bytes_are_native_endian() {
        let channel = Channel::from_vec(vec![0x0102_u16, 0x0304]);
        let bytes = channel.as_bytes();

        assert_eq!(bytes.len(), 4);
        assert_eq!(u16::from_ne_bytes([bytes[0], bytes[1]]), 0x0102);
    }

    #[test]
    fn fill_sets_all() {
        let mut channel = Channel::new_with_length::<f32>(3);
        channel.fill(0.5_f32).unwrap();
        assert_eq!(channel.reinterpret_as::<f32>().unwrap(), &[0.5; 3]);
        assert!(channel.fill(1_u8).is_err());
    }
}
