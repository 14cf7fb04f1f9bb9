/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

/// Numeric operations every pixel type supports
///
/// `max_val` and `min_val` are the limits of the image range
/// of the type, which for `f32` is `0.0..=1.0`
pub trait NumOps<T>: Copy + PartialOrd + Default + Send + Sync {
    fn max_val() -> T;

    fn min_val() -> T;

    fn to_f32(self) -> f32;

    /// Convert from f32, integers are rounded and saturated
    fn from_f32(value: f32) -> T;
}

macro_rules! numops_for_int {
    ($int:tt) => {
        impl NumOps<$int> for $int {
            #[inline(always)]
            fn max_val() -> $int {
                $int::MAX
            }

            #[inline(always)]
            fn min_val() -> $int {
                $int::MIN
            }

            #[inline(always)]
            fn to_f32(self) -> f32 {
                f32::from(self)
            }

            #[inline(always)]
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            fn from_f32(value: f32) -> $int {
                value.round().clamp($int::MIN as f32, $int::MAX as f32) as $int
            }
        }
    };
}

numops_for_int!(u8);
numops_for_int!(u16);

impl NumOps<f32> for f32 {
    #[inline(always)]
    fn max_val() -> f32 {
        1.0
    }

    #[inline(always)]
    fn min_val() -> f32 {
        0.0
    }

    #[inline(always)]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline(always)]
    fn from_f32(value: f32) -> f32 {
        value
    }
}

#[test]
fn int_conversions_saturate() {
    assert_eq!(u8::from_f32(-3.0), 0);
    assert_eq!(u8::from_f32(254.6), 255);
    assert_eq!(u8::from_f32(1000.0), 255);
    assert_eq!(u16::from_f32(70000.0), u16::MAX);
    assert_eq!(f32::from_f32(2.5), 2.5);
}
