//! Signed fixed-point numbers.

use std::ops::{Add, Div, Mul, Neg, Sub};

/// Implement a fixed-point type backed by a signed integer.
///
/// The operators saturate on overflow. Font engines expect clamped
/// results from hinting arithmetic, not wrapped bit patterns.
macro_rules! fixed_impl {
    ($name:ident, $bits:literal, $fract_bits:literal, $ty:ty, $wide:ty) => {
        #[doc = concat!("A ", stringify!($bits), "-bit signed fixed point number with ", stringify!($fract_bits), " bits of fraction.")]
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name($ty);

        impl $name {
            /// Minimum value.
            pub const MIN: $name = $name(<$ty>::MIN);

            /// Maximum value.
            pub const MAX: $name = $name(<$ty>::MAX);

            /// This type's smallest representable value.
            pub const EPSILON: $name = $name(1);

            /// Representation of 0.0.
            pub const ZERO: $name = $name(0);

            /// Representation of 1.0.
            pub const ONE: $name = $name(1 << $fract_bits);

            const INT_MASK: $ty = !((1 << $fract_bits) - 1);
            const HALF: $ty = 1 << ($fract_bits - 1);

            /// Creates a new fixed point value from the underlying bit representation.
            pub const fn from_bits(bits: $ty) -> Self {
                Self(bits)
            }

            /// Returns the underlying bit representation of the value.
            pub const fn to_bits(self) -> $ty {
                self.0
            }

            /// Creates a fixed point value from an integer, saturating on
            /// overflow.
            pub const fn from_int(value: $ty) -> Self {
                Self(value.saturating_mul(1 << $fract_bits))
            }

            /// Returns the integer part of the value, discarding the
            /// fractional bits.
            pub const fn to_int(self) -> $ty {
                self.0 >> $fract_bits
            }

            /// Creates a fixed point value from a 32-bit float, truncating
            /// toward zero and saturating at the type bounds.
            pub fn from_f32(value: f32) -> Self {
                Self::from_f64(value as f64)
            }

            /// Creates a fixed point value from a 64-bit float, truncating
            /// toward zero and saturating at the type bounds.
            pub fn from_f64(value: f64) -> Self {
                Self((value * (1u32 << $fract_bits) as f64) as $ty)
            }

            /// Returns the value as a 32-bit float.
            pub fn to_f32(self) -> f32 {
                self.to_f64() as f32
            }

            /// Returns the value as a 64-bit float.
            pub fn to_f64(self) -> f64 {
                self.0 as f64 / (1u32 << $fract_bits) as f64
            }

            /// Returns the largest integral value less than or equal to `self`.
            pub const fn floor(self) -> Self {
                Self(self.0 & Self::INT_MASK)
            }

            /// Returns the smallest integral value greater than or equal to
            /// `self`, saturating at the type bound.
            pub const fn ceil(self) -> Self {
                Self(self.0.saturating_add((1 << $fract_bits) - 1) & Self::INT_MASK)
            }

            /// Returns the nearest integral value, rounding halfway cases
            /// away from negative infinity and saturating at the type bound.
            pub const fn round(self) -> Self {
                Self(self.0.saturating_add(Self::HALF) & Self::INT_MASK)
            }

            /// Returns the absolute value, saturating at the type bound.
            pub const fn abs(self) -> Self {
                Self(self.0.saturating_abs())
            }

            /// Returns the fractional part of the value.
            pub const fn fract(self) -> Self {
                Self(self.0 & !Self::INT_MASK)
            }
        }

        /// Saturating addition.
        impl Add for $name {
            type Output = Self;
            fn add(self, other: Self) -> Self {
                Self(self.0.saturating_add(other.0))
            }
        }

        /// Saturating subtraction.
        impl Sub for $name {
            type Output = Self;
            fn sub(self, other: Self) -> Self {
                Self(self.0.saturating_sub(other.0))
            }
        }

        impl Neg for $name {
            type Output = Self;
            fn neg(self) -> Self {
                Self(self.0.saturating_neg())
            }
        }

        /// Fixed point multiplication: the product is computed at double
        /// width, shifted back into position and saturated.
        impl Mul for $name {
            type Output = Self;
            fn mul(self, other: Self) -> Self {
                let product = (self.0 as $wide * other.0 as $wide) >> $fract_bits;
                Self(product.clamp(<$ty>::MIN as $wide, <$ty>::MAX as $wide) as $ty)
            }
        }

        /// Fixed point division: the dividend is widened and shifted before
        /// the integer division, and the quotient saturated.
        ///
        /// Like the builtin integer operator, this panics when `other` is
        /// zero. The hinting engine checks divisors before dividing.
        impl Div for $name {
            type Output = Self;
            fn div(self, other: Self) -> Self {
                let quotient = ((self.0 as $wide) << $fract_bits) / other.0 as $wide;
                Self(quotient.clamp(<$ty>::MIN as $wide, <$ty>::MAX as $wide) as $ty)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                self.to_f64().fmt(f)
            }
        }
    };
}

fixed_impl!(F2Dot14, 16, 14, i16, i32);
fixed_impl!(F26Dot6, 32, 6, i32, i64);

crate::raw::newtype_scalar!(F2Dot14, i16);
crate::raw::newtype_scalar!(F26Dot6, i32);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn f2dot14_float_conversion() {
        assert_eq!(F2Dot14::from_f32(1.75), F2Dot14::from_bits(0x7000));
        assert_eq!(F2Dot14::from_f32(-0.25), F2Dot14::from_bits(-0x1000));
        assert_eq!(F2Dot14::from_f32(-2.0), F2Dot14::MIN);
        // out of range values saturate
        assert_eq!(F2Dot14::from_f32(2.0), F2Dot14::MAX);
    }

    #[test]
    fn float_conversion_truncates() {
        // 1.99 * 64 = 127.36; the fraction is dropped, not rounded
        assert_eq!(F26Dot6::from_f64(1.99), F26Dot6::from_bits(127));
        assert_eq!(F26Dot6::from_f64(-1.99), F26Dot6::from_bits(-127));
    }

    #[test]
    fn floor_round_ceil() {
        let half = F26Dot6::from_bits(32);
        let one = F26Dot6::ONE;
        assert_eq!((one + half).floor(), one);
        assert_eq!((one + half).round(), F26Dot6::from_int(2));
        assert_eq!((one + F26Dot6::EPSILON).ceil(), F26Dot6::from_int(2));
        assert_eq!((-half).floor(), -one);
        assert_eq!((-half).ceil(), F26Dot6::ZERO);
    }

    #[test]
    fn mul_div() {
        let two = F26Dot6::from_int(2);
        let three = F26Dot6::from_int(3);
        assert_eq!(two * three, F26Dot6::from_int(6));
        assert_eq!(F26Dot6::from_int(6) / two, three);
        assert_eq!(F26Dot6::from_f64(1.5) * two, three);
        assert_eq!(F26Dot6::ONE / two, F26Dot6::from_bits(32));
    }

    #[test]
    fn overflow_saturates() {
        assert_eq!(F26Dot6::MAX + F26Dot6::ONE, F26Dot6::MAX);
        assert_eq!(F26Dot6::MIN - F26Dot6::ONE, F26Dot6::MIN);
        assert_eq!(F26Dot6::MAX * F26Dot6::from_int(2), F26Dot6::MAX);
        assert_eq!(F26Dot6::MIN / F26Dot6::from_bits(-64), F26Dot6::MAX);
        assert_eq!(-F26Dot6::MIN, F26Dot6::MAX);
        assert_eq!(F26Dot6::MIN.abs(), F26Dot6::MAX);
    }
}
