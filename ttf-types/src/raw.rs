//! Types for converting raw big-endian bytes to and from native types.

/// A trait for types that can be encoded as big-endian bytes.
///
/// This is for the types we write into font files; the `Raw` associated
/// type is always a fixed-size byte array holding the big-endian
/// representation.
pub trait Scalar: Sized {
    /// The raw byte representation of this type.
    type Raw: Copy + AsRef<[u8]>;

    /// The size of the raw type, in bytes.
    const RAW_BYTE_LEN: usize = std::mem::size_of::<Self::Raw>();

    /// Create an instance of this type from raw big-endian bytes.
    fn from_raw(raw: Self::Raw) -> Self;

    /// Encode this type as raw big-endian bytes.
    fn to_raw(self) -> Self::Raw;

    /// Attempt to read a scalar from the front of a slice of bytes.
    ///
    /// Returns `None` if the slice is shorter than [`Self::RAW_BYTE_LEN`].
    fn read(slice: &[u8]) -> Option<Self>;
}

/// Implement the `Scalar` trait for the builtin integers.
macro_rules! int_scalar {
    ($ty:ty) => {
        impl crate::raw::Scalar for $ty {
            type Raw = [u8; std::mem::size_of::<$ty>()];

            fn from_raw(raw: Self::Raw) -> Self {
                Self::from_be_bytes(raw)
            }

            fn to_raw(self) -> Self::Raw {
                self.to_be_bytes()
            }

            fn read(slice: &[u8]) -> Option<Self> {
                slice
                    .get(..Self::RAW_BYTE_LEN)
                    .and_then(|bytes| bytes.try_into().ok())
                    .map(Self::from_be_bytes)
            }
        }
    };
}

int_scalar!(u8);
int_scalar!(i8);
int_scalar!(u16);
int_scalar!(i16);
int_scalar!(u32);
int_scalar!(i32);

/// Implement the `Scalar` trait for a type that wraps an integer.
///
/// The wrapper provides `from_bits`/`to_bits` for the inner type; the
/// raw representation is the big-endian encoding of the bits.
macro_rules! newtype_scalar {
    ($ty:ty, $inner:ty) => {
        impl crate::raw::Scalar for $ty {
            type Raw = [u8; std::mem::size_of::<$inner>()];

            fn from_raw(raw: Self::Raw) -> Self {
                Self::from_bits(<$inner>::from_be_bytes(raw))
            }

            fn to_raw(self) -> Self::Raw {
                self.to_bits().to_be_bytes()
            }

            fn read(slice: &[u8]) -> Option<Self> {
                <$inner as crate::raw::Scalar>::read(slice).map(Self::from_bits)
            }
        }
    };
}

pub(crate) use newtype_scalar;
