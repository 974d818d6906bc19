//! Fixed-width wire types.
//!
//! All multi-byte integers and floats are written big-endian (network byte order) to avoid
//! host-endian ambiguity. Floats are transmitted as their IEEE-754 bit pattern in the integer
//! encoding of the same width. Single-octet values are copied as-is.

use bytes::{Buf, BufMut};

/// A value with a constant encoded size that can be placed into, and recovered from, a region
/// of exactly [FixedWidth::SIZE] bytes.
pub trait FixedWidth: Copy + Sized {
    /// The length of the encoded value.
    const SIZE: usize;

    /// Writes the value into `dst`.
    ///
    /// Panics if `dst` is shorter than [FixedWidth::SIZE]. Callers are expected to have checked
    /// bounds already.
    fn put(self, dst: &mut [u8]);

    /// Reads a value from the front of `src`.
    ///
    /// Panics if `src` is shorter than [FixedWidth::SIZE].
    fn get(src: &[u8]) -> Self;
}

macro_rules! impl_fixed_width {
    ($type:ty, $read_method:ident, $write_method:ident) => {
        impl FixedWidth for $type {
            const SIZE: usize = std::mem::size_of::<$type>();

            #[inline]
            fn put(self, mut dst: &mut [u8]) {
                dst.$write_method(self);
            }

            #[inline]
            fn get(mut src: &[u8]) -> Self {
                src.$read_method()
            }
        }
    };
}

impl_fixed_width!(u8, get_u8, put_u8);
impl_fixed_width!(u16, get_u16, put_u16);
impl_fixed_width!(u32, get_u32, put_u32);
impl_fixed_width!(u64, get_u64, put_u64);
impl_fixed_width!(i8, get_i8, put_i8);
impl_fixed_width!(i16, get_i16, put_i16);
impl_fixed_width!(i32, get_i32, put_i32);
impl_fixed_width!(i64, get_i64, put_i64);
impl_fixed_width!(f32, get_f32, put_f32);
impl_fixed_width!(f64, get_f64, put_f64);
