//! Variable-length integer encoding and decoding
//!
//! A value is encoded in 1 to [MAX_SIZE] bytes, most significant group first. Each byte uses:
//! - 7 bits for the value (the low-order bits)
//! - 1 "continuation" bit (the high-order bit) that is set on every byte but the last
//!
//! ```text
//! 10000011 11111111 01111111
//! ^        ^        ^--- 0 == final byte
//! ```
//!
//! The example above is the unsigned value `0xFFFF`.
//!
//! Signed values are not ZigZag encoded: the 7-bit groups carry the two's-complement bit pattern
//! directly and the second-highest bit (`0x40`) of the first byte is the sign. Decoding therefore
//! seeds the result with that sign before shifting in the groups.
//!
//! Values are always encoded in the fewest bytes possible. Decoding accepts padded encodings
//! shorter than [MAX_SIZE] bytes, but a [MAX_SIZE]-byte encoding must begin with the only
//! leading byte(s) a 64-bit value can produce.
//!
//! Narrower integers share the 64-bit wire format; decoding into them is a separate range check
//! after the full 64-bit value has been read.

use crate::{DataBuffer, Error, RangeCfg};
use tracing::debug;

const BITS_PER_U64: usize = 64;
const DATA_BITS_PER_BYTE: usize = 7;
const DATA_BITS_MASK: u8 = 0x7F;
const CONTINUATION_BIT_MASK: u8 = 0x80;
const SIGN_BIT_MASK: u8 = 0x40;

/// The maximum number of bytes in the encoding of a 64-bit value.
pub const MAX_SIZE: usize = 10;

/// The only leading byte of a [MAX_SIZE]-byte unsigned encoding (`u64::MAX` and friends).
const UNSIGNED_MAX_SIZE_LEAD: u8 = 0x81;

/// The only leading bytes of a [MAX_SIZE]-byte signed encoding (positive and negative extremes).
const SIGNED_MAX_SIZE_LEADS: [u8; 2] = [0x80, 0xFF];

/// Returns the position of the most significant set bit, treating `0` as position `0`.
const fn highest_set_bit(value: u64) -> usize {
    if value == 0 {
        return 0;
    }
    BITS_PER_U64 - 1 - value.leading_zeros() as usize
}

/// Calculates the number of bytes needed to encode an unsigned integer as a varint.
pub const fn size(value: u64) -> usize {
    highest_set_bit(value) / DATA_BITS_PER_BYTE + 1
}

/// Calculates the number of bytes needed to encode a signed integer as a varint.
///
/// One bit beyond the magnitude is reserved for the sign. Negative values are sized by their
/// complement, whose highest set bit is the highest bit that differs from the sign.
pub const fn size_signed(value: i64) -> usize {
    let magnitude = if value < 0 { !value } else { value };
    (highest_set_bit(magnitude as u64) + 1) / DATA_BITS_PER_BYTE + 1
}

/// A source of 7-bit groups, least significant first.
trait Groups: Copy {
    /// Returns the least significant 7 bits.
    fn low_group(self) -> u8;

    /// Discards the least significant 7 bits. Signed values shift in copies of the sign bit.
    fn next_group(self) -> Self;
}

impl Groups for u64 {
    #[inline]
    fn low_group(self) -> u8 {
        self as u8 & DATA_BITS_MASK
    }

    #[inline]
    fn next_group(self) -> Self {
        self >> DATA_BITS_PER_BYTE
    }
}

impl Groups for i64 {
    #[inline]
    fn low_group(self) -> u8 {
        self as u8 & DATA_BITS_MASK
    }

    #[inline]
    fn next_group(self) -> Self {
        self >> DATA_BITS_PER_BYTE
    }
}

/// Fills `dst` with the encoding of `value`, writing the least significant group last.
fn put<G: Groups>(mut value: G, dst: &mut [u8]) {
    let last = dst.len() - 1;
    for (i, byte) in dst.iter_mut().enumerate().rev() {
        let mut group = value.low_group();
        value = value.next_group();
        if i != last {
            group |= CONTINUATION_BIT_MASK;
        }
        *byte = group;
    }
}

/// Reads the groups of a varint starting at `offset`, feeding each to `accumulate`.
///
/// Returns the number of bytes consumed.
fn take(src: &[u8], offset: usize, mut accumulate: impl FnMut(u8)) -> Result<usize, Error> {
    let mut consumed = 0;
    loop {
        // A 64-bit value never requires more than MAX_SIZE bytes
        if consumed == MAX_SIZE {
            debug!(offset, consumed, "varint exceeds maximum length");
            return Err(Error::MalformedVarint);
        }
        let byte = offset
            .checked_add(consumed)
            .and_then(|position| src.get(position))
            .ok_or(Error::out_of_bounds(offset, consumed + 1, src.len()))?;
        consumed += 1;
        accumulate(byte & DATA_BITS_MASK);
        if byte & CONTINUATION_BIT_MASK == 0 {
            return Ok(consumed);
        }
    }
}

/// Encodes an unsigned integer as a varint at the front of `dst`.
///
/// Returns the number of bytes written, or [Error::OutOfBounds] if `dst` is too short.
pub fn encode(value: u64, dst: &mut [u8]) -> Result<usize, Error> {
    let len = size(value);
    let range = DataBuffer::region(0, len, dst.len())?;
    put(value, &mut dst[range]);
    Ok(len)
}

/// Encodes a signed integer as a varint at the front of `dst`.
///
/// Returns the number of bytes written, or [Error::OutOfBounds] if `dst` is too short.
pub fn encode_signed(value: i64, dst: &mut [u8]) -> Result<usize, Error> {
    let len = size_signed(value);
    let range = DataBuffer::region(0, len, dst.len())?;
    put(value, &mut dst[range]);
    Ok(len)
}

/// Decodes an unsigned varint from the front of `src`.
///
/// Returns the value and the number of bytes consumed.
pub fn decode(src: &[u8]) -> Result<(u64, usize), Error> {
    decode_at(src, 0)
}

/// Decodes a signed varint from the front of `src`.
///
/// Returns the value and the number of bytes consumed.
pub fn decode_signed(src: &[u8]) -> Result<(i64, usize), Error> {
    decode_signed_at(src, 0)
}

fn decode_at(src: &[u8], offset: usize) -> Result<(u64, usize), Error> {
    let mut value = 0u64;
    let consumed = take(src, offset, |group| {
        value = (value << DATA_BITS_PER_BYTE) | u64::from(group);
    })?;
    if consumed == MAX_SIZE && src[offset] != UNSIGNED_MAX_SIZE_LEAD {
        debug!(offset, lead = src[offset], "malformed unsigned varint");
        return Err(Error::MalformedVarint);
    }
    Ok((value, consumed))
}

fn decode_signed_at(src: &[u8], offset: usize) -> Result<(i64, usize), Error> {
    let Some(&lead) = src.get(offset) else {
        return Err(Error::out_of_bounds(offset, 1, src.len()));
    };

    // Seed with the sign so that shifting in the groups sign-extends the result
    let mut value: i64 = if lead & SIGN_BIT_MASK != 0 { -1 } else { 0 };
    let consumed = take(src, offset, |group| {
        value = (value << DATA_BITS_PER_BYTE) | i64::from(group);
    })?;
    if consumed == MAX_SIZE && !SIGNED_MAX_SIZE_LEADS.contains(&lead) {
        debug!(offset, lead, "malformed signed varint");
        return Err(Error::MalformedVarint);
    }
    Ok((value, consumed))
}

/// An unsigned integer that can be varint encoded.
///
/// All widths share the 64-bit wire format. Decoding into a narrower width fails with
/// [Error::VarintRangeExceeded] if the value does not fit.
pub trait UInt: Copy + PartialOrd + Into<u64> + TryFrom<u64> {}

impl UInt for u8 {}
impl UInt for u16 {}
impl UInt for u32 {}
impl UInt for u64 {}

/// A signed integer that can be varint encoded.
///
/// All widths share the 64-bit wire format. Decoding into a narrower width fails with
/// [Error::VarintRangeExceeded] if the value does not fit.
pub trait SInt: Copy + PartialOrd + Into<i64> + TryFrom<i64> {}

impl SInt for i8 {}
impl SInt for i16 {}
impl SInt for i32 {}
impl SInt for i64 {}

fn narrow<W, T: TryFrom<W>>(value: W) -> Result<T, Error> {
    T::try_from(value).map_err(|_| Error::VarintRangeExceeded)
}

impl DataBuffer<'_> {
    /// Writes `value` as an unsigned varint at `offset`, ignoring data length and read position.
    ///
    /// Returns the number of bytes written.
    pub fn set_var_uint<T: UInt>(&mut self, value: T, offset: usize) -> Result<usize, Error> {
        let value: u64 = value.into();
        let len = size(value);
        let range = Self::region(offset, len, self.capacity())?;
        put(value, &mut self.as_mut_slice()[range]);
        Ok(len)
    }

    /// Writes `value` as a signed varint at `offset`, ignoring data length and read position.
    ///
    /// Returns the number of bytes written.
    pub fn set_var_int<T: SInt>(&mut self, value: T, offset: usize) -> Result<usize, Error> {
        let value: i64 = value.into();
        let len = size_signed(value);
        let range = Self::region(offset, len, self.capacity())?;
        put(value, &mut self.as_mut_slice()[range]);
        Ok(len)
    }

    /// Reads an unsigned varint at `offset`, ignoring data length and read position.
    ///
    /// Returns the value and the number of bytes consumed.
    pub fn get_var_uint<T: UInt>(&self, offset: usize) -> Result<(T, usize), Error> {
        let (value, len) = decode_at(self.as_slice(), offset)?;
        Ok((narrow(value)?, len))
    }

    /// Reads an unsigned varint at `offset`, requiring it to be within `cfg`.
    pub fn get_var_uint_cfg<T: UInt>(
        &self,
        offset: usize,
        cfg: &RangeCfg<T>,
    ) -> Result<(T, usize), Error> {
        let (value, len) = self.get_var_uint(offset)?;
        Ok((cfg.check(value)?, len))
    }

    /// Reads a signed varint at `offset`, ignoring data length and read position.
    ///
    /// Returns the value and the number of bytes consumed.
    pub fn get_var_int<T: SInt>(&self, offset: usize) -> Result<(T, usize), Error> {
        let (value, len) = decode_signed_at(self.as_slice(), offset)?;
        Ok((narrow(value)?, len))
    }

    /// Reads a signed varint at `offset`, requiring it to be within `cfg`.
    pub fn get_var_int_cfg<T: SInt>(
        &self,
        offset: usize,
        cfg: &RangeCfg<T>,
    ) -> Result<(T, usize), Error> {
        let (value, len) = self.get_var_int(offset)?;
        Ok((cfg.check(value)?, len))
    }

    /// Appends `value` as an unsigned varint to the live data.
    ///
    /// Returns the number of bytes written.
    pub fn append_var_uint<T: UInt>(&mut self, value: T) -> Result<usize, Error> {
        let len = self.set_var_uint(value, self.data_length())?;
        self.advance_data_length(len);
        Ok(len)
    }

    /// Appends `value` as a signed varint to the live data.
    ///
    /// Returns the number of bytes written.
    pub fn append_var_int<T: SInt>(&mut self, value: T) -> Result<usize, Error> {
        let len = self.set_var_int(value, self.data_length())?;
        self.advance_data_length(len);
        Ok(len)
    }

    /// Reads an unsigned varint from the unread live data.
    ///
    /// Only the value is returned; the number of octets consumed is the change in
    /// [DataBuffer::read_position]. On failure the read position is left unchanged.
    pub fn read_var_uint<T: UInt>(&mut self) -> Result<T, Error> {
        self.read_var_uint_cfg(&RangeCfg::from(..))
    }

    /// Reads an unsigned varint from the unread live data, requiring it to be within `cfg`.
    ///
    /// On failure the read position is left unchanged.
    pub fn read_var_uint_cfg<T: UInt>(&mut self, cfg: &RangeCfg<T>) -> Result<T, Error> {
        let (value, len) = decode_at(self.data(), self.read_position())?;
        let value = cfg.check(narrow(value)?)?;
        self.advance_read_position(len)?;
        Ok(value)
    }

    /// Reads a signed varint from the unread live data.
    ///
    /// Only the value is returned; the number of octets consumed is the change in
    /// [DataBuffer::read_position]. On failure the read position is left unchanged.
    pub fn read_var_int<T: SInt>(&mut self) -> Result<T, Error> {
        self.read_var_int_cfg(&RangeCfg::from(..))
    }

    /// Reads a signed varint from the unread live data, requiring it to be within `cfg`.
    ///
    /// On failure the read position is left unchanged.
    pub fn read_var_int_cfg<T: SInt>(&mut self, cfg: &RangeCfg<T>) -> Result<T, Error> {
        let (value, len) = decode_signed_at(self.data(), self.read_position())?;
        let value = cfg.check(narrow(value)?)?;
        self.advance_read_position(len)?;
        Ok(value)
    }
}
