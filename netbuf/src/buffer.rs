//! A bounds-checked octet buffer for serializing and deserializing network data.
//!
//! A [DataBuffer] tracks three independent quantities over a contiguous region of octets:
//! - `capacity`: the size of the underlying storage,
//! - `data_length`: the number of octets (from the start of storage) considered live,
//! - `read_position`: how far sequential reads have progressed through the live octets.
//!
//! and maintains `read_position <= data_length <= capacity` after every operation.
//!
//! Storage is either owned (allocated by the buffer and released when the buffer is dropped,
//! cleared, or rebound) or borrowed from the caller for the lifetime `'a`.
//!
//! Access comes in four groups:
//!
//! | Group | Bound | Touches counters |
//! |-------|-------|------------------|
//! | `set_*` | capacity | no |
//! | `get_*` | capacity | no |
//! | `append*` | capacity | advances `data_length` |
//! | `read*` | data length | advances `read_position` |
//!
//! Every operation validates before it mutates, so a failed call leaves the buffer unchanged.

use crate::{primitives::FixedWidth, Error};
use std::{
    fmt,
    ops::{Index, IndexMut, Range},
};
use tracing::{trace, warn};

/// Backing storage of a [DataBuffer].
enum Storage<'a> {
    /// No storage is associated with the buffer.
    Empty,
    /// Storage allocated (and released) by the buffer. Never zero-length.
    Owned(Box<[u8]>),
    /// Storage lent by the caller. Never zero-length.
    Borrowed(&'a mut [u8]),
}

impl Storage<'_> {
    fn as_slice(&self) -> &[u8] {
        match self {
            Storage::Empty => &[],
            Storage::Owned(storage) => &storage[..],
            Storage::Borrowed(storage) => &storage[..],
        }
    }

    fn as_mut_slice(&mut self) -> &mut [u8] {
        match self {
            Storage::Empty => &mut [],
            Storage::Owned(storage) => &mut storage[..],
            Storage::Borrowed(storage) => &mut storage[..],
        }
    }
}

/// Allocates `capacity` zeroed octets, reporting failure instead of aborting.
fn allocate(capacity: usize) -> Result<Box<[u8]>, Error> {
    let mut storage = Vec::new();
    if let Err(err) = storage.try_reserve_exact(capacity) {
        warn!(capacity, ?err, "unable to allocate buffer");
        return Err(Error::Allocation(capacity));
    }
    storage.resize(capacity, 0);
    Ok(storage.into_boxed_slice())
}

/// A bounds-checked octet buffer with independent capacity, data length, and read position.
///
/// # Example
///
/// ```
/// use netbuf::DataBuffer;
///
/// let mut buffer = DataBuffer::with_capacity(64).unwrap();
/// buffer.append(0x12u8)?.append(0x0003u16)?.append(0xDEADBEEFu32)?;
/// assert_eq!(buffer.data(), &[0x12, 0x00, 0x03, 0xDE, 0xAD, 0xBE, 0xEF]);
///
/// assert_eq!(buffer.read::<u8>()?, 0x12);
/// assert_eq!(buffer.read::<u16>()?, 0x0003);
/// assert_eq!(buffer.unread_length(), 4);
/// # Ok::<(), netbuf::Error>(())
/// ```
pub struct DataBuffer<'a> {
    storage: Storage<'a>,
    data_length: usize,
    read_position: usize,
}

impl<'a> DataBuffer<'a> {
    /// Creates a buffer with no storage.
    ///
    /// Storage can be associated later with [DataBuffer::set_buffer].
    pub const fn new() -> Self {
        Self {
            storage: Storage::Empty,
            data_length: 0,
            read_position: 0,
        }
    }

    /// Creates a buffer that owns `capacity` zeroed octets and holds no data.
    ///
    /// A `capacity` of zero yields a buffer with no storage.
    pub fn with_capacity(capacity: usize) -> Result<Self, Error> {
        let mut buffer = Self::new();
        if capacity > 0 {
            buffer.storage = Storage::Owned(allocate(capacity)?);
        }
        Ok(buffer)
    }

    /// Creates a buffer over caller-provided storage, treating the whole region as live data.
    ///
    /// The buffer never releases borrowed storage. An empty region yields a buffer with no
    /// storage.
    pub fn from_slice(buffer: &'a mut [u8]) -> Self {
        let mut result = Self::new();
        result.set_buffer(buffer);
        result
    }

    /// Creates a buffer over caller-provided storage with `data_length` octets of live data.
    ///
    /// Fails with [Error::InvalidArgument] if `buffer` is empty or `data_length` exceeds its
    /// length.
    pub fn bind(buffer: &'a mut [u8], data_length: usize) -> Result<Self, Error> {
        let mut result = Self::new();
        result.set_buffer_with_length(buffer, data_length)?;
        Ok(result)
    }

    /// Rebinds the buffer to caller-provided storage, treating the whole region as live data.
    ///
    /// Any owned storage is released and the read position is reset.
    pub fn set_buffer(&mut self, buffer: &'a mut [u8]) {
        let length = buffer.len();
        if length == 0 {
            self.clear();
            return;
        }
        self.rebind(buffer, length);
    }

    /// Rebinds the buffer to caller-provided storage with `data_length` octets of live data.
    ///
    /// Fails with [Error::InvalidArgument] if `buffer` is empty or `data_length` exceeds its
    /// length, in which case the buffer is left unchanged. On success, any owned storage is
    /// released and the read position is reset.
    pub fn set_buffer_with_length(
        &mut self,
        buffer: &'a mut [u8],
        data_length: usize,
    ) -> Result<(), Error> {
        if buffer.is_empty() {
            return Err(Error::InvalidArgument("buffer must not be empty"));
        }
        if data_length > buffer.len() {
            return Err(Error::InvalidArgument("data length exceeds buffer size"));
        }
        self.rebind(buffer, data_length);
        Ok(())
    }

    fn rebind(&mut self, buffer: &'a mut [u8], data_length: usize) {
        trace!(capacity = buffer.len(), data_length, "rebinding buffer");
        self.storage = Storage::Borrowed(buffer);
        self.data_length = data_length;
        self.read_position = 0;
    }

    /// Releases any owned storage and returns the buffer to the empty state.
    pub fn clear(&mut self) {
        self.storage = Storage::Empty;
        self.data_length = 0;
        self.read_position = 0;
    }

    /// Moves the storage and counters out of this buffer, leaving it empty.
    pub fn take(&mut self) -> DataBuffer<'a> {
        std::mem::take(self)
    }

    /// Copies this buffer into freshly allocated owned storage of the same capacity.
    ///
    /// All octets up to capacity are copied, along with the data length and read position.
    /// A buffer with no storage copies to a buffer with no storage.
    pub fn try_clone(&self) -> Result<DataBuffer<'static>, Error> {
        let mut copy = DataBuffer::with_capacity(self.capacity())?;
        copy.as_mut_slice().copy_from_slice(self.as_slice());
        copy.data_length = self.data_length;
        copy.read_position = self.read_position;
        Ok(copy)
    }

    /// Returns true if the buffer allocated (and will release) its storage.
    pub fn is_owned(&self) -> bool {
        matches!(self.storage, Storage::Owned(_))
    }

    /// Returns the size of the underlying storage.
    pub fn capacity(&self) -> usize {
        self.storage.as_slice().len()
    }

    /// Returns the number of live octets.
    pub fn data_length(&self) -> usize {
        self.data_length
    }

    /// Sets the number of live octets and resets the read position.
    ///
    /// Fails with [Error::OutOfBounds] if `length` exceeds capacity.
    pub fn set_data_length(&mut self, length: usize) -> Result<(), Error> {
        if length > self.capacity() {
            return Err(Error::out_of_bounds(0, length, self.capacity()));
        }
        self.data_length = length;
        self.read_position = 0;
        Ok(())
    }

    /// Returns true if there are no live octets.
    pub fn is_empty(&self) -> bool {
        self.data_length == 0
    }

    /// Returns the position of the next sequential read.
    pub fn read_position(&self) -> usize {
        self.read_position
    }

    /// Moves the read position.
    ///
    /// Fails with [Error::OutOfBounds] if `position` exceeds the data length.
    pub fn set_read_position(&mut self, position: usize) -> Result<(), Error> {
        if position > self.data_length {
            return Err(Error::out_of_bounds(position, 0, self.data_length));
        }
        self.read_position = position;
        Ok(())
    }

    /// Moves the read position forward by `distance` octets.
    pub fn advance_read_position(&mut self, distance: usize) -> Result<(), Error> {
        let position = self
            .read_position
            .checked_add(distance)
            .ok_or(Error::out_of_bounds(self.read_position, distance, self.data_length))?;
        self.set_read_position(position)
    }

    /// Extends the live data by `len` octets already written past the end of it.
    ///
    /// Callers must have bounds-checked the write against capacity.
    pub(crate) fn advance_data_length(&mut self, len: usize) {
        debug_assert!(self.data_length + len <= self.capacity());
        self.data_length += len;
    }

    /// Returns the number of live octets not yet read.
    pub fn unread_length(&self) -> usize {
        self.data_length - self.read_position
    }

    /// Returns the whole storage, ignoring data length and read position.
    pub fn as_slice(&self) -> &[u8] {
        self.storage.as_slice()
    }

    /// Returns the whole storage mutably, ignoring data length and read position.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        self.storage.as_mut_slice()
    }

    /// Returns the storage from `offset` to capacity.
    ///
    /// A buffer with no storage yields an empty slice. Otherwise fails with
    /// [Error::OutOfBounds] if `offset` does not address an octet of storage.
    pub fn slice_from(&self, offset: usize) -> Result<&[u8], Error> {
        let storage = self.as_slice();
        if storage.is_empty() {
            return Ok(storage);
        }
        if offset >= storage.len() {
            return Err(Error::out_of_bounds(offset, 1, storage.len()));
        }
        Ok(&storage[offset..])
    }

    /// Returns the live octets.
    pub fn data(&self) -> &[u8] {
        &self.as_slice()[..self.data_length]
    }

    /// Returns the live octets that have not been read.
    pub fn unread(&self) -> &[u8] {
        &self.as_slice()[self.read_position..self.data_length]
    }

    /// Returns the octet of storage at `index`, or `None` if it is beyond capacity.
    pub fn get(&self, index: usize) -> Option<&u8> {
        self.as_slice().get(index)
    }

    /// Returns the octet of storage at `index` mutably, or `None` if it is beyond capacity.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut u8> {
        self.as_mut_slice().get_mut(index)
    }

    /// Iterates over the live octets that have not been read.
    ///
    /// Iterating does not consume anything; only reads move the read position.
    pub fn iter(&self) -> std::slice::Iter<'_, u8> {
        self.unread().iter()
    }

    /// Returns the range `offset..offset + len` if it ends within `bound`.
    pub(crate) fn region(
        offset: usize,
        len: usize,
        bound: usize,
    ) -> Result<Range<usize>, Error> {
        match offset.checked_add(len) {
            Some(end) if end <= bound => Ok(offset..end),
            _ => Err(Error::out_of_bounds(offset, len, bound)),
        }
    }

    /// Copies `value` into storage at `offset`.
    ///
    /// An empty `value` always succeeds.
    pub fn set_bytes(&mut self, value: &[u8], offset: usize) -> Result<(), Error> {
        if value.is_empty() {
            return Ok(());
        }
        let range = Self::region(offset, value.len(), self.capacity())?;
        self.as_mut_slice()[range].copy_from_slice(value);
        Ok(())
    }

    /// Copies the octets of `value` into storage at `offset`.
    pub fn set_str(&mut self, value: &str, offset: usize) -> Result<(), Error> {
        self.set_bytes(value.as_bytes(), offset)
    }

    /// Fills `value` from storage at `offset`.
    ///
    /// An empty `value` always succeeds.
    pub fn get_bytes(&self, value: &mut [u8], offset: usize) -> Result<(), Error> {
        if value.is_empty() {
            return Ok(());
        }
        let range = Self::region(offset, value.len(), self.capacity())?;
        value.copy_from_slice(&self.as_slice()[range]);
        Ok(())
    }

    /// Writes `value` in wire order at `offset`.
    pub fn set_value<T: FixedWidth>(&mut self, value: T, offset: usize) -> Result<(), Error> {
        let range = Self::region(offset, T::SIZE, self.capacity())?;
        value.put(&mut self.as_mut_slice()[range]);
        Ok(())
    }

    /// Reads a value in wire order at `offset`.
    pub fn get_value<T: FixedWidth>(&self, offset: usize) -> Result<T, Error> {
        let range = Self::region(offset, T::SIZE, self.capacity())?;
        Ok(T::get(&self.as_slice()[range]))
    }

    /// Copies `value` to the end of the live data.
    pub fn append_bytes(&mut self, value: &[u8]) -> Result<&mut Self, Error> {
        self.set_bytes(value, self.data_length)?;
        self.advance_data_length(value.len());
        Ok(self)
    }

    /// Copies the octets of `value` to the end of the live data.
    pub fn append_str(&mut self, value: &str) -> Result<&mut Self, Error> {
        self.append_bytes(value.as_bytes())
    }

    /// Writes `value` in wire order at the end of the live data.
    pub fn append<T: FixedWidth>(&mut self, value: T) -> Result<&mut Self, Error> {
        self.set_value(value, self.data_length)?;
        self.advance_data_length(T::SIZE);
        Ok(self)
    }

    /// Fills `value` from the unread live data.
    pub fn read_bytes(&mut self, value: &mut [u8]) -> Result<(), Error> {
        let range = Self::region(self.read_position, value.len(), self.data_length)?;
        value.copy_from_slice(&self.as_slice()[range]);
        self.read_position += value.len();
        Ok(())
    }

    /// Reads a value in wire order from the unread live data.
    pub fn read<T: FixedWidth>(&mut self) -> Result<T, Error> {
        let range = Self::region(self.read_position, T::SIZE, self.data_length)?;
        let value = T::get(&self.as_slice()[range]);
        self.read_position += T::SIZE;
        Ok(value)
    }
}

impl Default for DataBuffer<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for DataBuffer<'_> {
    fn clone(&self) -> Self {
        let storage = match self.capacity() {
            0 => Storage::Empty,
            _ => Storage::Owned(self.as_slice().into()),
        };
        Self {
            storage,
            data_length: self.data_length,
            read_position: self.read_position,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        let reusable = matches!(
            &self.storage,
            Storage::Owned(storage) if storage.len() == source.capacity()
        );
        if !reusable {
            *self = source.clone();
            return;
        }
        self.as_mut_slice().copy_from_slice(source.as_slice());
        self.data_length = source.data_length;
        self.read_position = source.read_position;
    }
}

impl PartialEq for DataBuffer<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.data() == other.data()
    }
}

impl Eq for DataBuffer<'_> {}

impl Index<usize> for DataBuffer<'_> {
    type Output = u8;

    fn index(&self, index: usize) -> &u8 {
        &self.as_slice()[index]
    }
}

impl IndexMut<usize> for DataBuffer<'_> {
    fn index_mut(&mut self, index: usize) -> &mut u8 {
        &mut self.as_mut_slice()[index]
    }
}

impl<'b> IntoIterator for &'b DataBuffer<'_> {
    type Item = &'b u8;
    type IntoIter = std::slice::Iter<'b, u8>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for DataBuffer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataBuffer")
            .field("owned", &self.is_owned())
            .field("capacity", &self.capacity())
            .field("data_length", &self.data_length)
            .field("read_position", &self.read_position)
            .finish()
    }
}
