//! [bytes] integration.
//!
//! A [DataBuffer] is a [Buf] over its unread octets and a [BufMut] over the headroom between the
//! end of its data and its capacity, so it can be handed to anything that reads or writes through
//! those traits.

use crate::DataBuffer;
use bytes::{buf::UninitSlice, Buf, BufMut, Bytes};

impl DataBuffer<'_> {
    /// Copies the live octets into a new [Bytes].
    pub fn to_bytes(&self) -> Bytes {
        Bytes::copy_from_slice(self.data())
    }
}

impl Buf for DataBuffer<'_> {
    fn remaining(&self) -> usize {
        self.unread_length()
    }

    fn chunk(&self) -> &[u8] {
        self.unread()
    }

    fn advance(&mut self, cnt: usize) {
        if let Err(err) = self.advance_read_position(cnt) {
            panic!("cannot advance past the end of the data: {err}");
        }
    }
}

unsafe impl BufMut for DataBuffer<'_> {
    fn remaining_mut(&self) -> usize {
        self.capacity() - self.data_length()
    }

    unsafe fn advance_mut(&mut self, cnt: usize) {
        assert!(
            cnt <= self.remaining_mut(),
            "cannot advance past capacity: {cnt} > {}",
            self.remaining_mut()
        );
        self.advance_data_length(cnt);
    }

    fn chunk_mut(&mut self) -> &mut UninitSlice {
        let start = self.data_length();
        UninitSlice::new(&mut self.as_mut_slice()[start..])
    }
}
