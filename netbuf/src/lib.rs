//! Serialize network data into bounds-checked octet buffers.
//!
//! # Overview
//!
//! A [DataBuffer] is a contiguous region of octets with a data length (how much of it holds live
//! data) and a read position (how much of that data has been consumed). Every access is checked
//! against the relevant bound and fails with an [Error] rather than touching memory it should not.
//!
//! Values are encoded in network byte order:
//! - Fixed-width integers and floats (`u8`..`u64`, `i8`..`i64`, `f32`, `f64`) are big-endian. See
//!   [primitives].
//! - Variable-length integers use 1 to 10 octets with a continuation bit per octet, most
//!   significant group first. See [varint].
//!
//! # Example
//!
//! ```
//! use netbuf::{DataBuffer, Error, RangeCfg};
//!
//! // Build a frame: a type octet, a length-prefixed payload, and a trailing checksum
//! let mut frame = DataBuffer::with_capacity(64)?;
//! let payload = b"hello";
//! frame.append(0x12u8)?;
//! frame.append_var_uint(payload.len() as u64)?;
//! frame.append_bytes(payload)?.append(0xDEADBEEFu32)?;
//! assert_eq!(frame.data_length(), 11);
//!
//! // Parse it back, refusing absurd lengths
//! assert_eq!(frame.read::<u8>()?, 0x12);
//! let len: u16 = frame.read_var_uint_cfg(&RangeCfg::new(..=1500))?;
//! let mut body = vec![0u8; len as usize];
//! frame.read_bytes(&mut body)?;
//! assert_eq!(body, payload);
//! assert_eq!(frame.read::<u32>()?, 0xDEADBEEF);
//!
//! // Nothing is left to read
//! assert!(matches!(frame.read::<u8>(), Err(Error::OutOfBounds { .. })));
//! # Ok::<(), Error>(())
//! ```

mod buf;
pub mod buffer;
pub mod config;
pub mod error;
pub mod hex;
pub mod primitives;
pub mod varint;

pub use buffer::DataBuffer;
pub use config::RangeCfg;
pub use error::Error;
pub use hex::{from_hex, from_hex_formatted};
pub use primitives::FixedWidth;
pub use varint::{SInt, UInt};
