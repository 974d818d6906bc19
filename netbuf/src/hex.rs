//! Hexadecimal helpers and the diagnostic dump of a [DataBuffer].
//!
//! The dump renders the unread octets 16 per line:
//!
//! ```text
//! 00000000: 00 01 02 03 48 69                               :....Hi          :
//! ```

use crate::DataBuffer;
use std::fmt::{self, Write};

/// Number of octets rendered on each line of a dump.
const OCTETS_PER_LINE: usize = 16;

/// Returns the value of a single hexadecimal digit.
fn nibble(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}

/// Converts a hexadecimal string to bytes.
///
/// Returns `None` if the string has an odd number of digits or any character that is not a
/// hexadecimal digit.
pub fn from_hex(hex: &str) -> Option<Vec<u8>> {
    let digits = hex.as_bytes();
    if digits.len() % 2 != 0 {
        return None;
    }
    digits
        .chunks_exact(2)
        .map(|pair| Some((nibble(pair[0])? << 4) | nibble(pair[1])?))
        .collect()
}

/// Converts a hexadecimal string to bytes after dropping ASCII whitespace and a leading `0x`.
///
/// Lets wire captures be written grouped by field, e.g. `"12 0003 DEADBEEF"`.
pub fn from_hex_formatted(hex: &str) -> Option<Vec<u8>> {
    let digits: String = hex.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    from_hex(digits.strip_prefix("0x").unwrap_or(&digits))
}

fn printable(octet: u8) -> char {
    match octet {
        0x20..=0x7E => octet as char,
        _ => '.',
    }
}

/// Renders the unread octets as offset, hex columns, and an ASCII gutter.
///
/// Offsets count from the read position. An empty window renders nothing.
impl fmt::Display for DataBuffer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (line, chunk) in self.unread().chunks(OCTETS_PER_LINE).enumerate() {
            write!(f, "{:08X}:", line * OCTETS_PER_LINE)?;
            for octet in chunk {
                write!(f, " {:02X}", octet)?;
            }
            for _ in chunk.len()..OCTETS_PER_LINE {
                f.write_str("   ")?;
            }
            f.write_str(" :")?;
            for &octet in chunk {
                f.write_char(printable(octet))?;
            }
            for _ in chunk.len()..OCTETS_PER_LINE {
                f.write_char(' ')?;
            }
            f.write_str(":\n")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(from_hex("").unwrap(), Vec::<u8>::new());
        assert_eq!(from_hex("00").unwrap(), vec![0x00]);
        assert_eq!(from_hex("DEADbeef").unwrap(), vec![0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(from_hex("81808000").unwrap(), vec![0x81, 0x80, 0x80, 0x00]);

        // Odd digit count
        assert!(from_hex("0102030").is_none());

        // Not a digit
        assert!(from_hex("01g3").is_none());
        assert!(from_hex("0x01").is_none());
        assert!(from_hex("0é0").is_none());
    }

    #[test]
    fn test_from_hex_formatted() {
        let b = vec![0x01, 0x02, 0x03];
        assert_eq!(from_hex_formatted("01 02 03").unwrap(), b);
        assert_eq!(from_hex_formatted("0x010203").unwrap(), b);
        assert_eq!(from_hex_formatted("    \n\n0x\r\n01\t02\n03\n").unwrap(), b);
        assert!(from_hex_formatted("0x0102030").is_none());
    }

    #[test]
    fn test_dump_empty() {
        assert_eq!(DataBuffer::new().to_string(), "");

        let mut buffer = DataBuffer::with_capacity(4).unwrap();
        buffer.append(1u16).unwrap();
        buffer.read::<u16>().unwrap();
        assert_eq!(buffer.to_string(), "");
    }

    #[test]
    fn test_dump_partial_line() {
        let mut buffer = DataBuffer::with_capacity(64).unwrap();
        buffer.append_bytes(&[0x00, 0x01, 0x02, 0x03]).unwrap();
        buffer.append_str("Hi").unwrap();
        assert_eq!(
            buffer.to_string(),
            "00000000: 00 01 02 03 48 69                               :....Hi          :\n"
        );

        let mut storage = [0xFF, 0xFF, 0x00, 0x00, 0x00, 0x01];
        let buffer = DataBuffer::from_slice(&mut storage);
        assert_eq!(
            buffer.to_string(),
            "00000000: FF FF 00 00 00 01                               :......          :\n"
        );
    }

    #[test]
    fn test_dump_multiple_lines() {
        let text = "The quick brown fox jumps over the lazy dog";
        let mut buffer = DataBuffer::with_capacity(64).unwrap();
        buffer.append_str(text).unwrap();

        let expected = concat!(
            "00000000: 54 68 65 20 71 75 69 63 6B 20 62 72 6F 77 6E 20 :The quick brown :\n",
            "00000010: 66 6F 78 20 6A 75 6D 70 73 20 6F 76 65 72 20 74 :fox jumps over t:\n",
            "00000020: 68 65 20 6C 61 7A 79 20 64 6F 67                :he lazy dog     :\n",
        );
        assert_eq!(buffer.to_string(), expected);
    }

    #[test]
    fn test_dump_starts_at_read_position() {
        let mut buffer = DataBuffer::with_capacity(64).unwrap();
        buffer.append(0xDEADBEEFu32).unwrap();
        buffer.append_str("ok").unwrap();
        buffer.read::<u32>().unwrap();
        assert_eq!(
            buffer.to_string(),
            "00000000: 6F 6B                                           :ok              :\n"
        );
    }
}
