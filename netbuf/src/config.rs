//! Decode-time configuration.
//!
//! Decoding a varint into a narrower type already rejects values outside that type's range.
//! A [RangeCfg] tightens the check further, e.g. to bound a length prefix read from untrusted
//! input before it is used to size anything.

use crate::Error;
use core::ops::{self, Bound, RangeBounds};

/// Configuration for limiting the range of a decoded value.
///
/// # Examples
///
/// ```
/// use netbuf::{DataBuffer, Error, RangeCfg};
///
/// let mut buffer = DataBuffer::with_capacity(16).unwrap();
/// buffer.append_var_uint(2000u32).unwrap();
///
/// // Accept lengths up to 1500 octets
/// let cfg = RangeCfg::new(0..=1500u32);
/// assert!(matches!(
///     buffer.read_var_uint_cfg(&cfg),
///     Err(Error::VarintRangeExceeded)
/// ));
///
/// // A failed read does not move the read position
/// assert_eq!(buffer.read_position(), 0);
/// assert_eq!(buffer.read_var_uint::<u32>().unwrap(), 2000);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct RangeCfg<T: Copy + PartialOrd> {
    /// The lower bound of the range.
    start: Bound<T>,

    /// The upper bound of the range.
    end: Bound<T>,
}

macro_rules! impl_from_range {
    ($($range:ident),+) => {
        $(
            impl<T: Copy + PartialOrd> From<ops::$range<T>> for RangeCfg<T> {
                fn from(r: ops::$range<T>) -> Self {
                    Self::new(r)
                }
            }
        )+
    };
}

impl_from_range!(Range, RangeInclusive, RangeFrom, RangeTo, RangeToInclusive);

impl<T: Copy + PartialOrd> From<ops::RangeFull> for RangeCfg<T> {
    fn from(_: ops::RangeFull) -> Self {
        Self::new(..)
    }
}

impl<T: Copy + PartialOrd> RangeCfg<T> {
    /// Creates a new `RangeCfg` from any type implementing `RangeBounds<T>`.
    pub fn new(r: impl RangeBounds<T>) -> Self {
        RangeCfg {
            start: r.start_bound().cloned(),
            end: r.end_bound().cloned(),
        }
    }

    /// Creates a `RangeCfg` that only accepts exactly `value`.
    pub fn exact(value: T) -> Self {
        Self {
            start: Bound::Included(value),
            end: Bound::Included(value),
        }
    }

    /// Returns true if the value is within this range.
    pub fn contains(&self, value: &T) -> bool {
        match &self.start {
            Bound::Included(s) if value < s => return false,
            Bound::Excluded(s) if value <= s => return false,
            _ => {}
        }
        match &self.end {
            Bound::Included(e) if value > e => return false,
            Bound::Excluded(e) if value >= e => return false,
            _ => {}
        }
        true
    }

    /// Returns `value` if it is within this range, else [Error::VarintRangeExceeded].
    pub fn check(&self, value: T) -> Result<T, Error> {
        if !self.contains(&value) {
            return Err(Error::VarintRangeExceeded);
        }
        Ok(value)
    }
}

impl<T: Copy + PartialOrd> RangeBounds<T> for RangeCfg<T> {
    fn start_bound(&self) -> Bound<&T> {
        self.start.as_ref()
    }

    fn end_bound(&self) -> Bound<&T> {
        self.end.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::ops::Bound::{Excluded, Included, Unbounded};

    #[test]
    fn test_range_cfg_from() {
        let cfg: RangeCfg<u64> = (..).into();
        assert_eq!(cfg.start_bound(), Unbounded);
        assert_eq!(cfg.end_bound(), Unbounded);

        let cfg: RangeCfg<u64> = (5..10).into();
        assert_eq!(cfg.start_bound(), Included(&5));
        assert_eq!(cfg.end_bound(), Excluded(&10));

        let cfg: RangeCfg<i64> = (-5..=10).into();
        assert_eq!(cfg.start_bound(), Included(&-5));
        assert_eq!(cfg.end_bound(), Included(&10));

        let cfg: RangeCfg<u16> = (..=1500).into();
        assert_eq!(cfg.start_bound(), Unbounded);
        assert_eq!(cfg.end_bound(), Included(&1500));
    }

    #[test]
    fn test_contains() {
        let cfg = RangeCfg::new(5u32..10);
        assert!(!cfg.contains(&4));
        assert!(cfg.contains(&5));
        assert!(cfg.contains(&9));
        assert!(!cfg.contains(&10));

        let cfg = RangeCfg::new(-128i64..);
        assert!(!cfg.contains(&-129));
        assert!(cfg.contains(&-128));
        assert!(cfg.contains(&i64::MAX));

        let cfg = RangeCfg::exact(7u8);
        assert!(cfg.contains(&7));
        assert!(!cfg.contains(&6));
        assert!(!cfg.contains(&8));
    }

    #[test]
    fn test_contains_empty_range() {
        let cfg: RangeCfg<u64> = (5..5).into();
        assert!(!cfg.contains(&4));
        assert!(!cfg.contains(&5));
        assert!(!cfg.contains(&6));
    }

    #[test]
    fn test_check() {
        let cfg = RangeCfg::new(0u64..=1500);
        assert_eq!(cfg.check(1500), Ok(1500));
        assert_eq!(cfg.check(1501), Err(Error::VarintRangeExceeded));
    }
}
