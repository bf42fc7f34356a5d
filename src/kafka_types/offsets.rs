use rdkafka::Offset;

use crate::constants::OFFSET_UNSET;

/// Earliest (`low`) and one-past-the-latest (`high`) offsets retained by a Topic Partition.
///
/// Either bound can be [`OFFSET_UNSET`], when the client doesn't know it (yet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatermarkOffsets {
    pub low: i64,
    pub high: i64,
}

impl WatermarkOffsets {
    pub fn new(low: i64, high: i64) -> Self {
        Self {
            low,
            high,
        }
    }

    /// Both bounds unknown.
    #[cfg(test)]
    pub fn unset() -> Self {
        Self::new(OFFSET_UNSET, OFFSET_UNSET)
    }

    pub fn is_low_unset(&self) -> bool {
        self.low == OFFSET_UNSET
    }

    pub fn is_high_unset(&self) -> bool {
        self.high == OFFSET_UNSET
    }

    /// Low bound, or `0` when unset.
    pub(crate) fn low_or_zero(&self) -> i64 {
        if self.is_low_unset() {
            0
        } else {
            self.low
        }
    }

    /// High bound, or `0` when unset.
    pub(crate) fn high_or_zero(&self) -> i64 {
        if self.is_high_unset() {
            0
        } else {
            self.high
        }
    }
}

impl From<(i64, i64)> for WatermarkOffsets {
    fn from((low, high): (i64, i64)) -> Self {
        Self::new(low, high)
    }
}

/// Offset committed by a Consumer Group for a Topic Partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CommittedOffset {
    /// The Consumer Group never committed for the Topic Partition.
    #[default]
    Unset,

    /// Offset of the next record the Consumer Group will consume.
    At(i64),
}

impl CommittedOffset {
    pub fn is_unset(&self) -> bool {
        matches!(self, CommittedOffset::Unset)
    }
}

impl From<Offset> for CommittedOffset {
    /// Only [`Offset::Offset`] is an actual commit: every logical offset
    /// (`Invalid`, `Beginning`, `End`, `Stored`, ...) means nothing was committed.
    fn from(o: Offset) -> Self {
        match o {
            Offset::Offset(v) if v != OFFSET_UNSET => CommittedOffset::At(v),
            _ => CommittedOffset::Unset,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn committed_offset_from_rdkafka_offset() {
        assert_eq!(CommittedOffset::from(Offset::Offset(42)), CommittedOffset::At(42));
        assert_eq!(CommittedOffset::from(Offset::Offset(0)), CommittedOffset::At(0));
        assert_eq!(CommittedOffset::from(Offset::Invalid), CommittedOffset::Unset);
        assert_eq!(CommittedOffset::from(Offset::Beginning), CommittedOffset::Unset);
        assert_eq!(CommittedOffset::from(Offset::Stored), CommittedOffset::Unset);
    }

    #[test]
    fn unset_watermark_bounds() {
        let w = WatermarkOffsets::unset();
        assert!(w.is_low_unset());
        assert!(w.is_high_unset());
        assert_eq!((w.low_or_zero(), w.high_or_zero()), (0, 0));

        let w = WatermarkOffsets::new(OFFSET_UNSET, 17);
        assert!(w.is_low_unset());
        assert!(!w.is_high_unset());
        assert_eq!((w.low_or_zero(), w.high_or_zero()), (0, 17));
    }
}
