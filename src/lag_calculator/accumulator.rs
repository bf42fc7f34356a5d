use crate::kafka_types::{CommittedOffset, TopicPartition, WatermarkOffsets};

/// Lag of a single [`TopicPartition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionLag {
    pub topic_partition: TopicPartition,
    pub lag: i64,
}

impl PartitionLag {
    /// Lag of a Topic Partition, given its watermarks and the offset committed by the Consumer Group.
    ///
    /// * If an offset was committed, the lag is `high - committed`.
    /// * Otherwise nothing was consumed yet, and the lag is the whole retained backlog, `high - low`.
    ///
    /// The result is not clamped: a committed offset ahead of the `high` watermark
    /// (i.e. stale watermarks) produces a negative lag.
    /// An unset watermark bound counts as `0`.
    pub fn new(
        topic_partition: TopicPartition,
        watermarks: WatermarkOffsets,
        committed: CommittedOffset,
    ) -> Self {
        let lag = match committed {
            CommittedOffset::At(offset) => watermarks.high_or_zero() - offset,
            CommittedOffset::Unset => watermarks.high_or_zero() - watermarks.low_or_zero(),
        };

        Self {
            topic_partition,
            lag,
        }
    }
}

/// Reduction of multiple [`PartitionLag`] into a total.
///
/// It also keeps track of the [`PartitionLag`] with the highest lag: if more than one
/// has the same highest lag, the first one added wins.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LagAccumulator {
    pub total_lag: i64,
    pub partition_count: usize,
    pub highest: Option<PartitionLag>,
}

impl LagAccumulator {
    pub fn add(mut self, pl: PartitionLag) -> Self {
        self.total_lag += pl.lag;
        self.partition_count += 1;

        let is_new_highest = match &self.highest {
            None => true,
            Some(h) => pl.lag > h.lag,
        };
        if is_new_highest {
            self.highest = Some(pl);
        }

        self
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::constants::OFFSET_UNSET;

    fn tp(p: u32) -> TopicPartition {
        TopicPartition::new("t".to_string(), p)
    }

    #[test]
    fn lag_with_committed_offset() {
        let pl = PartitionLag::new(tp(0), WatermarkOffsets::new(0, 100), CommittedOffset::At(80));
        assert_eq!(pl.lag, 20);

        let pl = PartitionLag::new(tp(0), WatermarkOffsets::new(40, 100), CommittedOffset::At(10));
        assert_eq!(pl.lag, 90);
    }

    #[test]
    fn lag_ahead_of_high_watermark_is_negative() {
        let pl = PartitionLag::new(tp(0), WatermarkOffsets::new(0, 100), CommittedOffset::At(103));
        assert_eq!(pl.lag, -3);
    }

    #[test]
    fn lag_without_committed_offset_is_whole_backlog() {
        let pl = PartitionLag::new(tp(1), WatermarkOffsets::new(0, 50), CommittedOffset::Unset);
        assert_eq!(pl.lag, 50);

        let pl = PartitionLag::new(tp(1), WatermarkOffsets::new(30, 50), CommittedOffset::Unset);
        assert_eq!(pl.lag, 20);
    }

    #[test]
    fn lag_with_unset_bounds() {
        let pl = PartitionLag::new(
            tp(1),
            WatermarkOffsets::new(OFFSET_UNSET, 50),
            CommittedOffset::Unset,
        );
        assert_eq!(pl.lag, 50);

        let pl = PartitionLag::new(tp(1), WatermarkOffsets::unset(), CommittedOffset::Unset);
        assert_eq!(pl.lag, 0);
    }

    #[test]
    fn accumulates_total_and_highest() {
        let acc = [(0, 20), (1, 50), (2, -5), (3, 50)]
            .into_iter()
            .map(|(p, lag)| PartitionLag {
                topic_partition: tp(p),
                lag,
            })
            .fold(LagAccumulator::default(), LagAccumulator::add);

        assert_eq!(acc.total_lag, 115);
        assert_eq!(acc.partition_count, 4);
        assert_eq!(
            acc.highest,
            Some(PartitionLag {
                topic_partition: tp(1),
                lag: 50
            })
        );
    }

    #[test]
    fn empty_accumulator() {
        let acc = LagAccumulator::default();
        assert_eq!(acc.total_lag, 0);
        assert_eq!(acc.partition_count, 0);
        assert_eq!(acc.highest, None);
    }
}
