use std::collections::HashSet;
use std::time::Duration;

use super::accumulator::{LagAccumulator, PartitionLag};
use super::errors::{LagCalculatorError, LagCalculatorResult};
use crate::client::ConsumerHandle;
use crate::kafka_types::{CommittedOffset, TopicPartition, WatermarkOffsets};

/// Calculates the lag of a Consumer over a set of [`TopicPartition`]s.
///
/// For every Topic Partition, the lag is determined by combining its watermarks with
/// the offset committed by the Consumer Group (see [`PartitionLag::new`]).
///
/// Where the watermarks are read from depends on the Topic Partition being assigned
/// to the Consumer or not:
///
/// * assigned: the Consumer local cache is used, unless it looks untrustworthy
///   (see [`LagCalculator::is_untrustworthy`]), in which case it's fetched from the Brokers;
/// * unassigned: always fetched from the Brokers, as the Consumer has no cache for it.
///
/// Requests to the Brokers are issued one at a time, each bound by the configured timeout.
#[derive(Debug, Clone)]
pub struct LagCalculator {
    timeout: Duration,
}

impl LagCalculator {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
        }
    }

    /// Calculate the lag of `consumer` over `partitions`.
    ///
    /// Partitions in `assigned` are processed first, followed by the rest; each group
    /// preserves the order of `partitions`.
    ///
    /// # Arguments
    ///
    /// * `consumer` - Consumer to calculate the lag of
    /// * `partitions` - All the Topic Partitions to calculate the lag for
    /// * `assigned` - Topic Partitions currently assigned to `consumer`
    pub fn calculate<C: ConsumerHandle>(
        &self,
        consumer: &C,
        partitions: &[TopicPartition],
        assigned: &HashSet<TopicPartition>,
    ) -> LagCalculatorResult<LagAccumulator> {
        let committed = consumer
            .committed_offsets(partitions, self.timeout)
            .map_err(|e| LagCalculatorError::CommittedOffsets(partitions.len(), e))?;

        let (assigned_tps, unassigned_tps): (Vec<&TopicPartition>, Vec<&TopicPartition>) =
            partitions.iter().partition(|tp| assigned.contains(*tp));
        debug!(
            "Calculating lag of {} assigned and {} unassigned partitions",
            assigned_tps.len(),
            unassigned_tps.len()
        );

        assigned_tps
            .into_iter()
            .map(|tp| (tp, true))
            .chain(unassigned_tps.into_iter().map(|tp| (tp, false)))
            .try_fold(
                LagAccumulator::default(),
                |acc, (tp, is_assigned)| -> LagCalculatorResult<LagAccumulator> {
                    let committed_offset = committed.get(tp).copied().unwrap_or_default();

                    let watermarks = if is_assigned {
                        self.assigned_watermarks(consumer, tp, committed_offset)?
                    } else {
                        self.live_watermarks(consumer, tp)?
                    };

                    let pl = PartitionLag::new(tp.clone(), watermarks, committed_offset);
                    trace!(
                        "Partition '{}': watermarks {:?}, committed {:?}, lag {}",
                        tp,
                        watermarks,
                        committed_offset,
                        pl.lag
                    );

                    Ok(acc.add(pl))
                },
            )
    }

    /// Cached watermarks of an assigned partition, or live ones if the cache can't be trusted.
    fn assigned_watermarks<C: ConsumerHandle>(
        &self,
        consumer: &C,
        tp: &TopicPartition,
        committed: CommittedOffset,
    ) -> LagCalculatorResult<WatermarkOffsets> {
        match consumer.cached_watermarks(tp) {
            Ok(cached) if !Self::is_untrustworthy(&cached, committed) => Ok(cached),
            Ok(cached) => {
                debug!("Cached watermarks of '{tp}' untrustworthy ({:?}): fetching", cached);
                self.live_watermarks(consumer, tp)
            },
            Err(e) => {
                debug!("Cached watermarks of '{tp}' unavailable ({e}): fetching");
                self.live_watermarks(consumer, tp)
            },
        }
    }

    fn live_watermarks<C: ConsumerHandle>(
        &self,
        consumer: &C,
        tp: &TopicPartition,
    ) -> LagCalculatorResult<WatermarkOffsets> {
        consumer
            .fetch_watermarks(tp, self.timeout)
            .map_err(|e| LagCalculatorError::Watermarks(tp.clone(), e))
    }

    /// Cached watermarks are not trusted when both bounds are unknown, or when
    /// the low bound is `0` but nothing was committed: the Consumer likely didn't
    /// fetch anything for the partition yet.
    pub(crate) fn is_untrustworthy(cached: &WatermarkOffsets, committed: CommittedOffset) -> bool {
        (cached.is_low_unset() && cached.is_high_unset()) || (cached.low == 0 && committed.is_unset())
    }
}
