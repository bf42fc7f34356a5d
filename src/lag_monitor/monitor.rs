use std::time::Duration;

use chrono::Utc;

use super::metrics::{LagMetrics, LastCalculatedMetrics};
use crate::client::{AdminConnector, ConsumerHandle};
use crate::lag_calculator::LagCalculator;
use crate::partition_sets::{AssignmentSnapshot, TopicPartitionsFetcher};

/// Computes the aggregated [`LagMetrics`] of a Consumer over a single Topic.
///
/// Every call to [`LagMonitor::compute_metrics`] is a "metrics cycle":
///
/// 1. all the Partitions of the Topic are determined (once, then memoized)
/// 2. the Partitions assigned to the Consumer are determined (once, then memoized)
/// 3. the lag is calculated over all the Partitions, via [`LagCalculator`]
/// 4. the result is stored in [`LastCalculatedMetrics`], and returned
///
/// A cycle never fails: every error is logged, and the cycle degrades to [`LagMetrics::DEGRADED`].
///
/// The Consumer is not driven concurrently by [`Self`]: cycles require exclusive access
/// (`&mut self`). If the host keeps consuming with the same Consumer, it's on the host
/// to coordinate with the cycles.
pub struct LagMonitor<A, C> {
    topic: String,
    consumer: C,
    topic_partitions: TopicPartitionsFetcher<A>,
    assignment: AssignmentSnapshot,
    calculator: LagCalculator,
    last_calculated: LastCalculatedMetrics,
}

impl<A, C> LagMonitor<A, C>
where
    A: AdminConnector,
    C: ConsumerHandle,
{
    /// Create a new [`LagMonitor`]
    ///
    /// # Arguments
    ///
    /// * `topic` - Topic consumed by `consumer`
    /// * `admin` - Connector used to fetch the Topic metadata
    /// * `consumer` - Consumer to compute the lag of
    /// * `timeout` - Timeout applied to every single request to the Kafka cluster
    pub fn new(topic: String, admin: A, consumer: C, timeout: Duration) -> Self {
        Self {
            topic_partitions: TopicPartitionsFetcher::new(admin, topic.clone(), timeout),
            topic,
            consumer,
            assignment: AssignmentSnapshot::new(),
            calculator: LagCalculator::new(timeout),
            last_calculated: LastCalculatedMetrics::default(),
        }
    }

    /// Run a metrics cycle.
    ///
    /// Blocks for as long as the requests to the Kafka cluster take.
    pub fn compute_metrics(&mut self) -> LagMetrics {
        let cycle_start = Utc::now();
        debug!("Metrics cycle of Topic '{}' started at {}", self.topic, cycle_start);

        let metrics = self.run_cycle();

        let cycle_end = Utc::now();
        self.last_calculated.set(metrics, cycle_end);

        info!(
            "Metrics cycle of Topic '{}': total lag {}, {} partitions (took {}ms)",
            self.topic,
            metrics.total_lag,
            metrics.partition_count,
            (cycle_end - cycle_start).num_milliseconds()
        );
        metrics
    }

    /// View over the [`LagMetrics`] of the latest cycle, usable without running a new one.
    pub fn last_calculated_metrics(&self) -> LastCalculatedMetrics {
        self.last_calculated.clone()
    }

    fn run_cycle(&self) -> LagMetrics {
        let partitions = self.topic_partitions.partitions();
        if partitions.is_empty() {
            warn!("No partitions known for Topic '{}': skipping lag calculation", self.topic);
            return LagMetrics::DEGRADED;
        }

        let assigned = self.assignment.assigned(&self.consumer);

        match self.calculator.calculate(&self.consumer, partitions, assigned) {
            Ok(acc) => {
                if let Some(highest) = &acc.highest {
                    info!(
                        "Partition with highest lag: '{}' ({})",
                        highest.topic_partition, highest.lag
                    );
                }
                debug_assert_eq!(acc.partition_count, partitions.len());
                LagMetrics::new(acc.total_lag, acc.partition_count)
            },
            Err(e) => {
                error!("Failed to calculate lag of Topic '{}': {e}", self.topic);
                LagMetrics::DEGRADED
            },
        }
    }
}
