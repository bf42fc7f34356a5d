use std::collections::HashSet;

use crate::client::ConsumerHandle;
use crate::internals::Memoized;
use crate::kafka_types::TopicPartition;

/// Snapshot of the [`TopicPartition`]s assigned to the local Consumer.
///
/// Taken on first use and memoized for the lifetime of [`Self`]:
/// a rebalance happening after that is not reflected.
#[derive(Debug, Default)]
pub struct AssignmentSnapshot {
    assigned: Memoized<HashSet<TopicPartition>>,
}

impl AssignmentSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// The assigned [`TopicPartition`]s, read from the given `consumer` if not yet known.
    ///
    /// Empty if the Consumer has no assignment, or reading it failed.
    pub fn assigned<C: ConsumerHandle>(&self, consumer: &C) -> &HashSet<TopicPartition> {
        self.assigned.get_or_load(|| match consumer.current_assignment() {
            Ok(tps) if tps.is_empty() => {
                info!("Consumer has no partitions assigned");
                HashSet::new()
            },
            Ok(tps) => {
                info!("Consumer has {} partitions assigned", tps.len());
                trace!("Assigned: {:?}", tps);
                tps.into_iter().collect()
            },
            Err(e) => {
                error!("Failed to read Consumer assignment: {e}");
                HashSet::new()
            },
        })
    }
}
