use std::time::Duration;

use crate::client::AdminConnector;
#[cfg(test)]
use crate::internals::Memo;
use crate::internals::Memoized;
use crate::kafka_types::TopicPartition;

/// Determines all the [`TopicPartition`]s that exist for a Topic, according to the Brokers.
///
/// The set is fetched on first use and memoized for the lifetime of [`Self`].
/// Every failure is logged and recovered as an empty set.
pub struct TopicPartitionsFetcher<A> {
    admin: A,
    topic: String,
    timeout: Duration,
    partitions: Memoized<Vec<TopicPartition>>,
}

impl<A: AdminConnector> TopicPartitionsFetcher<A> {
    /// Create a new [`TopicPartitionsFetcher`]
    ///
    /// # Arguments
    ///
    /// * `admin` - Connector used to request Topic metadata
    /// * `topic` - Topic to fetch the Partitions of
    /// * `timeout` - Timeout for the metadata request
    pub fn new(admin: A, topic: String, timeout: Duration) -> Self {
        Self {
            admin,
            topic,
            timeout,
            partitions: Memoized::new(),
        }
    }

    /// All [`TopicPartition`]s of the Topic, ordered by partition.
    ///
    /// Empty if the Topic could not be found, or its metadata could not be fetched.
    pub fn partitions(&self) -> &[TopicPartition] {
        self.partitions.get_or_load(|| self.fetch())
    }

    #[cfg(test)]
    pub fn is_loaded(&self) -> bool {
        matches!(self.partitions.state(), Memo::Loaded(_))
    }

    fn fetch(&self) -> Vec<TopicPartition> {
        match self.admin.fetch_topic_metadata(&self.topic, self.timeout) {
            Ok(Some(tm)) if !tm.partitions.is_empty() => {
                let mut tps = tm
                    .partitions
                    .iter()
                    .map(|p| TopicPartition::new(tm.name.clone(), *p))
                    .collect::<Vec<TopicPartition>>();
                tps.sort();

                info!("Topic '{}' has {} partitions", tm.name, tps.len());
                tps
            },
            Ok(Some(_)) => {
                error!("Topic '{}' has no partitions", self.topic);
                Vec::new()
            },
            Ok(None) => {
                error!("Topic '{}' not found in cluster metadata", self.topic);
                Vec::new()
            },
            Err(e) => {
                error!("Failed to fetch metadata of Topic '{}': {e}", self.topic);
                Vec::new()
            },
        }
    }
}
