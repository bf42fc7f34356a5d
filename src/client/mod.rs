//! Narrow capabilities required from the Kafka clients.
//!
//! The rest of the service only depends on [`AdminConnector`] and [`ConsumerHandle`],
//! never on the concrete `rdkafka` clients: this keeps the threading model of the
//! underlying clients out of the lag computation.

// Inner modules
mod admin;
mod consumer;
mod errors;
#[cfg(test)]
pub(crate) mod mock;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::kafka_types::{CommittedOffset, TopicPartition, WatermarkOffsets};

// Exports
pub use admin::KafkaAdminConnector;
pub use errors::{ClientError, ClientResult};

/// Partitions of a Topic, as reported by the Brokers metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TopicMetadata {
    pub name: String,
    pub partitions: Vec<u32>,
}

/// Administrative access to the Kafka cluster.
pub trait AdminConnector {
    /// Fetch metadata of the given `topic`.
    ///
    /// Returns `Ok(None)` if the Brokers know nothing about the Topic.
    /// Every call acquires its own connection and releases it before returning.
    fn fetch_topic_metadata(
        &self,
        topic: &str,
        timeout: Duration,
    ) -> ClientResult<Option<TopicMetadata>>;
}

/// Operations of a long-lived Consumer used to estimate its lag.
///
/// Implementations wrap a client that must NOT be driven by two threads at once:
/// callers are required to serialize every access, including the host's own consumption.
pub trait ConsumerHandle {
    /// Topic Partitions currently assigned to the Consumer. No network round-trip.
    fn current_assignment(&self) -> ClientResult<Vec<TopicPartition>>;

    /// Watermarks locally cached by the Consumer for an assigned Topic Partition. No network round-trip.
    fn cached_watermarks(&self, tp: &TopicPartition) -> ClientResult<WatermarkOffsets>;

    /// Watermarks queried to the Partition leader.
    fn fetch_watermarks(
        &self,
        tp: &TopicPartition,
        timeout: Duration,
    ) -> ClientResult<WatermarkOffsets>;

    /// Offsets committed by the Consumer Group for all the given Topic Partitions, in one request.
    fn committed_offsets(
        &self,
        tps: &[TopicPartition],
        timeout: Duration,
    ) -> ClientResult<HashMap<TopicPartition, CommittedOffset>>;
}

impl<T: AdminConnector + ?Sized> AdminConnector for &T {
    fn fetch_topic_metadata(
        &self,
        topic: &str,
        timeout: Duration,
    ) -> ClientResult<Option<TopicMetadata>> {
        (**self).fetch_topic_metadata(topic, timeout)
    }
}

impl<T: AdminConnector + ?Sized> AdminConnector for Arc<T> {
    fn fetch_topic_metadata(
        &self,
        topic: &str,
        timeout: Duration,
    ) -> ClientResult<Option<TopicMetadata>> {
        (**self).fetch_topic_metadata(topic, timeout)
    }
}

impl<T: ConsumerHandle + ?Sized> ConsumerHandle for &T {
    fn current_assignment(&self) -> ClientResult<Vec<TopicPartition>> {
        (**self).current_assignment()
    }

    fn cached_watermarks(&self, tp: &TopicPartition) -> ClientResult<WatermarkOffsets> {
        (**self).cached_watermarks(tp)
    }

    fn fetch_watermarks(
        &self,
        tp: &TopicPartition,
        timeout: Duration,
    ) -> ClientResult<WatermarkOffsets> {
        (**self).fetch_watermarks(tp, timeout)
    }

    fn committed_offsets(
        &self,
        tps: &[TopicPartition],
        timeout: Duration,
    ) -> ClientResult<HashMap<TopicPartition, CommittedOffset>> {
        (**self).committed_offsets(tps, timeout)
    }
}

/// A Consumer shared with the host, that keeps using it for consumption.
impl<T: ConsumerHandle + ?Sized> ConsumerHandle for Arc<T> {
    fn current_assignment(&self) -> ClientResult<Vec<TopicPartition>> {
        (**self).current_assignment()
    }

    fn cached_watermarks(&self, tp: &TopicPartition) -> ClientResult<WatermarkOffsets> {
        (**self).cached_watermarks(tp)
    }

    fn fetch_watermarks(
        &self,
        tp: &TopicPartition,
        timeout: Duration,
    ) -> ClientResult<WatermarkOffsets> {
        (**self).fetch_watermarks(tp, timeout)
    }

    fn committed_offsets(
        &self,
        tps: &[TopicPartition],
        timeout: Duration,
    ) -> ClientResult<HashMap<TopicPartition, CommittedOffset>> {
        (**self).committed_offsets(tps, timeout)
    }
}
