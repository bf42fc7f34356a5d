//! In-memory [`AdminConnector`] and [`ConsumerHandle`], recording the calls they receive.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use rdkafka::error::{KafkaError, RDKafkaErrorCode};

use super::{AdminConnector, ClientError, ClientResult, ConsumerHandle, TopicMetadata};
use crate::kafka_types::{CommittedOffset, TopicPartition, WatermarkOffsets};

pub fn tp(topic: &str, partition: u32) -> TopicPartition {
    TopicPartition::new(topic.to_string(), partition)
}

fn transport_failure() -> ClientError {
    ClientError::Kafka(KafkaError::MetadataFetch(RDKafkaErrorCode::BrokerTransportFailure))
}

/// Answers with the configured partitions, or fails if `None`.
#[derive(Default)]
pub struct MockAdmin {
    pub partitions: Option<Vec<u32>>,
    calls: AtomicUsize,
}

impl MockAdmin {
    pub fn with_partitions(partitions: Vec<u32>) -> Self {
        Self {
            partitions: Some(partitions),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AdminConnector for MockAdmin {
    fn fetch_topic_metadata(
        &self,
        topic: &str,
        _timeout: Duration,
    ) -> ClientResult<Option<TopicMetadata>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.partitions {
            None => Err(transport_failure()),
            Some(ps) => Ok(Some(TopicMetadata {
                name: topic.to_string(),
                partitions: ps.clone(),
            })),
        }
    }
}

/// Consumer state is configured upfront; every `None` or missing entry makes the related call fail.
#[derive(Default)]
pub struct MockConsumer {
    pub assignment: Option<Vec<TopicPartition>>,
    pub cached: HashMap<TopicPartition, WatermarkOffsets>,
    pub live: HashMap<TopicPartition, WatermarkOffsets>,
    pub committed: Option<HashMap<TopicPartition, CommittedOffset>>,
    pub panics_on_committed: bool,

    assignment_reads: AtomicUsize,
    cached_reads: Mutex<Vec<TopicPartition>>,
    live_fetches: Mutex<Vec<TopicPartition>>,
    committed_fetches: AtomicUsize,
}

fn record(calls: &Mutex<Vec<TopicPartition>>, tp: &TopicPartition) {
    calls.lock().unwrap_or_else(PoisonError::into_inner).push(tp.clone());
}

fn recorded(calls: &Mutex<Vec<TopicPartition>>) -> Vec<TopicPartition> {
    calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
}

impl MockConsumer {
    pub fn new() -> Self {
        Self {
            assignment: Some(Vec::new()),
            committed: Some(HashMap::new()),
            ..Default::default()
        }
    }

    pub fn assigned(mut self, tp: TopicPartition, cached: WatermarkOffsets) -> Self {
        self.assignment.get_or_insert_with(Vec::new).push(tp.clone());
        self.cached.insert(tp, cached);
        self
    }

    pub fn live(mut self, tp: TopicPartition, live: WatermarkOffsets) -> Self {
        self.live.insert(tp, live);
        self
    }

    pub fn committed(mut self, tp: TopicPartition, offset: i64) -> Self {
        self.committed.get_or_insert_with(HashMap::new).insert(tp, CommittedOffset::At(offset));
        self
    }

    pub fn failing_committed(mut self) -> Self {
        self.committed = None;
        self
    }

    pub fn panicking_committed(mut self) -> Self {
        self.panics_on_committed = true;
        self
    }

    pub fn failing_assignment(mut self) -> Self {
        self.assignment = None;
        self
    }

    pub fn assignment_reads(&self) -> usize {
        self.assignment_reads.load(Ordering::SeqCst)
    }

    pub fn cached_reads(&self) -> Vec<TopicPartition> {
        recorded(&self.cached_reads)
    }

    pub fn live_fetches(&self) -> Vec<TopicPartition> {
        recorded(&self.live_fetches)
    }

    pub fn committed_fetches(&self) -> usize {
        self.committed_fetches.load(Ordering::SeqCst)
    }

    pub fn network_calls(&self) -> usize {
        self.live_fetches().len() + self.committed_fetches()
    }
}

impl ConsumerHandle for MockConsumer {
    fn current_assignment(&self) -> ClientResult<Vec<TopicPartition>> {
        self.assignment_reads.fetch_add(1, Ordering::SeqCst);
        self.assignment.clone().ok_or_else(transport_failure)
    }

    fn cached_watermarks(&self, tp: &TopicPartition) -> ClientResult<WatermarkOffsets> {
        record(&self.cached_reads, tp);
        self.cached.get(tp).copied().ok_or_else(transport_failure)
    }

    fn fetch_watermarks(
        &self,
        tp: &TopicPartition,
        _timeout: Duration,
    ) -> ClientResult<WatermarkOffsets> {
        record(&self.live_fetches, tp);
        self.live.get(tp).copied().ok_or_else(transport_failure)
    }

    fn committed_offsets(
        &self,
        tps: &[TopicPartition],
        _timeout: Duration,
    ) -> ClientResult<HashMap<TopicPartition, CommittedOffset>> {
        self.committed_fetches.fetch_add(1, Ordering::SeqCst);
        if self.panics_on_committed {
            panic!("Consumer driven into an unexpected state");
        }

        let committed = self.committed.as_ref().ok_or_else(|| {
            ClientError::Kafka(KafkaError::OffsetFetch(RDKafkaErrorCode::RequestTimedOut))
        })?;

        // Like the Brokers do, answer for every requested partition
        Ok(tps
            .iter()
            .map(|tp| (tp.clone(), committed.get(tp).copied().unwrap_or_default()))
            .collect())
    }
}
