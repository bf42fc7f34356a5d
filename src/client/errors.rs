use rdkafka::error::KafkaError;
use thiserror::Error;

/// Possible errors from the [`super`] client capabilities.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Failed to allocate a Kafka client from the given configuration.
    #[error("Failed to create Kafka client: {0}")]
    Creation(#[source] KafkaError),

    /// A request issued to the Kafka cluster failed (network, timeout, authorization, ...).
    #[error("Kafka request failed: {0}")]
    Kafka(#[from] KafkaError),
}

pub type ClientResult<T> = Result<T, ClientError>;
