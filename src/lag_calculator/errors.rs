use thiserror::Error;

use crate::client::ClientError;
use crate::kafka_types::TopicPartition;

/// Possible errors from the [`super::LagCalculator`].
#[derive(Error, Debug)]
pub enum LagCalculatorError {
    /// The batched request of committed offsets failed.
    #[error("Failed to fetch committed offsets of {0} partitions: {1}")]
    CommittedOffsets(usize, #[source] ClientError),

    /// The watermarks of a Topic Partition could not be queried to the Brokers.
    #[error("Failed to fetch watermarks of '{0}': {1}")]
    Watermarks(TopicPartition, #[source] ClientError),
}

pub type LagCalculatorResult<T> = Result<T, LagCalculatorError>;
