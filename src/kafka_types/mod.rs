mod offsets;
mod topic_partition;

pub use offsets::{CommittedOffset, WatermarkOffsets};
pub use topic_partition::TopicPartition;
