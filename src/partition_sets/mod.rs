// Inner modules
mod assignment;
mod metadata_fetcher;

// Exports
pub use assignment::AssignmentSnapshot;
pub use metadata_fetcher::TopicPartitionsFetcher;
