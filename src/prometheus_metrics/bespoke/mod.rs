pub mod topic_lag_offset;
pub mod topic_partitions;

pub(self) const TYPE_GAUGE: &str = "gauge";

pub(self) const HEADER_HELP: &str = "# HELP";
pub(self) const HEADER_TYPE: &str = "# TYPE";
