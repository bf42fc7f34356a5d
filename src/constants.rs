/// Raw offset value used by librdkafka (`RD_KAFKA_OFFSET_INVALID`) when an offset is not known.
pub(crate) const OFFSET_UNSET: i64 = -1001;

/// Default timeout applied to every single operation issued to the Kafka cluster.
pub(crate) const DEFAULT_OPERATION_TIMEOUT_MS: &str = "5000";

/// Default interval between two consecutive metrics cycles.
pub(crate) const DEFAULT_CYCLE_INTERVAL_MS: &str = "10000";

pub(crate) const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
pub(crate) const DEFAULT_HTTP_PORT: &str = "6565";

/// Environment variable that can be used to control logging.
pub(crate) const LOG_ENV_VAR: &str = "KONSUMER_LAG_LOG";
