use std::net::{IpAddr, SocketAddr};
use std::sync::OnceLock;
use std::time::Duration;

use clap::{ArgGroup, Parser};
use rdkafka::ClientConfig;
use regex::Regex;

use crate::constants::{
    DEFAULT_CYCLE_INTERVAL_MS, DEFAULT_HTTP_HOST, DEFAULT_HTTP_PORT, DEFAULT_OPERATION_TIMEOUT_MS,
};

/// Command Line Interface, defined via the declarative,
/// `derive` based functionality of the `clap` crate.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group(
    ArgGroup::new("logging_flags")
        .required(false)
        .multiple(false)
        .args(["verbose", "quiet"]),
))]
pub struct Cli {
    // ------------------------------------------------------------------ Kafka Clients configuration
    /// Initial Kafka Brokers to connect to (format: 'HOST:PORT,...').
    ///
    /// Equivalent to '--kafka-conf=bootstrap.servers:host:port,...'.
    #[arg(short, long = "brokers", value_name = "BOOTSTRAP_BROKERS", env = "KONSUMER_LAG_BROKERS")]
    pub bootstrap_brokers: String,

    /// Client identifier used by the internal Kafka (Admin and Consumer) Clients.
    ///
    /// Equivalent to '--kafka-conf=client.id:my-client-id'.
    #[arg(long = "client-id", value_name = "CLIENT_ID", default_value = env!("CARGO_PKG_NAME"))]
    pub client_id: String,

    /// Additional configuration used by the internal Kafka Clients (format: 'CONF_KEY:CONF_VAL').
    ///
    /// To set multiple configurations keys, use this argument multiple times.
    /// Security settings (e.g. 'security.protocol', 'sasl.*', 'ssl.*') go here.
    /// See: https://github.com/edenhill/librdkafka/blob/master/CONFIGURATION.md.
    #[arg(
        long = "kafka-conf",
        value_name = "CONF_KEY:CONF_VAL",
        value_parser = kv_clap_value_parser,
        verbatim_doc_comment
    )]
    pub kafka_config: Vec<KVPair>,

    // ------------------------------------------------------------------ Lag monitoring
    /// Topic to measure the consumer lag of.
    #[arg(
        short,
        long,
        value_name = "TOPIC",
        env = "KONSUMER_LAG_TOPIC",
        value_parser = topic_clap_value_parser
    )]
    pub topic: String,

    /// Consumer Group to measure the lag of.
    ///
    /// Equivalent to '--kafka-conf=group.id:my-group'.
    #[arg(short, long, value_name = "GROUP", env = "KONSUMER_LAG_GROUP")]
    pub group: String,

    /// Partitions of the Topic assigned to the local Consumer (format: 'PARTITION,...').
    ///
    /// Watermarks of assigned partitions are first looked up in the local Consumer cache,
    /// while watermarks of all other partitions are always requested to the Brokers.
    #[arg(
        long = "assigned-partitions",
        value_name = "PARTITION",
        value_delimiter = ',',
        verbatim_doc_comment
    )]
    pub assigned_partitions: Vec<u32>,

    /// Timeout (ms) of every single request issued to the Kafka cluster.
    #[arg(
        long = "timeout-ms",
        value_name = "MILLISECONDS",
        default_value = DEFAULT_OPERATION_TIMEOUT_MS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub operation_timeout_ms: u64,

    /// Interval (ms) between two metrics cycles.
    ///
    /// A metrics cycle that takes longer than this, delays the next one.
    #[arg(
        long = "interval-ms",
        value_name = "MILLISECONDS",
        default_value = DEFAULT_CYCLE_INTERVAL_MS,
        value_parser = clap::value_parser!(u64).range(1..),
        verbatim_doc_comment
    )]
    pub cycle_interval_ms: u64,

    // ------------------------------------------------------------------ HTTP
    /// Host address to listen on for HTTP requests.
    ///
    /// Supports both IPv4 and IPv6 addresses.
    #[arg(long, default_value = DEFAULT_HTTP_HOST, verbatim_doc_comment)]
    pub host: IpAddr,

    /// Port to listen on for HTTP requests.
    #[arg(long, default_value = DEFAULT_HTTP_PORT, verbatim_doc_comment)]
    pub port: u16,

    /// Verbose logging.
    ///
    /// * none    = 'WARN'
    /// * '-v'    = 'INFO'
    /// * '-vv'   = 'DEBUG'
    /// * '-vvv'  = 'TRACE'
    ///
    /// Alternatively, set environment variable 'KONSUMER_LAG_LOG=(ERROR|WARN|INFO|DEBUG|TRACE|OFF)'.
    #[arg(short, long, action = clap::ArgAction::Count, verbatim_doc_comment)]
    pub verbose: u8,

    /// Quiet logging.
    ///
    /// * none    = 'WARN'
    /// * '-q'    = 'ERROR'
    /// * '-qq'   = 'OFF'
    ///
    /// Alternatively, set environment variable 'KONSUMER_LAG_LOG=(ERROR|WARN|INFO|DEBUG|TRACE|OFF)'.
    #[arg(short, long, action = clap::ArgAction::Count, verbatim_doc_comment)]
    pub quiet: u8,
}

impl Cli {
    pub fn parse_and_validate() -> Self {
        Self::parse()
    }

    pub fn verbosity_level(&self) -> i8 {
        self.verbose as i8 - self.quiet as i8
    }

    pub fn listen_on(&self) -> SocketAddr {
        SocketAddr::from((self.host, self.port))
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }

    pub fn cycle_interval(&self) -> Duration {
        Duration::from_millis(self.cycle_interval_ms)
    }

    pub fn build_admin_client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new();
        config
            .set("bootstrap.servers", self.bootstrap_brokers.clone())
            .set("client.id", self.client_id.clone());
        for cfg in &self.kafka_config {
            config.set(cfg.0.clone(), cfg.1.clone());
        }

        trace!("Created:\n{:#?}", config);
        config
    }

    /// Consumer configuration: it never commits, so it can't alter the progress of the Group.
    pub fn build_consumer_client_config(&self) -> ClientConfig {
        let mut config = self.build_admin_client_config();
        config
            .set("group.id", self.group.clone())
            .set("enable.auto.commit", "false")
            .set("enable.auto.offset.store", "false");

        trace!("Created:\n{:#?}", config);
        config
    }
}

/// A simple (key,value) pair of `String`s, useful to be parsed from arguments via [`kv_clap_value_parser`].
pub type KVPair = (String, String);

/// To be used as [`clap::value_parser`] function to create [`KVPair`] values.
fn kv_clap_value_parser(kv: &str) -> Result<KVPair, String> {
    let (k, v) = match kv.split_once(':') {
        None => {
            return Err("Should have 'K:V' format".to_string());
        },
        Some((k, v)) => (k, v),
    };

    Ok((k.to_string(), v.to_string()))
}

/// Legal Kafka Topic names: up to 249 ASCII alphanumerics, `.`, `_` or `-`, but not just `.` or `..`.
fn topic_clap_value_parser(topic: &str) -> Result<String, String> {
    static TOPIC_NAME_RE: OnceLock<Regex> = OnceLock::new();
    let re = TOPIC_NAME_RE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._-]{1,249}$").expect("Topic name regex should be valid")
    });

    if !re.is_match(topic) || topic == "." || topic == ".." {
        return Err(format!("'{topic}' is not a legal Kafka Topic name"));
    }

    Ok(topic.to_string())
}
