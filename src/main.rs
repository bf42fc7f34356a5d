#[macro_use]
extern crate log;

mod cli;
mod client;
mod constants;
mod http;
mod internals;
mod kafka_types;
mod lag_calculator;
mod lag_monitor;
mod logging;
mod partition_sets;
mod prometheus_metrics;

use std::error::Error;
use std::process;
use std::sync::Arc;

use rdkafka::consumer::{BaseConsumer, Consumer};
use rdkafka::TopicPartitionList;
use tokio_util::sync::CancellationToken;

use cli::Cli;
use client::KafkaAdminConnector;
use lag_monitor::LagMonitor;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = parse_cli_and_init_logging();

    let shutdown_token = build_shutdown_token();

    // Consumer used to measure the lag: built once, kept for the whole lifetime of the service
    let consumer = build_consumer(&cli);

    // Prometheus Metrics Registry
    let metrics = Arc::new(prometheus_metrics::init(&cli.topic, &cli.group));

    // Lag Monitor, running metrics cycles at regular intervals
    let monitor = LagMonitor::new(
        cli.topic.clone(),
        KafkaAdminConnector::new(cli.build_admin_client_config()),
        consumer,
        cli.operation_timeout(),
    );
    let (last_calculated, lm_join) =
        lag_monitor::init(monitor, cli.cycle_interval(), shutdown_token.clone(), metrics.clone());

    // Serve Prometheus metrics, until shutdown
    if let Err(e) = http::init(
        cli.listen_on(),
        &cli.topic,
        &cli.group,
        last_calculated,
        shutdown_token.clone(),
        metrics,
    )
    .await
    {
        error!("HTTP service failed on '{}': {e}", cli.listen_on());
        shutdown_token.cancel();
        lm_join.await??;
        process::exit(exit_code::SERVICE_UNAVAILABLE);
    }

    // A cycle that terminated abnormally also stops the service: report it
    lm_join.await??;
    Ok(())
}

fn parse_cli_and_init_logging() -> Cli {
    // Parse command line input and initialize logging
    let cli = Cli::parse_and_validate();
    logging::init(cli.verbosity_level());

    trace!("Created:\n{:#?}", cli);

    cli
}

fn build_shutdown_token() -> CancellationToken {
    let shutdown_token = CancellationToken::new();

    // Setup shutdown signal handler:
    // when it's time to shutdown, cancels the token that all parts of the system listen on.
    //
    // NOTE: This handler will be listening on its own dedicated thread.
    let handler_token = shutdown_token.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        info!("Shutting down...");
        handler_token.cancel();
    }) {
        error!("Failed to register signal handler: {e}");
    }

    // Return a token so we can notify other parts of the system.
    shutdown_token
}

fn build_consumer(cli: &Cli) -> BaseConsumer {
    let consumer: BaseConsumer = match cli.build_consumer_client_config().create() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create Consumer Client: {e}");
            process::exit(exit_code::CONFIG_ERROR);
        },
    };

    if !cli.assigned_partitions.is_empty() {
        let mut tpl = TopicPartitionList::with_capacity(cli.assigned_partitions.len());
        for p in &cli.assigned_partitions {
            tpl.add_partition(&cli.topic, *p as i32);
        }

        if let Err(e) = consumer.assign(&tpl) {
            error!("Failed to assign partitions {:?} to Consumer: {e}", cli.assigned_partitions);
            process::exit(exit_code::CONFIG_ERROR);
        }
        info!("Assigned partitions {:?} of Topic '{}' to Consumer", cli.assigned_partitions, cli.topic);
    }

    consumer
}
