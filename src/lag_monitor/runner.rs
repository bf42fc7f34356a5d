use std::sync::Arc;

use prometheus::{
    register_histogram_with_registry, register_int_counter_with_registry,
    register_int_gauge_with_registry, Histogram, IntCounter, IntGauge, Registry,
};
use tokio::{
    task::{spawn_blocking, JoinError, JoinHandle},
    time::{interval, Duration, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use super::monitor::LagMonitor;
use crate::client::{AdminConnector, ConsumerHandle};

const MET_CYCLE_NAME: &str = "lag_monitor_cycle_time_seconds";
const MET_CYCLE_HELP: &str = "Time (s) taken to run a metrics cycle";
const MET_DEGRADED_NAME: &str = "lag_monitor_degraded_cycles_total";
const MET_DEGRADED_HELP: &str = "Metrics cycles that could not determine the lag";
const MET_TOTAL_LAG_NAME: &str = "lag_monitor_total_lag";
const MET_TOTAL_LAG_HELP: &str = "Total lag of the consumer group, as of the latest metrics cycle";
const MET_PARTITIONS_NAME: &str = "lag_monitor_partition_count";
const MET_PARTITIONS_HELP: &str =
    "Partitions the total lag was calculated over, as of the latest metrics cycle";

/// Runs metrics cycles of a [`LagMonitor`], at regular intervals.
///
/// Cycles are executed one at a time, on a thread dedicated to blocking work:
/// the [`LagMonitor`] moves to that thread for the duration of the cycle, and back.
///
/// It shuts down when the provided [`CancellationToken`] is cancelled.
/// If a cycle terminates abnormally (i.e. panics), the [`LagMonitor`] is lost: the runner
/// cancels the [`CancellationToken`] itself, so the rest of the service stops too.
pub struct LagMonitorRunner {
    cycle_interval: Duration,

    // Prometheus Metrics
    metric_cycle: Histogram,
    metric_degraded: IntCounter,
    metric_total_lag: IntGauge,
    metric_partitions: IntGauge,
}

impl LagMonitorRunner {
    /// Create a new [`LagMonitorRunner`]
    ///
    /// # Arguments
    ///
    /// * `cycle_interval` - How often to run a metrics cycle
    /// * `metrics` - Registry to register the runner metrics with
    pub fn new(cycle_interval: Duration, metrics: Arc<Registry>) -> Self {
        Self {
            cycle_interval,
            metric_cycle: register_histogram_with_registry!(
                MET_CYCLE_NAME,
                MET_CYCLE_HELP,
                metrics
            )
            .unwrap_or_else(|e| panic!("Failed to create metric '{MET_CYCLE_NAME}': {e}")),
            metric_degraded: register_int_counter_with_registry!(
                MET_DEGRADED_NAME,
                MET_DEGRADED_HELP,
                metrics
            )
            .unwrap_or_else(|e| panic!("Failed to create metric '{MET_DEGRADED_NAME}': {e}")),
            metric_total_lag: register_int_gauge_with_registry!(
                MET_TOTAL_LAG_NAME,
                MET_TOTAL_LAG_HELP,
                metrics
            )
            .unwrap_or_else(|e| panic!("Failed to create metric '{MET_TOTAL_LAG_NAME}': {e}")),
            metric_partitions: register_int_gauge_with_registry!(
                MET_PARTITIONS_NAME,
                MET_PARTITIONS_HELP,
                metrics
            )
            .unwrap_or_else(|e| panic!("Failed to create metric '{MET_PARTITIONS_NAME}': {e}")),
        }
    }

    /// Spawn a new async task, running a metrics cycle every interval.
    ///
    /// Returns a [`JoinHandle`] of the task, that concludes once `shutdown_token` is cancelled.
    /// The task resolves to the [`JoinError`] of the cycle that terminated abnormally, if any.
    ///
    /// # Arguments
    ///
    /// * `monitor` - The [`LagMonitor`] to run the cycles of
    /// * `shutdown_token`: A [`CancellationToken`] that, when cancelled, will make the internal loop terminate.
    pub fn spawn<A, C>(
        &self,
        monitor: LagMonitor<A, C>,
        shutdown_token: CancellationToken,
    ) -> JoinHandle<Result<(), JoinError>>
    where
        A: AdminConnector + Send + 'static,
        C: ConsumerHandle + Send + 'static,
    {
        // Clone metrics so they can be used in the spawned future
        let metric_cycle = self.metric_cycle.clone();
        let metric_degraded = self.metric_degraded.clone();
        let metric_total_lag = self.metric_total_lag.clone();
        let metric_partitions = self.metric_partitions.clone();

        let cycle_interval = self.cycle_interval;
        let mut monitor = monitor;

        tokio::spawn(async move {
            let mut interval = interval(cycle_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                // Wait for next "tick", or get interrupted by shutdown
                tokio::select! {
                    _ = interval.tick() => {
                        // No-op
                    },
                    _ = shutdown_token.cancelled() => {
                        info!("Shutting down");
                        return Ok(());
                    },
                }

                // Run cycle and update timer metric
                let timer = metric_cycle.start_timer();
                let res_cycle = spawn_blocking(move || {
                    let metrics = monitor.compute_metrics();
                    (monitor, metrics)
                })
                .await;
                timer.observe_duration();

                match res_cycle {
                    Ok((m, lag_metrics)) => {
                        monitor = m;

                        metric_total_lag.set(lag_metrics.total_lag);
                        metric_partitions.set(lag_metrics.partition_count as i64);
                        if lag_metrics.partition_count == 0 {
                            metric_degraded.inc();
                        }
                    },
                    Err(e) => {
                        error!("Metrics cycle terminated abnormally: {e}");
                        shutdown_token.cancel();
                        return Err(e);
                    },
                }
            }
        })
    }
}
