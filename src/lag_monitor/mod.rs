// Inner modules
mod metrics;
mod monitor;
mod runner;

use std::sync::Arc;

use prometheus::Registry;
use tokio::{
    task::{JoinError, JoinHandle},
    time::Duration,
};
use tokio_util::sync::CancellationToken;

use crate::client::{AdminConnector, ConsumerHandle};

// Exports
pub use metrics::LastCalculatedMetrics;
pub use monitor::LagMonitor;

use runner::LagMonitorRunner;

/// Start running metrics cycles of `monitor`.
///
/// Returns the [`LastCalculatedMetrics`] of `monitor`, and the [`JoinHandle`] of the runner.
pub fn init<A, C>(
    monitor: LagMonitor<A, C>,
    cycle_interval: Duration,
    shutdown_token: CancellationToken,
    metrics: Arc<Registry>,
) -> (LastCalculatedMetrics, JoinHandle<Result<(), JoinError>>)
where
    A: AdminConnector + Send + 'static,
    C: ConsumerHandle + Send + 'static,
{
    let last_calculated = monitor.last_calculated_metrics();
    let runner_join = LagMonitorRunner::new(cycle_interval, metrics).spawn(monitor, shutdown_token);

    debug!("Initialized");
    (last_calculated, runner_join)
}
