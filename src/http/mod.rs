use std::{io, net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use prometheus::{Registry, TextEncoder};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::timeout::TimeoutLayer;

use crate::lag_monitor::LastCalculatedMetrics;
use crate::prometheus_metrics::bespoke::*;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
struct HttpServiceState {
    topic: Arc<str>,
    group: Arc<str>,
    last_calculated: LastCalculatedMetrics,
    metrics: Arc<Registry>,
}

/// Serve the HTTP endpoints, until `shutdown_token` is cancelled.
///
/// # Arguments
///
/// * `listen_on` - Address to listen on
/// * `topic` - Topic the lag is calculated of
/// * `group` - Consumer Group the lag is calculated of
/// * `last_calculated` - Latest metrics produced by the lag monitor
/// * `shutdown_token` - When cancelled, triggers graceful shutdown of the server
/// * `metrics` - Registry of the internal metrics of the service
pub async fn init(
    listen_on: SocketAddr,
    topic: &str,
    group: &str,
    last_calculated: LastCalculatedMetrics,
    shutdown_token: CancellationToken,
    metrics: Arc<Registry>,
) -> io::Result<()> {
    // Assemble the HTTP Service State object, that will be passed to the routes
    let state = HttpServiceState {
        topic: Arc::from(topic),
        group: Arc::from(group),
        last_calculated,
        metrics,
    };

    let app = router(state);

    let listener = TcpListener::bind(listen_on).await?;
    info!("Begin listening on '{}'...", listen_on);

    // Setup Server, with Graceful Shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown_token.cancelled().await })
        .await
}

fn router(state: HttpServiceState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/metrics", get(prometheus_metrics))
        .route("/ready", get(ready))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .with_state(state)
}

async fn root() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"))
}

async fn ready(State(state): State<HttpServiceState>) -> impl IntoResponse {
    match state.last_calculated.calculated_at() {
        Some(at) => (StatusCode::OK, format!("Ready: last metrics cycle completed at {at}")),
        None => (StatusCode::SERVICE_UNAVAILABLE, "Not ready: no metrics cycle completed yet".into()),
    }
}

async fn prometheus_metrics(State(state): State<HttpServiceState>) -> impl IntoResponse {
    let mut status = StatusCode::OK;
    let mut headers = HeaderMap::new();

    // As defined by Prometheus: https://github.com/prometheus/docs/blob/main/content/docs/instrumenting/exposition_formats.md#basic-info
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain; version=0.0.4"));

    // Procure the latest metrics once and reuse it in all metrics that get generated
    let lag_metrics = state.last_calculated.get();
    let calculated_at_utc_ms =
        state.last_calculated.calculated_at().map(|at| at.timestamp_millis()).unwrap_or(-1);

    let metric_types_count: usize = 2;
    let mut body: Vec<String> = Vec::with_capacity(metric_types_count * 3);

    // ---------------------------------------------------------------- METRIC: topic_lag_offset
    topic_lag_offset::append_headers(&mut body);
    topic_lag_offset::append_metric(
        &state.topic,
        &state.group,
        lag_metrics.total_lag,
        calculated_at_utc_ms,
        &mut body,
    );

    // ---------------------------------------------------------------- METRIC: topic_partitions
    topic_partitions::append_headers(&mut body);
    topic_partitions::append_metric(
        &state.topic,
        &state.group,
        lag_metrics.partition_count,
        calculated_at_utc_ms,
        &mut body,
    );

    // Turn the bespoke metrics created so far, into a String
    let mut body = body.join("\n");
    body.push('\n');

    // Append to the bespoke metrics, classic Prometheus Metrics
    let metrics_family = state.metrics.gather();
    if let Err(e) = TextEncoder.encode_utf8(&metrics_family, &mut body) {
        status = StatusCode::INTERNAL_SERVER_ERROR;
        body = format!("Failed to encode metrics: {e}");
    }

    (status, headers, body)
}
