//! Prometheus metrics

use crate::refresh::RefreshOutcome;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;

const REFRESH_TOTAL: &str = "coincache_refresh_total";
const REFRESH_DURATION: &str = "coincache_refresh_duration_seconds";
const CACHED_ENTRIES: &str = "coincache_cached_prices";
const UPSTREAM_FAILURES: &str = "coincache_upstream_failures_total";

/// Upstream endpoints tracked for failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamEndpoint {
    /// `/coins/markets`
    Markets,
    /// `/simple/price`
    SimplePrice,
    /// `/ping`
    Ping,
}

impl UpstreamEndpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpstreamEndpoint::Markets => "markets",
            UpstreamEndpoint::SimplePrice => "simple_price",
            UpstreamEndpoint::Ping => "ping",
        }
    }
}

/// Serve `/metrics` on all interfaces at `port`
pub fn init_metrics_exporter(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to start metrics exporter: {}", e))?;

    tracing::info!(%addr, "Prometheus exporter listening");
    Ok(())
}

/// Record one finished refresh cycle
pub fn record_refresh(outcome: RefreshOutcome, duration: Duration, cached: usize) {
    let result = match outcome {
        RefreshOutcome::Replaced { .. } => "replaced",
        RefreshOutcome::Skipped => "skipped",
    };

    metrics::counter!(REFRESH_TOTAL, "result" => result).increment(1);
    metrics::histogram!(REFRESH_DURATION).record(duration.as_secs_f64());
    metrics::gauge!(CACHED_ENTRIES).set(cached as f64);
}

/// Count a failed upstream call
pub fn record_upstream_failure(endpoint: UpstreamEndpoint) {
    metrics::counter!(UPSTREAM_FAILURES, "endpoint" => endpoint.as_str()).increment(1);
}
