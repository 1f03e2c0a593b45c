//! Metrics collection and exposition.
//!
//! # Metrics
//! - `phony_requests_total` (counter): requests by kind (admin, business, unmatched) and status
//! - `phony_config_reloads_total` (counter): reload attempts by outcome
//! - `phony_calls_recorded` (gauge): current size of the call log
//!
//! Recording is a no-op until a recorder is installed with [`init_metrics`].

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and serve it on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Kind of request, used as a metric label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Admin,
    Business,
    Unmatched,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Admin => "admin",
            RequestKind::Business => "business",
            RequestKind::Unmatched => "unmatched",
        }
    }
}

pub fn record_request(kind: RequestKind, status: u16) {
    metrics::counter!(
        "phony_requests_total",
        "kind" => kind.as_str(),
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn record_reload(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    metrics::counter!("phony_config_reloads_total", "outcome" => outcome).increment(1);
}

pub fn record_calls_recorded(count: usize) {
    metrics::gauge!("phony_calls_recorded").set(count as f64);
}
