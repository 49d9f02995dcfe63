//! Prometheus metrics
//!
//! Installs the global `metrics` recorder; every crate records through the
//! `metrics` macros and `/metrics` renders the result.

use axum::http::header;
use axum::response::IntoResponse;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder once. Later calls return the same handle.
pub fn init_metrics() -> Option<PrometheusHandle> {
    if let Some(handle) = METRICS_HANDLE.get() {
        return Some(handle.clone());
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            describe_metrics();
            let _ = METRICS_HANDLE.set(handle.clone());
            Some(handle)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to install Prometheus recorder");
            None
        }
    }
}

fn describe_metrics() {
    metrics::describe_counter!("medassist_messages_total", "Chat messages handled, by resolved intent");
    metrics::describe_counter!(
        "medassist_classifications_total",
        "Message classifications, by source (ai or rules)"
    );
    metrics::describe_counter!(
        "medassist_processing_errors_total",
        "Messages answered with the apology reply"
    );
    metrics::describe_counter!("medassist_sessions_swept_total", "Idle sessions removed");
    metrics::describe_histogram!(
        "medassist_message_duration_seconds",
        metrics::Unit::Seconds,
        "End-to-end message handling time"
    );
    metrics::describe_histogram!(
        "medassist_ai_request_duration_seconds",
        metrics::Unit::Seconds,
        "External AI call time, by operation and outcome"
    );
}

/// Render metrics in Prometheus text format
pub fn render_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

/// `GET /metrics`
pub async fn metrics_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        render_metrics(),
    )
}
