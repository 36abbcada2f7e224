//! Prometheus metrics registry and instruments.
//!
//! Instruments are usable before `init_metrics` runs; registration only
//! makes them visible to `render`.

use std::sync::Once;

use lazy_static::lazy_static;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // Pipeline Metrics
    pub static ref WEBHOOKS_RECEIVED: IntCounterVec = IntCounterVec::new(
        Opts::new("callr_bridge_webhooks_received_total", "Webhook events seen by the normalizer"),
        &["outcome"]
    ).expect("metric can be created");
    pub static ref OBJECTS_MAPPED: IntCounterVec = IntCounterVec::new(
        Opts::new("callr_bridge_objects_mapped_total", "Activities built by the mapper, by object type"),
        &["object_type"]
    ).expect("metric can be created");
    pub static ref VALIDATIONS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("callr_bridge_validations_total", "Validator results"),
        &["outcome"]
    ).expect("metric can be created");

    // Probe Metrics
    pub static ref PROBE_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "callr_bridge_probe_duration_seconds",
            "Media probe duration in seconds"
        ).buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["status"]
    ).expect("metric can be created");

    // Error Metrics
    pub static ref ERRORS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("callr_bridge_errors_total", "Total number of errors"),
        &["error_type", "stage"]
    ).expect("metric can be created");
}

static INIT: Once = Once::new();

/// Initialize metrics registry. Calls after the first are no-ops.
pub fn init_metrics() {
    INIT.call_once(register_all);
}

fn register_all() {
    REGISTRY
        .register(Box::new(WEBHOOKS_RECEIVED.clone()))
        .expect("WEBHOOKS_RECEIVED can be registered");
    REGISTRY
        .register(Box::new(OBJECTS_MAPPED.clone()))
        .expect("OBJECTS_MAPPED can be registered");
    REGISTRY
        .register(Box::new(VALIDATIONS_TOTAL.clone()))
        .expect("VALIDATIONS_TOTAL can be registered");
    REGISTRY
        .register(Box::new(PROBE_DURATION_SECONDS.clone()))
        .expect("PROBE_DURATION_SECONDS can be registered");
    REGISTRY
        .register(Box::new(ERRORS_TOTAL.clone()))
        .expect("ERRORS_TOTAL can be registered");

    tracing::info!("Metrics registry initialized");
}

/// Encode every registered metric in Prometheus text format.
pub fn render() -> crate::error::Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| crate::error::AppError::Internal(e.into()))?;
    String::from_utf8(buffer).map_err(|e| crate::error::AppError::Internal(e.into()))
}
