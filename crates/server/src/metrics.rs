//! Prometheus metrics for the Larder server.
//!
//! The `/metrics` endpoint is unauthenticated so it can be scraped. It only
//! exposes aggregate counts, never cookbook names or checksums.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{
    self, Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry,
    TextEncoder,
};
use std::sync::{LazyLock, Once};

/// Global Prometheus registry for all metrics.
pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// Cookbook metrics
pub static COOKBOOK_UPLOADS: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "larder_cookbook_uploads_total",
        "Total number of cookbook versions successfully merged",
    )
    .expect("metric creation failed")
});

pub static COOKBOOK_UPLOAD_ERRORS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "larder_cookbook_upload_errors_total",
            "Total number of rejected cookbook uploads by reason",
        ),
        &["reason"],
    )
    .expect("metric creation failed")
});

pub static COOKBOOK_MERGE_DURATION: LazyLock<Histogram> = LazyLock::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "larder_cookbook_merge_duration_seconds",
            "Time taken to merge a cookbook manifest",
        )
        .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
    )
    .expect("metric creation failed")
});

pub static COOKBOOK_FILE_DOWNLOADS: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "larder_cookbook_file_downloads_total",
        "Total number of cookbook file bodies served",
    )
    .expect("metric creation failed")
});

// Data bag metrics
pub static DATA_BAG_ITEM_WRITES: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "larder_data_bag_item_writes_total",
            "Total number of data bag item writes by operation",
        ),
        &["op"],
    )
    .expect("metric creation failed")
});

static REGISTER_ONCE: Once = Once::new();

/// Register all metrics with the global registry.
pub fn register_metrics() {
    REGISTER_ONCE.call_once(|| {
        REGISTRY
            .register(Box::new(COOKBOOK_UPLOADS.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(COOKBOOK_UPLOAD_ERRORS.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(COOKBOOK_MERGE_DURATION.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(COOKBOOK_FILE_DOWNLOADS.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(DATA_BAG_ITEM_WRITES.clone()))
            .expect("metric registration failed");
    });
}

/// GET /metrics - Prometheus metrics endpoint.
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = Vec::new();
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            format!("Failed to encode metrics: {e}").into_bytes(),
        ),
    }
}

/// Record a rejected cookbook upload.
pub fn record_upload_error(reason: &str) {
    COOKBOOK_UPLOAD_ERRORS.with_label_values(&[reason]).inc();
}

/// Record a data bag item write (`create`, `update` or `delete`).
pub fn record_item_write(op: &str) {
    DATA_BAG_ITEM_WRITES.with_label_values(&[op]).inc();
}
