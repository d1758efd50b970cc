//! Prometheus metrics for the blog server.
//!
//! The `/metrics` endpoint is unauthenticated. Restrict it at the network
//! level or turn it off with `server.metrics_enabled = false`.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::{LazyLock, Once};

/// Global Prometheus registry for all metrics.
pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// Image store metrics
pub static IMAGES_SAVED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new("blog_images_saved_total", "Total number of images saved")
        .expect("metric creation failed")
});

pub static IMAGES_DELETED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new("blog_images_deleted_total", "Total number of images deleted")
        .expect("metric creation failed")
});

pub static IMAGE_BYTES_SAVED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "blog_image_bytes_saved_total",
        "Total bytes written to the image store",
    )
    .expect("metric creation failed")
});

pub static IMAGE_DELETE_FAILURES: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "blog_image_delete_failures_total",
        "Image deletions that failed and were ignored",
    )
    .expect("metric creation failed")
});

// Entity metrics
pub static ENTITY_WRITES: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new("blog_entity_writes_total", "Successful entity writes"),
        &["entity", "operation"],
    )
    .expect("metric creation failed")
});

pub static UPDATE_CONFLICTS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "blog_update_conflicts_total",
            "Updates that matched no row",
        ),
        &["entity"],
    )
    .expect("metric creation failed")
});

/// Guard to ensure metrics are only registered once.
static REGISTER_ONCE: Once = Once::new();

/// Register all metrics with the global registry.
///
/// Idempotent: calls after the first are no-ops.
pub fn register_metrics() {
    REGISTER_ONCE.call_once(|| {
        REGISTRY
            .register(Box::new(IMAGES_SAVED.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(IMAGES_DELETED.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(IMAGE_BYTES_SAVED.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(IMAGE_DELETE_FAILURES.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(ENTITY_WRITES.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(UPDATE_CONFLICTS.clone()))
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

/// Count a successful write.
pub fn record_write(entity: &str, operation: &str) {
    ENTITY_WRITES.with_label_values(&[entity, operation]).inc();
}
