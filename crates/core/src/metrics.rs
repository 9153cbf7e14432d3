//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Catalog requests (searches, detail lookups)
//! - Detail cache hits and misses
//! - Search cancellations

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Catalog
// =============================================================================

/// Catalog requests total by kind and result.
pub static CATALOG_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "moviesearch_catalog_requests_total",
            "Total catalog requests",
        ),
        &["kind", "result"], // kind: "search", "details"; result: "ok", "skipped", error kind
    )
    .unwrap()
});

/// Catalog request duration in seconds.
pub static CATALOG_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "moviesearch_catalog_request_duration_seconds",
            "Duration of catalog requests",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        &["kind"],
    )
    .unwrap()
});

// =============================================================================
// Session
// =============================================================================

/// Detail cache lookups by result.
pub static DETAIL_CACHE_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "moviesearch_detail_cache_lookups_total",
            "Detail cache lookups",
        ),
        &["result"], // "hit", "miss"
    )
    .unwrap()
});

/// Searches cancelled or discarded, by reason.
pub static SEARCH_CANCELLATIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "moviesearch_search_cancellations_total",
            "Searches cancelled before their results were shown",
        ),
        &["reason"], // "superseded", "cleared", "stale"
    )
    .unwrap()
});

/// Get all core metrics for registration.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(CATALOG_REQUESTS.clone()),
        Box::new(CATALOG_REQUEST_DURATION.clone()),
        Box::new(DETAIL_CACHE_LOOKUPS.clone()),
        Box::new(SEARCH_CANCELLATIONS.clone()),
    ]
}
