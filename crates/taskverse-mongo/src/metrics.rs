//! Store metrics collection.
//!
//! Provides standardized metrics for monitoring MongoDB operations:
//! - Request counters by operation and outcome
//! - Latency histograms

use std::time::Duration;

use metrics::{counter, histogram};

/// Metric name constants for consistency.
pub mod names {
    /// Total store requests by operation and outcome.
    pub const REQUESTS_TOTAL: &str = "taskverse_mongo_requests_total";

    /// Request latency in seconds by operation.
    pub const LATENCY_SECONDS: &str = "taskverse_mongo_latency_seconds";
}

/// Record metrics for a completed store request.
pub fn record_request(operation: &str, outcome: &str, latency: Duration) {
    counter!(
        names::REQUESTS_TOTAL,
        "operation" => operation.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);

    histogram!(
        names::LATENCY_SECONDS,
        "operation" => operation.to_string()
    )
    .record(latency.as_secs_f64());
}
