//! Metrics collection and reporting

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Counters for resource resolution and message handling.
///
/// Cheap to clone; every clone shares the same counters. Each record call
/// also feeds the global `metrics` recorder when one is installed.
#[derive(Debug, Clone)]
pub struct BridgeMetrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug)]
struct MetricsInner {
    requests_resolved: AtomicU64,
    requests_failed: AtomicU64,
    archive_errors: AtomicU64,
    bytes_served: AtomicU64,
    messages_dispatched: AtomicU64,
    messages_rejected: AtomicU64,
    messages_ignored: AtomicU64,
    config_errors: AtomicU64,
}

impl BridgeMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                requests_resolved: AtomicU64::new(0),
                requests_failed: AtomicU64::new(0),
                archive_errors: AtomicU64::new(0),
                bytes_served: AtomicU64::new(0),
                messages_dispatched: AtomicU64::new(0),
                messages_rejected: AtomicU64::new(0),
                messages_ignored: AtomicU64::new(0),
                config_errors: AtomicU64::new(0),
            }),
        }
    }

    /// Record a resource request delivered in full
    pub fn record_resolved(&self, kind: &'static str, bytes: u64) {
        self.inner.requests_resolved.fetch_add(1, Ordering::Relaxed);
        self.inner.bytes_served.fetch_add(bytes, Ordering::Relaxed);
        metrics::counter!("aibridge_requests_total", "kind" => kind, "outcome" => "ok").increment(1);
        metrics::counter!("aibridge_bytes_served_total").increment(bytes);
    }

    /// Record a failed resource request
    pub fn record_failed(&self, kind: &'static str) {
        self.inner.requests_failed.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("aibridge_requests_total", "kind" => kind, "outcome" => "failed").increment(1);
    }

    /// Record an unreadable or corrupt archive
    pub fn record_archive_error(&self) {
        self.inner.archive_errors.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("aibridge_archive_errors_total").increment(1);
    }

    /// Record a message forwarded to the event sink
    pub fn record_dispatched(&self, function_call: &'static str) {
        self.inner.messages_dispatched.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("aibridge_messages_total", "function" => function_call, "outcome" => "dispatched").increment(1);
    }

    /// Record a message dropped because it could not be parsed
    pub fn record_rejected(&self) {
        self.inner.messages_rejected.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("aibridge_messages_total", "outcome" => "rejected").increment(1);
    }

    /// Record a message with an unrecognized function call
    pub fn record_ignored(&self) {
        self.inner.messages_ignored.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("aibridge_messages_total", "outcome" => "ignored").increment(1);
    }

    /// Record a configuration error reported to the host
    pub fn record_config_error(&self) {
        self.inner.config_errors.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("aibridge_config_errors_total").increment(1);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_resolved: self.inner.requests_resolved.load(Ordering::Relaxed),
            requests_failed: self.inner.requests_failed.load(Ordering::Relaxed),
            archive_errors: self.inner.archive_errors.load(Ordering::Relaxed),
            bytes_served: self.inner.bytes_served.load(Ordering::Relaxed),
            messages_dispatched: self.inner.messages_dispatched.load(Ordering::Relaxed),
            messages_rejected: self.inner.messages_rejected.load(Ordering::Relaxed),
            messages_ignored: self.inner.messages_ignored.load(Ordering::Relaxed),
            config_errors: self.inner.config_errors.load(Ordering::Relaxed),
        }
    }
}

impl Default for BridgeMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of current metrics
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    pub requests_resolved: u64,
    pub requests_failed: u64,
    pub archive_errors: u64,
    pub bytes_served: u64,
    pub messages_dispatched: u64,
    pub messages_rejected: u64,
    pub messages_ignored: u64,
    pub config_errors: u64,
}

impl MetricsSnapshot {
    /// Total resource requests that reached a terminal state
    pub fn total_requests(&self) -> u64 {
        self.requests_resolved + self.requests_failed
    }

    /// Fraction of requests that failed
    pub fn failure_rate(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            0.0
        } else {
            self.requests_failed as f64 / total as f64
        }
    }
}
