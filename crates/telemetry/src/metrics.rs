//! In-memory metrics surfaced by the health endpoint.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// A counter metric.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub const fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Collected metrics for the resume engine.
#[derive(Debug, Default)]
pub struct Metrics {
    pub uploads_received: Counter,
    pub analyses_completed: Counter,
    pub analyses_failed: Counter,
    pub chat_turns: Counter,
    pub guides_generated: Counter,
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            uploads_received: Counter::new(),
            analyses_completed: Counter::new(),
            analyses_failed: Counter::new(),
            chat_turns: Counter::new(),
            guides_generated: Counter::new(),
        }
    }

    /// Takes a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            uploads_received: self.uploads_received.get(),
            analyses_completed: self.analyses_completed.get(),
            analyses_failed: self.analyses_failed.get(),
            chat_turns: self.chat_turns.get(),
            guides_generated: self.guides_generated.get(),
        }
    }
}

/// A snapshot of metrics at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub uploads_received: u64,
    pub analyses_completed: u64,
    pub analyses_failed: u64,
    pub chat_turns: u64,
    pub guides_generated: u64,
}

/// Global metrics registry.
pub static METRICS: Metrics = Metrics::new();

/// Get the global metrics instance.
pub fn metrics() -> &'static Metrics {
    &METRICS
}
