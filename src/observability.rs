//! Process counters, logged as they change

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics handle for recording counters
#[derive(Debug, Default)]
pub struct Metrics {
    entries_published: AtomicU64,
    mentions_received: AtomicU64,
    mentions_attached: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry_published(&self) {
        self.entries_published.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "entries_published", "Metric incremented");
    }

    pub fn mention_received(&self) {
        self.mentions_received.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "mentions_received", "Metric incremented");
    }

    pub fn mention_attached(&self) {
        self.mentions_attached.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "mentions_attached", "Metric incremented");
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            entries_published: self.entries_published.load(Ordering::Relaxed),
            mentions_received: self.mentions_received.load(Ordering::Relaxed),
            mentions_attached: self.mentions_attached.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    pub entries_published: u64,
    pub mentions_received: u64,
    pub mentions_attached: u64,
}
