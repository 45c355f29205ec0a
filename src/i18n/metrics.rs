//! Machine translation metrics.
//!
//! Counts lookups served from the stored machine translations versus those
//! that had to go out to the translation provider, and how many provider
//! calls failed. One instance lives in the server state; tests build their own.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct TranslationMetrics {
    /// Lookups answered by a stored machine translation
    cache_hits: AtomicUsize,

    /// Lookups with no stored machine translation
    cache_misses: AtomicUsize,

    /// Calls made to the translation provider
    api_calls: AtomicUsize,

    /// Provider calls that failed
    api_failures: AtomicUsize,
}

impl TranslationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_api_call(&self) {
        self.api_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_api_failure(&self) {
        self.api_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot the counters into a serializable report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.cache_hits.load(Ordering::Relaxed);
        let misses = self.cache_misses.load(Ordering::Relaxed);
        let calls = self.api_calls.load(Ordering::Relaxed);
        let failures = self.api_failures.load(Ordering::Relaxed);

        MetricsReport {
            cache_hits: hits,
            cache_misses: misses,
            cache_hit_rate: percentage(hits, hits + misses),
            api_calls: calls,
            api_failures: failures,
            api_success_rate: percentage(calls.saturating_sub(failures), calls),
        }
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64) * 100.0
}

/// Point-in-time machine translation statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub cache_hits: usize,
    pub cache_misses: usize,
    /// Percentage (0-100)
    pub cache_hit_rate: f64,
    pub api_calls: usize,
    pub api_failures: usize,
    /// Percentage (0-100)
    pub api_success_rate: f64,
}
