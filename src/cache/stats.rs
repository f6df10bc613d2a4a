//! Cache Statistics Module
//!
//! Tracks memory store counters: hits, misses, GC evictions, oversize
//! rejections and dropped dirty notifications.

use serde::Serialize;

// == Cache Stats ==
/// Memory store performance counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of lookups that returned a finished, unexpired entry
    pub hits: u64,
    /// Number of lookups that found nothing usable
    pub misses: u64,
    /// Number of entries removed by expiration sweeps
    pub evictions: u64,
    /// Number of writes rejected for exceeding their size limit
    pub oversize_rejections: u64,
    /// Dirty notifications dropped because the queue was full
    pub dirty_dropped: u64,
    /// Current number of committed entries
    pub total_entries: usize,
    /// Bytes held by committed entries
    pub used_bytes: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_oversize(&mut self) {
        self.oversize_rejections += 1;
    }

    pub fn record_dirty_dropped(&mut self) {
        self.dirty_dropped += 1;
    }
}
