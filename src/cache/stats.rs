//! Cache Statistics Module
//!
//! Tracks lookup outcomes and write activity of the result cache.

use serde::Serialize;

// == Cache Stats ==
/// Tracks result cache metrics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Lookups that returned a still-valid result
    pub hits: u64,
    /// Lookups that found nothing stored
    pub misses: u64,
    /// Lookups that found an entry past its TTL
    pub expired: u64,
    /// Lookups that hit a damaged record
    pub corrupt: u64,
    /// Successful stores
    pub writes: u64,
    /// Entries removed by `expire` or a purge sweep
    pub purged: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Expired and corrupt lookups count as misses. Returns 0.0 if no
    /// lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.lookups();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Total number of lookups of any outcome.
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses + self.expired + self.corrupt
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_expired(&mut self) {
        self.expired += 1;
    }

    pub fn record_corrupt(&mut self) {
        self.corrupt += 1;
    }

    pub fn record_write(&mut self) {
        self.writes += 1;
    }

    pub fn record_purged(&mut self, count: usize) {
        self.purged += count as u64;
    }
}
