//! Result Cache Module
//!
//! TTL-checked lookups over an `EntryStore`, with per-key write
//! serialization and monotonic age tracking for entries written by this
//! process.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::cache::{
    CacheEntry, CacheStats, Clock, EntryStore, FileStore, MemoryStore, SystemClock,
};
use crate::config::{CacheBackend, Config};
use crate::error::{CrewError, Result};

/// Monotonic reading taken when this process wrote an entry.
#[derive(Debug, Clone, Copy)]
struct WriteMark {
    timestamp: DateTime<Utc>,
    monotonic: Duration,
}

// == Result Cache ==
/// Cache of task results with a fixed time-to-live.
///
/// Expiry is a read-time check only: an expired entry stays in storage until
/// it is overwritten, removed with [`ResultCache::expire`] or swept by
/// [`ResultCache::purge_expired`].
pub struct ResultCache {
    /// Persistence engine
    backend: Box<dyn EntryStore>,
    /// Time source for stamping and ageing entries
    clock: Arc<dyn Clock>,
    /// Maximum age of a valid entry
    ttl: Duration,
    /// One mutex per key with a store in flight
    key_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    /// Monotonic marks of entries written by this process
    marks: Mutex<HashMap<String, WriteMark>>,
    /// Performance statistics
    stats: Mutex<CacheStats>,
}

impl std::fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache")
            .field("ttl", &self.ttl)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl ResultCache {
    // == Constructor ==
    /// Creates a cache over `backend` using the system clock.
    pub fn new(backend: impl EntryStore + 'static, ttl: Duration) -> Self {
        Self::with_clock(backend, ttl, Arc::new(SystemClock::new()))
    }

    /// Creates a cache with an explicit time source.
    pub fn with_clock(
        backend: impl EntryStore + 'static,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            backend: Box::new(backend),
            clock,
            ttl,
            key_locks: Mutex::new(HashMap::new()),
            marks: Mutex::new(HashMap::new()),
            stats: Mutex::new(CacheStats::new()),
        }
    }

    /// Creates a cache from configuration.
    pub fn from_config(config: &Config) -> Self {
        match config.cache_backend {
            CacheBackend::File => Self::new(FileStore::new(&config.cache_dir), config.ttl()),
            CacheBackend::Memory => Self::new(MemoryStore::new(), config.ttl()),
        }
    }

    /// Configured time-to-live.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Lookup ==
    /// Returns the stored result for `key` if it is younger than the TTL.
    ///
    /// Read-only: an expired entry is reported as absent and left in place.
    /// A damaged record surfaces as [`CrewError::CorruptEntry`].
    pub fn lookup(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;

        let entry = match self.backend.read(key) {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                self.with_stats(CacheStats::record_miss);
                debug!(key, "Cache miss");
                return Ok(None);
            }
            Err(e) => {
                if matches!(e, CrewError::CorruptEntry { .. }) {
                    self.with_stats(CacheStats::record_corrupt);
                }
                return Err(e);
            }
        };

        let age = self.age_of(&entry);
        if age < self.ttl {
            self.with_stats(CacheStats::record_hit);
            debug!(key, age_secs = age.as_secs(), "Cache hit");
            Ok(Some(entry.result))
        } else {
            self.with_stats(CacheStats::record_expired);
            debug!(key, age_secs = age.as_secs(), "Cache entry expired");
            Ok(None)
        }
    }

    // == Lookup Or Miss ==
    /// Like [`ResultCache::lookup`] but degrades any error to a miss, logging
    /// the cause so a damaged cache can still be told apart from a cold one.
    pub fn lookup_or_miss(&self, key: &str) -> Option<String> {
        match self.lookup(key) {
            Ok(result) => result,
            Err(e) => {
                warn!(key, error = %e, "Cache lookup failed, treating as miss");
                None
            }
        }
    }

    // == Store ==
    /// Writes `result` for `key` stamped with the current time, replacing any
    /// prior entry. Stores for the same key are serialized.
    pub fn store(&self, key: &str, result: impl Into<String>) -> Result<()> {
        validate_key(key)?;

        let lock = self.key_lock(key);
        let outcome = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            let entry = CacheEntry::new(key, result, self.clock.now());
            let monotonic = self.clock.monotonic();
            let written = self.backend.write(&entry);
            if written.is_ok() {
                let mark = WriteMark {
                    timestamp: entry.timestamp,
                    monotonic,
                };
                self.lock_marks().insert(key.to_string(), mark);
            }
            written
        };
        drop(lock);
        self.release_key_lock(key);

        outcome?;
        self.with_stats(CacheStats::record_write);
        debug!(key, "Cache entry stored");
        Ok(())
    }

    // == Expire ==
    /// Removes the entry for `key`, returning whether one existed.
    pub fn expire(&self, key: &str) -> Result<bool> {
        validate_key(key)?;

        let lock = self.key_lock(key);
        let outcome = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            let outcome = self.backend.remove(key);
            self.lock_marks().remove(key);
            outcome
        };
        drop(lock);
        self.release_key_lock(key);

        let removed = outcome?;

        if removed {
            self.with_stats(|s| s.record_purged(1));
            debug!(key, "Cache entry removed");
        }
        Ok(removed)
    }

    // == Purge Expired ==
    /// Removes every stored entry that has reached the TTL.
    ///
    /// Each candidate is re-checked under its key lock so a concurrent store
    /// is never thrown away. Returns the number of entries removed.
    pub fn purge_expired(&self) -> Result<usize> {
        let candidates: Vec<String> = self
            .backend
            .scan()?
            .into_iter()
            .filter(|entry| self.age_of(entry) >= self.ttl)
            .map(|entry| entry.key)
            .collect();

        let mut removed = 0;
        for key in candidates {
            let lock = self.key_lock(&key);
            let purged = {
                let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
                match self.backend.read(&key) {
                    Ok(Some(entry)) if self.age_of(&entry) >= self.ttl => {
                        let outcome = self.backend.remove(&key);
                        self.lock_marks().remove(&key);
                        outcome
                    }
                    Ok(_) => Ok(false),
                    Err(e) => {
                        warn!(key = %key, error = %e, "Skipping unreadable entry during purge");
                        Ok(false)
                    }
                }
            };
            drop(lock);
            self.release_key_lock(&key);
            if purged? {
                removed += 1;
            }
        }

        if removed > 0 {
            self.with_stats(|s| s.record_purged(removed));
            info!(removed, "Purged expired cache entries");
        }
        Ok(removed)
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Age of `entry`, from the monotonic mark when this process wrote
    /// exactly that record, otherwise from the wall clock.
    ///
    /// A mark older than the record it is checked against belongs to a write
    /// that has since been replaced by another writer, so it is dropped. A
    /// newer mark is kept: its store may have landed after `entry` was read.
    fn age_of(&self, entry: &CacheEntry) -> Duration {
        let mut marks = self.lock_marks();
        match marks.get(&entry.key).copied() {
            Some(mark) if mark.timestamp == entry.timestamp => {
                drop(marks);
                self.clock.monotonic().saturating_sub(mark.monotonic)
            }
            Some(mark) if mark.timestamp < entry.timestamp => {
                marks.remove(&entry.key);
                drop(marks);
                entry.wall_age(self.clock.now())
            }
            _ => {
                drop(marks);
                entry.wall_age(self.clock.now())
            }
        }
    }

    fn key_lock(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = self.key_locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drops the key's mutex once no other caller holds a handle to it.
    fn release_key_lock(&self, key: &str) {
        let mut locks = self.key_locks.lock().unwrap_or_else(PoisonError::into_inner);
        if locks.get(key).is_some_and(|l| Arc::strong_count(l) == 1) {
            locks.remove(key);
        }
    }

    fn lock_marks(&self) -> std::sync::MutexGuard<'_, HashMap<String, WriteMark>> {
        self.marks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_stats(&self, f: impl FnOnce(&mut CacheStats)) {
        let mut stats = self.stats.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut stats);
    }
}

/// Rejects keys that cannot name a computation.
fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CrewError::InvalidKey("key cannot be empty".to_string()));
    }
    Ok(())
}
