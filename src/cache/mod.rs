//! Cache Module
//!
//! Task-result cache with a read-time TTL check over pluggable storage.

mod backend;
mod clock;
mod entry;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use backend::{hash_key, EntryStore, FileStore, MemoryStore};
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{parse_timestamp, CacheEntry};
pub use stats::CacheStats;
pub use store::ResultCache;
