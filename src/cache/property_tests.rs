//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check lookup/store behaviour over arbitrary keys and
//! results, against both storage engines.

use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use crate::cache::{FileStore, ManualClock, MemoryStore, ResultCache};

// == Test Configuration ==
const DAY: Duration = Duration::from_secs(24 * 60 * 60);

fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
    ))
}

// == Strategies ==
/// Any non-empty key, path separators and dots included
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_./\\\\: -]{1,64}"
}

fn result_strategy() -> impl Strategy<Value = String> {
    ".{0,256}"
}

#[derive(Debug, Clone)]
enum CacheOp {
    Store { key: String, result: String },
    Lookup { key: String },
}

/// Small key pool so stores and lookups collide often
fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    let key = prop::sample::select(vec!["a", "b", "c", "../d"]).prop_map(str::to_string);
    prop_oneof![
        (key.clone(), result_strategy()).prop_map(|(key, result)| CacheOp::Store { key, result }),
        key.prop_map(|key| CacheOp::Lookup { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Keys never written are always a miss.
    #[test]
    fn prop_unwritten_key_is_absent(key in key_strategy()) {
        let cache = ResultCache::with_clock(MemoryStore::new(), DAY, manual_clock());
        prop_assert_eq!(cache.lookup(&key).unwrap(), None);
    }

    // A store is immediately visible through the file engine, whatever the key.
    #[test]
    fn prop_file_store_then_lookup(key in key_strategy(), result in result_strategy()) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        let record = store.path_for(&key);
        prop_assert_eq!(record.parent(), Some(dir.path()));

        let cache = ResultCache::with_clock(store, DAY, manual_clock());
        cache.store(&key, result.clone()).unwrap();
        prop_assert_eq!(cache.lookup(&key).unwrap(), Some(result));
    }

    // Lookups are valid strictly before the TTL and absent from it onward.
    #[test]
    fn prop_ttl_boundary(
        ttl_secs in 1u64..=7 * 24 * 3600,
        epsilon_ms in 1u64..=1000,
    ) {
        let ttl = Duration::from_secs(ttl_secs);
        let epsilon = Duration::from_millis(epsilon_ms);
        let clock = manual_clock();
        let cache = ResultCache::with_clock(MemoryStore::new(), ttl, clock.clone());
        cache.store("k", "v").unwrap();

        clock.advance(ttl.saturating_sub(epsilon));
        let fresh = cache.lookup("k").unwrap();
        prop_assert_eq!(fresh.as_deref(), Some("v"));

        clock.advance(epsilon * 2);
        prop_assert_eq!(cache.lookup("k").unwrap(), None);
    }

    // Any interleaving of stores and lookups behaves like a last-write-wins map.
    #[test]
    fn prop_matches_model(ops in prop::collection::vec(cache_op_strategy(), 1..40)) {
        let dir = TempDir::new().unwrap();
        let cache = ResultCache::with_clock(FileStore::new(dir.path()), DAY, manual_clock());
        let mut model: HashMap<String, String> = HashMap::new();
        let mut expected_hits = 0u64;

        for op in ops {
            match op {
                CacheOp::Store { key, result } => {
                    cache.store(&key, result.clone()).unwrap();
                    model.insert(key, result);
                }
                CacheOp::Lookup { key } => {
                    let got = cache.lookup(&key).unwrap();
                    if got.is_some() {
                        expected_hits += 1;
                    }
                    prop_assert_eq!(got.as_ref(), model.get(&key));
                }
            }
        }

        prop_assert_eq!(cache.stats().hits, expected_hits);
    }
}
