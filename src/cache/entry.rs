//! Cache Entry Module
//!
//! Defines the persisted record for a cached task result.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{CrewError, Result};

// == Cache Entry ==
/// A single cached result, one per key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Opaque identifier of the cached computation
    pub key: String,
    /// The stored output
    pub result: String,
    /// Wall-clock instant the entry was written
    pub timestamp: DateTime<Utc>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry stamped with `timestamp`.
    pub fn new(key: impl Into<String>, result: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            result: result.into(),
            timestamp,
        }
    }

    // == Wall-Clock Age ==
    /// Age of the entry measured against `now`.
    ///
    /// A timestamp in the future (clock stepped backward since the write)
    /// yields its absolute distance, so validity stays bounded by one TTL.
    pub fn wall_age(&self, now: DateTime<Utc>) -> Duration {
        let delta = now.signed_duration_since(self.timestamp);
        delta.abs().to_std().unwrap_or(Duration::ZERO)
    }

    // == Is Expired ==
    /// Checks if the entry has reached `ttl` as of `now`.
    ///
    /// Boundary condition: an entry whose age equals the TTL is expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.wall_age(now) >= ttl
    }
}

// == Persisted Record ==
/// On-disk shape of an entry. Every field is optional so that a damaged
/// record can be reported precisely instead of failing in serde.
#[derive(Debug, Deserialize)]
pub(crate) struct StoredRecord {
    key: Option<String>,
    result: Option<String>,
    timestamp: Option<String>,
}

impl StoredRecord {
    /// Key the record claims to belong to, if any.
    pub(crate) fn key_hint(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Validates the record against the key it was looked up under.
    pub(crate) fn into_entry(self, expected_key: &str) -> Result<CacheEntry> {
        let key = self
            .key
            .ok_or_else(|| CrewError::corrupt(expected_key, "missing field 'key'"))?;
        if key != expected_key {
            return Err(CrewError::corrupt(
                expected_key,
                format!("record belongs to key '{}'", key),
            ));
        }
        let result = self
            .result
            .ok_or_else(|| CrewError::corrupt(expected_key, "missing field 'result'"))?;
        let raw = self
            .timestamp
            .ok_or_else(|| CrewError::corrupt(expected_key, "missing field 'timestamp'"))?;
        let timestamp = parse_timestamp(&raw).ok_or_else(|| {
            CrewError::corrupt(expected_key, format!("unparsable timestamp '{}'", raw))
        })?;

        Ok(CacheEntry {
            key,
            result,
            timestamp,
        })
    }
}

// == Utility Functions ==
/// Parses an RFC 3339 instant, falling back to a naive ISO-8601 timestamp
/// without offset, which is read as UTC.
///
/// Legacy naive records were stamped in the writer's local time, which is not
/// recorded. On a host outside UTC their age is off by the zone offset, so
/// such an entry expires that much early or late. Records written here always
/// carry an explicit offset.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
