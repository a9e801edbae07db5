//! Entry Store Module
//!
//! Storage engines behind the result cache: one JSON file per key, or an
//! in-process map.

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::cache::entry::StoredRecord;
use crate::cache::CacheEntry;
use crate::error::{CrewError, Result};

/// Distinguishes temp files written concurrently by one process.
static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

// == Entry Store Trait ==
/// Key-value persistence for cache entries.
///
/// Implementations hold at most one entry per key and must make `write`
/// atomic with respect to `read`.
pub trait EntryStore: Send + Sync {
    /// Reads the entry for `key`; `Ok(None)` when nothing is stored.
    fn read(&self, key: &str) -> Result<Option<CacheEntry>>;

    /// Writes `entry`, replacing any prior entry for its key.
    fn write(&self, entry: &CacheEntry) -> Result<()>;

    /// Removes the entry for `key`, returning whether one existed.
    fn remove(&self, key: &str) -> Result<bool>;

    /// Returns every readable entry. Damaged records are skipped.
    fn scan(&self) -> Result<Vec<CacheEntry>>;
}

// == File Store ==
/// One JSON record per key under a directory.
///
/// File names are the SHA-256 of the key, so arbitrary keys (including ones
/// with `/` or `..`) never escape the directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    // == Constructor ==
    /// Creates a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the record for `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", hash_key(key)))
    }

    /// Temp file for one write. Unique per process and per call so writers
    /// sharing a directory never truncate each other's pending record.
    fn tmp_path_for(&self, key: &str) -> PathBuf {
        let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
        self.dir.join(format!(
            "{}.json.{}.{}.tmp",
            hash_key(key),
            std::process::id(),
            seq
        ))
    }

    fn decode(key: &str, raw: &str) -> Result<CacheEntry> {
        let record: StoredRecord = serde_json::from_str(raw)
            .map_err(|e| CrewError::corrupt(key, format!("invalid record: {}", e)))?;
        record.into_entry(key)
    }
}

impl EntryStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<CacheEntry>> {
        let path = self.path_for(key);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Self::decode(key, &raw).map(Some)
    }

    fn write(&self, entry: &CacheEntry) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(&entry.key);
        let tmp = self.tmp_path_for(&entry.key);
        let body = serde_json::to_vec_pretty(entry)
            .map_err(|e| CrewError::InvalidRequest(format!("unserializable entry: {}", e)))?;

        // Readers only ever see the old record or the complete new one.
        let published = (|| -> std::io::Result<()> {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(&body)?;
            file.sync_all()?;
            fs::rename(&tmp, &path)
        })();
        if let Err(e) = published {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        debug!(path = %path.display(), "Cache record written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn scan(&self) -> Result<Vec<CacheEntry>> {
        let dir = match fs::read_dir(&self.dir) {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        for item in dir {
            let path = item?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let raw = fs::read_to_string(&path)?;
            let record: StoredRecord = match serde_json::from_str(&raw) {
                Ok(record) => record,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable cache record");
                    continue;
                }
            };
            // A record is only trusted if it hashes back to its own file name.
            let Some(key) = record.key_hint().map(str::to_owned) else {
                warn!(path = %path.display(), "Skipping cache record without key");
                continue;
            };
            if self.path_for(&key) != path {
                warn!(path = %path.display(), "Skipping cache record stored under a foreign name");
                continue;
            }
            match record.into_entry(&key) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping corrupt cache record"),
            }
        }
        Ok(entries)
    }
}

// == Memory Store ==
/// In-process store, mainly for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EntryStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<CacheEntry>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn write(&self, entry: &CacheEntry) -> Result<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(entry.key.clone(), entry.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.remove(key).is_some())
    }

    fn scan(&self) -> Result<Vec<CacheEntry>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.values().cloned().collect())
    }
}

// == Utility Functions ==
/// Lowercase hex SHA-256 of `key`.
pub fn hash_key(key: &str) -> String {
    hex::encode(Sha256::digest(key.as_bytes()))
}
