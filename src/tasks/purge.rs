//! Expired-entry purge task
//!
//! Background task that periodically removes expired cache records.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::ResultCache;

/// Spawns a background task that calls [`ResultCache::purge_expired`] every
/// `interval_secs` seconds.
///
/// The sweep does blocking file I/O, so each run goes through
/// `spawn_blocking`. Returns a handle the caller aborts on shutdown.
pub fn spawn_purge_task(cache: Arc<ResultCache>, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!("Starting purge task with interval of {} seconds", interval.as_secs());

        loop {
            tokio::time::sleep(interval).await;

            let sweep = {
                let cache = cache.clone();
                tokio::task::spawn_blocking(move || cache.purge_expired()).await
            };

            match sweep {
                Ok(Ok(0)) => debug!("Purge: no expired entries found"),
                Ok(Ok(removed)) => info!("Purge: removed {} expired entries", removed),
                Ok(Err(e)) => warn!(error = %e, "Purge sweep failed"),
                Err(e) => warn!(error = %e, "Purge sweep panicked"),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::FileStore;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_purge_task_removes_expired_entries() {
        let dir = TempDir::new().unwrap();
        let cache = Arc::new(ResultCache::new(
            FileStore::new(dir.path()),
            Duration::from_millis(200),
        ));
        cache.store("expire_soon", "value").unwrap();

        let handle = spawn_purge_task(cache.clone(), 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(!FileStore::new(dir.path()).path_for("expire_soon").exists());
        assert_eq!(cache.stats().purged, 1);

        handle.abort();
    }

    #[tokio::test]
    async fn test_purge_task_preserves_valid_entries() {
        let dir = TempDir::new().unwrap();
        let cache = Arc::new(ResultCache::new(
            FileStore::new(dir.path()),
            Duration::from_secs(3600),
        ));
        cache.store("long_lived", "value").unwrap();

        let handle = spawn_purge_task(cache.clone(), 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(cache.lookup("long_lived").unwrap().as_deref(), Some("value"));

        handle.abort();
    }

    #[tokio::test]
    async fn test_purge_task_can_be_aborted() {
        let cache = Arc::new(ResultCache::new(
            crate::cache::MemoryStore::new(),
            Duration::from_secs(60),
        ));

        let handle = spawn_purge_task(cache, 1);
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
