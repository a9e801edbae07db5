//! Configuration Module
//!
//! Handles loading and managing cache and service configuration from
//! environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default TTL for cached task results: 24 hours.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 24 * 60 * 60;

/// Storage engine behind the result cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    /// One JSON record per key under `cache_dir`
    File,
    /// Process-local map, lost on restart
    Memory,
}

impl CacheBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Some(CacheBackend::File),
            "memory" => Some(CacheBackend::Memory),
            _ => None,
        }
    }
}

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding one record per cache key
    pub cache_dir: PathBuf,
    /// Storage engine for cached results
    pub cache_backend: CacheBackend,
    /// Time-to-live in seconds for cached results
    pub cache_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Expired-record sweep interval in seconds, 0 disables the sweep
    pub purge_interval: u64,
    /// Model identifier handed to the video analysis agent
    pub model_id: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_DIR` - Cache directory (default: cache)
    /// - `CACHE_BACKEND` - `file` or `memory` (default: file)
    /// - `CACHE_TTL` - TTL in seconds (default: 86400)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `PURGE_INTERVAL` - Sweep frequency in seconds (default: 0, disabled)
    /// - `MODEL_ID` - Model for the video agent (default: gpt-4o)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_dir: env::var("CACHE_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
            cache_backend: env::var("CACHE_BACKEND")
                .ok()
                .and_then(|v| CacheBackend::parse(&v))
                .unwrap_or(defaults.cache_backend),
            cache_ttl: env::var("CACHE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_ttl),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            purge_interval: env::var("PURGE_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.purge_interval),
            model_id: env::var("MODEL_ID")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.model_id),
        }
    }

    /// TTL as a `Duration`.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("cache"),
            cache_backend: CacheBackend::File,
            cache_ttl: DEFAULT_CACHE_TTL_SECS,
            server_port: 3000,
            purge_interval: 0,
            model_id: "gpt-4o".to_string(),
        }
    }
}
