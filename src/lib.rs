//! Crew Cache - task-result cache and kickoff hooks for agent crews
//!
//! Provides a file-backed result cache with a read-time TTL check, input
//! validation and completion logging hooks, an explicit crew registry and a
//! video analysis agent configuration, plus an HTTP adapter exposing them.

pub mod api;
pub mod cache;
pub mod config;
pub mod crew;
pub mod error;
pub mod hooks;
pub mod models;
pub mod tasks;
pub mod video;

pub use api::AppState;
pub use cache::ResultCache;
pub use config::Config;
pub use error::{CrewError, Result};
pub use tasks::spawn_purge_task;
