//! API Module
//!
//! HTTP adapter exposing the cache and kickoff hooks to an out-of-process
//! orchestration engine.
//!
//! # Endpoints
//! - `GET /cache/:key` - Look up a cached result
//! - `PUT /cache` - Store a result
//! - `DELETE /cache/:key` - Remove an entry
//! - `POST /purge` - Remove all expired entries
//! - `POST /inputs/validate` - Validate and normalize kickoff inputs
//! - `POST /tasks/completed` - Log a task completion
//! - `GET /video/templates` - List video analysis templates
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
