//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Expired-entry purge: sweeps records past their TTL at a configured
//!   interval. Lookups never delete, so without it expired records stay on
//!   disk until overwritten.

mod purge;

pub use purge::spawn_purge_task;
