//! Request and Response models for the cache service API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{CompletionRequest, StoreRequest};
pub use responses::{
    CompletionResponse, ExpireResponse, HealthResponse, InputsResponse, LookupResponse,
    PurgeResponse, StatsResponse, StoreResponse, TemplateResponse,
};
