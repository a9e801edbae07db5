//! Response DTOs for the cache service API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::hooks::Inputs;
use crate::video::AnalysisTemplate;

/// Response body for GET /cache/:key
#[derive(Debug, Clone, Serialize)]
pub struct LookupResponse {
    pub key: String,
    pub result: String,
}

impl LookupResponse {
    pub fn new(key: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            result: result.into(),
        }
    }
}

/// Response body for PUT /cache
#[derive(Debug, Clone, Serialize)]
pub struct StoreResponse {
    /// Success message
    pub message: String,
    /// The key that was stored
    pub key: String,
}

impl StoreResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' stored successfully", key),
            key,
        }
    }
}

/// Response body for DELETE /cache/:key
#[derive(Debug, Clone, Serialize)]
pub struct ExpireResponse {
    pub message: String,
    pub key: String,
}

impl ExpireResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' expired successfully", key),
            key,
        }
    }
}

/// Response body for POST /purge
#[derive(Debug, Clone, Serialize)]
pub struct PurgeResponse {
    /// Number of expired entries removed
    pub purged: usize,
}

/// Response body for POST /inputs/validate
#[derive(Debug, Clone, Serialize)]
pub struct InputsResponse {
    /// Normalized inputs, null when none were sent
    pub inputs: Option<Inputs>,
}

/// Response body for POST /tasks/completed
#[derive(Debug, Clone, Serialize)]
pub struct CompletionResponse {
    pub task: String,
    pub output_chars: usize,
    pub agent: String,
}

/// One entry of GET /video/templates
#[derive(Debug, Clone, Serialize)]
pub struct TemplateResponse {
    pub name: AnalysisTemplate,
    pub label: &'static str,
    pub emoji: &'static str,
    pub description: &'static str,
    pub default_prompt: &'static str,
}

impl From<AnalysisTemplate> for TemplateResponse {
    fn from(template: AnalysisTemplate) -> Self {
        Self {
            name: template,
            label: template.label(),
            emoji: template.emoji(),
            description: template.description(),
            default_prompt: template.default_prompt(),
        }
    }
}

/// Response body for GET /stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub expired: u64,
    pub corrupt: u64,
    pub writes: u64,
    pub purged: u64,
    /// hits / all lookups
    pub hit_rate: f64,
    /// Configured TTL in seconds
    pub ttl_secs: u64,
}

impl StatsResponse {
    pub fn new(stats: &CacheStats, ttl_secs: u64) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            expired: stats.expired,
            corrupt: stats.corrupt,
            writes: stats.writes,
            purged: stats.purged,
            hit_rate: stats.hit_rate(),
            ttl_secs,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_response() {
        let resp = StoreResponse::new("abc");
        assert_eq!(resp.key, "abc");
        assert!(resp.message.contains("abc"));
    }

    #[test]
    fn test_stats_response_hit_rate() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_expired();

        let resp = StatsResponse::new(&stats, 86_400);
        assert_eq!(resp.hit_rate, 0.5);
        assert_eq!(resp.ttl_secs, 86_400);
    }

    #[test]
    fn test_template_response_serializes_snake_case_name() {
        let json = serde_json::to_value(TemplateResponse::from(AnalysisTemplate::TechReview)).unwrap();
        assert_eq!(json["name"], "tech_review");
        assert_eq!(json["label"], "Tech Reviews");
    }

    #[test]
    fn test_health_response() {
        let resp = HealthResponse::healthy();
        assert_eq!(resp.status, "healthy");
        assert!(!resp.timestamp.is_empty());
    }
}
