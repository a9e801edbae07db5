//! Request DTOs for the cache service API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for PUT /cache
#[derive(Debug, Clone, Deserialize)]
pub struct StoreRequest {
    /// Opaque cache key
    pub key: String,
    /// Task output to cache
    pub result: String,
}

impl StoreRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        None
    }
}

/// Request body for POST /tasks/completed
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionRequest {
    /// Task identifier
    pub task: String,
    /// Task output text
    #[serde(default)]
    pub output: String,
    /// Agent identifier
    pub agent: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_request_deserialize() {
        let json = r#"{"key": "abc", "result": "hello"}"#;
        let req: StoreRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.key, "abc");
        assert_eq!(req.result, "hello");
        assert!(req.validate().is_none());
    }

    #[test]
    fn test_validate_empty_key() {
        let req = StoreRequest {
            key: "".to_string(),
            result: "hello".to_string(),
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_completion_request_output_defaults_empty() {
        let json = r#"{"task": "research_task", "agent": "researcher"}"#;
        let req: CompletionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.output, "");
    }
}
