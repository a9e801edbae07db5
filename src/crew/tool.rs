//! Agent tools

use serde_json::{json, Value};

use crate::error::{CrewError, Result};

/// A capability an executor may invoke on an agent's behalf.
pub trait Tool: Send + Sync {
    /// Registry name, referenced from `AgentSpec::tools`
    fn name(&self) -> &str;

    /// Human-readable summary handed to the model
    fn description(&self) -> &str;

    /// Runs the tool with JSON arguments.
    fn call(&self, args: &Value) -> Result<Value>;
}

/// Placeholder web search returning `max_results` canned hits.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebSearchTool;

impl WebSearchTool {
    pub const NAME: &'static str = "web_search";
    const DEFAULT_MAX_RESULTS: usize = 5;
    /// Upper bound on `max_results`
    pub const MAX_RESULTS: usize = 50;

    /// Canned hits for `query`, at most [`Self::MAX_RESULTS`] of them.
    pub fn search(&self, query: &str, max_results: usize) -> Vec<String> {
        (0..max_results.min(Self::MAX_RESULTS))
            .map(|i| format!("Result {} for: {}", i, query))
            .collect()
    }
}

impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Search the web for information. Args: query (string), max_results (integer, default 5)."
    }

    fn call(&self, args: &Value) -> Result<Value> {
        let query = args
            .get("query")
            .and_then(Value::as_str)
            .ok_or_else(|| CrewError::MissingRequiredField("query".to_string()))?;
        let max_results = match args.get("max_results") {
            None | Some(Value::Null) => Self::DEFAULT_MAX_RESULTS,
            Some(value) => value
                .as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .filter(|n| *n <= Self::MAX_RESULTS)
                .ok_or_else(|| CrewError::InvalidField {
                    field: "max_results".to_string(),
                    reason: format!("expected an integer between 0 and {}", Self::MAX_RESULTS),
                })?,
        };

        Ok(json!(self.search(query, max_results)))
    }
}
