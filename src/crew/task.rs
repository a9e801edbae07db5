//! Task declarations and outputs

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::hooks::Inputs;

/// A unit of work assigned to one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Registry name, also used in completion logs
    pub name: String,
    /// What to do; may contain `{field}` placeholders
    pub description: String,
    /// Shape of a good answer; may contain `{field}` placeholders
    pub expected_output: String,
    /// Name of the agent that runs this task
    pub agent: String,
    /// File that receives the task's output, if any
    #[serde(default)]
    pub output_file: Option<PathBuf>,
}

impl TaskSpec {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        agent: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            expected_output: String::new(),
            agent: agent.into(),
            output_file: None,
        }
    }

    pub fn expected_output(mut self, expected_output: impl Into<String>) -> Self {
        self.expected_output = expected_output.into();
        self
    }

    pub fn output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = Some(path.into());
        self
    }
}

/// Result of one task within a kickoff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskOutput {
    pub task: String,
    pub agent: String,
    pub output: String,
    /// Served from the result cache instead of the executor
    pub cached: bool,
}

/// Result of a whole kickoff.
#[derive(Debug, Clone, Serialize)]
pub struct CrewOutput {
    /// Per-task outputs in execution order
    pub tasks: Vec<TaskOutput>,
    /// Normalized inputs the crew ran with
    pub inputs: Option<Inputs>,
}

impl CrewOutput {
    /// Output of the last task, or an empty string for an empty run.
    pub fn raw(&self) -> &str {
        self.tasks.last().map(|t| t.output.as_str()).unwrap_or("")
    }
}

/// Replaces `{field}` placeholders with scalar input values.
///
/// Unknown placeholders and non-scalar values are left untouched.
pub fn interpolate(template: &str, inputs: Option<&Inputs>) -> String {
    let Some(inputs) = inputs else {
        return template.to_string();
    };

    let mut rendered = template.to_string();
    for (field, value) in inputs {
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => continue,
        };
        rendered = rendered.replace(&format!("{{{}}}", field), &text);
    }
    rendered
}
