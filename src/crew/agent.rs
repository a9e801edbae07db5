//! Agent declarations

use serde::{Deserialize, Serialize};

/// A crew member: the persona an executor adopts for its tasks.
///
/// `role`, `goal` and `backstory` may contain `{field}` placeholders filled
/// from the kickoff inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSpec {
    /// Registry name, referenced by tasks
    pub name: String,
    pub role: String,
    pub goal: String,
    pub backstory: String,
    /// Names of registered tools this agent may call
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub verbose: bool,
}

impl AgentSpec {
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            goal: String::new(),
            backstory: String::new(),
            tools: Vec::new(),
            verbose: false,
        }
    }

    pub fn goal(mut self, goal: impl Into<String>) -> Self {
        self.goal = goal.into();
        self
    }

    pub fn backstory(mut self, backstory: impl Into<String>) -> Self {
        self.backstory = backstory.into();
        self
    }

    pub fn tool(mut self, tool: impl Into<String>) -> Self {
        self.tools.push(tool.into());
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}
