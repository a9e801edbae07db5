//! Crew registry and kickoff
//!
//! Agents, tools and tasks are registered by explicit calls; `build` checks
//! every cross-reference once so `kickoff` can run without lookups failing.

use std::collections::HashMap;
use std::fs;
use std::sync::Arc;

use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::cache::ResultCache;
use crate::crew::{interpolate, AgentSpec, CrewOutput, TaskOutput, TaskSpec, Tool};
use crate::error::{CrewError, Result};
use crate::hooks::{
    validate_and_normalize_inputs, CompletionObserver, Inputs, TracingObserver, TIMESTAMP_FIELD,
};

/// Everything an executor needs to run one task.
pub struct TaskRequest<'a> {
    pub agent: &'a AgentSpec,
    pub task: &'a TaskSpec,
    /// Task description with inputs interpolated
    pub description: String,
    /// Expected output with inputs interpolated
    pub expected_output: String,
    /// Outputs of the tasks that ran before this one
    pub context: &'a [TaskOutput],
    /// Tools granted to the agent
    pub tools: Vec<&'a dyn Tool>,
    pub inputs: Option<&'a Inputs>,
}

/// External runtime that turns a task request into text, typically by
/// calling a language model.
pub trait TaskExecutor {
    fn execute(&self, request: &TaskRequest<'_>) -> Result<String>;
}

// == Crew Registry ==
/// Builder collecting agents, tools and tasks.
#[derive(Default)]
pub struct CrewRegistry {
    agents: Vec<AgentSpec>,
    tools: HashMap<String, Arc<dyn Tool>>,
    tasks: Vec<TaskSpec>,
    cache: Option<Arc<ResultCache>>,
    observer: Option<Arc<dyn CompletionObserver>>,
}

impl CrewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an agent. Duplicate names are rejected.
    pub fn add_agent(&mut self, agent: AgentSpec) -> Result<&mut Self> {
        if self.agent(&agent.name).is_some() {
            return Err(CrewError::InvalidRequest(format!(
                "agent '{}' registered twice",
                agent.name
            )));
        }
        self.agents.push(agent);
        Ok(self)
    }

    /// Registers a tool under its own name, replacing any previous one.
    pub fn add_tool(&mut self, tool: impl Tool + 'static) -> &mut Self {
        self.tools.insert(tool.name().to_string(), Arc::new(tool));
        self
    }

    /// Appends a task. Its agent must already be registered.
    pub fn add_task(&mut self, task: TaskSpec) -> Result<&mut Self> {
        if self.agent(&task.agent).is_none() {
            return Err(CrewError::UnknownAgent(task.agent));
        }
        self.tasks.push(task);
        Ok(self)
    }

    /// Serves repeated tasks from `cache`.
    pub fn with_cache(&mut self, cache: Arc<ResultCache>) -> &mut Self {
        self.cache = Some(cache);
        self
    }

    /// Replaces the default tracing completion observer.
    pub fn with_observer(&mut self, observer: Arc<dyn CompletionObserver>) -> &mut Self {
        self.observer = Some(observer);
        self
    }

    /// Checks tool references and freezes the registry into a crew.
    pub fn build(self) -> Result<Crew> {
        if self.tasks.is_empty() {
            return Err(CrewError::InvalidRequest(
                "crew needs at least one task".to_string(),
            ));
        }
        for agent in &self.agents {
            if let Some(missing) = agent.tools.iter().find(|t| !self.tools.contains_key(*t)) {
                return Err(CrewError::UnknownTool(missing.clone()));
            }
        }

        Ok(Crew {
            agents: self.agents,
            tools: self.tools,
            tasks: self.tasks,
            cache: self.cache,
            observer: self.observer.unwrap_or_else(|| Arc::new(TracingObserver)),
        })
    }

    fn agent(&self, name: &str) -> Option<&AgentSpec> {
        self.agents.iter().find(|a| a.name == name)
    }
}

// == Crew ==
/// A validated set of agents and tasks, run sequentially.
pub struct Crew {
    agents: Vec<AgentSpec>,
    tools: HashMap<String, Arc<dyn Tool>>,
    tasks: Vec<TaskSpec>,
    cache: Option<Arc<ResultCache>>,
    observer: Arc<dyn CompletionObserver>,
}

impl Crew {
    pub fn agents(&self) -> &[AgentSpec] {
        &self.agents
    }

    pub fn tasks(&self) -> &[TaskSpec] {
        &self.tasks
    }

    /// Runs every task in declaration order.
    ///
    /// Inputs go through [`validate_and_normalize_inputs`] first; a failure
    /// there aborts before any task runs. Cache errors degrade to a miss.
    pub fn kickoff(
        &self,
        inputs: Option<&Inputs>,
        executor: &dyn TaskExecutor,
    ) -> Result<CrewOutput> {
        let inputs = validate_and_normalize_inputs(inputs)?;
        info!(tasks = self.tasks.len(), "Crew kickoff");

        let mut outputs: Vec<TaskOutput> = Vec::with_capacity(self.tasks.len());
        for task in &self.tasks {
            let agent = self
                .agents
                .iter()
                .find(|a| a.name == task.agent)
                .ok_or_else(|| CrewError::UnknownAgent(task.agent.clone()))?;

            let request = TaskRequest {
                agent,
                task,
                description: interpolate(&task.description, inputs.as_ref()),
                expected_output: interpolate(&task.expected_output, inputs.as_ref()),
                context: &outputs,
                tools: agent
                    .tools
                    .iter()
                    .filter_map(|name| self.tools.get(name))
                    .map(|tool| tool.as_ref())
                    .collect(),
                inputs: inputs.as_ref(),
            };
            let cache_key = task_cache_key(&request);

            let cached = self
                .cache
                .as_ref()
                .and_then(|cache| cache.lookup_or_miss(&cache_key));

            let (output, from_cache) = match cached {
                Some(output) => {
                    debug!(task = %task.name, "Task served from cache");
                    (output, true)
                }
                None => {
                    let output = executor.execute(&request)?;
                    if let Some(cache) = &self.cache {
                        if let Err(e) = cache.store(&cache_key, output.clone()) {
                            warn!(task = %task.name, error = %e, "Failed to cache task output");
                        }
                    }
                    (output, false)
                }
            };

            if let Some(path) = &task.output_file {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                fs::write(path, &output)?;
            }

            self.observer.task_completed(&task.name, &output, &agent.name);
            outputs.push(TaskOutput {
                task: task.name.clone(),
                agent: agent.name.clone(),
                output,
                cached: from_cache,
            });
        }

        Ok(CrewOutput {
            tasks: outputs,
            inputs,
        })
    }
}

/// Cache key for one task run.
///
/// Hashes everything the executor is handed: the agent and its persona
/// rendered with the inputs, the task name, rendered description and
/// expected output, the granted tools, the inputs minus the kickoff
/// `timestamp`, and every upstream output. Each part is length-prefixed so
/// fields cannot run together.
pub fn task_cache_key(request: &TaskRequest<'_>) -> String {
    let mut hasher = Sha256::new();
    let mut feed = |part: &str| {
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part.as_bytes());
    };

    let agent = request.agent;
    feed(&agent.name);
    feed(&interpolate(&agent.role, request.inputs));
    feed(&interpolate(&agent.goal, request.inputs));
    feed(&interpolate(&agent.backstory, request.inputs));

    feed(&request.task.name);
    feed(&request.description);
    feed(&request.expected_output);

    feed(&request.tools.len().to_string());
    for tool in &request.tools {
        feed(tool.name());
    }

    let inputs = match request.inputs {
        Some(inputs) => Value::Object(
            inputs
                .iter()
                .filter(|(field, _)| field.as_str() != TIMESTAMP_FIELD)
                .map(|(field, value)| (field.clone(), value.clone()))
                .collect(),
        ),
        None => Value::Null,
    };
    feed(&inputs.to_string());

    for upstream in request.context {
        feed(&upstream.output);
    }
    format!("task-{}", hex::encode(hasher.finalize()))
}
