//! Video analysis agent configuration and runner

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{CrewError, Result};
use crate::video::AnalysisTemplate;

/// Instruction template for the analysis agent.
pub const DEFAULT_INSTRUCTIONS: &str = "\
You analyse online videos from their transcript and metadata.

Steps:
1. Overview: note the length, the kind of video (tutorial, review, lecture, ...) and how it is structured.
2. Timestamps: mark major topic transitions and key demonstrations as [start, end, summary].
3. Organisation: group related segments, name the main themes and follow how they progress.

Style:
- Open with the overview, then one titled section per segment.
- Call out learning points, practical demonstrations and references.

Quality:
- Only cite timestamps present in the transcript; never invent them.
- Keep the level of detail consistent across the whole video.";

/// Everything the analysis agent is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoAgentConfig {
    pub name: String,
    /// Model identifier passed to the runtime
    pub model_id: String,
    /// Tool names the runtime should attach
    pub tools: Vec<String>,
    pub instructions: String,
    /// Append the current time to the instructions
    pub add_datetime: bool,
    /// Ask for markdown output
    pub markdown: bool,
}

impl Default for VideoAgentConfig {
    fn default() -> Self {
        Self {
            name: "Video Agent".to_string(),
            model_id: "gpt-4o".to_string(),
            tools: vec!["youtube_transcript".to_string()],
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
            add_datetime: true,
            markdown: true,
        }
    }
}

impl VideoAgentConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            model_id: config.model_id.clone(),
            ..Self::default()
        }
    }

    /// Instructions as sent to the model at `now`.
    pub fn render_instructions(&self, now: DateTime<Utc>) -> String {
        let mut rendered = self.instructions.clone();
        if self.add_datetime {
            rendered.push_str("\n\nThe current time is ");
            rendered.push_str(&now.to_rfc3339_opts(SecondsFormat::Secs, true));
            rendered.push('.');
        }
        if self.markdown {
            rendered.push_str("\n\nFormat the answer as markdown.");
        }
        rendered
    }
}

/// A video URL plus what to look for in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoAnalysisRequest {
    pub url: String,
    pub instructions: String,
}

impl VideoAnalysisRequest {
    /// Fails with `MissingRequiredField("video_url")` on a blank URL.
    pub fn new(url: impl Into<String>, instructions: impl Into<String>) -> Result<Self> {
        let url = url.into().trim().to_string();
        if url.is_empty() {
            return Err(CrewError::MissingRequiredField("video_url".to_string()));
        }
        Ok(Self {
            url,
            instructions: instructions.into(),
        })
    }

    /// Request using a template's default prompt.
    pub fn from_template(url: impl Into<String>, template: AnalysisTemplate) -> Result<Self> {
        Self::new(url, template.default_prompt())
    }

    /// User message sent to the agent.
    pub fn prompt(&self) -> String {
        format!("URL: {}\nInstructions: {}", self.url, self.instructions)
    }
}

/// Model runtime able to run an agent with tools. Supplied by the caller.
pub trait AgentRuntime {
    fn run(&self, agent: &VideoAgentConfig, instructions: &str, prompt: &str) -> Result<String>;
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub url: String,
    pub model_id: String,
    /// Agent's answer, markdown when configured
    pub content: String,
    pub generated_at: DateTime<Utc>,
}

/// Runs analysis requests against one configured agent.
pub struct VideoAnalyzer<R> {
    config: VideoAgentConfig,
    runtime: R,
}

impl<R: AgentRuntime> VideoAnalyzer<R> {
    pub fn new(config: VideoAgentConfig, runtime: R) -> Self {
        Self { config, runtime }
    }

    pub fn config(&self) -> &VideoAgentConfig {
        &self.config
    }

    pub fn analyze(&self, request: &VideoAnalysisRequest) -> Result<AnalysisReport> {
        let now = Utc::now();
        let instructions = self.config.render_instructions(now);

        info!(url = %request.url, model = %self.config.model_id, "Analyzing video");
        let content = self
            .runtime
            .run(&self.config, &instructions, &request.prompt())
            .map_err(|e| {
                warn!(url = %request.url, error = %e, "Video analysis failed");
                match e {
                    CrewError::Execution(_) => e,
                    other => CrewError::Execution(other.to_string()),
                }
            })?;

        Ok(AnalysisReport {
            url: request.url.clone(),
            model_id: self.config.model_id.clone(),
            content,
            generated_at: now,
        })
    }
}
