//! Video Analysis Module
//!
//! Configuration and request plumbing for a transcript-equipped analysis
//! agent. The model call itself goes through a caller-supplied
//! [`AgentRuntime`].

mod agent;
mod templates;

pub use agent::{
    AgentRuntime, AnalysisReport, VideoAgentConfig, VideoAnalysisRequest, VideoAnalyzer,
    DEFAULT_INSTRUCTIONS,
};
pub use templates::AnalysisTemplate;
