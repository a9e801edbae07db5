//! Quick analysis templates

use serde::Serialize;

/// Preset analysis prompts offered alongside the URL input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisTemplate {
    Tutorial,
    Educational,
    TechReview,
    Creative,
}

impl AnalysisTemplate {
    pub const ALL: [AnalysisTemplate; 4] = [
        AnalysisTemplate::Tutorial,
        AnalysisTemplate::Educational,
        AnalysisTemplate::TechReview,
        AnalysisTemplate::Creative,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AnalysisTemplate::Tutorial => "Tutorial Analysis",
            AnalysisTemplate::Educational => "Educational Content",
            AnalysisTemplate::TechReview => "Tech Reviews",
            AnalysisTemplate::Creative => "Creative Content",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            AnalysisTemplate::Tutorial => "💻",
            AnalysisTemplate::Educational => "📚",
            AnalysisTemplate::TechReview => "📱",
            AnalysisTemplate::Creative => "🎨",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            AnalysisTemplate::Tutorial => "Code examples & steps",
            AnalysisTemplate::Educational => "Learning material",
            AnalysisTemplate::TechReview => "Product analysis",
            AnalysisTemplate::Creative => "Art & design",
        }
    }

    pub fn default_prompt(self) -> &'static str {
        match self {
            AnalysisTemplate::Tutorial => {
                "Analyze code examples and implementation steps. \
                 Identify key concepts and implementation examples."
            }
            AnalysisTemplate::Educational => {
                "Create a study guide with key concepts. \
                 Summarize the main arguments of the presentation."
            }
            AnalysisTemplate::TechReview => {
                "Extract features and comparisons. \
                 List all product features mentioned with timestamps."
            }
            AnalysisTemplate::Creative => {
                "Document techniques and methods. \
                 List all tools and materials mentioned with timestamps."
            }
        }
    }

    /// Finds a template by its snake_case name or its label.
    pub fn from_name(name: &str) -> Option<Self> {
        let needle = name.trim();
        Self::ALL.into_iter().find(|t| {
            t.label().eq_ignore_ascii_case(needle)
                || serde_json::to_value(t)
                    .ok()
                    .and_then(|v| v.as_str().map(|s| s == needle))
                    .unwrap_or(false)
        })
    }
}
