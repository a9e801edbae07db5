//! Crew Module
//!
//! Explicitly registered agents, tools and tasks, run sequentially with
//! kickoff hooks and the result cache wired in. Model calls are delegated to
//! a caller-supplied [`TaskExecutor`].

mod agent;
mod registry;
mod task;
mod tool;

pub use agent::AgentSpec;
pub use registry::{task_cache_key, Crew, CrewRegistry, TaskExecutor, TaskRequest};
pub use task::{interpolate, CrewOutput, TaskOutput, TaskSpec};
pub use tool::{Tool, WebSearchTool};

use crate::error::Result;

/// Registry pre-filled with the research crew: a researcher, a reporting
/// analyst and an email summarizer, each owning one task.
///
/// Callers may still attach a cache or observer before `build`.
pub fn memory_crew() -> Result<CrewRegistry> {
    let mut registry = CrewRegistry::new();
    registry.add_tool(WebSearchTool);

    registry
        .add_agent(
            AgentSpec::new("researcher", "{topic} Senior Data Researcher")
                .goal("Uncover cutting-edge developments in {topic}")
                .backstory(
                    "A seasoned researcher with a knack for finding the most relevant \
                     information about {topic} and presenting it clearly.",
                )
                .tool(WebSearchTool::NAME)
                .verbose(true),
        )?
        .add_agent(
            AgentSpec::new("reporting_analyst", "{topic} Reporting Analyst")
                .goal("Create detailed reports based on {topic} research findings")
                .backstory(
                    "A meticulous analyst who turns complex data into clear, \
                     actionable reports.",
                )
                .verbose(true),
        )?
        .add_agent(
            AgentSpec::new("email_summarizer", "Email Summarizer")
                .goal("Condense the {topic} report into a short email")
                .backstory("Writes crisp summaries busy readers actually finish.")
                .verbose(true),
        )?;

    registry
        .add_task(
            TaskSpec::new(
                "research_task",
                "Conduct thorough research about {topic}. Make sure you find any \
                 interesting and relevant information.",
                "researcher",
            )
            .expected_output("A list of 10 bullet points of the most relevant information about {topic}"),
        )?
        .add_task(
            TaskSpec::new(
                "reporting_task",
                "Review the research context and expand each topic into a full \
                 section for a report.",
                "reporting_analyst",
            )
            .expected_output("A fully fledged report in markdown, without code fences")
            .output_file("report.md"),
        )?
        .add_task(
            TaskSpec::new(
                "email_summarizer_task",
                "Summarize the {topic} report into an email for stakeholders.",
                "email_summarizer",
            )
            .expected_output("A short plain-text email")
            .output_file("email.md"),
        )?;

    Ok(registry)
}
