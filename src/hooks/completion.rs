//! Task completion hook
//!
//! Records which task finished, how much it produced and which agent ran it.

use tracing::info;

/// Receives a notification after every finished task.
///
/// Implementations must not panic or block for long; the runner does not
/// wait on or inspect the outcome.
pub trait CompletionObserver: Send + Sync {
    fn task_completed(&self, task: &str, output: &str, agent: &str);
}

/// Default observer, forwards to [`log_completion`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl CompletionObserver for TracingObserver {
    fn task_completed(&self, task: &str, output: &str, agent: &str) {
        log_completion(task, output, agent);
    }
}

/// Logs a task completion with the output length in characters.
///
/// Infallible: emitting a tracing event cannot fail the caller.
pub fn log_completion(task: &str, output: &str, agent: &str) {
    info!(
        task,
        agent,
        output_chars = output.chars().count(),
        "Task completed"
    );
}
