//! Kickoff Hooks Module
//!
//! Callbacks the crew runner fires around task execution: input validation
//! before kickoff and completion logging after each task.

mod completion;
mod inputs;

pub use completion::{log_completion, CompletionObserver, TracingObserver};
pub use inputs::{validate_and_normalize_inputs, Inputs, TIMESTAMP_FIELD, TOPIC_FIELD};
