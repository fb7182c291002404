//! The generate / call-tool loop.
//!
//! One user utterance becomes a sequence of generation calls interleaved
//! with tool invocations until the model answers in plain text.

mod run;
mod types;


pub use run::Orchestrator;
pub use types::{RunOutcome, FALLBACK_TEXT};
