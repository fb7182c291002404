//! Orchestration results.

use crate::AiError;

/// Reply used when a run cannot produce an answer.
pub const FALLBACK_TEXT: &str = "Sorry, I encountered an error processing your request.";

/// The result of one orchestration run. Always carries displayable text.
#[derive(Debug)]
pub struct RunOutcome {
    pub text: String,
    /// Set when generation failed and `text` is the fallback.
    pub error: Option<AiError>,
    /// Number of tool rounds executed.
    pub tool_rounds: u32,
    /// The run stopped at the tool round limit.
    pub capped: bool,
}

impl RunOutcome {
    pub(crate) fn completed(text: String, tool_rounds: u32) -> Self {
        Self {
            text,
            error: None,
            tool_rounds,
            capped: false,
        }
    }

    pub(crate) fn capped(text: String, tool_rounds: u32) -> Self {
        Self {
            text,
            error: None,
            tool_rounds,
            capped: true,
        }
    }

    pub(crate) fn failed(error: AiError, tool_rounds: u32) -> Self {
        Self {
            text: FALLBACK_TEXT.to_string(),
            error: Some(error),
            tool_rounds,
            capped: false,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
