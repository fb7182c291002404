//! Token usage tracking across generation calls.

use std::collections::HashMap;

use crate::TokenUsage;

/// Tracks cumulative token usage, broken down by model.
#[derive(Debug, Clone, Default)]
pub struct TokenTracker {
    total: TokenUsage,
    by_model: HashMap<String, TokenUsage>,
    call_count: u64,
}

impl TokenTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record token usage from a generation call.
    pub fn record(&mut self, model: &str, usage: &TokenUsage) {
        self.total.input_tokens = self.total.input_tokens.saturating_add(usage.input_tokens);
        self.total.output_tokens = self.total.output_tokens.saturating_add(usage.output_tokens);
        self.call_count += 1;

        let entry = self.by_model.entry(model.to_string()).or_default();
        entry.input_tokens = entry.input_tokens.saturating_add(usage.input_tokens);
        entry.output_tokens = entry.output_tokens.saturating_add(usage.output_tokens);
    }

    pub fn total(&self) -> &TokenUsage {
        &self.total
    }

    pub fn for_model(&self, model: &str) -> Option<&TokenUsage> {
        self.by_model.get(model)
    }

    pub fn total_tokens(&self) -> u64 {
        self.total.total_tokens()
    }

    /// Number of generation calls recorded.
    pub fn call_count(&self) -> u64 {
        self.call_count
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(input: u64, output: u64) -> TokenUsage {
        TokenUsage {
            input_tokens: input,
            output_tokens: output,
        }
    }

    #[test]
    fn records_totals_and_per_model() {
        let mut tracker = TokenTracker::new();
        tracker.record("gemini-2.5-flash", &usage(10, 5));
        tracker.record("gemini-2.5-flash", &usage(20, 7));
        tracker.record("gemini-2.0-flash", &usage(1, 1));

        assert_eq!(tracker.call_count(), 3);
        assert_eq!(tracker.total_tokens(), 44);
        assert_eq!(
            tracker.for_model("gemini-2.5-flash"),
            Some(&usage(30, 12))
        );
        assert!(tracker.for_model("other").is_none());
    }

    #[test]
    fn reset_clears_everything() {
        let mut tracker = TokenTracker::new();
        tracker.record("m", &usage(3, 4));
        tracker.reset();
        assert_eq!(tracker.call_count(), 0);
        assert_eq!(tracker.total_tokens(), 0);
        assert!(tracker.for_model("m").is_none());
    }
}
