//! Orchestrator struct and the tool-call loop.

use std::sync::{Arc, Mutex, MutexGuard};

use oap_common::{Message, ToolMode};
use tracing::{debug, error, warn};

use super::types::RunOutcome;
use crate::token_tracker::TokenTracker;
use crate::tools::{ToolCallResult, ToolDescriptor, ToolOutcome, ToolProvider};
use crate::{GenerationClient, GenerationRequest, TokenUsage, ToolCallRequest, Turn};

/// Drives a [`GenerationClient`] and a [`ToolProvider`] for one utterance at a time.
pub struct Orchestrator {
    generator: Arc<dyn GenerationClient>,
    tools: Arc<dyn ToolProvider>,
    /// Passed to the model verbatim on every call.
    system_instruction: String,
    /// Maximum tool-call rounds per run.
    max_tool_rounds: u32,
    tracker: Mutex<TokenTracker>,
}

impl Orchestrator {
    pub fn new(
        generator: Arc<dyn GenerationClient>,
        tools: Arc<dyn ToolProvider>,
        system_instruction: impl Into<String>,
    ) -> Self {
        Self {
            generator,
            tools,
            system_instruction: system_instruction.into(),
            max_tool_rounds: 10,
            tracker: Mutex::new(TokenTracker::new()),
        }
    }

    pub fn with_max_tool_rounds(mut self, max: u32) -> Self {
        self.max_tool_rounds = max;
        self
    }

    pub fn tool_provider(&self) -> &Arc<dyn ToolProvider> {
        &self.tools
    }

    pub fn max_tool_rounds(&self) -> u32 {
        self.max_tool_rounds
    }

    /// Snapshot of cumulative token usage.
    pub fn usage(&self) -> TokenTracker {
        self.lock_tracker().clone()
    }

    /// Answer `user_text` given the committed `history`, oldest first.
    ///
    /// Never fails: generation errors yield the fallback text with the error
    /// attached, and tool errors are reported back to the model.
    pub async fn run(&self, history: &[Message], user_text: &str, mode: ToolMode) -> RunOutcome {
        let tools = if mode.is_enabled() {
            self.discover_tools().await
        } else {
            Vec::new()
        };

        let mut turns: Vec<Turn> = history.iter().map(Turn::from_message).collect();
        turns.push(Turn::user_text(user_text));

        let mut request = GenerationRequest {
            system_instruction: self.system_instruction.clone(),
            history: turns,
            tools,
        };
        let mut rounds = 0;

        loop {
            let response = match self.generator.generate(&request).await {
                Ok(response) => response,
                Err(e) => {
                    error!(error = %e, rounds, "generation failed");
                    return RunOutcome::failed(e, rounds);
                }
            };
            self.record_usage(&response.usage);

            if response.tool_calls.is_empty() || !mode.is_enabled() {
                debug!(rounds, chars = response.text.len(), "run complete");
                return RunOutcome::completed(response.text, rounds);
            }

            rounds += 1;
            if rounds > self.max_tool_rounds {
                warn!(
                    max = self.max_tool_rounds,
                    "max tool rounds reached, returning partial response"
                );
                return RunOutcome::capped(response.text, self.max_tool_rounds);
            }

            let results = self.resolve_calls(&response.tool_calls).await;
            request.history.push(response.model_turn);
            request.history.push(Turn::function_results(results));
        }
    }

    async fn discover_tools(&self) -> Vec<ToolDescriptor> {
        match self.tools.list_tools().await {
            Ok(tools) => {
                if tools.is_empty() {
                    debug!("no tools available, continuing without");
                }
                tools
            }
            Err(e) => {
                warn!(error = %e, "tool discovery failed, continuing without tools");
                Vec::new()
            }
        }
    }

    /// Resolve every call in emission order. Each call yields exactly one result.
    async fn resolve_calls(&self, calls: &[ToolCallRequest]) -> Vec<ToolCallResult> {
        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            debug!(tool = %call.name, "executing tool");
            let result = match self.tools.call_tool(&call.name, call.arguments.clone()).await {
                Ok(ToolOutcome::Error(reason)) => {
                    warn!(tool = %call.name, %reason, "tool reported an error");
                    ToolCallResult::failed(&call.name, reason)
                }
                Ok(outcome) => ToolCallResult::new(&call.name, outcome),
                Err(e) => {
                    warn!(tool = %call.name, error = %e, "tool call failed");
                    ToolCallResult::failed(&call.name, e)
                }
            };
            results.push(result);
        }
        results
    }

    fn record_usage(&self, usage: &TokenUsage) {
        self.lock_tracker()
            .record(self.generator.model_name(), usage);
    }

    fn lock_tracker(&self) -> MutexGuard<'_, TokenTracker> {
        self.tracker.lock().unwrap_or_else(|e| e.into_inner())
    }
}
