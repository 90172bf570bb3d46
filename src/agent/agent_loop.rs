//! The bounded model/tool exchange at the center of a turn
//!
//! The loop sends the conversation plus tool schemas to the model, runs any
//! requested tool calls in emission order, folds their results back into the
//! conversation, and repeats until the model answers in text or the step
//! budget runs out. Terminal either way: a new turn starts a fresh loop over
//! the extended conversation.

use std::sync::Arc;

use serde_json::Value;

use crate::core::{AgentError, AgentResult};
use crate::llm::{ChatMessage, ChatProvider};

use super::config::AgentConfig;

/// Fallback when the model finishes without any text content
const EMPTY_ANSWER: &str = "idk! 😻";

/// One parametrized loop for both setup and task mode
pub struct AgentLoop {
    config: AgentConfig,
    llm: Arc<dyn ChatProvider>,
}

impl AgentLoop {
    pub fn new(config: AgentConfig, llm: Arc<dyn ChatProvider>) -> Self {
        Self { config, llm }
    }

    /// Run the loop over the projected conversation turns.
    ///
    /// Appends the assistant tool-call records and their results to `turns`
    /// as it goes. Returns the model's final text, or fails the whole turn on
    /// budget exhaustion, an unknown tool, or a downstream error; partial
    /// progress is never reported as success.
    pub async fn run(&self, turns: &mut Vec<ChatMessage>) -> AgentResult<String> {
        let definitions = self.config.tools.definitions();
        let mut steps = 0;

        let mut completion = self
            .llm
            .complete(&self.config.system_prompt, turns, &definitions)
            .await?;

        while completion.requests_tools() {
            let calls = completion.tool_calls().to_vec();
            tracing::info!(step = steps + 1, calls = calls.len(), "executing tool calls");

            // one result per invocation, in emission order, before the next
            // model call
            let mut results = Vec::with_capacity(calls.len());
            for call in &calls {
                let input: Value = serde_json::from_str(&call.function.arguments)?;
                let result = self.config.tools.execute(&call.function.name, &input).await?;
                results.push(ChatMessage::tool(&call.id, result.output));
            }

            turns.push(ChatMessage::assistant_tool_calls(calls));
            turns.extend(results);

            steps += 1;
            if steps >= self.config.max_tool_steps {
                tracing::warn!(steps, "tool budget exhausted");
                return Err(AgentError::BudgetExceeded { steps });
            }

            completion = self
                .llm
                .complete(&self.config.system_prompt, turns, &definitions)
                .await?;
        }

        Ok(completion
            .text()
            .filter(|text| !text.is_empty())
            .unwrap_or(EMPTY_ANSWER)
            .to_string())
    }
}
