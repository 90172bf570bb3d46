//! Chat provider trait
//!
//! Abstracts the model interface so the agent loop can run against any
//! chat-completions backend, and against scripted stubs in tests.

use async_trait::async_trait;

use crate::core::AgentResult;

use super::types::{ChatMessage, Completion, ToolDefinition};

/// Trait for chat model services used by the agent loop.
///
/// One call sends the system instruction, the ordered turns, and the tool
/// schemas, and returns the first-choice completion.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send the conversation and get the model's next completion.
    async fn complete(
        &self,
        system: &str,
        turns: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> AgentResult<Completion>;

    /// Get the model identifier used for requests.
    fn model(&self) -> &str;
}
