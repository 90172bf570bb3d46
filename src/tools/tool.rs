//! Tool trait definition
//!
//! Tools pair a schema the model can format calls against with an async
//! handler that performs the side effect. Tool names are a closed set.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::core::AgentResult;
use crate::llm::ToolDefinition;

/// The closed set of tools the model may call.
///
/// Dispatch is an exhaustive match over this enum; a name outside the set
/// fails parsing and the turn, never a silent skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    /// Persist the session's repository configuration
    SetupChat,
    /// Read one file from the linked repository
    ReadFile,
    /// Open a single-file change request against the linked repository
    CreatePullRequest,
}

impl ToolName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::SetupChat => "setup_chat",
            ToolName::ReadFile => "read_file",
            ToolName::CreatePullRequest => "create_pull_request",
        }
    }

    /// Parse a model-supplied name; anything outside the set is `None`
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "setup_chat" => Some(ToolName::SetupChat),
            "read_file" => Some(ToolName::ReadFile),
            "create_pull_request" => Some(ToolName::CreatePullRequest),
            _ => None,
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of executing a tool
#[derive(Debug, Clone)]
pub struct ToolResult {
    /// String payload: file content, a change-request url, or an error
    /// surfaced as content
    pub output: String,
    /// Whether the payload describes an error
    pub is_error: bool,
}

impl ToolResult {
    /// Create a successful tool result
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            is_error: false,
        }
    }

    /// Create an error tool result
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            output: message.into(),
            is_error: true,
        }
    }
}

/// Trait for tools the agent can expose to the model
#[async_trait]
pub trait Tool: Send + Sync {
    /// The tool's name from the closed set
    fn name(&self) -> ToolName;

    /// Schema exposed to the model so it can format valid calls
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool with the model-supplied input.
    ///
    /// Downstream failures are returned as `Err` and fail the turn; they are
    /// not retried here.
    async fn execute(&self, input: &Value) -> AgentResult<ToolResult>;
}
