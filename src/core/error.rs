//! Agent error types

use thiserror::Error;

/// Errors that can occur while handling a turn
#[derive(Error, Debug)]
pub enum AgentError {
    /// Inbound payload failed validation at ingress
    #[error("malformed update: {0}")]
    MalformedUpdate(String),

    /// The agent loop hit its step ceiling without a final answer
    #[error("a step too far! tool budget exhausted after {steps} steps")]
    BudgetExceeded { steps: usize },

    /// The model requested a tool outside the registry
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// Model service failure
    #[error("model error: {0}")]
    Model(String),

    /// GitHub API failure
    #[error("github error: {status} {body}")]
    Github { status: u16, body: String },

    /// Requested repository path does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Telegram delivery failure
    #[error("telegram error: {0}")]
    Telegram(String),

    /// Prompt template failure (missing variable, bad syntax)
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    /// HTTP transport failure
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Session store failure
    #[error("store error: {0}")]
    Store(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AgentError {
    /// Create a store error from a message
    pub fn store(msg: impl Into<String>) -> Self {
        AgentError::Store(msg.into())
    }

    /// Create a model error from a message
    pub fn model(msg: impl Into<String>) -> Self {
        AgentError::Model(msg.into())
    }
}

/// Result type alias for agent operations
pub type AgentResult<T> = Result<T, AgentError>;
