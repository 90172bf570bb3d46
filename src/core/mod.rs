//! Core types shared across the agent
//!
//! - `AgentError` / `AgentResult` - the error taxonomy for a turn

pub mod error;

pub use error::{AgentError, AgentResult};
