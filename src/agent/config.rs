//! Agent configuration
//!
//! One loop implementation serves both operating modes; the mode is entirely
//! captured here as {system instruction, tool registry, step budget}.

use std::sync::Arc;

use crate::tools::ToolRegistry;

/// Hard ceiling on tool steps per turn; bounds cost and a model stuck
/// requesting tools forever
pub const MAX_TOOL_STEPS: usize = 4;

/// Configuration for one agent-loop run
pub struct AgentConfig {
    /// System instruction for the model
    pub system_prompt: String,

    /// Tools available to the model in this mode
    pub tools: Arc<ToolRegistry>,

    /// Maximum tool steps per turn
    pub max_tool_steps: usize,
}

impl AgentConfig {
    /// Create a configuration with the default step budget
    pub fn new(system_prompt: impl Into<String>, tools: Arc<ToolRegistry>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            tools,
            max_tool_steps: MAX_TOOL_STEPS,
        }
    }

    /// Override the step budget
    pub fn with_max_tool_steps(mut self, max: usize) -> Self {
        self.max_tool_steps = max;
        self
    }
}
