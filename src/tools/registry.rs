//! Tool registry for one agent mode
//!
//! Binds each tool name to its handler and collects the schemas sent to the
//! model. Execution parses the model-supplied name against the closed set
//! first; an unknown name is fatal for the turn.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::core::{AgentError, AgentResult};
use crate::llm::ToolDefinition;

use super::tool::{Tool, ToolName, ToolResult};

/// Registry of the tools available to the model in the current mode
pub struct ToolRegistry {
    tools: HashMap<ToolName, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty tool registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool in the registry
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        let name = tool.name();
        tracing::debug!(tool = %name, "registering tool");
        self.tools.insert(name, Arc::new(tool));
    }

    /// Get a tool by name
    pub fn get(&self, name: ToolName) -> Option<Arc<dyn Tool>> {
        self.tools.get(&name).cloned()
    }

    /// Get all tool definitions for the model request
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|tool| tool.definition()).collect()
    }

    /// Execute a tool by its model-supplied name
    pub async fn execute(&self, name: &str, input: &Value) -> AgentResult<ToolResult> {
        let parsed =
            ToolName::parse(name).ok_or_else(|| AgentError::UnknownTool(name.to_string()))?;
        let tool = self
            .get(parsed)
            .ok_or_else(|| AgentError::UnknownTool(name.to_string()))?;

        tracing::info!(tool = %parsed, "executing tool");
        let result = tool.execute(input).await?;
        tracing::debug!(tool = %parsed, is_error = result.is_error, "tool completed");
        Ok(result)
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
