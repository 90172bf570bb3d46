//! Read tool: fetch one file's raw content from the linked repository

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::core::AgentResult;
use crate::github::RepoHost;
use crate::llm::ToolDefinition;
use crate::session::RepoTarget;

use super::tool::{Tool, ToolName, ToolResult};

/// Reads a file from the session's linked repository
pub struct ReadFileTool {
    repos: Arc<dyn RepoHost>,
    target: RepoTarget,
}

#[derive(Debug, Deserialize)]
struct ReadFileInput {
    path: String,
}

impl ReadFileTool {
    pub fn new(repos: Arc<dyn RepoHost>, target: RepoTarget) -> Self {
        Self { repos, target }
    }
}

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> ToolName {
        ToolName::ReadFile
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            self.name().as_str(),
            format!(
                "takes a path and returns the content of that file in {}/{}.",
                self.target.owner, self.target.name
            ),
            json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "relative path to a file in the repo"
                    }
                },
                "required": ["path"]
            }),
        )
    }

    async fn execute(&self, input: &Value) -> AgentResult<ToolResult> {
        let input: ReadFileInput = serde_json::from_value(input.clone())?;
        let content = self.repos.read_file(&self.target, &input.path).await?;
        Ok(ToolResult::success(content))
    }
}
