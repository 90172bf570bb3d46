//! Change-request tool: propose one file's new content as a pull request

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::core::AgentResult;
use crate::github::RepoHost;
use crate::llm::ToolDefinition;
use crate::session::RepoTarget;

use super::tool::{Tool, ToolName, ToolResult};

/// Opens a single-file pull request against the session's linked repository.
///
/// The branch name is time-derived, so re-invocation opens a fresh request
/// rather than colliding with an earlier one.
pub struct CreatePullRequestTool {
    repos: Arc<dyn RepoHost>,
    target: RepoTarget,
}

#[derive(Debug, Deserialize)]
struct CreatePullRequestInput {
    path: String,
    content: String,
}

impl CreatePullRequestTool {
    pub fn new(repos: Arc<dyn RepoHost>, target: RepoTarget) -> Self {
        Self { repos, target }
    }
}

#[async_trait]
impl Tool for CreatePullRequestTool {
    fn name(&self) -> ToolName {
        ToolName::CreatePullRequest
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            self.name().as_str(),
            format!(
                "takes a path and new file content. returns a link to a pull request on {}/{}.",
                self.target.owner, self.target.name
            ),
            json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "relative path to the file being changed"
                    },
                    "content": {
                        "type": "string",
                        "description": "new content for the file being changed"
                    }
                },
                "required": ["path", "content"]
            }),
        )
    }

    async fn execute(&self, input: &Value) -> AgentResult<ToolResult> {
        let input: CreatePullRequestInput = serde_json::from_value(input.clone())?;
        let url = self
            .repos
            .create_change_request(&self.target, &input.path, &input.content)
            .await?;
        Ok(ToolResult::success(url))
    }
}
