//! Setup tool: persist the session's repository configuration

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::core::{AgentError, AgentResult};
use crate::llm::ToolDefinition;
use crate::session::{RepoTarget, SessionStore};

use super::tool::{Tool, ToolName, ToolResult};

/// Persists the repository owner and name collected during setup.
///
/// Bound to the session it was created for; the model cannot configure a
/// different chat. Owner and name are written together or not at all.
pub struct SetupChatTool {
    store: Arc<dyn SessionStore>,
    chat_id: i64,
}

#[derive(Debug, Deserialize)]
struct SetupChatInput {
    github_repo_owner: String,
    github_repo_name: String,
}

impl SetupChatTool {
    pub fn new(store: Arc<dyn SessionStore>, chat_id: i64) -> Self {
        Self { store, chat_id }
    }
}

#[async_trait]
impl Tool for SetupChatTool {
    fn name(&self) -> ToolName {
        ToolName::SetupChat
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            self.name().as_str(),
            "records the github repo for this chat once the team has identified it.",
            json!({
                "type": "object",
                "properties": {
                    "github_repo_owner": {
                        "type": "string",
                        "description": "owner of the github repo"
                    },
                    "github_repo_name": {
                        "type": "string",
                        "description": "name of the github repo"
                    }
                },
                "required": ["github_repo_owner", "github_repo_name"]
            }),
        )
    }

    async fn execute(&self, input: &Value) -> AgentResult<ToolResult> {
        let input: SetupChatInput = serde_json::from_value(input.clone())?;

        if input.github_repo_owner.trim().is_empty() || input.github_repo_name.trim().is_empty() {
            return Err(AgentError::store(
                "setup requires both the repo owner and the repo name",
            ));
        }

        let repo = RepoTarget::new(
            input.github_repo_owner.trim(),
            input.github_repo_name.trim(),
        );
        tracing::info!(chat_id = self.chat_id, owner = %repo.owner, name = %repo.name, "configuring session");
        self.store.configure(self.chat_id, repo).await?;

        Ok(ToolResult::success("setup complete! 😻"))
    }
}
