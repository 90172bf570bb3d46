//! Mode routing for one inbound message
//!
//! Decides, in precedence order: unaddressed (no response), simple command,
//! setup mode (no repository linked yet), or task mode. Whatever happens, the
//! inbound event lands in the session history first, so history is never lost
//! even when the agent is not being addressed.

use std::sync::Arc;

use chrono::Utc;

use crate::commands;
use crate::core::AgentResult;
use crate::github::RepoHost;
use crate::llm::ChatProvider;
use crate::prompt::PromptAssembler;
use crate::session::{Event, RepoTarget, Session, SessionStore};
use crate::telegram::IncomingMessage;
use crate::tools::{CreatePullRequestTool, ReadFileTool, SetupChatTool, ToolRegistry};

use super::agent_loop::AgentLoop;
use super::config::AgentConfig;

/// Routes each inbound message to the handler its session state selects
pub struct ModeRouter {
    store: Arc<dyn SessionStore>,
    llm: Arc<dyn ChatProvider>,
    repos: Arc<dyn RepoHost>,
    prompts: Arc<PromptAssembler>,
}

impl ModeRouter {
    pub fn new(
        store: Arc<dyn SessionStore>,
        llm: Arc<dyn ChatProvider>,
        repos: Arc<dyn RepoHost>,
        prompts: Arc<PromptAssembler>,
    ) -> Self {
        Self {
            store,
            llm,
            repos,
            prompts,
        }
    }

    /// Handle one inbound message and return the response text, if any.
    ///
    /// Setup/task responses are folded back into the session as synthesized
    /// events so the next turn's context includes them. Simple-command
    /// confirmations are not: `reset` would repopulate the history it just
    /// emptied and `leave` would resurrect the session it just deleted.
    pub async fn respond(&self, message: &IncomingMessage) -> AgentResult<Option<String>> {
        let chat_id = message.chat.id;
        let text = message.text.clone().unwrap_or_default();

        let mut session = self.store.load_or_create(chat_id).await?;
        let event = Event::inbound(
            message.from.username.clone(),
            text.clone(),
            message.date.unwrap_or_else(|| Utc::now().timestamp()),
        );
        self.store.append_event(chat_id, &event).await?;
        session.push(event);

        if !commands::has_trigger(&text) {
            tracing::debug!(chat_id, "message not addressed to the agent");
            return Ok(None);
        }

        if let Some(command) = commands::parse_simple_command(&text) {
            let reply =
                commands::handle_simple_command(command, &session, self.store.as_ref()).await?;
            return Ok(Some(reply));
        }

        let reply = match session.repo.clone() {
            None => self.setup_turn(&session).await?,
            Some(repo) => self.task_turn(&session, &repo).await?,
        };

        self.store
            .append_event(chat_id, &Event::synthesized(reply.clone()))
            .await?;
        Ok(Some(reply))
    }

    /// Collect the missing repository configuration through the model
    async fn setup_turn(&self, session: &Session) -> AgentResult<String> {
        tracing::info!(chat_id = session.id, "setup turn");

        let system = self.prompts.setup_prompt(session.id)?;
        let mut tools = ToolRegistry::new();
        tools.register(SetupChatTool::new(self.store.clone(), session.id));

        let config = AgentConfig::new(system, Arc::new(tools));
        let mut turns = session.to_turns();
        AgentLoop::new(config, self.llm.clone()).run(&mut turns).await
    }

    /// Perform a file-level task against the linked repository
    async fn task_turn(&self, session: &Session, repo: &RepoTarget) -> AgentResult<String> {
        tracing::info!(chat_id = session.id, owner = %repo.owner, name = %repo.name, "task turn");

        let tree = self.repos.structure(repo).await?;
        let system = self.prompts.task_prompt(&repo.owner, &repo.name, &tree)?;

        let mut tools = ToolRegistry::new();
        tools.register(ReadFileTool::new(self.repos.clone(), repo.clone()));
        tools.register(CreatePullRequestTool::new(self.repos.clone(), repo.clone()));

        let config = AgentConfig::new(system, Arc::new(tools));
        let mut turns = session.to_turns();
        AgentLoop::new(config, self.llm.clone()).run(&mut turns).await
    }
}
