//! Outbound delivery via the Telegram Bot API

use reqwest::Client;
use serde_json::json;

use crate::core::{AgentError, AgentResult};

const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Bot API client for sending responses back to the conversation
pub struct TelegramBot {
    http: Client,
    token: String,
    api_base: String,
}

impl TelegramBot {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            token: token.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Override the API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    async fn call(&self, method: &str, body: serde_json::Value) -> AgentResult<()> {
        let response = self
            .http
            .post(self.method_url(method))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Telegram(format!("{method}: {status} {body}")));
        }
        Ok(())
    }

    /// Send Markdown-flavored text to a chat
    pub async fn send_message(&self, chat_id: i64, text: &str) -> AgentResult<()> {
        self.call(
            "sendMessage",
            json!({ "chat_id": chat_id, "text": text, "parse_mode": "Markdown" }),
        )
        .await
    }

    /// Show a chat action (e.g. "typing") while a turn is being processed
    pub async fn send_chat_action(&self, chat_id: i64, action: &str) -> AgentResult<()> {
        self.call(
            "sendChatAction",
            json!({ "chat_id": chat_id, "action": action }),
        )
        .await
    }
}
