//! OpenAI chat completions provider

use async_trait::async_trait;
use reqwest::Client;

use crate::core::{AgentError, AgentResult};

use super::provider::ChatProvider;
use super::types::{ChatMessage, ChatRequest, ChatResponse, Completion, ToolDefinition};

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Chat completions client for the OpenAI API
pub struct OpenAiProvider {
    http: Client,
    api_key: String,
    api_base: String,
    model: String,
}

impl OpenAiProvider {
    /// Create a new provider with an API key and model identifier
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            model: model.into(),
        }
    }

    /// Override the API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
    async fn complete(
        &self,
        system: &str,
        turns: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> AgentResult<Completion> {
        let mut messages = Vec::with_capacity(turns.len() + 1);
        messages.push(ChatMessage::system(system));
        messages.extend_from_slice(turns);

        let request = ChatRequest {
            model: self.model.clone(),
            messages,
            tools: if tools.is_empty() {
                None
            } else {
                Some(tools.to_vec())
            },
        };

        tracing::debug!(
            model = %self.model,
            messages = request.messages.len(),
            tools = tools.len(),
            "calling chat completions"
        );

        let response = self
            .http
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::model(format!("{status}: {body}")));
        }

        let body: ChatResponse = response.json().await?;
        if let Some(usage) = &body.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "completion usage"
            );
        }

        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::model("empty choices in completion response"))?;

        Ok(Completion {
            message: choice.message,
            finish_reason: choice.finish_reason,
        })
    }

    fn model(&self) -> &str {
        &self.model
    }
}
