//! Chat-completions API types
//!
//! These types serialize/deserialize against the OpenAI-style chat completions
//! wire format: role-tagged messages, function tools, and a finish reason that
//! distinguishes a final answer from a request to run tools.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Messages
// ============================================================================

/// A message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message ("system", "user", "assistant", "tool")
    pub role: String,

    /// Text content; absent on pure tool-call records
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Tool calls requested by the assistant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,

    /// Correlation id linking a tool-result message to its tool call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    /// Create a system message
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: Some(text.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Create a user message
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(text.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Create an assistant message with text content
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: Some(text.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Create an assistant record carrying tool calls
    pub fn assistant_tool_calls(calls: Vec<ToolCall>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: None,
            tool_calls: Some(calls),
            tool_call_id: None,
        }
    }

    /// Create a tool-result message for a tool call id
    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: "tool".to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
        }
    }

    /// Get text content if present
    pub fn text(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

// ============================================================================
// Tool calls and definitions
// ============================================================================

/// A tool invocation requested by the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Correlation id; exactly one result must reference it
    pub id: String,

    /// Call type (always "function")
    #[serde(rename = "type")]
    pub call_type: String,

    /// The function being called
    pub function: FunctionCall,
}

/// Function name and JSON-encoded arguments of a tool call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// Arguments as a JSON-encoded string, exactly as the API delivers them
    pub arguments: String,
}

impl ToolCall {
    /// Create a function tool call
    pub fn function(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            call_type: "function".to_string(),
            function: FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            },
        }
    }
}

/// Tool definition exposed to the model
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    /// Definition type (always "function")
    #[serde(rename = "type")]
    pub def_type: String,

    /// The function schema
    pub function: FunctionDefinition,
}

/// Function name, description, and JSON schema for its parameters
#[derive(Debug, Clone, Serialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    /// JSON schema describing required/optional argument names and types
    pub parameters: Value,
}

impl ToolDefinition {
    /// Create a function tool definition
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
    ) -> Self {
        Self {
            def_type: "function".to_string(),
            function: FunctionDefinition {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }
}

// ============================================================================
// Request / response
// ============================================================================

/// Request body for the chat completions API
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// The model to use
    pub model: String,

    /// Ordered messages, system instruction first
    pub messages: Vec<ChatMessage>,

    /// Tools available to the model (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
}

/// Reason why the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Final answer, no tool calls
    Stop,
    /// The model requested one or more tool calls
    ToolCalls,
    /// Max tokens reached
    Length,
    /// Content filtered
    ContentFilter,
}

/// One candidate in a chat completions response
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChatMessage,
    pub finish_reason: Option<FinishReason>,
}

/// Token usage information
#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Response from the chat completions API
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

/// The first-choice view of a response, consumed by the agent loop
#[derive(Debug, Clone)]
pub struct Completion {
    pub message: ChatMessage,
    pub finish_reason: Option<FinishReason>,
}

impl Completion {
    /// Tool calls requested by this completion, empty if none
    pub fn tool_calls(&self) -> &[ToolCall] {
        self.message.tool_calls.as_deref().unwrap_or(&[])
    }

    /// True when the model asked for tools to run rather than finishing
    pub fn requests_tools(&self) -> bool {
        matches!(self.finish_reason, Some(FinishReason::ToolCalls)) || !self.tool_calls().is_empty()
    }

    /// Final text, if any
    pub fn text(&self) -> Option<&str> {
        self.message.text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_serialization() {
        let msg = ChatMessage::user("Hello");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"role\":\"user\""));
        assert!(json.contains("\"content\":\"Hello\""));
        assert!(!json.contains("tool_calls"));
    }

    #[test]
    fn test_tool_result_serialization() {
        let msg = ChatMessage::tool("call_123", "output");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"role\":\"tool\""));
        assert!(json.contains("\"tool_call_id\":\"call_123\""));
    }

    #[test]
    fn test_finish_reason_deserialization() {
        let reason: FinishReason = serde_json::from_str("\"tool_calls\"").unwrap();
        assert_eq!(reason, FinishReason::ToolCalls);

        let reason: FinishReason = serde_json::from_str("\"stop\"").unwrap();
        assert_eq!(reason, FinishReason::Stop);
    }

    #[test]
    fn test_response_with_tool_calls() {
        let body = json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": { "name": "read_file", "arguments": "{\"path\":\"README.md\"}" }
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        });

        let response: ChatResponse = serde_json::from_value(body).unwrap();
        let choice = &response.choices[0];
        assert_eq!(choice.finish_reason, Some(FinishReason::ToolCalls));

        let completion = Completion {
            message: choice.message.clone(),
            finish_reason: choice.finish_reason,
        };
        assert!(completion.requests_tools());
        assert_eq!(completion.tool_calls()[0].function.name, "read_file");
    }

    #[test]
    fn test_final_answer_does_not_request_tools() {
        let completion = Completion {
            message: ChatMessage::assistant("all done! 😻"),
            finish_reason: Some(FinishReason::Stop),
        };
        assert!(!completion.requests_tools());
        assert_eq!(completion.text(), Some("all done! 😻"));
    }
}
