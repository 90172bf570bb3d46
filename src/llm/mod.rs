pub mod openai;
pub mod provider;
pub mod types;

pub use openai::OpenAiProvider;
pub use provider::ChatProvider;
pub use types::{
    ChatMessage, ChatRequest, ChatResponse, Choice, Completion, FinishReason, FunctionCall,
    ToolCall, ToolDefinition,
};
