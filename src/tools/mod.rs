//! Tools the model may call, and the registry that dispatches them

pub mod create_pull_request;
pub mod read_file;
pub mod registry;
pub mod setup_chat;
pub mod tool;

pub use create_pull_request::CreatePullRequestTool;
pub use read_file::ReadFileTool;
pub use registry::ToolRegistry;
pub use setup_chat::SetupChatTool;
pub use tool::{Tool, ToolName, ToolResult};
