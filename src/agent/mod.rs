//! The agent core: one bounded loop, configured per mode, and the router
//! that picks the mode

pub mod agent_loop;
pub mod config;
pub mod router;

pub use agent_loop::AgentLoop;
pub use config::{AgentConfig, MAX_TOOL_STEPS};
pub use router::ModeRouter;
