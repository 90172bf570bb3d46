//! Conversation state: sessions, events, and their persistence

pub mod session;
pub mod store;

pub use session::{Event, RepoTarget, Session, AGENT_HANDLE};
pub use store::{FileSessionStore, SessionStore};
