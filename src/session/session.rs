//! Session state for one conversation
//!
//! A session accumulates the ordered event history for a Telegram chat and,
//! once setup completes, the linked repository target. Events are append-only;
//! the projection into model turns happens here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::commands;
use crate::llm::ChatMessage;

/// Handle the agent signs synthesized events with
pub const AGENT_HANDLE: &str = "juniordev";

/// The linked repository a configured session operates against.
///
/// Both fields are required: a session is either unconfigured (`repo` absent
/// on the session) or configured with owner and name together. A half-set
/// target is unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoTarget {
    pub owner: String,
    pub name: String,
}

impl RepoTarget {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

/// One inbound message or one synthesized agent response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Sender handle; absent on synthesized agent records
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,

    /// Raw text as delivered, trigger prefix included
    pub text: String,

    /// Unix seconds; ordering key within the session
    pub date: i64,
}

impl Event {
    /// Create an inbound event from a sender
    pub fn inbound(sender: impl Into<String>, text: impl Into<String>, date: i64) -> Self {
        Self {
            sender: Some(sender.into()),
            text: text.into(),
            date,
        }
    }

    /// Create a synthesized agent-response event stamped now
    pub fn synthesized(text: impl Into<String>) -> Self {
        Self {
            sender: None,
            text: text.into(),
            date: Utc::now().timestamp(),
        }
    }
}

/// The accumulated record for one conversation
#[derive(Debug, Clone)]
pub struct Session {
    /// Telegram chat id, unique per conversation
    pub id: i64,

    /// Linked repository; `None` until setup completes
    pub repo: Option<RepoTarget>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Ordered, append-only event history
    pub events: Vec<Event>,
}

impl Session {
    /// Create a fresh, unconfigured session
    pub fn new(id: i64) -> Self {
        let now = Utc::now();
        Self {
            id,
            repo: None,
            created_at: now,
            updated_at: now,
            events: Vec::new(),
        }
    }

    /// True once a repository target is linked
    pub fn is_configured(&self) -> bool {
        self.repo.is_some()
    }

    /// Append an event to the in-memory history
    pub fn push(&mut self, event: Event) {
        self.events.push(event);
        self.updated_at = Utc::now();
    }

    /// The most recent event, which determines whether processing triggers
    pub fn latest(&self) -> Option<&Event> {
        self.events.last()
    }

    /// Project the event history into model turns.
    ///
    /// Every event becomes a user turn of the form `[sender]: text` with the
    /// trigger prefix stripped. Synthesized agent responses pass through as
    /// user turns under the agent's own handle rather than assistant turns;
    /// tests pin this down.
    pub fn to_turns(&self) -> Vec<ChatMessage> {
        self.events
            .iter()
            .map(|event| {
                let sender = event.sender.as_deref().unwrap_or(AGENT_HANDLE);
                ChatMessage::user(format!("[{}]: {}", sender, commands::strip_trigger(&event.text)))
            })
            .collect()
    }
}
