//! Session persistence
//!
//! The `SessionStore` trait is the seam between the core and whatever holds
//! conversation state. The provided implementation keeps one directory per
//! session: a `session.json` metadata file and an append-only `events.jsonl`
//! history file. Writes are last-writer-wins; there is no concurrency token.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::AgentResult;

use super::session::{Event, RepoTarget, Session};

/// Storage seam for conversation state
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load a session by chat id, creating and persisting a fresh one on miss
    async fn load_or_create(&self, id: i64) -> AgentResult<Session>;

    /// Append one event to the session's history
    async fn append_event(&self, id: i64, event: &Event) -> AgentResult<()>;

    /// Empty the session's event history, configuration untouched
    async fn truncate_events(&self, id: i64) -> AgentResult<()>;

    /// Record the linked repository target, both fields together
    async fn configure(&self, id: i64, repo: RepoTarget) -> AgentResult<()>;

    /// Remove the session entirely; the id is unknown afterwards
    async fn delete(&self, id: i64) -> AgentResult<()>;
}

/// Metadata persisted per session, history lives in its own file
#[derive(Debug, Serialize, Deserialize)]
struct SessionMetadata {
    id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    repo: Option<RepoTarget>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// File-backed session store, one directory per chat id
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    base_dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn session_dir(&self, id: i64) -> PathBuf {
        self.base_dir.join(id.to_string())
    }

    fn metadata_path(&self, id: i64) -> PathBuf {
        self.session_dir(id).join("session.json")
    }

    fn events_path(&self, id: i64) -> PathBuf {
        self.session_dir(id).join("events.jsonl")
    }

    fn ensure_session_dir(&self, id: i64) -> AgentResult<PathBuf> {
        let dir = self.session_dir(id);
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        Ok(dir)
    }

    fn save_metadata(&self, metadata: &SessionMetadata) -> AgentResult<()> {
        self.ensure_session_dir(metadata.id)?;
        let json = serde_json::to_string_pretty(metadata)?;
        fs::write(self.metadata_path(metadata.id), json)?;
        Ok(())
    }

    fn load_metadata(&self, id: i64) -> AgentResult<Option<SessionMetadata>> {
        let path = self.metadata_path(id);
        if !path.exists() {
            return Ok(None);
        }
        let file = File::open(&path)?;
        let metadata: SessionMetadata = serde_json::from_reader(BufReader::new(file))?;
        Ok(Some(metadata))
    }

    fn load_events(&self, id: i64) -> AgentResult<Vec<Event>> {
        let path = self.events_path(id);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&path)?;
        let mut events = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            events.push(serde_json::from_str(&line)?);
        }
        Ok(events)
    }

    fn touch(&self, path: &Path) -> AgentResult<()> {
        File::create(path)?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load_or_create(&self, id: i64) -> AgentResult<Session> {
        if let Some(metadata) = self.load_metadata(id)? {
            let events = self.load_events(id)?;
            return Ok(Session {
                id: metadata.id,
                repo: metadata.repo,
                created_at: metadata.created_at,
                updated_at: metadata.updated_at,
                events,
            });
        }

        tracing::info!(chat_id = id, "starting new session");
        let session = Session::new(id);
        self.save_metadata(&SessionMetadata {
            id: session.id,
            repo: None,
            created_at: session.created_at,
            updated_at: session.updated_at,
        })?;
        self.touch(&self.events_path(id))?;
        Ok(session)
    }

    async fn append_event(&self, id: i64, event: &Event) -> AgentResult<()> {
        self.ensure_session_dir(id)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.events_path(id))?;
        writeln!(file, "{}", serde_json::to_string(event)?)?;
        Ok(())
    }

    async fn truncate_events(&self, id: i64) -> AgentResult<()> {
        self.ensure_session_dir(id)?;
        self.touch(&self.events_path(id))
    }

    async fn configure(&self, id: i64, repo: RepoTarget) -> AgentResult<()> {
        let mut metadata = match self.load_metadata(id)? {
            Some(metadata) => metadata,
            None => SessionMetadata {
                id,
                repo: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        };
        metadata.repo = Some(repo);
        metadata.updated_at = Utc::now();
        self.save_metadata(&metadata)
    }

    async fn delete(&self, id: i64) -> AgentResult<()> {
        let dir = self.session_dir(id);
        if dir.exists() {
            fs::remove_dir_all(&dir)?;
        }
        Ok(())
    }
}
