//! Environment-driven settings
//!
//! Loaded once at startup and handed to the components that need them; no
//! process-global client state.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_MODEL: &str = "gpt-4o-2024-05-13";
const DEFAULT_GITHUB_API_VERSION: &str = "2022-11-28";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8787";
const DEFAULT_SESSIONS_DIR: &str = "sessions";

/// Process configuration
#[derive(Debug, Clone)]
pub struct Settings {
    pub telegram_token: String,
    pub openai_api_key: String,
    pub openai_model: String,
    /// Pre-signed app bearer for the installation-token exchange
    pub github_app_jwt: String,
    pub github_installation_id: u64,
    pub github_api_version: String,
    pub bind_addr: SocketAddr,
    pub sessions_dir: PathBuf,
}

impl Settings {
    /// Read settings from the environment
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            telegram_token: required("TELEGRAM_TOKEN")?,
            openai_api_key: required("OPENAI_API_KEY")?,
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            github_app_jwt: required("GITHUB_APP_JWT")?,
            github_installation_id: required("GITHUB_APP_INSTALLATION_ID")?
                .parse()
                .context("GITHUB_APP_INSTALLATION_ID must be an integer")?,
            github_api_version: env::var("GITHUB_API_VERSION")
                .unwrap_or_else(|_| DEFAULT_GITHUB_API_VERSION.to_string()),
            bind_addr: env::var("BIND_ADDR")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
                .parse()
                .context("BIND_ADDR must be host:port")?,
            sessions_dir: env::var("SESSIONS_DIR")
                .unwrap_or_else(|_| DEFAULT_SESSIONS_DIR.to_string())
                .into(),
        })
    }
}

fn required(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("{name} must be set"))
}
