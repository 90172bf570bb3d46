//! GitHub API client
//!
//! Speaks to the REST and raw-content endpoints with a short-lived
//! installation token obtained through the app-bearer exchange. Change
//! requests are built from the git data API: branch ref off base HEAD, a
//! single-file tree + commit, then the pull request. The first failing step
//! aborts the rest.

use chrono::{DateTime, Utc};
use reqwest::{Client, Method, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::core::{AgentError, AgentResult};
use crate::session::AGENT_HANDLE;

use super::tree::{format_tree, TreeEntry};

const DEFAULT_API_BASE: &str = "https://api.github.com";
const DEFAULT_RAW_BASE: &str = "https://raw.githubusercontent.com";
const DEFAULT_BASE_BRANCH: &str = "main";

/// Commit messages are clamped to one git subject line
const MAX_COMMIT_MESSAGE: usize = 72;
/// GitHub rejects longer pull request titles
const MAX_PR_TITLE: usize = 256;

pub const COMMIT_MESSAGE: &str = "juniordev meow meow";
pub const PR_TITLE: &str = "juniordev meow meow";
pub const PR_BODY: &str = "😻 juniordev meow meow 😻";

/// Time-derived branch name, unique per change request
pub fn change_branch_name(now: DateTime<Utc>) -> String {
    format!("{}-{}", AGENT_HANDLE, now.timestamp_millis())
}

/// Clamp text to a maximum number of characters
pub fn clamp(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[derive(Debug, Deserialize)]
struct InstallTokenResponse {
    token: String,
}

/// GitHub REST client bound to one app installation
pub struct GithubClient {
    http: Client,
    api_base: String,
    raw_base: String,
    app_jwt: String,
    installation_id: u64,
    api_version: String,
}

impl GithubClient {
    pub fn new(
        app_jwt: impl Into<String>,
        installation_id: u64,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            raw_base: DEFAULT_RAW_BASE.to_string(),
            app_jwt: app_jwt.into(),
            installation_id,
            api_version: api_version.into(),
        }
    }

    /// Override the REST API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Override the raw-content base URL
    pub fn with_raw_base(mut self, raw_base: impl Into<String>) -> Self {
        self.raw_base = raw_base.into();
        self
    }

    /// Exchange the app bearer for a short-lived installation token
    pub async fn fetch_install_token(&self) -> AgentResult<String> {
        let url = format!(
            "{}/app/installations/{}/access_tokens",
            self.api_base, self.installation_id
        );
        let response = self
            .http
            .post(&url)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", &self.api_version)
            .bearer_auth(&self.app_jwt)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Github {
                status: status.as_u16(),
                body,
            });
        }

        let body: InstallTokenResponse = response.json().await?;
        Ok(body.token)
    }

    /// One authenticated REST call, JSON in and out
    async fn fetch_gh(
        &self,
        token: &str,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> AgentResult<Value> {
        let mut request = self
            .http
            .request(method, format!("{}{}", self.api_base, path))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", &self.api_version)
            .bearer_auth(token);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Github {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }

    /// Raw text content of a file, NotFound when the path is absent
    pub async fn fetch_raw(
        &self,
        token: &str,
        owner: &str,
        repo: &str,
        branch: Option<&str>,
        path: &str,
    ) -> AgentResult<String> {
        let url = format!(
            "{}/{}/{}/{}/{}",
            self.raw_base,
            owner,
            repo,
            branch.unwrap_or(DEFAULT_BASE_BRANCH),
            path
        );
        let response = self.http.get(&url).bearer_auth(token).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AgentError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Github {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.text().await?)
    }

    /// Create a branch off the base branch's HEAD
    pub async fn new_branch(
        &self,
        token: &str,
        owner: &str,
        repo: &str,
        base: &str,
        name: &str,
    ) -> AgentResult<()> {
        let base_ref = self
            .fetch_gh(
                token,
                Method::GET,
                &format!("/repos/{owner}/{repo}/git/ref/heads/{base}"),
                None,
            )
            .await?;
        let sha = ref_sha(&base_ref)?;

        self.fetch_gh(
            token,
            Method::POST,
            &format!("/repos/{owner}/{repo}/git/refs"),
            Some(json!({ "ref": format!("refs/heads/{name}"), "sha": sha })),
        )
        .await?;
        Ok(())
    }

    /// Commit one file to a branch through the git data API
    pub async fn create_commit(
        &self,
        token: &str,
        owner: &str,
        repo: &str,
        branch: &str,
        message: &str,
        path: &str,
        content: &str,
    ) -> AgentResult<()> {
        let branch_ref = self
            .fetch_gh(
                token,
                Method::GET,
                &format!("/repos/{owner}/{repo}/git/ref/heads/{branch}"),
                None,
            )
            .await?;
        let head_sha = ref_sha(&branch_ref)?;

        let base_tree = self
            .fetch_gh(
                token,
                Method::GET,
                &format!("/repos/{owner}/{repo}/git/trees/{head_sha}"),
                None,
            )
            .await?;
        let base_tree_sha = string_field(&base_tree, "sha")?;

        let new_tree = self
            .fetch_gh(
                token,
                Method::POST,
                &format!("/repos/{owner}/{repo}/git/trees"),
                Some(json!({
                    "base_tree": base_tree_sha,
                    "tree": [{ "path": path, "content": content, "mode": "100644", "type": "blob" }]
                })),
            )
            .await?;
        let new_tree_sha = string_field(&new_tree, "sha")?;

        let commit = self
            .fetch_gh(
                token,
                Method::POST,
                &format!("/repos/{owner}/{repo}/git/commits"),
                Some(json!({
                    "message": clamp(message, MAX_COMMIT_MESSAGE),
                    "tree": new_tree_sha,
                    "parents": [head_sha]
                })),
            )
            .await?;
        let commit_sha = string_field(&commit, "sha")?;

        self.fetch_gh(
            token,
            Method::PATCH,
            &format!("/repos/{owner}/{repo}/git/refs/heads/{branch}"),
            Some(json!({ "sha": commit_sha })),
        )
        .await?;
        Ok(())
    }

    /// Open a pull request and return its html url
    pub async fn open_pull_request(
        &self,
        token: &str,
        owner: &str,
        repo: &str,
        base: &str,
        head: &str,
        title: &str,
        body: &str,
    ) -> AgentResult<String> {
        let pr = self
            .fetch_gh(
                token,
                Method::POST,
                &format!("/repos/{owner}/{repo}/pulls"),
                Some(json!({
                    "base": base,
                    "head": head,
                    "title": clamp(title, MAX_PR_TITLE),
                    "body": body
                })),
            )
            .await?;
        string_field(&pr, "html_url")
    }

    /// Recursive tree listing of the base branch, formatted for the prompt
    pub async fn repo_structure(&self, owner: &str, repo: &str) -> AgentResult<String> {
        let token = self.fetch_install_token().await?;
        let data = self
            .fetch_gh(
                &token,
                Method::GET,
                &format!("/repos/{owner}/{repo}/git/trees/{DEFAULT_BASE_BRANCH}?recursive=1"),
                None,
            )
            .await?;

        let entries: Vec<TreeEntry> = data
            .get("tree")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| {
                        let path = item.get("path")?.as_str()?;
                        let is_dir = item.get("type").and_then(Value::as_str) == Some("tree");
                        Some(TreeEntry {
                            path: path.to_string(),
                            is_dir,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(format_tree(&entries))
    }

    /// Branch + single-file commit + pull request; returns the PR url.
    ///
    /// Steps run in order against shared remote state; the first failure
    /// aborts the operation and surfaces the GitHub error.
    pub async fn create_change_request(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        content: &str,
    ) -> AgentResult<String> {
        let token = self.fetch_install_token().await?;
        let branch = change_branch_name(Utc::now());

        tracing::info!(owner, repo, path, branch = %branch, "creating change request");

        self.new_branch(&token, owner, repo, DEFAULT_BASE_BRANCH, &branch)
            .await?;
        self.create_commit(&token, owner, repo, &branch, COMMIT_MESSAGE, path, content)
            .await?;
        self.open_pull_request(
            &token,
            owner,
            repo,
            DEFAULT_BASE_BRANCH,
            &branch,
            PR_TITLE,
            PR_BODY,
        )
        .await
    }
}

fn ref_sha(reference: &Value) -> AgentResult<String> {
    reference
        .get("object")
        .and_then(|object| object.get("sha"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| AgentError::Github {
            status: 0,
            body: "missing object.sha in ref response".to_string(),
        })
}

fn string_field(value: &Value, field: &str) -> AgentResult<String> {
    value
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| AgentError::Github {
            status: 0,
            body: format!("missing {field} in response"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_branch_names_are_time_derived() {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(
            change_branch_name(at),
            format!("juniordev-{}", at.timestamp_millis())
        );

        let later = at + chrono::Duration::milliseconds(1);
        assert_ne!(change_branch_name(at), change_branch_name(later));
    }

    #[test]
    fn test_clamp_bounds_length() {
        assert_eq!(clamp("short", 72), "short");
        let long = "x".repeat(100);
        assert_eq!(clamp(&long, 72).chars().count(), 72);
        // char boundary safe
        assert_eq!(clamp("😻😻😻", 2), "😻😻");
    }

    #[test]
    fn test_ref_sha_extraction() {
        let reference = json!({ "object": { "sha": "abc123" } });
        assert_eq!(ref_sha(&reference).unwrap(), "abc123");
        assert!(ref_sha(&json!({})).is_err());
    }
}
