//! Repository service: raw reads, change requests, and tree listings

pub mod client;
pub mod tree;

use async_trait::async_trait;

use crate::core::AgentResult;
use crate::session::RepoTarget;

pub use client::GithubClient;
pub use tree::{format_tree, TreeEntry};

/// Repository operations the agent's tools depend on.
///
/// `GithubClient` is the production implementation; tests substitute stubs.
#[async_trait]
pub trait RepoHost: Send + Sync {
    /// Raw content of one file on the base branch; NotFound when absent
    async fn read_file(&self, repo: &RepoTarget, path: &str) -> AgentResult<String>;

    /// Branch + single-file commit + pull request; returns the PR url
    async fn create_change_request(
        &self,
        repo: &RepoTarget,
        path: &str,
        content: &str,
    ) -> AgentResult<String>;

    /// Indented tree listing of the repository for prompt interpolation
    async fn structure(&self, repo: &RepoTarget) -> AgentResult<String>;
}

#[async_trait]
impl RepoHost for GithubClient {
    async fn read_file(&self, repo: &RepoTarget, path: &str) -> AgentResult<String> {
        let token = self.fetch_install_token().await?;
        self.fetch_raw(&token, &repo.owner, &repo.name, None, path)
            .await
    }

    async fn create_change_request(
        &self,
        repo: &RepoTarget,
        path: &str,
        content: &str,
    ) -> AgentResult<String> {
        GithubClient::create_change_request(self, &repo.owner, &repo.name, path, content).await
    }

    async fn structure(&self, repo: &RepoTarget) -> AgentResult<String> {
        self.repo_structure(&repo.owner, &repo.name).await
    }
}
