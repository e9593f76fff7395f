pub mod github;
pub mod types;

use async_trait::async_trait;

use crate::error::Result;
use types::*;

#[async_trait]
pub trait Platform: Send + Sync {
    /// Resolve a credential for `repo` and fetch the pull request.
    async fn get_pull_request(&self, repo: &RepoName, number: u64) -> Result<PullRequestHandle>;

    /// List at most `limit` changed files, in the order the API returns them.
    async fn list_changed_files(
        &self,
        pr: &PullRequestHandle,
        limit: usize,
    ) -> Result<Vec<ChangedFile>>;

    /// Post a plain comment on the pull request conversation.
    async fn create_comment(&self, pr: &PullRequestHandle, body: &str) -> Result<()>;
}
