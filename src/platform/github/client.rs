use async_trait::async_trait;
use octocrab::models::repos::DiffEntry;
use octocrab::Octocrab;

use crate::config::GitHubConfig;
use crate::error::{AppError, Result};
use crate::platform::types::*;
use crate::platform::Platform;

use super::credentials::CredentialResolver;
use super::mapper;

pub struct GitHubPlatform {
    api_base: String,
    credentials: CredentialResolver,
}

impl GitHubPlatform {
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        if config.app_id_with_key().is_none() && config.personal_token().is_none() {
            return Err(AppError::Config(
                "No GitHub credentials configured: set GITHUB_APP_ID and GITHUB_PRIVATE_KEY, or GITHUB_TOKEN"
                    .to_string(),
            ));
        }

        Ok(Self {
            api_base: config.api_base.clone(),
            credentials: CredentialResolver::new(config),
        })
    }

    /// Build an octocrab instance for one credential.
    fn client(&self, credential: &Credential) -> Result<Octocrab> {
        Octocrab::builder()
            .personal_token(credential.token().to_string())
            .base_uri(self.api_base.as_str())
            .map_err(|e| AppError::Config(format!("Invalid GitHub API base URL: {e}")))?
            .build()
            .map_err(|e| AppError::GitHubApi(format!("Failed to build octocrab client: {e}")))
    }
}

#[async_trait]
impl Platform for GitHubPlatform {
    async fn get_pull_request(&self, repo: &RepoName, number: u64) -> Result<PullRequestHandle> {
        let credential = self.credentials.resolve(repo).await?;
        let client = self.client(&credential)?;

        let pr = client.pulls(&repo.owner, &repo.name).get(number).await?;

        Ok(mapper::map_pull_request(pr, repo, credential))
    }

    async fn list_changed_files(
        &self,
        pr: &PullRequestHandle,
        limit: usize,
    ) -> Result<Vec<ChangedFile>> {
        let client = self.client(&pr.credential)?;

        let mut page = client
            .pulls(&pr.repo.owner, &pr.repo.name)
            .list_files(pr.number)
            .await?;

        let mut files = Vec::new();
        loop {
            let next = page.next.take();
            files.extend(page.items.into_iter().map(mapper::map_changed_file));
            if files.len() >= limit {
                break;
            }
            match client.get_page::<DiffEntry>(&next).await? {
                Some(next_page) => page = next_page,
                None => break,
            }
        }

        files.truncate(limit);
        Ok(files)
    }

    async fn create_comment(&self, pr: &PullRequestHandle, body: &str) -> Result<()> {
        let client = self.client(&pr.credential)?;

        client
            .issues(&pr.repo.owner, &pr.repo.name)
            .create_comment(pr.number, body)
            .await?;

        Ok(())
    }
}
