use octocrab::Octocrab;
use serde::Deserialize;
use serde_json::json;

use crate::config::GitHubConfig;
use crate::error::{AppError, Result};
use crate::platform::types::{Credential, RepoName};

use super::auth::generate_app_jwt;

#[derive(Debug, Deserialize)]
struct InstallationRecord {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct AccessTokenRecord {
    token: String,
    expires_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Picks the credential used for one request: an installation token when the
/// App is configured, the personal access token otherwise or on failure.
pub struct CredentialResolver {
    config: GitHubConfig,
}

impl CredentialResolver {
    pub fn new(config: &GitHubConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    pub async fn resolve(&self, repo: &RepoName) -> Result<Credential> {
        let mut app_failure = None;

        if let Some(app_id) = self.config.app_id_with_key() {
            match self.mint_installation_token(app_id, repo).await {
                Ok(credential) => {
                    if let Credential::Installation { expires_at, .. } = &credential {
                        tracing::debug!(
                            repo = %repo,
                            expires_at = %expires_at,
                            "Using installation token"
                        );
                    }
                    return Ok(credential);
                }
                Err(e) => {
                    tracing::warn!(
                        repo = %repo,
                        error = %e,
                        "GitHub App authentication failed, falling back to personal token"
                    );
                    app_failure = Some(e);
                }
            }
        }

        if let Some(token) = self.config.personal_token() {
            tracing::debug!(repo = %repo, "Using personal access token");
            return Ok(Credential::PersonalToken(token.to_string()));
        }

        Err(match app_failure {
            Some(e) => AppError::Config(format!(
                "GitHub App authentication failed and GITHUB_TOKEN is not set: {e}"
            )),
            None => AppError::Config(
                "No GitHub credentials configured: set GITHUB_APP_ID and GITHUB_PRIVATE_KEY, or GITHUB_TOKEN"
                    .to_string(),
            ),
        })
    }

    async fn mint_installation_token(&self, app_id: u64, repo: &RepoName) -> Result<Credential> {
        let key_pem = self.config.private_key_pem()?;
        let jwt = generate_app_jwt(app_id, &key_pem)?;

        let client = Octocrab::builder()
            .personal_token(jwt)
            .base_uri(self.config.api_base.as_str())
            .map_err(|e| AppError::Config(format!("Invalid GitHub API base URL: {e}")))?
            .build()
            .map_err(|e| AppError::GitHubApi(format!("Failed to build JWT client: {e}")))?;

        let url = format!("/repos/{}/{}/installation", repo.owner, repo.name);
        let installation: InstallationRecord = client
            .get(&url, None::<&()>)
            .await
            .map_err(|e| AppError::GitHubApi(format!("No installation for {repo}: {e}")))?;

        let url = format!("/app/installations/{}/access_tokens", installation.id);
        let body = json!({ "repositories": [repo.name] });
        let response: AccessTokenRecord = client
            .post(&url, Some(&body))
            .await
            .map_err(|e| AppError::GitHubApi(format!("Failed to create installation token: {e}")))?;

        let expires_at = response
            .expires_at
            .unwrap_or_else(|| chrono::Utc::now() + chrono::Duration::hours(1));

        Ok(Credential::Installation {
            token: response.token,
            expires_at,
        })
    }
}
