use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::platform::types::RepoName;
use crate::workflow::types::ReviewTarget;

/// Webhook actions that trigger a review.
pub const REVIEWABLE_ACTIONS: &[&str] = &["opened", "synchronize", "reopened"];

/// `{"github_url": "https://github.com/owner/repo/pull/N"}`
#[derive(Debug, Deserialize)]
pub struct DirectReviewRequest {
    pub github_url: String,
}

/// The `pull_request` webhook event.
#[derive(Debug, Deserialize)]
pub struct PullRequestEvent {
    #[serde(default)]
    pub action: String,
    pub pull_request: PullRequestPayload,
    pub repository: RepositoryPayload,
}

#[derive(Debug, Deserialize)]
pub struct PullRequestPayload {
    pub number: u64,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RepositoryPayload {
    pub full_name: String,
}

impl PullRequestEvent {
    pub fn is_reviewable(&self) -> bool {
        REVIEWABLE_ACTIONS.contains(&self.action.as_str())
    }

    pub fn target(&self) -> Result<ReviewTarget> {
        Ok(ReviewTarget {
            repo: self.repository.full_name.parse()?,
            number: self.pull_request.number,
        })
    }
}

/// Body of `POST /review`, told apart by its keys.
#[derive(Debug)]
pub enum ReviewRequest {
    Direct(DirectReviewRequest),
    Webhook(PullRequestEvent),
}

impl ReviewRequest {
    pub fn parse(payload: &[u8]) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_slice(payload)?;

        if value.get("github_url").is_some() {
            Ok(ReviewRequest::Direct(serde_json::from_value(value)?))
        } else if value.get("pull_request").is_some() && value.get("repository").is_some() {
            Ok(ReviewRequest::Webhook(serde_json::from_value(value)?))
        } else {
            Err(AppError::InvalidRequest(
                "expected a github_url or a pull_request webhook payload".to_string(),
            ))
        }
    }
}

/// Extract owner, repo and PR number from a pull request URL.
///
/// Positional: after `github.com/`, segments 0 and 1 are owner and repo and
/// segment 3 is the number (`/owner/repo/pull/42`, trailing segments allowed).
pub fn parse_pull_request_url(url: &str) -> Result<ReviewTarget> {
    let invalid = || AppError::InvalidRequest("Invalid GitHub Pull Request URL.".to_string());

    let path = url.rsplit("github.com/").next().unwrap_or(url);
    let parts: Vec<&str> = path.split('/').collect();
    if parts.len() < 4 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(invalid());
    }

    let number = parts[3].trim().parse::<u64>().map_err(|_| invalid())?;

    Ok(ReviewTarget {
        repo: RepoName::new(parts[0], parts[1]),
        number,
    })
}
