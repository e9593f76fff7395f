use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::AppError;

/// A repository identifier in `owner/name` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoName {
    pub owner: String,
    pub name: String,
}

impl RepoName {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoName {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split('/').collect::<Vec<_>>().as_slice() {
            [owner, name] if !owner.is_empty() && !name.is_empty() => {
                Ok(RepoName::new(*owner, *name))
            }
            _ => Err(AppError::InvalidRepo(format!(
                "expected owner/name, got {s:?}"
            ))),
        }
    }
}

impl fmt::Display for RepoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Credential chosen for one invocation.
#[derive(Clone)]
pub enum Credential {
    /// Token minted for a single App installation and repository.
    Installation {
        token: String,
        expires_at: DateTime<Utc>,
    },
    /// Static personal access token.
    PersonalToken(String),
}

impl Credential {
    pub fn token(&self) -> &str {
        match self {
            Credential::Installation { token, .. } => token,
            Credential::PersonalToken(token) => token,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Credential::Installation { .. } => "installation",
            Credential::PersonalToken(_) => "personal_token",
        }
    }
}

// Manual Debug impl to avoid leaking the token
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Installation { expires_at, .. } => f
                .debug_struct("Installation")
                .field("token", &"[REDACTED]")
                .field("expires_at", expires_at)
                .finish(),
            Credential::PersonalToken(_) => {
                f.debug_tuple("PersonalToken").field(&"[REDACTED]").finish()
            }
        }
    }
}

/// A pull request fetched for review, carrying the credential used to fetch
/// it so the comment is posted under the same identity.
#[derive(Debug, Clone)]
pub struct PullRequestHandle {
    pub repo: RepoName,
    pub number: u64,
    pub title: String,
    pub html_url: Option<String>,
    pub credential: Credential,
}

/// One entry of the pull request files listing.
#[derive(Debug, Clone)]
pub struct ChangedFile {
    pub filename: String,
    /// "added", "removed", "modified", "renamed", ...
    pub status: String,
    /// Unified diff hunk text. Absent for binary or very large files.
    pub patch: Option<String>,
}

impl ChangedFile {
    pub fn is_removed(&self) -> bool {
        self.status == "removed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repo_name() {
        let repo: RepoName = "acme/widgets".parse().unwrap();
        assert_eq!(repo, RepoName::new("acme", "widgets"));
        assert_eq!(repo.full_name(), "acme/widgets");
    }

    #[test]
    fn test_parse_repo_name_rejects_bad_format() {
        for bad in ["acme", "acme/", "/widgets", "acme/widgets/extra", ""] {
            let err = bad.parse::<RepoName>().unwrap_err();
            assert!(matches!(err, AppError::InvalidRepo(_)), "{bad}");
        }
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let credential = Credential::PersonalToken("ghp_abc".to_string());
        assert!(!format!("{credential:?}").contains("ghp_abc"));
        assert_eq!(credential.token(), "ghp_abc");
        assert_eq!(credential.kind(), "personal_token");
    }
}
