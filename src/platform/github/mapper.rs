use octocrab::models::pulls::PullRequest;
use octocrab::models::repos::DiffEntry;

use crate::platform::types::{ChangedFile, Credential, PullRequestHandle, RepoName};

pub fn map_pull_request(
    pr: PullRequest,
    repo: &RepoName,
    credential: Credential,
) -> PullRequestHandle {
    PullRequestHandle {
        repo: repo.clone(),
        number: pr.number,
        title: pr.title.unwrap_or_default(),
        html_url: pr.html_url.map(|url| url.to_string()),
        credential,
    }
}

pub fn map_changed_file(entry: DiffEntry) -> ChangedFile {
    // Keep GitHub's wire name ("added", "removed", ...)
    let status = serde_json::to_value(&entry.status)
        .ok()
        .and_then(|value| value.as_str().map(str::to_string))
        .unwrap_or_default();

    ChangedFile {
        filename: entry.filename,
        status,
        patch: entry.patch,
    }
}
