use crate::error::Result;
use crate::platform::types::{ChangedFile, PullRequestHandle, RepoName};
use crate::platform::Platform;

/// Fetch the pull request and its reviewable diff.
///
/// Returns `None` on any failure (bad credentials, missing repo or PR, network);
/// callers treat that as "not found".
pub async fn fetch_diff(
    platform: &dyn Platform,
    repo: &RepoName,
    number: u64,
    max_files: usize,
) -> Option<(PullRequestHandle, String)> {
    match try_fetch_diff(platform, repo, number, max_files).await {
        Ok(result) => Some(result),
        Err(e) => {
            tracing::warn!(repo = %repo, pr = number, error = %e, "Error fetching PR");
            None
        }
    }
}

async fn try_fetch_diff(
    platform: &dyn Platform,
    repo: &RepoName,
    number: u64,
    max_files: usize,
) -> Result<(PullRequestHandle, String)> {
    let pr = platform.get_pull_request(repo, number).await?;
    let files = platform.list_changed_files(&pr, max_files).await?;
    let files = &files[..files.len().min(max_files)];

    tracing::info!(
        repo = %repo,
        pr = number,
        title = %pr.title,
        url = pr.html_url.as_deref().unwrap_or_default(),
        files = ?files.iter().map(|f| f.filename.as_str()).collect::<Vec<_>>(),
        "Fetched PR files"
    );

    let diff = build_diff(files);
    tracing::debug!(bytes = diff.len(), "Built diff text");

    Ok((pr, diff))
}

/// Concatenate file patches, each followed by a blank line. Removed files and
/// files without a patch (binary, too large) are skipped.
pub fn build_diff(files: &[ChangedFile]) -> String {
    let mut diff = String::new();
    for file in files {
        if file.is_removed() {
            continue;
        }
        match &file.patch {
            Some(patch) => {
                diff.push_str(patch);
                diff.push_str("\n\n");
            }
            None => tracing::debug!(file = %file.filename, "Skipping file without patch"),
        }
    }
    diff
}
