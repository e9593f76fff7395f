use crate::pipeline::Verdict;
use crate::platform::types::PullRequestHandle;
use crate::platform::Platform;

pub fn format_comment(review: &str, verdict: Verdict) -> String {
    format!("## 🤖 Automated Review Verdict: {verdict}\n\n{review}")
}

/// Post the review as a plain PR comment. Failures are logged, not retried.
pub async fn publish(
    platform: &dyn Platform,
    pr: &PullRequestHandle,
    review: &str,
    verdict: Verdict,
) -> bool {
    let body = format_comment(review, verdict);

    match platform.create_comment(pr, &body).await {
        Ok(()) => {
            tracing::info!(repo = %pr.repo, pr = pr.number, verdict = %verdict, "Posted review comment");
            true
        }
        Err(e) => {
            tracing::error!(repo = %pr.repo, pr = pr.number, error = %e, "Could not post review comment");
            false
        }
    }
}
