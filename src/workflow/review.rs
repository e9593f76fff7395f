use std::any::Any;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::pipeline::classify;
use crate::server::AppState;
use crate::workflow::diff::fetch_diff;
use crate::workflow::publish::publish;
use crate::workflow::types::{ReviewOutcome, ReviewTarget};

/// Fetch, review, classify and publish one pull request.
pub async fn review_pull_request(state: &AppState, target: &ReviewTarget) -> Result<ReviewOutcome> {
    let platform = state.platform.as_ref();

    let Some((pr, diff_text)) = fetch_diff(
        platform,
        &target.repo,
        target.number,
        state.config.review.max_files,
    )
    .await
    else {
        return Err(AppError::NotFound(
            "Repo not found or error fetching PR.".to_string(),
        ));
    };

    if diff_text.trim().is_empty() {
        tracing::info!(repo = %target.repo, pr = target.number, "No code changes to review");
        return Ok(ReviewOutcome::Skipped {
            message: "No code changes found in this PR.".to_string(),
        });
    }

    tracing::info!(repo = %target.repo, pr = target.number, "Review pipeline starting");
    let review = state
        .pipeline
        .run(&diff_text)
        .await
        .map_err(AppError::in_pipeline)?;

    let verdict = classify(&review);
    tracing::info!(repo = %target.repo, pr = target.number, verdict = %verdict, "Review complete");

    if publish(platform, &pr, &review, verdict).await {
        Ok(ReviewOutcome::Success { verdict, review })
    } else {
        Ok(ReviewOutcome::PartialSuccess {
            verdict,
            review,
            error: format!("Failed to post review on PR #{}", pr.number),
        })
    }
}

/// Run a review in its own task.
///
/// Errors with a dedicated HTTP mapping are returned as `Err`; anything else,
/// panics included, becomes an `Error` outcome carrying a trace.
pub async fn run_review(state: Arc<AppState>, target: ReviewTarget) -> Result<ReviewOutcome> {
    let task = tokio::spawn(async move { review_pull_request(&state, &target).await });

    match task.await {
        Ok(Ok(outcome)) => Ok(outcome),
        Ok(Err(e)) if e.is_anticipated() => Err(e),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Internal error during review");
            Ok(ReviewOutcome::from_error(e))
        }
        Err(join_error) => {
            let trace = format!("{join_error:?}");
            let error = if join_error.is_panic() {
                panic_message(join_error.into_panic())
            } else {
                join_error.to_string()
            };
            tracing::error!(error = %error, "Review task aborted");
            Ok(ReviewOutcome::Error { error, trace })
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("review task panicked: {msg}")
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("review task panicked: {msg}")
    } else {
        "review task panicked".to_string()
    }
}
