use serde::Serialize;

use crate::error::AppError;
use crate::pipeline::Verdict;
use crate::platform::types::RepoName;

/// The pull request a request asks us to review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewTarget {
    pub repo: RepoName,
    pub number: u64,
}

/// Outcome of a review request, serialized as the `/review` response body.
#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "status")]
pub enum ReviewOutcome {
    /// Review computed and posted.
    Success { verdict: Verdict, review: String },
    /// Review computed but the comment could not be posted.
    #[serde(rename = "Partial Success")]
    PartialSuccess {
        verdict: Verdict,
        review: String,
        error: String,
    },
    /// The PR has no reviewable changes.
    Skipped { message: String },
    /// The event is not one we review.
    Ignored { message: String },
    /// Unanticipated failure.
    Error { error: String, trace: String },
}

impl ReviewOutcome {
    pub fn ignored(message: impl Into<String>) -> Self {
        ReviewOutcome::Ignored {
            message: message.into(),
        }
    }

    /// Report an error with its full source chain as the trace.
    pub fn from_error(err: AppError) -> Self {
        let error = err.to_string();
        let trace = format!("{:?}", anyhow::Error::new(err));
        ReviewOutcome::Error { error, trace }
    }

    pub fn status(&self) -> &'static str {
        match self {
            ReviewOutcome::Success { .. } => "Success",
            ReviewOutcome::PartialSuccess { .. } => "Partial Success",
            ReviewOutcome::Skipped { .. } => "Skipped",
            ReviewOutcome::Ignored { .. } => "Ignored",
            ReviewOutcome::Error { .. } => "Error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partial_success_shape() {
        let outcome = ReviewOutcome::PartialSuccess {
            verdict: Verdict::Approve,
            review: "ok".to_string(),
            error: "no permission".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({
                "status": "Partial Success",
                "verdict": "APPROVE",
                "review": "ok",
                "error": "no permission"
            })
        );
    }

    #[test]
    fn test_error_trace_includes_cause() {
        let err = AppError::Llm("boom".to_string()).in_pipeline();
        let outcome = ReviewOutcome::from_error(err);

        match outcome {
            ReviewOutcome::Error { error, trace } => {
                assert_eq!(error, "AI pipeline error: Model API error: boom");
                assert!(trace.contains("Caused by"));
                assert!(trace.contains("Model API error: boom"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
