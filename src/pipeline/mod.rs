pub mod prompts;
pub mod state;
pub mod verdict;

use std::sync::Arc;

use tracing::Instrument;

use crate::error::{AppError, Result};
use crate::llm::ChatModel;

pub use state::ReviewState;
pub use verdict::{classify, Verdict};

/// Returned in place of the model output when the Manager's text is unusable.
pub const HANDOFF_ERROR: &str =
    "ERROR: The technical review output was not passed correctly. Please check the workflow logic.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Reviewer,
    Manager,
}

impl Stage {
    /// The stage after this one. `Manager` is terminal.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Reviewer => Some(Stage::Manager),
            Stage::Manager => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::Reviewer => "reviewer",
            Stage::Manager => "manager",
        }
    }
}

/// Two-stage review: the Reviewer lists findings from the diff, the Manager
/// turns those findings into a verdict.
pub struct ReviewPipeline {
    model: Arc<dyn ChatModel>,
    project: String,
}

impl ReviewPipeline {
    pub fn new(model: Arc<dyn ChatModel>, project: impl Into<String>) -> Self {
        Self {
            model,
            project: project.into(),
        }
    }

    /// Run both stages over `diff_text` and return the Manager's text.
    pub async fn run(&self, diff_text: &str) -> Result<String> {
        let span = tracing::info_span!("review_pipeline", project = %self.project);

        async {
            let mut state = ReviewState::new(diff_text);
            self.run_stages(&mut state).await?;
            Ok::<_, AppError>(finish(&state))
        }
        .instrument(span)
        .await
    }

    pub async fn run_stages(&self, state: &mut ReviewState) -> Result<()> {
        let mut stage = Some(Stage::Reviewer);
        while let Some(current) = stage {
            self.run_stage(current, state).await?;
            stage = current.next();
        }
        Ok(())
    }

    pub async fn run_stage(&self, stage: Stage, state: &mut ReviewState) -> Result<()> {
        tracing::info!(stage = stage.name(), "Running pipeline stage");

        match stage {
            Stage::Reviewer => {
                let messages = prompts::REVIEWER.render(&[("diff_text", state.diff_text.as_str())])?;
                state.review_output = self.model.complete(&messages).await?;
            }
            Stage::Manager => {
                if state.review_output.trim().is_empty() {
                    return Err(AppError::Llm(
                        "Reviewer stage returned no findings to hand to the manager".to_string(),
                    ));
                }
                let messages =
                    prompts::MANAGER.render(&[("review_output", state.review_output.as_str())])?;
                state.final_output = self.model.complete(&messages).await?;
            }
        }

        tracing::debug!(stage = stage.name(), "Pipeline stage finished");
        Ok(())
    }
}

/// Pick the text the pipeline hands back once both stages ran.
pub fn finish(state: &ReviewState) -> String {
    let final_output = &state.final_output;

    if final_output.trim().is_empty() || final_output.contains(prompts::REVIEW_OUTPUT_PLACEHOLDER) {
        tracing::error!("Manager output is empty or still holds the review placeholder");
        return HANDOFF_ERROR.to_string();
    }

    if !verdict::has_marker(final_output) {
        tracing::warn!("Manager did not output a strict VERDICT line, defaulting to COMMENT");
    }

    final_output.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedModel;

    fn pipeline(model: &Arc<ScriptedModel>) -> ReviewPipeline {
        ReviewPipeline::new(model.clone(), "test-project")
    }

    #[test]
    fn test_stage_order() {
        assert_eq!(Stage::Reviewer.next(), Some(Stage::Manager));
        assert_eq!(Stage::Manager.next(), None);
    }

    #[tokio::test]
    async fn test_reviewer_output_reaches_manager() {
        let model = Arc::new(ScriptedModel::new([
            "No critical issues found.",
            "Clean change.\nVERDICT: APPROVE",
        ]));

        let output = pipeline(&model).run("+let a = 1;").await.unwrap();
        assert_eq!(output, "Clean change.\nVERDICT: APPROVE");

        let calls = model.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0][1].content.contains("+let a = 1;"));

        let manager_turn = &calls[1][1].content;
        assert_eq!(manager_turn.matches("No critical issues found.").count(), 1);
        assert!(!manager_turn.contains("{review_output}"));
    }

    #[tokio::test]
    async fn test_state_is_filled_in_order() {
        let model = Arc::new(ScriptedModel::new(["findings", "VERDICT: REQUEST_CHANGES"]));
        let mut state = ReviewState::new("diff");

        pipeline(&model).run_stages(&mut state).await.unwrap();
        assert_eq!(state.review_output, "findings");
        assert_eq!(state.final_output, "VERDICT: REQUEST_CHANGES");
    }

    #[tokio::test]
    async fn test_reviewer_failure_skips_manager() {
        let model = Arc::new(ScriptedModel::failing("upstream down"));

        let err = pipeline(&model).run("diff").await.unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));
        assert_eq!(model.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_review_fails_before_manager() {
        let model = Arc::new(ScriptedModel::new(["   ", "VERDICT: APPROVE"]));

        let err = pipeline(&model).run("diff").await.unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));
        assert_eq!(model.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_manager_output_returns_handoff_error() {
        let model = Arc::new(ScriptedModel::new(["findings", ""]));

        let output = pipeline(&model).run("diff").await.unwrap();
        assert_eq!(output, HANDOFF_ERROR);
    }

    #[tokio::test]
    async fn test_leftover_placeholder_returns_handoff_error() {
        let model = Arc::new(ScriptedModel::new([
            "findings",
            "Review of {review_output}\nVERDICT: APPROVE",
        ]));

        let output = pipeline(&model).run("diff").await.unwrap();
        assert_eq!(output, HANDOFF_ERROR);
    }

    #[test]
    fn test_finish_keeps_output_without_marker() {
        let state = ReviewState {
            final_output: "Looks OK to me".to_string(),
            ..ReviewState::new("diff")
        };
        assert_eq!(finish(&state), "Looks OK to me");
    }
}
