use crate::llm::prompt::PromptTemplate;

pub const REVIEWER: PromptTemplate = PromptTemplate::new(
    r#"You are a senior, strict code reviewer. Your sole purpose is to identify logical errors, security vulnerabilities (e.g., SQL injection, XSS), and critical bugs.
You must IGNORE trivial style nitpicks, missing comments, or personal preference formatting.
Analyze the provided unified diff.
Output your review in Markdown. If you find critical issues, explain them clearly and explicitly state why they are a problem.
If the code is purely stylistic or safe, state that there are no critical issues.
Always analyze the code changes in the diff below."#,
    "Here is the unified diff to review:\n\n{diff_text}",
);

pub const MANAGER: PromptTemplate = PromptTemplate::new(
    r#"You are a Release Manager. You read the technical review provided by the Senior Reviewer and make the final call on the Pull Request.
If the Senior Reviewer found actual bugs, security risks, or critical logical errors, you must reject the PR.
If the Senior Reviewer only found trivial issues or stated there are no critical issues, you must approve the PR.

Your output MUST end with exactly one of the following two lines (on its own line, with no extra characters):
VERDICT: APPROVE
VERDICT: REQUEST_CHANGES

Do not use any other verdict strings."#,
    "Senior Reviewer's analysis:\n\n{review_output}\n\nBased on this analysis, what is your final verdict? Remember to end your response strictly with VERDICT: APPROVE or VERDICT: REQUEST_CHANGES.",
);

/// Placeholder that must never survive into the final output.
pub const REVIEW_OUTPUT_PLACEHOLDER: &str = "{review_output}";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manager_substitutes_review_once() {
        let review = "No critical issues found.";
        let messages = MANAGER.render(&[("review_output", review)]).unwrap();
        let human = &messages[1].content;

        assert_eq!(human.matches(review).count(), 1);
        assert!(!human.contains(REVIEW_OUTPUT_PLACEHOLDER));
        assert!(!messages[0].content.contains(REVIEW_OUTPUT_PLACEHOLDER));
    }

    #[test]
    fn test_reviewer_embeds_diff() {
        let diff = "@@ -1 +1 @@\n-let x = {};\n+let x = { a: 1 };";
        let messages = REVIEWER.render(&[("diff_text", diff)]).unwrap();
        assert!(messages[1].content.ends_with(diff));
        assert!(messages[0].content.contains("IGNORE trivial style nitpicks"));
    }
}
