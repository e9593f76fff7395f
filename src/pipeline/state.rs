/// Mutable record handed from stage to stage during one review.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewState {
    pub diff_text: String,
    /// Reviewer findings. Filled by the Reviewer stage.
    pub review_output: String,
    /// Manager decision text, ending in a verdict line.
    pub final_output: String,
}

impl ReviewState {
    pub fn new(diff_text: impl Into<String>) -> Self {
        Self {
            diff_text: diff_text.into(),
            ..Default::default()
        }
    }
}
