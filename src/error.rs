use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid repository identifier: {0}")]
    InvalidRepo(String),

    #[error("Webhook verification failed: {0}")]
    WebhookVerification(String),

    #[error("{0}")]
    NotFound(String),

    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    #[error("Model API error: {0}")]
    Llm(String),

    #[error("Prompt template error: {0}")]
    Template(String),

    #[error("AI pipeline error: {0}")]
    Pipeline(#[source] Box<AppError>),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

}

impl AppError {
    /// Tag an error raised while the review pipeline was running.
    pub fn in_pipeline(self) -> Self {
        match self {
            AppError::Pipeline(_) => self,
            other => AppError::Pipeline(Box::new(other)),
        }
    }

    /// Errors the request handler maps onto a dedicated HTTP status. Everything
    /// else is reported as an `Error` outcome with a trace.
    pub fn is_anticipated(&self) -> bool {
        matches!(
            self,
            AppError::InvalidRequest(_)
                | AppError::InvalidRepo(_)
                | AppError::Serialization(_)
                | AppError::WebhookVerification(_)
                | AppError::NotFound(_)
                | AppError::Pipeline(_)
        )
    }
}

impl From<octocrab::Error> for AppError {
    fn from(e: octocrab::Error) -> Self {
        AppError::GitHubApi(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
