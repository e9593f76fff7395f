use serde::Deserialize;
use std::path::PathBuf;

use crate::error::{AppError, Result};

/// Well-known environment variables and the configuration keys they override.
/// These take precedence over both the config file and `GITAUDITOR_*` variables.
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("GITHUB_APP_ID", "github.app_id"),
    ("GITHUB_PRIVATE_KEY", "github.private_key"),
    ("GITHUB_PRIVATE_KEY_PATH", "github.private_key_path"),
    ("GITHUB_TOKEN", "github.token"),
    ("GITHUB_WEBHOOK_SECRET", "github.webhook_secret"),
    ("GROQ_API_KEY", "llm.api_key"),
    ("LANGCHAIN_PROJECT", "telemetry.project"),
];

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub review: ReviewConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Deserialize, Clone)]
pub struct GitHubConfig {
    pub app_id: Option<u64>,
    /// Inline PEM contents. Wins over `private_key_path` when both are set.
    pub private_key: Option<String>,
    pub private_key_path: Option<PathBuf>,
    pub token: Option<String>,
    pub webhook_secret: Option<String>,
    #[serde(default = "default_github_api")]
    pub api_base: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            app_id: None,
            private_key: None,
            private_key_path: None,
            token: None,
            webhook_secret: None,
            api_base: default_github_api(),
        }
    }
}

// Manual Debug impl to avoid leaking the key, token and webhook secret
impl std::fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("app_id", &self.app_id)
            .field("private_key", &self.private_key.as_ref().map(|_| "[REDACTED]"))
            .field("private_key_path", &self.private_key_path)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field(
                "webhook_secret",
                &self.webhook_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl GitHubConfig {
    /// The app id when App authentication is fully configured (id and key).
    pub fn app_id_with_key(&self) -> Option<u64> {
        let has_key = non_empty(&self.private_key).is_some() || self.private_key_path.is_some();
        self.app_id.filter(|_| has_key)
    }

    /// Load the App private key, unescaping `\n` sequences in inline values.
    pub fn private_key_pem(&self) -> Result<Vec<u8>> {
        if let Some(inline) = non_empty(&self.private_key) {
            return Ok(inline.replace("\\n", "\n").into_bytes());
        }

        let path = self
            .private_key_path
            .as_ref()
            .ok_or_else(|| AppError::Config("No GitHub App private key configured".to_string()))?;

        std::fs::read(path).map_err(|e| {
            AppError::Config(format!(
                "Failed to read private key at {}: {e}",
                path.display()
            ))
        })
    }

    pub fn personal_token(&self) -> Option<&str> {
        non_empty(&self.token)
    }

    pub fn webhook_secret(&self) -> Option<&str> {
        non_empty(&self.webhook_secret)
    }
}

#[derive(Deserialize, Clone)]
pub struct LlmConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    pub temperature: Option<f32>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            base_url: default_llm_base_url(),
            max_tokens: default_max_tokens(),
            temperature: None,
        }
    }
}

// Manual Debug impl to avoid leaking the API key
impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

/// Upper bound for `review.max_files`.
pub const MAX_REVIEW_FILES: usize = 100;

#[derive(Debug, Deserialize, Clone)]
pub struct ReviewConfig {
    /// How many changed files (in API order) are included in the diff.
    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            max_files: default_max_files(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelemetryConfig {
    /// Project name attached to every pipeline span.
    #[serde(default = "default_project")]
    pub project: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            project: default_project(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_github_api() -> String {
    "https://api.github.com".to_string()
}

fn default_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_llm_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_max_files() -> usize {
    5
}

fn default_project() -> String {
    "gitauditor".to_string()
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        Self::load_with(config_path, |name| std::env::var(name).ok())
    }

    /// Build the configuration from an optional file, `GITAUDITOR_*` variables
    /// and the well-known variables resolved through `lookup`.
    pub fn load_with<F>(config_path: Option<&str>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = config::Config::builder();

        // Load from file if specified
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        } else {
            builder = builder.add_source(config::File::with_name("gitauditor").required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("GITAUDITOR")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        for (var, key) in ENV_OVERRIDES {
            let value = lookup(var).filter(|v| !v.is_empty());
            builder = builder
                .set_override_option(*key, value)
                .map_err(|e| AppError::Config(e.to_string()))?;
        }

        let config: AppConfig = builder
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| AppError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.llm.api_key.trim().is_empty() {
            return Err(AppError::Config(
                "Model API key is not set (GROQ_API_KEY or llm.api_key)".to_string(),
            ));
        }
        if !(1..=MAX_REVIEW_FILES).contains(&self.review.max_files) {
            return Err(AppError::Config(format!(
                "review.max_files must be between 1 and {MAX_REVIEW_FILES}, got {}",
                self.review.max_files
            )));
        }
        Ok(())
    }
}
