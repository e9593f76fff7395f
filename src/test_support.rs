//! In-memory stand-ins for the GitHub API and the model endpoint.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::llm::{ChatMessage, ChatModel};
use crate::platform::types::*;
use crate::platform::Platform;
use crate::server::AppState;

/// Replies with queued responses in order and records every prompt.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String>>>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedModel {
    pub fn new<'a>(replies: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.to_string())).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            replies: Mutex::new(VecDeque::from([Err(AppError::Llm(message.to_string()))])),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        self.calls.lock().unwrap().push(messages.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::Llm("no scripted reply left".to_string())))
    }
}

/// Panics on every call.
pub struct PanickingModel;

#[async_trait]
impl ChatModel for PanickingModel {
    async fn complete(&self, _messages: &[ChatMessage]) -> Result<String> {
        panic!("model client exploded")
    }
}

/// Serves a fixed file list and records fetches and comments.
#[derive(Default)]
pub struct FakePlatform {
    pub files: Vec<ChangedFile>,
    pub fail_fetch: bool,
    pub fail_comment: bool,
    pub fetched: Mutex<Vec<(String, u64)>>,
    pub file_limits: Mutex<Vec<usize>>,
    pub comments: Mutex<Vec<String>>,
}

impl FakePlatform {
    pub fn with_files(files: Vec<ChangedFile>) -> Self {
        Self {
            files,
            ..Default::default()
        }
    }

    pub fn fetched(&self) -> Vec<(String, u64)> {
        self.fetched.lock().unwrap().clone()
    }

    pub fn comments(&self) -> Vec<String> {
        self.comments.lock().unwrap().clone()
    }
}

#[async_trait]
impl Platform for FakePlatform {
    async fn get_pull_request(&self, repo: &RepoName, number: u64) -> Result<PullRequestHandle> {
        self.fetched.lock().unwrap().push((repo.full_name(), number));
        if self.fail_fetch {
            return Err(AppError::GitHubApi("Not Found".to_string()));
        }
        Ok(handle(repo, number))
    }

    async fn list_changed_files(
        &self,
        _pr: &PullRequestHandle,
        limit: usize,
    ) -> Result<Vec<ChangedFile>> {
        self.file_limits.lock().unwrap().push(limit);
        Ok(self.files.iter().take(limit).cloned().collect())
    }

    async fn create_comment(&self, _pr: &PullRequestHandle, body: &str) -> Result<()> {
        if self.fail_comment {
            return Err(AppError::GitHubApi("Resource not accessible by integration".to_string()));
        }
        self.comments.lock().unwrap().push(body.to_string());
        Ok(())
    }
}

pub fn handle(repo: &RepoName, number: u64) -> PullRequestHandle {
    PullRequestHandle {
        repo: repo.clone(),
        number,
        title: "Test PR".to_string(),
        html_url: None,
        credential: Credential::PersonalToken("ghp_test".to_string()),
    }
}

pub fn file(filename: &str, status: &str, patch: Option<&str>) -> ChangedFile {
    ChangedFile {
        filename: filename.to_string(),
        status: status.to_string(),
        patch: patch.map(str::to_string),
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.llm.api_key = "gsk_test".to_string();
    config.github.token = Some("ghp_test".to_string());
    config
}

pub fn test_state(
    config: AppConfig,
    platform: Arc<FakePlatform>,
    model: Arc<dyn ChatModel>,
) -> Arc<AppState> {
    Arc::new(AppState::with_components(config, platform, model))
}
