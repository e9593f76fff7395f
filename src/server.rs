use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::signal;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::llm::{ChatModel, LlmClient};
use crate::pipeline::ReviewPipeline;
use crate::platform::github::GitHubPlatform;
use crate::platform::Platform;

/// Read-only state shared by all requests.
pub struct AppState {
    pub config: AppConfig,
    pub platform: Arc<dyn Platform>,
    pub pipeline: ReviewPipeline,
}

impl AppState {
    pub fn new(config: AppConfig) -> crate::error::Result<Self> {
        let platform = GitHubPlatform::new(&config.github)?;
        let model = LlmClient::new(&config.llm);
        tracing::info!(model = %model.model(), "Using chat model");

        Ok(Self::with_components(config, Arc::new(platform), Arc::new(model)))
    }

    pub fn with_components(
        config: AppConfig,
        platform: Arc<dyn Platform>,
        model: Arc<dyn ChatModel>,
    ) -> Self {
        let pipeline = ReviewPipeline::new(model, config.telemetry.project.clone());
        Self {
            config,
            platform,
            pipeline,
        }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
        .route("/review", post(crate::webhook::handler::handle_review))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn home() -> Json<Value> {
    Json(json!({ "message": "Gitauditor Agent is Running 🚀" }))
}

async fn health_check() -> &'static str {
    "ok"
}

/// Resolve on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::test_support::{test_config, test_state, FakePlatform, ScriptedModel};

    fn router() -> Router {
        create_router(test_state(
            test_config(),
            Arc::new(FakePlatform::default()),
            Arc::new(ScriptedModel::new(Vec::<&str>::new())),
        ))
    }

    #[tokio::test]
    async fn test_home_reports_liveness() {
        let response = router()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["message"].as_str().unwrap().contains("Running"));
    }

    #[tokio::test]
    async fn test_health() {
        let response = router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_new_requires_github_credentials() {
        let mut config = test_config();
        config.github.token = None;
        assert!(AppState::new(config).is_err());
    }
}
