use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::AppError;
use crate::server::AppState;
use crate::webhook::events::{parse_pull_request_url, ReviewRequest};
use crate::webhook::signature::{verify_signature, SIGNATURE_HEADER};
use crate::workflow::{run_review, ReviewOutcome};

const EVENT_HEADER: &str = "x-github-event";

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

pub async fn handle_review(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let event_type = header_str(&headers, EVENT_HEADER);
    let signature = header_str(&headers, SIGNATURE_HEADER);
    let secret = state.config.github.webhook_secret();

    // Requests that announce themselves as webhooks are verified before parsing.
    let mut verified = false;
    if let Some(secret) = secret {
        if event_type.is_some() || signature.is_some() {
            if let Err(e) = verify_signature(secret, &body, signature) {
                return error_response(e);
            }
            verified = true;
        }
    }

    if let Some(event_type) = event_type {
        if event_type != "pull_request" {
            tracing::debug!(event_type = %event_type, "Ignoring non pull_request event");
            return ok(ReviewOutcome::ignored(format!("Event {event_type} is not reviewed")));
        }
    }

    let request = match ReviewRequest::parse(&body) {
        Ok(request) => request,
        Err(e) => return error_response(e),
    };

    let target = match request {
        ReviewRequest::Direct(direct) => match parse_pull_request_url(&direct.github_url) {
            Ok(target) => target,
            Err(e) => return error_response(e),
        },
        ReviewRequest::Webhook(event) => {
            if let (Some(secret), false) = (secret, verified) {
                if let Err(e) = verify_signature(secret, &body, signature) {
                    return error_response(e);
                }
            }

            if !event.is_reviewable() {
                tracing::info!(
                    repo = %event.repository.full_name,
                    pr = event.pull_request.number,
                    action = %event.action,
                    "Ignoring pull_request action"
                );
                return ok(ReviewOutcome::ignored(format!(
                    "Action {} is not reviewed",
                    event.action
                )));
            }

            match event.target() {
                Ok(target) => target,
                Err(e) => return error_response(e),
            }
        }
    };

    tracing::info!(repo = %target.repo, pr = target.number, "Analyzing PR");

    match run_review(state, target).await {
        Ok(outcome) => ok(outcome),
        Err(e) => error_response(e),
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn ok(outcome: ReviewOutcome) -> Response {
    (StatusCode::OK, Json(outcome)).into_response()
}

fn error_response(err: AppError) -> Response {
    let status = match &err {
        AppError::InvalidRequest(_) | AppError::InvalidRepo(_) | AppError::Serialization(_) => {
            StatusCode::BAD_REQUEST
        }
        AppError::WebhookVerification(_) => StatusCode::UNAUTHORIZED,
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        tracing::error!(error = %err, "Review request failed");
    } else {
        tracing::warn!(error = %err, status = %status, "Review request rejected");
    }

    (
        status,
        Json(ErrorBody {
            detail: err.to_string(),
        }),
    )
        .into_response()
}
