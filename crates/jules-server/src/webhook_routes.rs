use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde_json::{json, Value};

use jules_core::{RepoRef, Status};
use jules_webhook::{
    classification_message, parse_webhook_event, route, transition_message,
    verify_webhook_signature, RouteDecision, SignatureOutcome, TransitionTrigger,
    WebhookParseError, MISSING_DATA_MESSAGE, NO_ACTION_MESSAGE, SIGNATURE_HEADER,
};

use crate::state::AppState;

const EVENT_TYPE_HEADER: &str = "x-github-event";
const PROCESSING_FAILED: &str = "Failed to process webhook.";

fn message_response(message: impl Into<String>) -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "message": message.into() })))
}

fn error_response(status: StatusCode, error: impl Into<String>) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": error.into() })))
}

/// POST /webhooks/github: the single write entrypoint.
///
/// The body arrives as raw bytes and is verified before anything parses it;
/// the same buffer then feeds the payload parser, so the digest always
/// covers exactly what GitHub sent.
pub async fn handle_github_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let signature_header = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());
    match verify_webhook_signature(
        &body,
        signature_header,
        state.config.webhook_secret.as_deref(),
    ) {
        SignatureOutcome::Authentic => {}
        SignatureOutcome::Unverified => {
            tracing::warn!(
                "JULES_WEBHOOK_SECRET is not set. Skipping signature verification. This is insecure."
            );
        }
        SignatureOutcome::Forged { reason } => {
            return error_response(StatusCode::UNAUTHORIZED, reason);
        }
    }

    let event_type = headers
        .get(EVENT_TYPE_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let event = match parse_webhook_event(event_type, &body) {
        Ok(event) => event,
        Err(WebhookParseError::MissingField { .. }) => {
            // GitHub disables hooks that keep failing, so an event that
            // matched the table but lacks its fields degrades to a 200.
            return message_response(MISSING_DATA_MESSAGE);
        }
        Err(error @ WebhookParseError::InvalidJson(_)) => {
            tracing::error!(error = %error, "webhook body was not valid json");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, PROCESSING_FAILED);
        }
    };

    match route(&event) {
        RouteDecision::NoAction => message_response(NO_ACTION_MESSAGE),
        RouteDecision::SetStatus {
            repository,
            issue_number,
            status,
            trigger,
        } => {
            apply_transition(&state, &repository, issue_number, status, trigger).await
        }
        RouteDecision::ClassifyComment {
            repository,
            issue_number,
            comment_body,
        } => classify_and_apply(&state, &repository, issue_number, &comment_body).await,
    }
}

async fn apply_transition(
    state: &AppState,
    repository: &RepoRef,
    issue_number: u64,
    status: Option<Status>,
    trigger: TransitionTrigger,
) -> (StatusCode, Json<Value>) {
    match set_status_serialized(state, repository, issue_number, status).await {
        Ok(()) => message_response(transition_message(trigger, issue_number)),
        Err(response) => response,
    }
}

async fn classify_and_apply(
    state: &AppState,
    repository: &RepoRef,
    issue_number: u64,
    comment_body: &str,
) -> (StatusCode, Json<Value>) {
    let Some(classifier) = state.classifier.as_ref() else {
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "AI API URL is not configured.",
        );
    };

    let intent = match classifier.classify(comment_body).await {
        Ok(intent) => intent,
        Err(error) => {
            // Classification failure must not turn into a label write.
            tracing::error!(
                repo = repository.full_name(),
                issue_number,
                error = %error,
                "comment classification failed"
            );
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, PROCESSING_FAILED);
        }
    };

    if let Some(status) = intent.status_effect() {
        if let Err(response) =
            set_status_serialized(state, repository, issue_number, Some(status)).await
        {
            return response;
        }
    }
    message_response(classification_message(intent, issue_number))
}

/// Runs the label read-modify-write under the per-issue lock.
async fn set_status_serialized(
    state: &AppState,
    repository: &RepoRef,
    issue_number: u64,
    status: Option<Status>,
) -> Result<(), (StatusCode, Json<Value>)> {
    let Some(store) = state.label_store() else {
        return Err(error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "GitHub token is not configured.",
        ));
    };

    let _guard = state.issue_locks.acquire(repository, issue_number).await;
    store
        .set_status(repository, issue_number, status)
        .await
        .map_err(|error| {
            tracing::error!(
                repo = repository.full_name(),
                issue_number,
                error = %error,
                "status transition aborted"
            );
            error_response(StatusCode::INTERNAL_SERVER_ERROR, PROCESSING_FAILED)
        })
}
