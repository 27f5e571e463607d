use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use jules_core::{IssueStateFilter, RepoRef};

use crate::prompt_templates::templates_json;
use crate::state::AppState;

fn error_response(status: StatusCode, error: impl Into<String>) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": error.into() })))
}

#[derive(Debug, Deserialize)]
pub struct IssuesQuery {
    #[serde(default)]
    state: Option<String>,
}

/// GET /api/issues: the aggregate task list behind the board.
pub async fn handle_list_issues(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IssuesQuery>,
) -> (StatusCode, Json<Value>) {
    let Some(aggregator) = state.aggregator() else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "GitHub token (JULES_GITHUB_TOKEN) and repository list (JULES_GITHUB_REPOS) must be configured.",
        );
    };
    if state.config.repositories.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "GitHub token (JULES_GITHUB_TOKEN) and repository list (JULES_GITHUB_REPOS) must be configured.",
        );
    }

    let filter = IssueStateFilter::from_query_value(query.state.as_deref());
    let report = aggregator.fetch_all(filter).await;
    if report.is_total_failure() {
        let details: Vec<String> = report
            .repo_errors
            .iter()
            .map(|error| format!("{}: {}", error.repository.full_name(), error.message))
            .collect();
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Failed to fetch issues from GitHub.",
                "details": details,
            })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "tasks": report.tasks,
            "repo_errors": report.repo_errors,
        })),
    )
}

/// POST /api/issues: creates a new task in a configured repository.
pub async fn handle_create_issue(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let Some(github) = state.github.clone() else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "GitHub token (JULES_GITHUB_TOKEN) must be configured.",
        );
    };

    let title = payload["title"].as_str().map(str::trim).unwrap_or_default();
    let repo_raw = payload["repo"].as_str().map(str::trim).unwrap_or_default();
    if title.is_empty() || repo_raw.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Title and repo are required fields.");
    }
    let Ok(repo) = RepoRef::parse(repo_raw) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Repository must look like owner/name.",
        );
    };
    let body = payload["body"].as_str().unwrap_or_default();

    match github.create_issue(&repo, title, body).await {
        Ok(created) => (
            StatusCode::CREATED,
            Json(json!(created.into_task(&repo))),
        ),
        Err(error) => {
            tracing::error!(repo = repo.full_name(), error = %error, "issue creation failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create issue.")
        }
    }
}

/// POST /api/issues/assign: the mutation behind a drop into Ready.
///
/// The assignee defaults to the configured agent login; the board's only
/// assignment target is the agent account.
pub async fn handle_assign_issue(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let Some(github) = state.github.clone() else {
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "GitHub token is not configured.",
        );
    };

    let repo_raw = payload["repo"].as_str().map(str::trim).unwrap_or_default();
    let issue_number = payload["issue_number"].as_u64();
    let assignee = payload["assignee"]
        .as_str()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .or_else(|| state.config.bot_login.clone());

    let (Ok(repo), Some(issue_number), Some(assignee)) =
        (RepoRef::parse(repo_raw), issue_number, assignee)
    else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Missing repo, issue_number, or assignee in request body.",
        );
    };

    match github.add_assignee(&repo, issue_number, &assignee).await {
        Ok(updated) => (StatusCode::OK, Json(json!(updated.into_task(&repo)))),
        Err(error) => {
            tracing::error!(
                repo = repo.full_name(),
                issue_number,
                error = %error,
                "issue assignment failed"
            );
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to assign issue.")
        }
    }
}

/// GET /api/config: repo list plus the built-in prompt templates.
pub async fn handle_get_config(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<Value>) {
    if state.config.repositories.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Repository list (JULES_GITHUB_REPOS) is not configured.",
        );
    }
    let repos: Vec<&str> = state
        .config
        .repositories
        .iter()
        .map(RepoRef::full_name)
        .collect();
    (
        StatusCode::OK,
        Json(json!({ "repos": repos, "templates": templates_json() })),
    )
}

/// GET /api/status: readiness snapshot for clients.
pub async fn handle_get_status(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "is_configured": state.config.is_configured(),
            "has_credentials": state.config.has_github_credentials(),
        })),
    )
}

/// GET /api/user: login of the agent account behind the credential.
pub async fn handle_get_user(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    let Some(github) = state.github.clone() else {
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "GitHub token is not configured.",
        );
    };
    match github.viewer_login().await {
        Ok(login) => (StatusCode::OK, Json(json!({ "login": login }))),
        Err(error) => {
            tracing::error!(error = %error, "viewer login lookup failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch user.")
        }
    }
}

/// POST /api/ai/suggest-prompt: rewrites a draft task description.
pub async fn handle_suggest_prompt(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let prompt = payload["prompt"].as_str().map(str::trim).unwrap_or_default();
    if prompt.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Prompt is required.");
    }
    let Some(classifier) = state.classifier.as_ref() else {
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "AI API URL is not configured.",
        );
    };

    match classifier.suggest_prompt(prompt).await {
        Ok(suggested_prompt) => (
            StatusCode::OK,
            Json(json!({ "suggested_prompt": suggested_prompt })),
        ),
        Err(error) => {
            tracing::error!(error = %error, "prompt suggestion failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to get a suggestion from the AI service.",
            )
        }
    }
}

/// GET /healthz: liveness probe.
pub async fn handle_health() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}
