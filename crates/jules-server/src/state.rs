use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use jules_classifier::{ClassifierClient, ClassifierConfig};
use jules_github::{GithubApiClient, GithubApiConfig, IssueAggregator, LabelStateStore};

use crate::api_routes;
use crate::config::JulesConfig;
use crate::issue_locks::IssueLockMap;
use crate::webhook_routes;

/// Shared application state handed to every handler.
pub struct AppState {
    pub config: JulesConfig,
    pub github: Option<Arc<GithubApiClient>>,
    pub classifier: Option<ClassifierClient>,
    pub issue_locks: IssueLockMap,
}

impl AppState {
    pub fn label_store(&self) -> Option<LabelStateStore> {
        self.github.clone().map(LabelStateStore::new)
    }

    pub fn aggregator(&self) -> Option<IssueAggregator> {
        self.github
            .clone()
            .map(|client| IssueAggregator::new(client, self.config.repositories.clone()))
    }
}

/// Constructs the outbound clients the configuration allows for.
///
/// Absent configuration yields absent clients, not failures; the endpoints
/// that need a missing client answer with a structured "not configured"
/// error instead.
pub fn build_app_state(config: JulesConfig) -> anyhow::Result<AppState> {
    let github = match config.github_token.as_deref().map(str::trim) {
        Some(token) if !token.is_empty() => Some(Arc::new(GithubApiClient::new(
            GithubApiConfig {
                api_base: config.github_api_base.clone(),
                token: token.to_string(),
                request_timeout_ms: config.request_timeout_ms,
                retry_max_attempts: config.retry_max_attempts,
                retry_base_delay_ms: config.retry_base_delay_ms,
            },
        )?)),
        _ => None,
    };

    let classifier = match &config.classifier {
        Some(settings)
            if !settings.api_url.trim().is_empty() && !settings.api_key.trim().is_empty() =>
        {
            Some(ClassifierClient::new(ClassifierConfig {
                api_url: settings.api_url.clone(),
                api_key: settings.api_key.clone(),
                model: settings.model.clone(),
                request_timeout_ms: config.request_timeout_ms,
            })?)
        }
        _ => None,
    };

    Ok(AppState {
        config,
        github,
        classifier,
        issue_locks: IssueLockMap::default(),
    })
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/webhooks/github", post(webhook_routes::handle_github_webhook))
        .route(
            "/api/issues",
            get(api_routes::handle_list_issues).post(api_routes::handle_create_issue),
        )
        .route("/api/issues/assign", post(api_routes::handle_assign_issue))
        .route("/api/config", get(api_routes::handle_get_config))
        .route("/api/status", get(api_routes::handle_get_status))
        .route("/api/user", get(api_routes::handle_get_user))
        .route(
            "/api/ai/suggest-prompt",
            post(api_routes::handle_suggest_prompt),
        )
        .route("/healthz", get(api_routes::handle_health))
        .with_state(state)
}
