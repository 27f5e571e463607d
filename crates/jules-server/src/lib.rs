//! HTTP surface of the Jules board: the GitHub webhook endpoint plus the
//! board/config API consumed by clients.
//!
//! The webhook path is the write side (signature check, routing, label
//! mutation); the API path is the read side (aggregation, configuration
//! snapshots) plus the assignment mutation the optimistic board triggers.

mod api_routes;
pub mod config;
mod issue_locks;
mod prompt_templates;
mod state;
mod webhook_routes;


use anyhow::Context;

pub use config::{ClassifierSettings, JulesConfig};
pub use state::{build_app_state, build_router, AppState};

/// Binds the configured address and serves until ctrl-c.
pub async fn run_server(config: JulesConfig) -> anyhow::Result<()> {
    let bind = config.bind.clone();
    if config.webhook_secret.is_none() {
        tracing::warn!(
            "JULES_WEBHOOK_SECRET is not set. Webhook signature verification is disabled. This is insecure."
        );
    }

    let state = std::sync::Arc::new(build_app_state(config)?);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(bind.as_str())
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    let local_addr = listener
        .local_addr()
        .context("failed to resolve bound address")?;
    tracing::info!(addr = %local_addr, "jules board server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("jules board server exited unexpectedly")
}
