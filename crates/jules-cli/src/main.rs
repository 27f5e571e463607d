//! Binary entrypoint: folds the environment/CLI surface into the immutable
//! process configuration and starts either the HTTP service or the terminal
//! board watcher.

mod bootstrap_helpers;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use clap::{Parser, ValueEnum};
use tokio::sync::watch;

use jules_board::{column_for_labels, BoardError, BoardPoller, TaskSource, BOARD_COLUMNS};
use jules_core::{IssueStateFilter, RepoRef, Task};
use jules_github::{GithubApiClient, GithubApiConfig, IssueAggregator};
use jules_server::{ClassifierSettings, JulesConfig};

fn parse_positive_u64(value: &str) -> Result<u64, String> {
    let parsed = value
        .parse::<u64>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

fn parse_positive_usize(value: &str) -> Result<usize, String> {
    let parsed = value
        .parse::<usize>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RunMode {
    /// Serve the webhook endpoint and board API.
    Serve,
    /// Poll the aggregate task list and print column summaries.
    Board,
}

#[derive(Debug, Parser)]
#[command(
    name = "jules-board",
    about = "Label-driven GitHub Kanban service for the Jules coding agent",
    version
)]
struct Cli {
    #[arg(long, value_enum, env = "JULES_MODE", default_value = "serve")]
    mode: RunMode,

    #[arg(
        long = "github-repos",
        env = "JULES_GITHUB_REPOS",
        value_delimiter = ',',
        help = "Comma-separated owner/repo list backing the board."
    )]
    github_repos: Vec<String>,

    #[arg(
        long = "github-token",
        env = "JULES_GITHUB_TOKEN",
        help = "GitHub credential (PAT or OAuth token) with repo and issue write access."
    )]
    github_token: Option<String>,

    #[arg(
        long = "github-api-base",
        env = "JULES_GITHUB_API_BASE",
        default_value = "https://api.github.com",
        help = "GitHub REST base URL; override for tests or GHES."
    )]
    github_api_base: String,

    #[arg(
        long = "webhook-secret",
        env = "JULES_WEBHOOK_SECRET",
        help = "Shared secret for webhook signatures. Leaving it unset disables verification (insecure, local development only)."
    )]
    webhook_secret: Option<String>,

    #[arg(
        long = "bot-login",
        env = "JULES_BOT_LOGIN",
        help = "Agent account assigned when a task is moved to Ready."
    )]
    bot_login: Option<String>,

    #[arg(
        long = "ai-api-url",
        env = "JULES_AI_API_URL",
        help = "OpenAI-compatible chat-completions endpoint used to classify comments."
    )]
    ai_api_url: Option<String>,

    #[arg(long = "ai-api-key", env = "JULES_AI_API_KEY", help = "Bearer token for the classifier endpoint.")]
    ai_api_key: Option<String>,

    #[arg(
        long = "ai-model",
        env = "JULES_AI_MODEL",
        default_value = "TinyLlama-1.1B-Chat-v1.0",
        help = "Model id sent to the classifier endpoint."
    )]
    ai_model: String,

    #[arg(
        long,
        env = "JULES_BIND",
        default_value = "127.0.0.1:8080",
        help = "Address the HTTP server binds."
    )]
    bind: String,

    #[arg(
        long = "request-timeout-ms",
        env = "JULES_REQUEST_TIMEOUT_MS",
        default_value_t = 5_000,
        value_parser = parse_positive_u64,
        help = "Bound applied to every outbound GitHub and classifier call."
    )]
    request_timeout_ms: u64,

    #[arg(
        long = "retry-max-attempts",
        env = "JULES_RETRY_MAX_ATTEMPTS",
        default_value_t = 3,
        value_parser = parse_positive_usize,
        help = "Attempts per outbound GitHub call for retryable statuses."
    )]
    retry_max_attempts: usize,

    #[arg(
        long = "retry-base-delay-ms",
        env = "JULES_RETRY_BASE_DELAY_MS",
        default_value_t = 250,
        value_parser = parse_positive_u64,
        help = "Base backoff delay between retried GitHub calls."
    )]
    retry_base_delay_ms: u64,

    #[arg(
        long = "poll-interval-seconds",
        env = "JULES_POLL_INTERVAL_SECONDS",
        default_value_t = 15,
        value_parser = parse_positive_u64,
        help = "Interval between authoritative board refreshes in board mode."
    )]
    poll_interval_seconds: u64,
}

impl Cli {
    fn into_config(self) -> Result<JulesConfig> {
        let mut repositories = Vec::new();
        for raw in &self.github_repos {
            if raw.trim().is_empty() {
                continue;
            }
            repositories.push(RepoRef::parse(raw)?);
        }

        let classifier = self.ai_api_url.as_deref().map(|api_url| ClassifierSettings {
            api_url: api_url.to_string(),
            api_key: self.ai_api_key.clone().unwrap_or_default(),
            model: self.ai_model.clone(),
        });

        Ok(JulesConfig {
            repositories,
            webhook_secret: self.webhook_secret,
            bot_login: self.bot_login,
            github_token: self.github_token,
            github_api_base: self.github_api_base,
            classifier,
            bind: self.bind,
            request_timeout_ms: self.request_timeout_ms,
            retry_max_attempts: self.retry_max_attempts,
            retry_base_delay_ms: self.retry_base_delay_ms,
            poll_interval_seconds: self.poll_interval_seconds,
        })
    }
}

struct AggregatorTaskSource {
    aggregator: IssueAggregator,
}

#[async_trait]
impl TaskSource for AggregatorTaskSource {
    async fn fetch_tasks(&self) -> Result<Vec<Task>, BoardError> {
        let report = self.aggregator.fetch_all(IssueStateFilter::Open).await;
        if report.is_total_failure() {
            let detail = report
                .repo_errors
                .iter()
                .map(|error| format!("{}: {}", error.repository.full_name(), error.message))
                .collect::<Vec<_>>()
                .join("; ");
            return Err(BoardError::Fetch(detail));
        }
        for error in &report.repo_errors {
            tracing::warn!(
                repo = error.repository.full_name(),
                message = error.message,
                "repository skipped in board refresh"
            );
        }
        Ok(report.tasks)
    }
}

fn render_board_summary(tasks: &[Task]) -> String {
    let mut line = format!("board snapshot: tasks={}", tasks.len());
    for column in BOARD_COLUMNS {
        let count = tasks
            .iter()
            .filter(|task| column_for_labels(task.label_names()) == column.id)
            .count();
        line.push_str(&format!(" {}={}", column.id, count));
    }
    line
}

async fn run_board(config: JulesConfig) -> Result<()> {
    let Some(token) = config.github_token.as_deref().map(str::trim).filter(|t| !t.is_empty())
    else {
        bail!("JULES_GITHUB_TOKEN must be configured for board mode");
    };
    if config.repositories.is_empty() {
        bail!("JULES_GITHUB_REPOS must be configured for board mode");
    }

    let client = Arc::new(GithubApiClient::new(GithubApiConfig {
        api_base: config.github_api_base.clone(),
        token: token.to_string(),
        request_timeout_ms: config.request_timeout_ms,
        retry_max_attempts: config.retry_max_attempts,
        retry_base_delay_ms: config.retry_base_delay_ms,
    })?);
    let aggregator = IssueAggregator::new(client, config.repositories.clone());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        let _ = shutdown_tx.send(true);
    });

    let poller = BoardPoller::new(
        AggregatorTaskSource { aggregator },
        Duration::from_secs(config.poll_interval_seconds.max(1)),
        shutdown_rx,
    );
    poller
        .run(|tasks| println!("{}", render_board_summary(&tasks)))
        .await;
    println!("board watcher shutdown requested");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    bootstrap_helpers::init_tracing();
    let mode = cli.mode;
    let config = cli.into_config()?;
    match mode {
        RunMode::Serve => jules_server::run_server(config).await,
        RunMode::Board => run_board(config).await,
    }
}

#[cfg(test)]
mod tests {
    use super::{render_board_summary, Cli, RunMode};
    use clap::Parser;
    use jules_core::{IssueState, RepoRef, Task};

    fn sample_task(id: i64, labels: &[&str]) -> Task {
        Task {
            id,
            number: 1,
            title: "task".to_string(),
            repository: RepoRef::parse("octo/board").expect("repo"),
            state: IssueState::Open,
            created_at: "2026-02-01T00:00:00Z".to_string(),
            closed_at: None,
            labels: labels.iter().map(|label| label.to_string()).collect(),
        }
    }

    #[test]
    fn functional_cli_parses_repos_and_builds_config() {
        let cli = Cli::parse_from([
            "jules-board",
            "--github-repos",
            "octo/alpha,octo/beta",
            "--github-token",
            "token",
        ]);
        assert_eq!(cli.mode, RunMode::Serve);
        let config = cli.into_config().expect("config");
        assert_eq!(config.repositories.len(), 2);
        assert_eq!(config.repositories[0].full_name(), "octo/alpha");
        assert_eq!(config.bind, "127.0.0.1:8080");
        assert!(config.classifier.is_none());
    }

    #[test]
    fn regression_cli_rejects_malformed_repo_reference() {
        let cli = Cli::parse_from(["jules-board", "--github-repos", "not-a-repo"]);
        assert!(cli.into_config().is_err());
    }

    #[test]
    fn unit_render_board_summary_counts_columns_from_labels() {
        let tasks = vec![
            sample_task(1, &[]),
            sample_task(2, &["jules-status:ready"]),
            sample_task(3, &["jules-status:ready"]),
            sample_task(4, &["jules-status:done"]),
        ];
        assert_eq!(
            render_board_summary(&tasks),
            "board snapshot: tasks=4 backlog=1 ready=2 working=0 review=0 done=1"
        );
    }
}
