use std::cmp::Reverse;
use std::sync::Arc;

use futures_util::future::join_all;
use serde::Serialize;

use jules_core::{parse_rfc3339_to_unix_ms, IssueStateFilter, RepoRef, Task};

use crate::api_client::GithubApiClient;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
/// Structured failure for a single repository fetch.
pub struct RepoFetchError {
    pub repository: RepoRef,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Default)]
/// Result of an aggregate fetch: surviving tasks plus per-repo failures.
///
/// Partial failure is surfaced rather than hidden; callers that want the
/// all-or-nothing behavior treat a non-empty error list as fatal.
pub struct IssueFetchReport {
    pub tasks: Vec<Task>,
    pub repo_errors: Vec<RepoFetchError>,
}

impl IssueFetchReport {
    /// True when every configured repository failed and nothing was fetched.
    pub fn is_total_failure(&self) -> bool {
        self.tasks.is_empty() && !self.repo_errors.is_empty()
    }
}

#[derive(Clone)]
/// Fan-out/fan-in issue fetcher across the configured repositories.
pub struct IssueAggregator {
    client: Arc<GithubApiClient>,
    repos: Vec<RepoRef>,
}

impl IssueAggregator {
    pub fn new(client: Arc<GithubApiClient>, repos: Vec<RepoRef>) -> Self {
        Self { client, repos }
    }

    pub fn repos(&self) -> &[RepoRef] {
        &self.repos
    }

    /// Fetches one page of issues per repository concurrently and merges the
    /// results into a single task list sorted by creation time descending.
    ///
    /// Each task is stamped with the configured repository name, PR rows are
    /// dropped, and the sort is stable so equal timestamps keep per-repo
    /// fetch order. Failed repositories land in `repo_errors` without
    /// affecting the rest.
    pub async fn fetch_all(&self, state: IssueStateFilter) -> IssueFetchReport {
        let fetches = self.repos.iter().map(|repo| {
            let client = self.client.clone();
            async move { (repo.clone(), client.list_issues(repo, state).await) }
        });
        let results = join_all(fetches).await;

        let mut report = IssueFetchReport::default();
        for (repo, result) in results {
            match result {
                Ok(rows) => {
                    report.tasks.extend(
                        rows.into_iter()
                            .filter(|row| !row.is_pull_request())
                            .map(|row| row.into_task(&repo)),
                    );
                }
                Err(error) => {
                    tracing::warn!(
                        repo = repo.full_name(),
                        error = %error,
                        "issue fetch failed for repository"
                    );
                    report.repo_errors.push(RepoFetchError {
                        repository: repo,
                        message: error.to_string(),
                    });
                }
            }
        }

        report
            .tasks
            .sort_by_key(|task| Reverse(parse_rfc3339_to_unix_ms(&task.created_at).unwrap_or(0)));
        report
    }
}
