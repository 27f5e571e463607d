use std::sync::Arc;

use jules_core::{status_label, RepoRef, Status, STATUS_LABEL_PREFIX};

use crate::api_client::GithubApiClient;
use crate::error::GithubError;

#[derive(Clone)]
/// Read-modify-write owner of an issue's `jules-status:` label.
///
/// The write replaces the issue's entire label list, which keeps the
/// at-most-one-status-label invariant even when other actors add labels by
/// hand, and makes re-applying the same status a no-op in observable state.
pub struct LabelStateStore {
    client: Arc<GithubApiClient>,
}

impl LabelStateStore {
    pub fn new(client: Arc<GithubApiClient>) -> Self {
        Self { client }
    }

    /// Sets (or with `None`, clears) the status label on an issue.
    ///
    /// A failed initial fetch aborts the operation without mutating labels;
    /// retry policy beyond the transport layer belongs to the caller.
    pub async fn set_status(
        &self,
        repo: &RepoRef,
        issue_number: u64,
        status: Option<Status>,
    ) -> Result<(), GithubError> {
        let issue = match self.client.get_issue(repo, issue_number).await {
            Ok(issue) => issue,
            Err(error) => {
                tracing::warn!(
                    repo = repo.full_name(),
                    issue_number,
                    error = %error,
                    "aborting status transition: issue fetch failed before label write"
                );
                return Err(error);
            }
        };

        let mut labels: Vec<String> = issue
            .labels
            .into_iter()
            .map(|label| label.name)
            .filter(|name| !name.starts_with(STATUS_LABEL_PREFIX))
            .collect();
        if let Some(status) = status {
            labels.push(status_label(status));
        }

        self.client
            .replace_issue_labels(repo, issue_number, &labels)
            .await
    }
}
