use serde::{Deserialize, Serialize};
use serde_json::Value;

use jules_core::{IssueState, RepoRef, Task};

#[derive(Debug, Clone, Deserialize, Serialize)]
/// Label entry as returned by the GitHub issues API.
pub struct GithubLabel {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
/// Issue row as returned by the GitHub issues API.
///
/// The listing endpoint also yields pull requests; those rows carry the
/// `pull_request` marker and are filtered out before tasks are built.
pub struct GithubIssuePayload {
    pub id: i64,
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub state: String,
    pub created_at: String,
    #[serde(default)]
    pub closed_at: Option<String>,
    #[serde(default)]
    pub labels: Vec<GithubLabel>,
    #[serde(default)]
    pub pull_request: Option<Value>,
}

impl GithubIssuePayload {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    /// Builds the board task, stamping `repo` as the authoritative source
    /// repository regardless of what the raw payload claims.
    pub fn into_task(self, repo: &RepoRef) -> Task {
        Task {
            id: self.id,
            number: self.number,
            title: self.title,
            repository: repo.clone(),
            state: IssueState::from_api_value(&self.state),
            created_at: self.created_at,
            closed_at: self.closed_at,
            labels: self.labels.into_iter().map(|label| label.name).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GithubIssuePayload, GithubLabel};
    use jules_core::{IssueState, RepoRef};

    fn sample_payload() -> GithubIssuePayload {
        GithubIssuePayload {
            id: 9001,
            number: 42,
            title: "Fix the widget".to_string(),
            state: "open".to_string(),
            created_at: "2026-02-01T10:00:00Z".to_string(),
            closed_at: None,
            labels: vec![
                GithubLabel {
                    name: "bug".to_string(),
                },
                GithubLabel {
                    name: "jules-status:working".to_string(),
                },
            ],
            pull_request: None,
        }
    }

    #[test]
    fn functional_into_task_stamps_configured_repository() {
        let repo = RepoRef::parse("octo/board").expect("repo");
        let task = sample_payload().into_task(&repo);
        assert_eq!(task.repository, repo);
        assert_eq!(task.number, 42);
        assert_eq!(task.state, IssueState::Open);
        assert_eq!(
            task.labels,
            vec!["bug".to_string(), "jules-status:working".to_string()]
        );
    }

    #[test]
    fn unit_is_pull_request_detects_marker() {
        let mut payload = sample_payload();
        assert!(!payload.is_pull_request());
        payload.pull_request = Some(serde_json::json!({ "url": "https://example" }));
        assert!(payload.is_pull_request());
    }

    #[test]
    fn regression_payload_decodes_with_missing_optional_fields() {
        let raw = r#"{"id":1,"number":2,"title":"t","created_at":"2026-01-01T00:00:00Z"}"#;
        let payload: GithubIssuePayload = serde_json::from_str(raw).expect("decode");
        assert!(payload.labels.is_empty());
        assert!(payload.closed_at.is_none());
        assert!(!payload.is_pull_request());
    }
}
