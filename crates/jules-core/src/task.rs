use serde::{Deserialize, Serialize};

use crate::repo_ref::RepoRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Lifecycle state of the underlying GitHub issue.
pub enum IssueState {
    Open,
    Closed,
}

impl IssueState {
    pub fn from_api_value(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("closed") {
            Self::Closed
        } else {
            Self::Open
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// State filter forwarded to the GitHub issues listing.
pub enum IssueStateFilter {
    #[default]
    Open,
    Closed,
    All,
}

impl IssueStateFilter {
    /// Parses the query-string value, defaulting to open for anything else.
    pub fn from_query_value(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(value) if value.eq_ignore_ascii_case("closed") => Self::Closed,
            Some(value) if value.eq_ignore_ascii_case("all") => Self::All,
            _ => Self::Open,
        }
    }

    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::All => "all",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Board rendering of a GitHub issue.
///
/// Rebuilt from the upstream API on every aggregate fetch and never
/// persisted; the only durable state behind a task is its label set.
pub struct Task {
    pub id: i64,
    pub number: u64,
    pub title: String,
    pub repository: RepoRef,
    pub state: IssueState,
    pub created_at: String,
    #[serde(default)]
    pub closed_at: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
}

impl Task {
    pub fn label_names(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}
