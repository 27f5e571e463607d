use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use jules_core::{IssueStateFilter, RepoRef};

use crate::error::GithubError;
use crate::payload::{GithubIssuePayload, GithubLabel};
use crate::transport::{
    is_retryable_github_status, is_retryable_transport_error, parse_retry_after, retry_delay,
    truncate_for_error,
};

/// Single page bound applied to every per-repository listing.
pub(crate) const ISSUES_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone)]
/// Connection settings for the GitHub REST API.
pub struct GithubApiConfig {
    pub api_base: String,
    pub token: String,
    pub request_timeout_ms: u64,
    pub retry_max_attempts: usize,
    pub retry_base_delay_ms: u64,
}

#[derive(Clone)]
/// Authenticated GitHub REST client with bounded status retries.
pub struct GithubApiClient {
    http: reqwest::Client,
    api_base: String,
    retry_max_attempts: usize,
    retry_base_delay_ms: u64,
}

impl GithubApiClient {
    pub fn new(config: GithubApiConfig) -> Result<Self, GithubError> {
        if config.token.trim().is_empty() {
            return Err(GithubError::MissingToken);
        }

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("jules-board"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            reqwest::header::HeaderValue::from_static("2022-11-28"),
        );
        let auth_header = format!("Bearer {}", config.token.trim());
        headers.insert(
            reqwest::header::AUTHORIZATION,
            reqwest::header::HeaderValue::from_str(&auth_header)
                .map_err(|_| GithubError::InvalidAuthHeader)?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.request_timeout_ms.max(1)))
            .build()?;
        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            retry_max_attempts: config.retry_max_attempts.max(1),
            retry_base_delay_ms: config.retry_base_delay_ms.max(1),
        })
    }

    /// Login of the account behind the configured token.
    pub async fn viewer_login(&self) -> Result<String, GithubError> {
        #[derive(Deserialize)]
        struct Viewer {
            login: String,
        }

        let viewer: Viewer = self
            .request_json("resolve viewer login", || {
                self.http.get(format!("{}/user", self.api_base))
            })
            .await?;
        Ok(viewer.login)
    }

    /// Lists one page of issues for a repository.
    ///
    /// Repositories with more rows than the page size silently truncate; the
    /// aggregate view accepts that bound instead of paginating.
    pub async fn list_issues(
        &self,
        repo: &RepoRef,
        state: IssueStateFilter,
    ) -> Result<Vec<GithubIssuePayload>, GithubError> {
        let per_page = ISSUES_PAGE_SIZE.to_string();
        self.request_json("list issues", || {
            self.http
                .get(format!(
                    "{}/repos/{}/issues",
                    self.api_base,
                    repo.full_name()
                ))
                .query(&[
                    ("state", state.as_query_value()),
                    ("per_page", per_page.as_str()),
                ])
        })
        .await
    }

    pub async fn get_issue(
        &self,
        repo: &RepoRef,
        issue_number: u64,
    ) -> Result<GithubIssuePayload, GithubError> {
        self.request_json("fetch issue", || {
            self.http.get(format!(
                "{}/repos/{}/issues/{}",
                self.api_base,
                repo.full_name(),
                issue_number
            ))
        })
        .await
    }

    /// Replaces the issue's entire label list in one call.
    pub async fn replace_issue_labels(
        &self,
        repo: &RepoRef,
        issue_number: u64,
        labels: &[String],
    ) -> Result<(), GithubError> {
        let payload = json!({ "labels": labels });
        let _replaced: Vec<GithubLabel> = self
            .request_json("replace issue labels", || {
                self.http
                    .put(format!(
                        "{}/repos/{}/issues/{}/labels",
                        self.api_base,
                        repo.full_name(),
                        issue_number
                    ))
                    .json(&payload)
            })
            .await?;
        Ok(())
    }

    pub async fn add_assignee(
        &self,
        repo: &RepoRef,
        issue_number: u64,
        assignee: &str,
    ) -> Result<GithubIssuePayload, GithubError> {
        let payload = json!({ "assignees": [assignee] });
        self.request_json("add issue assignee", || {
            self.http
                .post(format!(
                    "{}/repos/{}/issues/{}/assignees",
                    self.api_base,
                    repo.full_name(),
                    issue_number
                ))
                .json(&payload)
        })
        .await
    }

    pub async fn create_issue(
        &self,
        repo: &RepoRef,
        title: &str,
        body: &str,
    ) -> Result<GithubIssuePayload, GithubError> {
        let payload = json!({ "title": title, "body": body });
        self.request_json("create issue", || {
            self.http
                .post(format!(
                    "{}/repos/{}/issues",
                    self.api_base,
                    repo.full_name()
                ))
                .json(&payload)
        })
        .await
    }

    async fn request_json<T, F>(
        &self,
        operation: &'static str,
        mut request_builder: F,
    ) -> Result<T, GithubError>
    where
        T: DeserializeOwned,
        F: FnMut() -> reqwest::RequestBuilder,
    {
        let mut attempt = 0_usize;
        loop {
            attempt = attempt.saturating_add(1);
            let response = request_builder().send().await;
            match response {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response.json::<T>().await.map_err(|error| {
                            GithubError::Decode {
                                operation,
                                detail: error.to_string(),
                            }
                        });
                    }

                    let retry_after = parse_retry_after(response.headers());
                    let body = response.text().await.unwrap_or_default();
                    if attempt < self.retry_max_attempts
                        && is_retryable_github_status(status.as_u16())
                    {
                        tokio::time::sleep(retry_delay(
                            self.retry_base_delay_ms,
                            attempt,
                            retry_after,
                        ))
                        .await;
                        continue;
                    }

                    return Err(GithubError::HttpStatus {
                        operation,
                        status: status.as_u16(),
                        body: truncate_for_error(&body, 800),
                    });
                }
                Err(error) => {
                    if attempt < self.retry_max_attempts && is_retryable_transport_error(&error) {
                        tokio::time::sleep(retry_delay(self.retry_base_delay_ms, attempt, None))
                            .await;
                        continue;
                    }
                    return Err(GithubError::Http(error));
                }
            }
        }
    }
}
