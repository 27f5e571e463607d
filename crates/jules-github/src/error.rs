use thiserror::Error;

#[derive(Debug, Error)]
/// Failures surfaced by the GitHub API client.
pub enum GithubError {
    #[error("github token is not configured")]
    MissingToken,
    #[error("invalid github authorization header")]
    InvalidAuthHeader,
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("github api {operation} failed with status {status}: {body}")]
    HttpStatus {
        operation: &'static str,
        status: u16,
        body: String,
    },
    #[error("failed to decode github {operation} response: {detail}")]
    Decode {
        operation: &'static str,
        detail: String,
    },
}

impl GithubError {
    /// True when the failure came from the upstream service rather than
    /// local configuration.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::HttpStatus { .. } | Self::Decode { .. }
        )
    }
}
