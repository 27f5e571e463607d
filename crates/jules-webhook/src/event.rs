use serde::Deserialize;
use thiserror::Error;

use jules_core::RepoRef;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Issue reference inside a webhook payload.
pub struct IssueRef {
    pub number: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Pull-request reference inside a webhook payload.
pub struct PullRequestRef {
    pub number: u64,
    pub body: String,
    pub merged: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Comment reference inside a webhook payload.
pub struct CommentRef {
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Tagged rendering of the webhook payloads this system consumes.
///
/// Only the fields the router reads survive parsing; an event claiming a
/// type it does not structurally match is rejected as a malformed payload
/// instead of limping along with partial data.
pub enum WebhookEvent {
    Issues {
        action: String,
        repository: RepoRef,
        issue: IssueRef,
    },
    PullRequest {
        action: String,
        repository: RepoRef,
        pull_request: PullRequestRef,
    },
    IssueComment {
        action: String,
        repository: RepoRef,
        issue: IssueRef,
        comment: CommentRef,
    },
    PullRequestReviewComment {
        action: String,
        repository: RepoRef,
        pull_request: PullRequestRef,
        comment: CommentRef,
    },
    /// Event types outside the routing table (ping, push, …).
    Unsupported { event_type: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
/// Parse failures for inbound webhook bodies.
pub enum WebhookParseError {
    /// The body was not valid JSON at all.
    #[error("invalid webhook payload json: {0}")]
    InvalidJson(String),
    /// The body parsed but lacks a field its claimed event type requires.
    /// The HTTP layer degrades this to a 200 no-op so GitHub keeps the hook
    /// enabled.
    #[error("webhook payload for '{event_type}' event is missing {field}")]
    MissingField {
        event_type: String,
        field: &'static str,
    },
}

#[derive(Debug, Deserialize)]
struct RawPayload {
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    repository: Option<RawRepository>,
    #[serde(default)]
    issue: Option<RawIssue>,
    #[serde(default)]
    pull_request: Option<RawPullRequest>,
    #[serde(default)]
    comment: Option<RawComment>,
}

#[derive(Debug, Deserialize)]
struct RawRepository {
    #[serde(default)]
    full_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawIssue {
    #[serde(default)]
    number: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawPullRequest {
    #[serde(default)]
    number: Option<u64>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    merged: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawComment {
    #[serde(default)]
    body: Option<String>,
}

/// Parses the raw body bytes for the delivery named by `x-github-event`.
///
/// The same buffer the signature was verified over is parsed here; the body
/// is never re-serialized in between.
pub fn parse_webhook_event(
    event_type: &str,
    raw_body: &[u8],
) -> Result<WebhookEvent, WebhookParseError> {
    let event_type = event_type.trim();
    let raw: RawPayload = serde_json::from_slice(raw_body)
        .map_err(|error| WebhookParseError::InvalidJson(error.to_string()))?;

    if !matches!(
        event_type,
        "issues" | "pull_request" | "issue_comment" | "pull_request_review_comment"
    ) {
        return Ok(WebhookEvent::Unsupported {
            event_type: event_type.to_string(),
        });
    }

    let missing = |field: &'static str| WebhookParseError::MissingField {
        event_type: event_type.to_string(),
        field,
    };

    let action = raw
        .action
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| missing("action"))?;
    let repository = raw
        .repository
        .and_then(|repo| repo.full_name)
        .and_then(|full_name| RepoRef::parse(&full_name).ok())
        .ok_or_else(|| missing("repository.full_name"))?;

    match event_type {
        "issues" => {
            let issue = require_issue(raw.issue, missing("issue.number"))?;
            Ok(WebhookEvent::Issues {
                action,
                repository,
                issue,
            })
        }
        "pull_request" => {
            let pull_request = require_pull_request(raw.pull_request, &missing)?;
            Ok(WebhookEvent::PullRequest {
                action,
                repository,
                pull_request,
            })
        }
        "issue_comment" => {
            let issue = require_issue(raw.issue, missing("issue.number"))?;
            let comment = require_comment(raw.comment, missing("comment.body"))?;
            Ok(WebhookEvent::IssueComment {
                action,
                repository,
                issue,
                comment,
            })
        }
        "pull_request_review_comment" => {
            let pull_request = require_pull_request(raw.pull_request, &missing)?;
            let comment = require_comment(raw.comment, missing("comment.body"))?;
            Ok(WebhookEvent::PullRequestReviewComment {
                action,
                repository,
                pull_request,
                comment,
            })
        }
        _ => Ok(WebhookEvent::Unsupported {
            event_type: event_type.to_string(),
        }),
    }
}

fn require_issue(
    raw: Option<RawIssue>,
    error: WebhookParseError,
) -> Result<IssueRef, WebhookParseError> {
    raw.and_then(|issue| issue.number)
        .map(|number| IssueRef { number })
        .ok_or(error)
}

fn require_pull_request<F>(
    raw: Option<RawPullRequest>,
    missing: F,
) -> Result<PullRequestRef, WebhookParseError>
where
    F: Fn(&'static str) -> WebhookParseError,
{
    let raw = raw.ok_or_else(|| missing("pull_request.number"))?;
    let number = raw.number.ok_or_else(|| missing("pull_request.number"))?;
    Ok(PullRequestRef {
        number,
        body: raw.body.unwrap_or_default(),
        merged: raw.merged.unwrap_or(false),
    })
}

fn require_comment(
    raw: Option<RawComment>,
    error: WebhookParseError,
) -> Result<CommentRef, WebhookParseError> {
    raw.and_then(|comment| comment.body)
        .filter(|body| !body.trim().is_empty())
        .map(|body| CommentRef { body })
        .ok_or(error)
}
