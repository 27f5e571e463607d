use std::sync::OnceLock;

use regex::Regex;

use jules_core::{Intent, RepoRef, Status};

use crate::event::WebhookEvent;

pub const NO_ACTION_MESSAGE: &str = "Webhook received, but no relevant action was taken.";
pub const MISSING_DATA_MESSAGE: &str = "Webhook received, but missing necessary data.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Names the table row that produced a status transition.
pub enum TransitionTrigger {
    IssueAssigned,
    IssueClosed,
    PullRequestOpened,
    PullRequestMerged,
    PullRequestClosedUnmerged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Routing verdict for a parsed webhook event.
pub enum RouteDecision {
    /// Apply a status transition directly.
    SetStatus {
        repository: RepoRef,
        issue_number: u64,
        status: Option<Status>,
        trigger: TransitionTrigger,
    },
    /// Run the comment through the intent classifier first; the executor
    /// applies the intent's status effect afterwards.
    ClassifyComment {
        repository: RepoRef,
        issue_number: u64,
        comment_body: String,
    },
    /// Outside the routing table; respond 200 and move on.
    NoAction,
}

/// Pure state machine over (event type, action).
///
/// Identical events always yield identical decisions, and shapes outside the
/// table are no-ops rather than errors. Review comments re-derive the target
/// issue from the pull request's body, since the comment itself always
/// targets the PR while the status belongs to the linked issue.
pub fn route(event: &WebhookEvent) -> RouteDecision {
    match event {
        WebhookEvent::Issues {
            action,
            repository,
            issue,
        } => match action.as_str() {
            "assigned" => RouteDecision::SetStatus {
                repository: repository.clone(),
                issue_number: issue.number,
                status: Some(Status::Ready),
                trigger: TransitionTrigger::IssueAssigned,
            },
            "closed" => RouteDecision::SetStatus {
                repository: repository.clone(),
                issue_number: issue.number,
                status: Some(Status::Done),
                trigger: TransitionTrigger::IssueClosed,
            },
            _ => RouteDecision::NoAction,
        },
        WebhookEvent::PullRequest {
            action,
            repository,
            pull_request,
        } => {
            let Some(issue_number) = extract_linked_issue(&pull_request.body) else {
                return RouteDecision::NoAction;
            };
            match action.as_str() {
                "opened" => RouteDecision::SetStatus {
                    repository: repository.clone(),
                    issue_number,
                    status: Some(Status::Working),
                    trigger: TransitionTrigger::PullRequestOpened,
                },
                "closed" if pull_request.merged => RouteDecision::SetStatus {
                    repository: repository.clone(),
                    issue_number,
                    status: Some(Status::Done),
                    trigger: TransitionTrigger::PullRequestMerged,
                },
                "closed" => RouteDecision::SetStatus {
                    repository: repository.clone(),
                    issue_number,
                    status: Some(Status::Ready),
                    trigger: TransitionTrigger::PullRequestClosedUnmerged,
                },
                _ => RouteDecision::NoAction,
            }
        }
        WebhookEvent::IssueComment {
            action,
            repository,
            issue,
            comment,
        } => {
            if action != "created" {
                return RouteDecision::NoAction;
            }
            RouteDecision::ClassifyComment {
                repository: repository.clone(),
                issue_number: issue.number,
                comment_body: comment.body.clone(),
            }
        }
        WebhookEvent::PullRequestReviewComment {
            action,
            repository,
            pull_request,
            comment,
        } => {
            if action != "created" {
                return RouteDecision::NoAction;
            }
            let Some(issue_number) = extract_linked_issue(&pull_request.body) else {
                return RouteDecision::NoAction;
            };
            RouteDecision::ClassifyComment {
                repository: repository.clone(),
                issue_number,
                comment_body: comment.body.clone(),
            }
        }
        WebhookEvent::Unsupported { .. } => RouteDecision::NoAction,
    }
}

/// First `closes|fixes|resolves #N` reference in a PR body, if any.
pub fn extract_linked_issue(body: &str) -> Option<u64> {
    static LINKED_ISSUE: OnceLock<Regex> = OnceLock::new();
    let regex = LINKED_ISSUE.get_or_init(|| {
        Regex::new(r"(?i)(?:closes|fixes|resolves)\s+#(\d+)").expect("linked-issue pattern is valid")
    });
    regex
        .captures(body)
        .and_then(|captures| captures.get(1))
        .and_then(|group| group.as_str().parse::<u64>().ok())
}

/// Response message for a direct status transition.
pub fn transition_message(trigger: TransitionTrigger, issue_number: u64) -> String {
    match trigger {
        TransitionTrigger::IssueAssigned => "Issue assigned, status set to \"ready\".".to_string(),
        TransitionTrigger::IssueClosed => "Issue closed, status set to \"done\".".to_string(),
        TransitionTrigger::PullRequestOpened => {
            format!("Pull request opened, issue #{issue_number} status set to \"working\".")
        }
        TransitionTrigger::PullRequestMerged => {
            format!("Pull request merged, issue #{issue_number} status set to \"done\".")
        }
        TransitionTrigger::PullRequestClosedUnmerged => {
            format!("Pull request closed, issue #{issue_number} status set to \"ready\".")
        }
    }
}

/// Response message for a classified comment.
pub fn classification_message(intent: Intent, issue_number: u64) -> String {
    match intent {
        Intent::Approved => {
            format!("Comment on issue #{issue_number} classified as approval, status set to \"done\".")
        }
        Intent::ChangesRequested => format!(
            "Comment on issue #{issue_number} classified as changes requested, status set to \"review\"."
        ),
        Intent::Commented => {
            format!("Comment on issue #{issue_number} classified as commentary, no status change.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        classification_message, extract_linked_issue, route, transition_message, RouteDecision,
        TransitionTrigger,
    };
    use crate::event::{CommentRef, IssueRef, PullRequestRef, WebhookEvent};
    use jules_core::{Intent, RepoRef, Status};

    fn repo() -> RepoRef {
        RepoRef::parse("o/r").expect("repo")
    }

    fn pull_request(body: &str, merged: bool) -> PullRequestRef {
        PullRequestRef {
            number: 30,
            body: body.to_string(),
            merged,
        }
    }

    #[test]
    fn functional_issue_assigned_routes_to_ready() {
        let event = WebhookEvent::Issues {
            action: "assigned".to_string(),
            repository: repo(),
            issue: IssueRef { number: 5 },
        };
        assert_eq!(
            route(&event),
            RouteDecision::SetStatus {
                repository: repo(),
                issue_number: 5,
                status: Some(Status::Ready),
                trigger: TransitionTrigger::IssueAssigned,
            }
        );
    }

    #[test]
    fn functional_issue_closed_routes_to_done() {
        let event = WebhookEvent::Issues {
            action: "closed".to_string(),
            repository: repo(),
            issue: IssueRef { number: 5 },
        };
        assert!(matches!(
            route(&event),
            RouteDecision::SetStatus {
                status: Some(Status::Done),
                trigger: TransitionTrigger::IssueClosed,
                ..
            }
        ));
    }

    #[test]
    fn functional_pr_opened_with_link_routes_linked_issue_to_working() {
        let event = WebhookEvent::PullRequest {
            action: "opened".to_string(),
            repository: repo(),
            pull_request: pull_request("This change Closes #42 for good.", false),
        };
        assert_eq!(
            route(&event),
            RouteDecision::SetStatus {
                repository: repo(),
                issue_number: 42,
                status: Some(Status::Working),
                trigger: TransitionTrigger::PullRequestOpened,
            }
        );
    }

    #[test]
    fn functional_pr_closed_routes_by_merged_flag() {
        let merged = WebhookEvent::PullRequest {
            action: "closed".to_string(),
            repository: repo(),
            pull_request: pull_request("fixes #7", true),
        };
        assert!(matches!(
            route(&merged),
            RouteDecision::SetStatus {
                issue_number: 7,
                status: Some(Status::Done),
                trigger: TransitionTrigger::PullRequestMerged,
                ..
            }
        ));

        let unmerged = WebhookEvent::PullRequest {
            action: "closed".to_string(),
            repository: repo(),
            pull_request: pull_request("fixes #7", false),
        };
        assert!(matches!(
            route(&unmerged),
            RouteDecision::SetStatus {
                issue_number: 7,
                status: Some(Status::Ready),
                trigger: TransitionTrigger::PullRequestClosedUnmerged,
                ..
            }
        ));
    }

    #[test]
    fn regression_pr_without_link_is_a_no_op_even_when_action_matches() {
        let event = WebhookEvent::PullRequest {
            action: "opened".to_string(),
            repository: repo(),
            pull_request: pull_request("See #42 for context", false),
        };
        assert_eq!(route(&event), RouteDecision::NoAction);
    }

    #[test]
    fn functional_issue_comment_created_requests_classification() {
        let event = WebhookEvent::IssueComment {
            action: "created".to_string(),
            repository: repo(),
            issue: IssueRef { number: 9 },
            comment: CommentRef {
                body: "Needs another pass".to_string(),
            },
        };
        assert_eq!(
            route(&event),
            RouteDecision::ClassifyComment {
                repository: repo(),
                issue_number: 9,
                comment_body: "Needs another pass".to_string(),
            }
        );
    }

    #[test]
    fn functional_review_comment_re_derives_issue_from_pr_body() {
        let event = WebhookEvent::PullRequestReviewComment {
            action: "created".to_string(),
            repository: repo(),
            pull_request: pull_request("Resolves #100", false),
            comment: CommentRef {
                body: "Nit: rename this".to_string(),
            },
        };
        assert!(matches!(
            route(&event),
            RouteDecision::ClassifyComment {
                issue_number: 100,
                ..
            }
        ));
    }

    #[test]
    fn regression_review_comment_without_linked_issue_is_a_no_op() {
        let event = WebhookEvent::PullRequestReviewComment {
            action: "created".to_string(),
            repository: repo(),
            pull_request: pull_request("Unrelated cleanup", false),
            comment: CommentRef {
                body: "ok".to_string(),
            },
        };
        assert_eq!(route(&event), RouteDecision::NoAction);
    }

    #[test]
    fn unit_unmatched_actions_and_events_are_no_ops() {
        let edited = WebhookEvent::Issues {
            action: "edited".to_string(),
            repository: repo(),
            issue: IssueRef { number: 5 },
        };
        assert_eq!(route(&edited), RouteDecision::NoAction);

        let comment_edited = WebhookEvent::IssueComment {
            action: "edited".to_string(),
            repository: repo(),
            issue: IssueRef { number: 5 },
            comment: CommentRef {
                body: "edited".to_string(),
            },
        };
        assert_eq!(route(&comment_edited), RouteDecision::NoAction);

        let unsupported = WebhookEvent::Unsupported {
            event_type: "ping".to_string(),
        };
        assert_eq!(route(&unsupported), RouteDecision::NoAction);
    }

    #[test]
    fn unit_route_is_deterministic_for_identical_events() {
        let event = WebhookEvent::Issues {
            action: "assigned".to_string(),
            repository: repo(),
            issue: IssueRef { number: 5 },
        };
        assert_eq!(route(&event), route(&event));
    }

    #[test]
    fn functional_extract_linked_issue_matches_keywords_case_insensitively() {
        assert_eq!(extract_linked_issue("Closes #42"), Some(42));
        assert_eq!(extract_linked_issue("fixes #7"), Some(7));
        assert_eq!(extract_linked_issue("Resolves #100"), Some(100));
        assert_eq!(extract_linked_issue("RESOLVES   #3"), Some(3));
    }

    #[test]
    fn regression_extract_linked_issue_requires_a_linking_keyword() {
        assert_eq!(extract_linked_issue("See #42 for context"), None);
        assert_eq!(extract_linked_issue("closes#42"), None);
        assert_eq!(extract_linked_issue(""), None);
    }

    #[test]
    fn unit_messages_name_issue_and_status() {
        assert_eq!(
            transition_message(TransitionTrigger::IssueAssigned, 5),
            "Issue assigned, status set to \"ready\"."
        );
        let review = classification_message(Intent::ChangesRequested, 9);
        assert!(review.contains("#9"));
        assert!(review.contains("\"review\""));
        let commentary = classification_message(Intent::Commented, 4);
        assert!(commentary.contains("no status change"));
    }
}
