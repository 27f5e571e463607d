//! Webhook ingestion: signature verification, payload typing, and the
//! status-transition state machine.
//!
//! Everything in this crate is synchronous and pure; the HTTP layer feeds it
//! raw bytes and executes the decisions it returns.

mod event;
mod router;
mod signature;

pub use event::{
    parse_webhook_event, CommentRef, IssueRef, PullRequestRef, WebhookEvent, WebhookParseError,
};
pub use router::{
    classification_message, extract_linked_issue, route, transition_message, RouteDecision,
    TransitionTrigger, MISSING_DATA_MESSAGE, NO_ACTION_MESSAGE,
};
pub use signature::{
    verify_webhook_signature, SignatureOutcome, REASON_SIGNATURE_INVALID,
    REASON_SIGNATURE_MISSING, SIGNATURE_HEADER,
};
