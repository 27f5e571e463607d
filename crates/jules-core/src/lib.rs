//! Domain types shared across the Jules board crates.
//!
//! Defines the status-label vocabulary, repository references, the ephemeral
//! task model, and comment-intent values consumed by the webhook, GitHub, and
//! board crates.

pub mod intent;
pub mod repo_ref;
pub mod status_label;
pub mod task;
pub mod time_utils;

pub use intent::Intent;
pub use repo_ref::{RepoRef, RepoRefError};
pub use status_label::{
    status_from_labels, status_label, Status, STATUS_LABEL_PREFIX,
};
pub use task::{IssueState, IssueStateFilter, Task};
pub use time_utils::{current_unix_timestamp_ms, parse_rfc3339_to_unix_ms};
