use serde::{Deserialize, Serialize};

use crate::status_label::Status;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Classifier verdict on a comment's sentiment toward a change.
pub enum Intent {
    Approved,
    ChangesRequested,
    Commented,
}

impl Intent {
    /// Maps the classifier's raw completion text onto an intent.
    ///
    /// The match is case-sensitive against the three literals the fixed
    /// prompt asks for; anything else (empty responses included) is treated
    /// as plain commentary rather than an error.
    pub fn from_verdict(raw: &str) -> Self {
        match raw.trim() {
            "Approved" => Self::Approved,
            "ChangesRequested" => Self::ChangesRequested,
            _ => Self::Commented,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "Approved",
            Self::ChangesRequested => "ChangesRequested",
            Self::Commented => "Commented",
        }
    }

    /// Status transition implied by the intent, if any.
    pub fn status_effect(self) -> Option<Status> {
        match self {
            Self::Approved => Some(Status::Done),
            Self::ChangesRequested => Some(Status::Review),
            Self::Commented => None,
        }
    }
}
