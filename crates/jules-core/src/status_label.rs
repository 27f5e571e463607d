use serde::{Deserialize, Serialize};

/// Prefix shared by every durable workflow-status label.
pub const STATUS_LABEL_PREFIX: &str = "jules-status:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Workflow status persisted as a `jules-status:` label.
///
/// Backlog is deliberately absent: an issue with no status label is in the
/// backlog, and that default is only materialized at the presentation
/// boundary. Persisted state is always `Option<Status>` where `None` means
/// backlog.
pub enum Status {
    Ready,
    Working,
    Review,
    Done,
}

impl Status {
    /// Lowercased wire form used in label names and board column ids.
    pub fn as_label_value(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Working => "working",
            Self::Review => "review",
            Self::Done => "done",
        }
    }

    pub fn from_label_value(raw: &str) -> Option<Self> {
        match raw {
            "ready" => Some(Self::Ready),
            "working" => Some(Self::Working),
            "review" => Some(Self::Review),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

/// Render the label written to GitHub for `status`.
pub fn status_label(status: Status) -> String {
    format!("{STATUS_LABEL_PREFIX}{}", status.as_label_value())
}

/// Derive the workflow status from a raw label set.
///
/// The first `jules-status:` label wins; a label carrying an unknown value
/// counts as no status at all, so corrupted labels degrade to backlog rather
/// than failing the projection.
pub fn status_from_labels<'a>(labels: impl IntoIterator<Item = &'a str>) -> Option<Status> {
    labels
        .into_iter()
        .find_map(|label| label.strip_prefix(STATUS_LABEL_PREFIX))
        .and_then(Status::from_label_value)
}

#[cfg(test)]
mod tests {
    use super::{status_from_labels, status_label, Status};

    #[test]
    fn unit_status_label_round_trips_every_variant() {
        for status in [Status::Ready, Status::Working, Status::Review, Status::Done] {
            let label = status_label(status);
            assert_eq!(status_from_labels([label.as_str()]), Some(status));
        }
    }

    #[test]
    fn functional_status_from_labels_ignores_foreign_labels() {
        let labels = ["bug", "priority:high", "jules-status:working"];
        assert_eq!(status_from_labels(labels), Some(Status::Working));
    }

    #[test]
    fn unit_status_from_labels_returns_none_without_status_label() {
        assert_eq!(status_from_labels(["bug", "enhancement"]), None);
        assert_eq!(status_from_labels([]), None);
    }

    #[test]
    fn regression_status_from_labels_treats_unknown_value_as_backlog() {
        assert_eq!(status_from_labels(["jules-status:launched"]), None);
    }
}
