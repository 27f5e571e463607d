use jules_core::{status_from_labels, Status};

pub const BACKLOG_COLUMN_ID: &str = "backlog";
pub const READY_COLUMN_ID: &str = "ready";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Ordered presentation bucket, one-to-one with a workflow status.
pub struct Column {
    pub id: &'static str,
    pub title: &'static str,
}

/// Board columns in display order.
pub const BOARD_COLUMNS: [Column; 5] = [
    Column {
        id: BACKLOG_COLUMN_ID,
        title: "Backlog",
    },
    Column {
        id: READY_COLUMN_ID,
        title: "Ready for Jules",
    },
    Column {
        id: "working",
        title: "Jules Working",
    },
    Column {
        id: "review",
        title: "Review Required",
    },
    Column {
        id: "done",
        title: "Done",
    },
];

pub fn column_by_id(id: &str) -> Option<&'static Column> {
    BOARD_COLUMNS.iter().find(|column| column.id == id)
}

/// Column id for a persisted status; `None` is backlog, materialized only
/// here at the presentation boundary.
pub fn column_id_for_status(status: Option<Status>) -> &'static str {
    match status {
        Some(status) => status.as_label_value(),
        None => BACKLOG_COLUMN_ID,
    }
}

/// Projects a raw label set straight onto a column id.
pub fn column_for_labels<'a>(labels: impl IntoIterator<Item = &'a str>) -> &'static str {
    column_id_for_status(status_from_labels(labels))
}
