//! Board-side projection of label truth: columns, the optimistic
//! drag-and-drop reconciler, and the authoritative refresh poller.
//!
//! Nothing in this crate is durable. The column mapping is a disposable
//! cache rebuilt from labels on every successful fetch; optimistic moves are
//! transient overlays that the next refresh overwrites.

mod columns;
mod poller;
mod reconciler;

pub use columns::{
    column_by_id, column_id_for_status, column_for_labels, Column, BOARD_COLUMNS,
    BACKLOG_COLUMN_ID, READY_COLUMN_ID,
};
pub use poller::{BoardPoller, TaskSource};
pub use reconciler::{
    AssignmentBackend, BoardError, BoardNotification, OptimisticBoardReconciler,
};
