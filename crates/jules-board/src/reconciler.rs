use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use jules_core::{RepoRef, Task};

use crate::columns::{column_by_id, column_for_labels, BACKLOG_COLUMN_ID, READY_COLUMN_ID};

#[derive(Debug, Error)]
/// Failures raised by board-side operations.
pub enum BoardError {
    #[error("failed to fetch board tasks: {0}")]
    Fetch(String),
    #[error("assignment failed: {0}")]
    Assignment(String),
}

#[async_trait]
/// Seam through which a move into Ready assigns the agent account.
pub trait AssignmentBackend: Send + Sync {
    async fn assign(
        &self,
        repository: &RepoRef,
        issue_number: u64,
        assignee: &str,
    ) -> Result<(), BoardError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// User-visible effects of a board interaction.
pub enum BoardNotification {
    TaskMoved {
        task_id: i64,
        column_title: String,
    },
    TaskAssigned {
        issue_number: u64,
        assignee: String,
    },
    AssignmentFailed {
        issue_number: u64,
        detail: String,
    },
}

/// Optimistic drag-and-drop state machine over the task→column mapping.
///
/// The mapping here is never a second source of truth: every successful
/// authoritative fetch rebuilds it wholesale from label state, erasing any
/// optimistic overlay that survived in between.
pub struct OptimisticBoardReconciler<B> {
    backend: B,
    bot_login: String,
    mapping: HashMap<i64, &'static str>,
}

impl<B: AssignmentBackend> OptimisticBoardReconciler<B> {
    pub fn new(backend: B, bot_login: impl Into<String>) -> Self {
        Self {
            backend,
            bot_login: bot_login.into(),
            mapping: HashMap::new(),
        }
    }

    /// Rebuilds the mapping from label truth after a successful fetch.
    pub fn apply_authoritative(&mut self, tasks: &[Task]) {
        self.mapping = tasks
            .iter()
            .map(|task| (task.id, column_for_labels(task.label_names())))
            .collect();
    }

    pub fn column_of(&self, task_id: i64) -> &'static str {
        self.mapping
            .get(&task_id)
            .copied()
            .unwrap_or(BACKLOG_COLUMN_ID)
    }

    /// Applies a drag-end move optimistically, then reconciles.
    ///
    /// The move lands in the mapping (and a move notification fires) before
    /// any network traffic. Dropping the task into Ready triggers the
    /// assignment mutation; a failed assignment reverts the mapping to its
    /// pre-drag column and raises exactly one failure notification.
    pub async fn handle_drag_end(
        &mut self,
        task: &Task,
        target_column_id: &str,
    ) -> Vec<BoardNotification> {
        let Some(column) = column_by_id(target_column_id) else {
            return Vec::new();
        };
        let previous = self.column_of(task.id);
        if previous == column.id {
            return Vec::new();
        }

        self.mapping.insert(task.id, column.id);
        let mut notifications = vec![BoardNotification::TaskMoved {
            task_id: task.id,
            column_title: column.title.to_string(),
        }];

        if column.id == READY_COLUMN_ID {
            match self
                .backend
                .assign(&task.repository, task.number, &self.bot_login)
                .await
            {
                Ok(()) => notifications.push(BoardNotification::TaskAssigned {
                    issue_number: task.number,
                    assignee: self.bot_login.clone(),
                }),
                Err(error) => {
                    self.mapping.insert(task.id, previous);
                    notifications.push(BoardNotification::AssignmentFailed {
                        issue_number: task.number,
                        detail: error.to_string(),
                    });
                }
            }
        }

        notifications
    }
}
