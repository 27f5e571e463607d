use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

use jules_core::Task;

use crate::reconciler::BoardError;

#[async_trait]
/// Source of authoritative task state for the poller.
pub trait TaskSource: Send + Sync {
    async fn fetch_tasks(&self) -> Result<Vec<Task>, BoardError>;
}

/// Fixed-interval refresh loop for the board's authoritative state.
///
/// Runs an immediate fetch, then one per interval tick. The watch channel is
/// the teardown path: flipping it to `true` (or dropping the sender) stops
/// the loop so no timer outlives the view.
pub struct BoardPoller<S> {
    source: S,
    interval: Duration,
    shutdown: watch::Receiver<bool>,
}

impl<S: TaskSource> BoardPoller<S> {
    pub fn new(source: S, interval: Duration, shutdown: watch::Receiver<bool>) -> Self {
        Self {
            source,
            interval,
            shutdown,
        }
    }

    /// Polls until shutdown, handing each successful snapshot to
    /// `on_refresh`. Failed fetches are logged and skipped; the next tick
    /// retries from scratch.
    pub async fn run<F>(mut self, mut on_refresh: F)
    where
        F: FnMut(Vec<Task>) + Send,
    {
        self.refresh(&mut on_refresh).await;
        loop {
            tokio::select! {
                changed = self.shutdown.changed() => {
                    if changed.is_err() || *self.shutdown.borrow() {
                        break;
                    }
                }
                _ = tokio::time::sleep(self.interval) => {
                    self.refresh(&mut on_refresh).await;
                }
            }
        }
    }

    async fn refresh<F>(&self, on_refresh: &mut F)
    where
        F: FnMut(Vec<Task>) + Send,
    {
        match self.source.fetch_tasks().await {
            Ok(tasks) => on_refresh(tasks),
            Err(error) => {
                tracing::warn!(error = %error, "board refresh failed; keeping previous snapshot");
            }
        }
    }
}
