use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use jules_core::RepoRef;

#[derive(Default)]
/// Keyed mutex serializing label read-modify-write cycles per issue.
///
/// GitHub can deliver two webhooks for the same issue back to back (a close
/// and an approving comment, say); without this, their read-modify-write
/// cycles interleave and the last writer silently wins. Lock entries are
/// small and never evicted; the key space is bounded by issues actually
/// touched during the process lifetime.
pub struct IssueLockMap {
    locks: Mutex<HashMap<(String, u64), Arc<Mutex<()>>>>,
}

impl IssueLockMap {
    /// Acquires the write lock for `(repo, issue_number)`, creating it on
    /// first use.
    pub async fn acquire(&self, repo: &RepoRef, issue_number: u64) -> OwnedMutexGuard<()> {
        let entry = {
            let mut locks = self.locks.lock().await;
            locks
                .entry((repo.full_name().to_string(), issue_number))
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        entry.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::IssueLockMap;
    use jules_core::RepoRef;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn functional_same_issue_waits_for_the_held_lock() {
        let locks = Arc::new(IssueLockMap::default());
        let repo = RepoRef::parse("octo/board").expect("repo");

        let guard = locks.acquire(&repo, 5).await;
        let contended = {
            let locks = locks.clone();
            let repo = repo.clone();
            tokio::spawn(async move { locks.acquire(&repo, 5).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contended.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), contended)
            .await
            .expect("lock should be released")
            .expect("acquire task");
    }

    #[tokio::test]
    async fn unit_distinct_issues_do_not_contend() {
        let locks = IssueLockMap::default();
        let repo = RepoRef::parse("octo/board").expect("repo");
        let other_repo = RepoRef::parse("octo/other").expect("repo");

        let _first = locks.acquire(&repo, 5).await;
        let _second = locks.acquire(&repo, 6).await;
        let _third = locks.acquire(&other_repo, 5).await;
    }
}
