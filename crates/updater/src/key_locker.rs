//! Per-vehicle serialisation of record handling.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Hands out one async lock per tracker id.
///
/// Entries are removed when the last guard for a key is dropped.
#[derive(Clone, Default)]
pub struct KeyLocker {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl KeyLocker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`.
    pub async fn lock(&self, key: &str) -> KeyGuard {
        let entry = Arc::clone(
            self.inner
                .locks
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        );

        let guard = entry.lock_owned().await;
        KeyGuard { key: key.to_string(), inner: Arc::clone(&self.inner), _guard: guard }
    }

    fn len(&self) -> usize {
        self.inner.locks.len()
    }
}

impl std::fmt::Debug for KeyLocker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyLocker").field("held", &self.len()).finish()
    }
}

/// Releases the key's lock on drop.
pub struct KeyGuard {
    key: String,
    inner: Arc<Inner>,
    _guard: OwnedMutexGuard<()>,
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        // the map holds one reference and this guard's mutex another
        self.inner
            .locks
            .remove_if(&self.key, |_, existing| Arc::strong_count(existing) <= 2);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn same_key_serialised() {
        let locker = KeyLocker::new();
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..4 {
            let locker = locker.clone();
            let active = Arc::clone(&active);
            let peak = Arc::clone(&peak);
            tasks.spawn(async move {
                let _guard = locker.lock("1832").await;
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                active.fetch_sub(1, Ordering::SeqCst);
            });
        }
        while tasks.join_next().await.is_some() {}

        assert_eq!(peak.load(Ordering::SeqCst), 1);
        assert_eq!(locker.len(), 0);
    }

    #[tokio::test]
    async fn different_keys_independent() {
        let locker = KeyLocker::new();
        let _first = locker.lock("1832").await;
        let second = tokio::time::timeout(Duration::from_secs(1), locker.lock("2170")).await;

        assert!(second.is_ok());
        assert_eq!(locker.len(), 2);
    }

    #[tokio::test]
    async fn entry_removed_after_release() {
        let locker = KeyLocker::new();
        drop(locker.lock("1832").await);
        assert_eq!(locker.len(), 0);
    }
}
