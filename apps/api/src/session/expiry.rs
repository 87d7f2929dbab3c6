use chrono::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::storage::{SharedStorage, StorageError};

use super::guard::evict_session;

/// What arming the watcher did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchOutcome {
    /// No readable session to watch.
    NoSession,
    /// Remaining lifetime was zero or negative; the session is already gone.
    EvictedNow,
    /// A one-shot eviction is pending.
    Scheduled(Duration),
}

/// One-shot deferred eviction for a single token.
///
/// Re-arming or dropping cancels the pending eviction. The eviction only removes the
/// session when the stored token is still the one the watcher was armed for.
pub struct ExpiryWatcher {
    storage: SharedStorage,
    pending: Option<JoinHandle<()>>,
}

impl ExpiryWatcher {
    pub fn new(storage: SharedStorage) -> Self {
        Self {
            storage,
            pending: None,
        }
    }

    pub async fn watch(
        &mut self,
        token: String,
        remaining: Duration,
    ) -> Result<WatchOutcome, StorageError> {
        self.cancel();

        if remaining <= Duration::zero() {
            info!("Session expired on activation, evicting");
            evict_session(&self.storage, Some(&token)).await?;
            return Ok(WatchOutcome::EvictedNow);
        }

        // chrono durations beyond std range cannot occur for a positive remainder
        let delay = remaining.to_std().unwrap_or_default();
        let storage = self.storage.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match evict_session(&storage, Some(&token)).await {
                Ok(true) => info!("Session expired, token evicted"),
                Ok(false) => debug!("Expiry fired for a replaced token, ignoring"),
                Err(e) => tracing::error!("Failed to evict expired session: {e}"),
            }
        }));
        debug!("Expiry eviction scheduled in {}s", remaining.num_seconds());
        Ok(WatchOutcome::Scheduled(remaining))
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    #[cfg(test)]
    pub fn is_armed(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for ExpiryWatcher {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::keys;

    async fn storage_with_token(token: &str) -> SharedStorage {
        let storage = SharedStorage::in_memory();
        storage
            .backend()
            .set(keys::TOKEN, token.to_string())
            .await
            .unwrap();
        storage
    }

    async fn stored_token(storage: &SharedStorage) -> Option<String> {
        storage.backend().get(keys::TOKEN).await.unwrap()
    }

    #[tokio::test]
    async fn test_zero_remaining_evicts_immediately() {
        let storage = storage_with_token("t1").await;
        let mut watcher = ExpiryWatcher::new(storage.clone());

        let outcome = watcher.watch("t1".into(), Duration::zero()).await;
        let outcome = outcome.unwrap();
        assert_eq!(outcome, WatchOutcome::EvictedNow);
        assert!(!watcher.is_armed());
        assert_eq!(stored_token(&storage).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_remaining() {
        let storage = storage_with_token("t1").await;
        let mut watcher = ExpiryWatcher::new(storage.clone());

        let outcome = watcher
            .watch("t1".into(), Duration::seconds(60))
            .await
            .unwrap();
        assert_eq!(outcome, WatchOutcome::Scheduled(Duration::seconds(60)));

        tokio::time::sleep(std::time::Duration::from_secs(59)).await;
        assert_eq!(stored_token(&storage).await.as_deref(), Some("t1"));

        tokio::time::sleep(std::time::Duration::from_secs(2)).await;
        assert_eq!(stored_token(&storage).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_eviction() {
        let storage = storage_with_token("t1").await;
        let mut watcher = ExpiryWatcher::new(storage.clone());
        watcher
            .watch("t1".into(), Duration::seconds(10))
            .await
            .unwrap();

        watcher.cancel();
        tokio::time::sleep(std::time::Duration::from_secs(30)).await;
        assert_eq!(stored_token(&storage).await.as_deref(), Some("t1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_eviction() {
        let storage = storage_with_token("t1").await;
        {
            let mut watcher = ExpiryWatcher::new(storage.clone());
            watcher
                .watch("t1".into(), Duration::seconds(10))
                .await
                .unwrap();
        }
        tokio::time::sleep(std::time::Duration::from_secs(30)).await;
        assert_eq!(stored_token(&storage).await.as_deref(), Some("t1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_watcher_never_evicts_newer_token() {
        let storage = storage_with_token("old").await;
        let mut watcher = ExpiryWatcher::new(storage.clone());
        watcher
            .watch("old".into(), Duration::seconds(10))
            .await
            .unwrap();

        // a fresh login replaced the token without re-arming this watcher
        storage
            .backend()
            .set(keys::TOKEN, "new".to_string())
            .await
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_secs(30)).await;
        assert_eq!(stored_token(&storage).await.as_deref(), Some("new"));
    }
}
