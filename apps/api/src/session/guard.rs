use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::clock::Clock;
use crate::storage::{keys, SharedStorage, StorageError};

use super::expiry::{ExpiryWatcher, WatchOutcome};
use super::token::{decode_identity, Identity, TokenError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid session token: {0}")]
    Token(#[from] TokenError),

    #[error("session token is already expired")]
    Expired,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Removes the session keys. With `expected` set, only evicts when the stored token
/// is that exact token. Returns whether anything was evicted.
pub(crate) async fn evict_session(
    storage: &SharedStorage,
    expected: Option<&str>,
) -> Result<bool, StorageError> {
    let _queue = storage.serialize().await;
    let current = storage.backend().get(keys::TOKEN).await?;
    let matches = match (expected, current.as_deref()) {
        (_, None) => false,
        (None, Some(_)) => true,
        (Some(expected), Some(current)) => expected == current,
    };
    if expected.is_none() || matches {
        storage.backend().delete(keys::TOKEN).await?;
        storage.backend().delete(keys::ROLE).await?;
    }
    Ok(matches)
}

/// Owns the session token lifecycle: derive, establish, watch, evict.
///
/// The guard never mints tokens. It stores what the authentication service issued and
/// removes it on logout, expiry or decode failure.
pub struct SessionGuard {
    storage: SharedStorage,
    clock: Arc<dyn Clock>,
    watcher: Mutex<ExpiryWatcher>,
}

impl SessionGuard {
    pub fn new(storage: SharedStorage, clock: Arc<dyn Clock>) -> Self {
        let watcher = Mutex::new(ExpiryWatcher::new(storage.clone()));
        Self {
            storage,
            clock,
            watcher,
        }
    }

    /// Current identity, or `None` when there is no usable session.
    ///
    /// A malformed or expired token is evicted and reported as `None`; only storage
    /// failures surface as errors.
    pub async fn derive_identity(&self) -> Result<Option<Identity>, StorageError> {
        let Some(token) = self.storage.backend().get(keys::TOKEN).await? else {
            return Ok(None);
        };

        match decode_identity(&token) {
            Ok(identity) if identity.is_expired_at(self.clock.now()) => {
                info!("Session for {} expired, evicting", identity.subject);
                evict_session(&self.storage, Some(&token)).await?;
                Ok(None)
            }
            Ok(identity) => Ok(Some(identity)),
            Err(e) => {
                warn!("Stored token is invalid, evicting: {e}");
                evict_session(&self.storage, Some(&token)).await?;
                Ok(None)
            }
        }
    }

    /// Stores a freshly minted token and arms the expiry watcher for it.
    ///
    /// The watcher lock is held across the write, so the last token stored is always
    /// the one being watched.
    pub async fn establish(&self, access_token: &str) -> Result<Identity, SessionError> {
        let identity = decode_identity(access_token)?;
        let now = self.clock.now();
        if identity.is_expired_at(now) {
            return Err(SessionError::Expired);
        }

        let mut watcher = self.watcher.lock().await;
        {
            let _queue = self.storage.serialize().await;
            self.storage
                .backend()
                .set(keys::TOKEN, access_token.to_string())
                .await?;
            self.storage
                .backend()
                .set(keys::ROLE, identity.role.as_str().to_string())
                .await?;
        }
        info!(
            "Session established for {} as {}",
            identity.subject,
            identity.role.as_str()
        );

        watcher
            .watch(access_token.to_string(), identity.remaining_at(now))
            .await?;
        Ok(identity)
    }

    /// Arms the expiry watcher for whatever token is currently stored.
    pub async fn watch_expiry(&self) -> Result<WatchOutcome, StorageError> {
        let mut watcher = self.watcher.lock().await;
        let Some(token) = self.storage.backend().get(keys::TOKEN).await? else {
            watcher.cancel();
            return Ok(WatchOutcome::NoSession);
        };

        match decode_identity(&token) {
            Ok(identity) => {
                let remaining = identity.remaining_at(self.clock.now());
                watcher.watch(token, remaining).await
            }
            Err(e) => {
                warn!("Stored token is invalid, evicting: {e}");
                watcher.cancel();
                evict_session(&self.storage, Some(&token)).await?;
                Ok(WatchOutcome::NoSession)
            }
        }
    }

    /// Ends the session. Calling it without a session is a no-op.
    pub async fn logout(&self) -> Result<(), StorageError> {
        let mut watcher = self.watcher.lock().await;
        watcher.cancel();
        if evict_session(&self.storage, None).await? {
            info!("Logged out");
        }
        Ok(())
    }

    #[cfg(test)]
    pub async fn is_watching(&self) -> bool {
        self.watcher.lock().await.is_armed()
    }
}
