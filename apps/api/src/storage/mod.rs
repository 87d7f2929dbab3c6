//! Storage: the key/value origin every screen reads and writes.
//!
//! Values are opaque strings (JSON for collections, the raw token for `token`).
//! `SharedStorage` adds the mutation queue: every read-modify-write in this process
//! runs under one async mutex, so writes from concurrent requests are strictly ordered.
//! Writers in *other* processes sharing the same file are not coordinated; the last
//! full-collection write wins.

pub mod file;
#[cfg(test)]
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard};

pub use file::FileStore;
#[cfg(test)]
pub use memory::MemoryStore;

/// Fixed keys of the persisted state layout.
pub mod keys {
    pub const TOKEN: &str = "token";
    /// Legacy redundant copy of the token's role claim.
    pub const ROLE: &str = "role";
    pub const RECRUITER_JOBS: &str = "recruiterJobs";
    pub const CANDIDATE_APPLICATIONS: &str = "candidateApplications";
    pub const CANDIDATE_PROFILE: &str = "candidateProfile";
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// String-keyed get/set/delete, the only capability the rest of the crate needs.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
    /// Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// A `KeyValueStore` handle plus the process-wide mutation queue.
#[derive(Clone)]
pub struct SharedStorage {
    backend: Arc<dyn KeyValueStore>,
    queue: Arc<Mutex<()>>,
}

impl SharedStorage {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            queue: Arc::new(Mutex::new(())),
        }
    }

    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::default()))
    }

    pub fn backend(&self) -> &dyn KeyValueStore {
        self.backend.as_ref()
    }

    /// Holds the mutation queue for the lifetime of the guard.
    pub async fn serialize(&self) -> MutexGuard<'_, ()> {
        self.queue.lock().await
    }
}
