use std::marker::PhantomData;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::storage::{SharedStorage, StorageError};

use super::RecordError;

/// Typed list accessor over one storage key.
///
/// Mutations are whole-collection read-modify-write under the storage queue.
pub struct Collection<T> {
    storage: SharedStorage,
    key: &'static str,
    _records: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            key: self.key,
            _records: PhantomData,
        }
    }
}

impl<T: Serialize + DeserializeOwned> Collection<T> {
    pub fn new(storage: SharedStorage, key: &'static str) -> Self {
        Self {
            storage,
            key,
            _records: PhantomData,
        }
    }

    /// Stored records. Missing or unreadable data loads as an empty list.
    pub async fn load(&self) -> Result<Vec<T>, StorageError> {
        let raw = self.storage.backend().get(self.key).await?;
        let records = raw.map(|raw| parse_list(self.key, &raw));
        Ok(records.unwrap_or_default())
    }

    /// Loads, applies `change`, and writes the full list back if `change` succeeds.
    pub async fn update<R>(
        &self,
        change: impl FnOnce(&mut Vec<T>) -> Result<R, RecordError>,
    ) -> Result<R, RecordError> {
        let _queue = self.storage.serialize().await;
        let mut records = self.load().await?;
        let out = change(&mut records)?;
        self.write(&records).await?;
        Ok(out)
    }

    pub async fn append(&self, record: T) -> Result<(), RecordError> {
        self.update(|records| {
            records.push(record);
            Ok(())
        })
        .await
    }

    async fn write(&self, records: &[T]) -> Result<(), RecordError> {
        let body = serde_json::to_string(records)?;
        self.storage.backend().set(self.key, body).await?;
        Ok(())
    }
}

/// Parses a stored list, dropping entries whose shape does not match `T`.
fn parse_list<T: DeserializeOwned>(key: &str, raw: &str) -> Vec<T> {
    let values: Vec<Value> = match serde_json::from_str(raw) {
        Ok(values) => values,
        Err(e) => {
            warn!("Stored '{key}' is not a JSON list, treating as empty: {e}");
            return Vec::new();
        }
    };

    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping malformed '{key}' entry #{index}: {e}");
                None
            }
        })
        .collect()
}

/// Typed single-object accessor over one storage key.
pub struct Document<T> {
    storage: SharedStorage,
    key: &'static str,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for Document<T> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            key: self.key,
            _record: PhantomData,
        }
    }
}

impl<T: Serialize + DeserializeOwned> Document<T> {
    pub fn new(storage: SharedStorage, key: &'static str) -> Self {
        Self {
            storage,
            key,
            _record: PhantomData,
        }
    }

    /// Stored object, or `None` when absent or unreadable.
    pub async fn load(&self) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.storage.backend().get(self.key).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                warn!("Stored '{}' is unreadable, ignoring: {e}", self.key);
                Ok(None)
            }
        }
    }

    /// Overwrites the stored object wholesale.
    pub async fn save(&self, record: &T) -> Result<(), RecordError> {
        let _queue = self.storage.serialize().await;
        self.write(record).await
    }

    /// Read-modify-write starting from `fallback()` when nothing usable is stored.
    pub async fn update<R>(
        &self,
        fallback: impl FnOnce() -> T,
        change: impl FnOnce(&mut T) -> Result<R, RecordError>,
    ) -> Result<R, RecordError> {
        let _queue = self.storage.serialize().await;
        let mut record = self.load().await?.unwrap_or_else(fallback);
        let out = change(&mut record)?;
        self.write(&record).await?;
        Ok(out)
    }

    async fn write(&self, record: &T) -> Result<(), RecordError> {
        let body = serde_json::to_string(record)?;
        self.storage.backend().set(self.key, body).await?;
        Ok(())
    }
}
