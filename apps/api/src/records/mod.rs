// Local record store: typed collections over the key/value origin.
// Seed jobs are an immutable catalog; every mutation goes to the stored overlay
// through whole-collection read-modify-write.

pub mod applications;
pub mod collection;
pub mod ids;
pub mod jobs;
pub mod models;
pub mod profile;
pub mod search;
pub mod seed;

use thiserror::Error;

use crate::storage::StorageError;

pub use applications::{ApplicationBook, ApplicationForm};
pub use jobs::{JobBoard, JobDraft, JobEditPolicy};
pub use profile::{EducationDraft, ExperienceDraft, ProfileStore};

#[derive(Debug, Error)]
pub enum RecordError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Failed to encode records: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Job {0} is part of the built-in catalog and cannot be changed")]
    SeedImmutable(u64),

    #[error("No ids left above the largest stored id")]
    IdsExhausted,
}
