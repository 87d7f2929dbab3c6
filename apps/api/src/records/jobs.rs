//! Job postings: immutable seed catalog plus the recruiter-created overlay.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::clock::Clock;
use crate::storage::{keys, SharedStorage, StorageError};

use super::collection::Collection;
use super::ids::next_id;
use super::models::{JobPosting, JobRequirements, ListInput};
use super::seed::seed_jobs;
use super::RecordError;

/// Whether recruiter edits to a stored job are written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobEditPolicy {
    /// Edits are logged and echoed back, storage is untouched.
    #[default]
    LogOnly,
    Persist,
}

/// Create/edit form for a job posting.
#[derive(Debug, Clone, Deserialize)]
pub struct JobDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub salary: String,
    #[serde(default)]
    pub age: Option<String>,
    #[serde(default)]
    pub skills: ListInput,
    #[serde(default)]
    pub deadline: String,
    #[serde(default)]
    pub tags: ListInput,
}

impl JobDraft {
    fn into_posting(self, id: u64) -> Result<JobPosting, RecordError> {
        let missing: Vec<&str> = [
            ("title", &self.title),
            ("description", &self.description),
            ("location", &self.location),
            ("salary", &self.salary),
            ("deadline", &self.deadline),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();
        if !missing.is_empty() {
            return Err(RecordError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        let Ok(deadline) = NaiveDate::parse_from_str(self.deadline.trim(), "%Y-%m-%d") else {
            return Err(RecordError::Validation(format!(
                "Deadline '{}' must be a date (YYYY-MM-DD)",
                self.deadline
            )));
        };

        Ok(JobPosting {
            id,
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            location: self.location.trim().to_string(),
            salary: self.salary.trim().to_string(),
            requirements: JobRequirements {
                age: self
                    .age
                    .map(|a| a.trim().to_string())
                    .filter(|a| !a.is_empty())
                    .unwrap_or_else(|| "18+".to_string()),
                skills: self.skills.0,
            },
            deadline,
            tags: self.tags.0,
        })
    }
}

fn not_found(id: u64) -> RecordError {
    RecordError::NotFound(format!("Job {id} not found"))
}

/// Result of an edit: the edited view, and whether it reached storage.
#[derive(Debug, Clone, Serialize)]
pub struct JobEdit {
    pub job: JobPosting,
    pub persisted: bool,
}

#[derive(Clone)]
pub struct JobBoard {
    seed: Arc<[JobPosting]>,
    overlay: Collection<JobPosting>,
    clock: Arc<dyn Clock>,
    edit_policy: JobEditPolicy,
}

impl JobBoard {
    pub fn new(storage: SharedStorage, clock: Arc<dyn Clock>, edit_policy: JobEditPolicy) -> Self {
        Self {
            seed: seed_jobs().into(),
            overlay: Collection::new(storage, keys::RECRUITER_JOBS),
            clock,
            edit_policy,
        }
    }

    pub fn is_seed(&self, id: u64) -> bool {
        self.seed.iter().any(|job| job.id == id)
    }

    /// Seed jobs followed by stored jobs, in storage order.
    ///
    /// A stored job whose id repeats a seed or earlier stored id is dropped.
    pub async fn load_all(&self) -> Result<Vec<JobPosting>, StorageError> {
        let stored = self.overlay.load().await?;
        let mut seen: HashSet<u64> = self.seed.iter().map(|job| job.id).collect();
        let mut jobs = self.seed.to_vec();
        for job in stored {
            if seen.insert(job.id) {
                jobs.push(job);
            } else {
                warn!("Ignoring stored job with duplicate id {}", job.id);
            }
        }
        Ok(jobs)
    }

    pub async fn find(&self, id: u64) -> Result<Option<JobPosting>, StorageError> {
        if let Some(job) = self.seed.iter().find(|job| job.id == id) {
            return Ok(Some(job.clone()));
        }
        let stored = self.overlay.load().await?;
        Ok(stored.into_iter().find(|job| job.id == id))
    }

    pub async fn create(&self, draft: JobDraft) -> Result<JobPosting, RecordError> {
        // validate before taking the queue so bad forms never touch storage
        let mut job = draft.into_posting(0)?;
        let now_millis = self.clock.now().timestamp_millis();
        let seed_ids: Vec<u64> = self.seed.iter().map(|j| j.id).collect();

        let job = self
            .overlay
            .update(move |jobs| {
                let existing = seed_ids.into_iter().chain(jobs.iter().map(|j| j.id));
                job.id = next_id(existing, now_millis)?;
                jobs.push(job.clone());
                Ok(job)
            })
            .await?;
        info!("Created job {} '{}'", job.id, job.title);
        Ok(job)
    }

    /// Deletes a stored job. Seed jobs cannot be deleted.
    pub async fn remove(&self, id: u64) -> Result<JobPosting, RecordError> {
        if self.is_seed(id) {
            return Err(RecordError::SeedImmutable(id));
        }
        let removed = self
            .overlay
            .update(|jobs| {
                let index = jobs
                    .iter()
                    .position(|job| job.id == id)
                    .ok_or_else(|| not_found(id))?;
                Ok(jobs.remove(index))
            })
            .await?;
        info!("Deleted job {id}");
        Ok(removed)
    }

    /// Applies an edit according to the configured `JobEditPolicy`.
    pub async fn update(&self, id: u64, draft: JobDraft) -> Result<JobEdit, RecordError> {
        if self.is_seed(id) {
            return Err(RecordError::SeedImmutable(id));
        }
        let edited = draft.into_posting(id)?;

        match self.edit_policy {
            JobEditPolicy::LogOnly => {
                if self.find(id).await?.is_none() {
                    return Err(not_found(id));
                }
                info!("Job {id} edit not persisted (log-only policy): {edited:?}");
                Ok(JobEdit {
                    job: edited,
                    persisted: false,
                })
            }
            JobEditPolicy::Persist => {
                let job = self
                    .overlay
                    .update(move |jobs| {
                        let slot = jobs
                            .iter_mut()
                            .find(|job| job.id == id)
                            .ok_or_else(|| not_found(id))?;
                        *slot = edited.clone();
                        Ok(edited)
                    })
                    .await?;
                info!("Updated job {id}");
                Ok(JobEdit {
                    job,
                    persisted: true,
                })
            }
        }
    }
}
