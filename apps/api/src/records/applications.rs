use std::sync::Arc;

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::clock::Clock;
use crate::storage::{keys, SharedStorage};

use super::collection::Collection;
use super::models::{Application, JobPosting};
use super::RecordError;

pub const MISSING_FIELDS_MESSAGE: &str = "Please fill all required fields and upload your resume";

/// Candidate application form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub cover_letter: String,
    #[serde(default)]
    pub resume_file_name: String,
    #[serde(default, rename = "linkedIn")]
    pub linked_in: String,
    #[serde(default)]
    pub portfolio: String,
}

impl ApplicationForm {
    fn validate(&self) -> Result<(), RecordError> {
        let required = [&self.full_name, &self.email, &self.resume_file_name];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(RecordError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
        }
        Ok(())
    }
}

/// The candidate's submitted applications.
#[derive(Clone)]
pub struct ApplicationBook {
    applications: Collection<Application>,
    clock: Arc<dyn Clock>,
}

impl ApplicationBook {
    pub fn new(storage: SharedStorage, clock: Arc<dyn Clock>) -> Self {
        Self {
            applications: Collection::new(storage, keys::CANDIDATE_APPLICATIONS),
            clock,
        }
    }

    /// Validates and appends. An invalid form writes nothing.
    pub async fn submit(
        &self,
        job: &JobPosting,
        form: ApplicationForm,
    ) -> Result<Application, RecordError> {
        form.validate()?;

        let application = Application {
            id: Uuid::new_v4(),
            job_id: job.id,
            job_title: job.title.clone(),
            full_name: form.full_name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: form.phone,
            cover_letter: form.cover_letter,
            resume_file_name: form.resume_file_name.trim().to_string(),
            linked_in: form.linked_in,
            portfolio: form.portfolio,
            applied_at: self.clock.now(),
        };
        self.applications.append(application.clone()).await?;
        info!(
            "Application {} submitted for job {}",
            application.id, job.id
        );
        Ok(application)
    }

    /// All applications in submission order. Legacy entries without an id get one
    /// assigned and persisted here.
    pub async fn list(&self) -> Result<Vec<Application>, RecordError> {
        let applications = self.applications.load().await?;
        if applications.iter().all(|a| !a.id.is_nil()) {
            return Ok(applications);
        }

        self.applications
            .update(|applications| {
                for application in applications.iter_mut().filter(|a| a.id.is_nil()) {
                    application.id = Uuid::new_v4();
                }
                Ok(applications.clone())
            })
            .await
    }

    /// Withdraws by stable id.
    pub async fn withdraw(&self, id: Uuid) -> Result<Application, RecordError> {
        let removed = self
            .applications
            .update(|applications| {
                let index = applications
                    .iter()
                    .position(|a| a.id == id && !id.is_nil())
                    .ok_or_else(|| RecordError::NotFound(format!("Application {id} not found")))?;
                Ok(applications.remove(index))
            })
            .await?;
        info!("Application {id} withdrawn");
        Ok(removed)
    }
}
