use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::clock::Clock;
use crate::storage::{keys, SharedStorage, StorageError};

use super::collection::Document;
use super::ids::next_id;
use super::models::{clean_list, CandidateProfile, EducationEntry, ExperienceEntry};
use super::seed::default_profile;
use super::RecordError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExperienceDraft {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EducationDraft {
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub year: String,
}

/// The single candidate profile of this storage origin.
#[derive(Clone)]
pub struct ProfileStore {
    profile: Document<CandidateProfile>,
    clock: Arc<dyn Clock>,
}

impl ProfileStore {
    pub fn new(storage: SharedStorage, clock: Arc<dyn Clock>) -> Self {
        Self {
            profile: Document::new(storage, keys::CANDIDATE_PROFILE),
            clock,
        }
    }

    /// Stored profile, or the default one when nothing usable is stored.
    pub async fn load(&self) -> Result<CandidateProfile, StorageError> {
        Ok(self.profile.load().await?.unwrap_or_else(default_profile))
    }

    /// Replaces the stored profile wholesale.
    pub async fn save(
        &self,
        mut profile: CandidateProfile,
    ) -> Result<CandidateProfile, RecordError> {
        profile.skills = clean_list(profile.skills);
        self.profile.save(&profile).await?;
        info!("Profile saved for {}", profile.email);
        Ok(profile)
    }

    pub async fn add_experience(
        &self,
        draft: ExperienceDraft,
    ) -> Result<ExperienceEntry, RecordError> {
        let now_millis = self.clock.now().timestamp_millis();
        self.profile
            .update(default_profile, move |profile| {
                let entry = ExperienceEntry {
                    id: next_id(profile.experience.iter().map(|e| e.id), now_millis)?,
                    role: draft.role,
                    company: draft.company,
                    duration: draft.duration,
                    description: draft.description,
                };
                profile.experience.push(entry.clone());
                Ok(entry)
            })
            .await
    }

    pub async fn remove_experience(&self, id: u64) -> Result<(), RecordError> {
        self.profile
            .update(default_profile, |profile| {
                let before = profile.experience.len();
                profile.experience.retain(|e| e.id != id);
                if profile.experience.len() == before {
                    return Err(RecordError::NotFound(format!("Experience {id} not found")));
                }
                Ok(())
            })
            .await
    }

    pub async fn add_education(
        &self,
        draft: EducationDraft,
    ) -> Result<EducationEntry, RecordError> {
        let now_millis = self.clock.now().timestamp_millis();
        self.profile
            .update(default_profile, move |profile| {
                let entry = EducationEntry {
                    id: next_id(profile.education.iter().map(|e| e.id), now_millis)?,
                    degree: draft.degree,
                    institution: draft.institution,
                    year: draft.year,
                };
                profile.education.push(entry.clone());
                Ok(entry)
            })
            .await
    }

    pub async fn remove_education(&self, id: u64) -> Result<(), RecordError> {
        self.profile
            .update(default_profile, |profile| {
                let before = profile.education.len();
                profile.education.retain(|e| e.id != id);
                if profile.education.len() == before {
                    return Err(RecordError::NotFound(format!("Education {id} not found")));
                }
                Ok(())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn store(storage: &SharedStorage) -> ProfileStore {
        ProfileStore::new(
            storage.clone(),
            Arc::new(ManualClock::at_secs(1_750_000_000)),
        )
    }

    async fn stored(storage: &SharedStorage) -> Option<String> {
        storage.backend().get(keys::CANDIDATE_PROFILE).await.unwrap()
    }

    #[tokio::test]
    async fn test_first_load_returns_defaults_without_writing() {
        let storage = SharedStorage::in_memory();
        let profile = store(&storage).load().await.unwrap();
        assert_eq!(profile, default_profile());
        assert_eq!(stored(&storage).await, None);
    }

    #[tokio::test]
    async fn test_save_overwrites_wholesale() {
        let storage = SharedStorage::in_memory();
        let store = store(&storage);

        let mut profile = default_profile();
        profile.full_name = "Jane Doe".to_string();
        profile.experience.clear();
        profile.skills = vec![" Rust ".to_string(), "".to_string()];
        store.save(profile).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.full_name, "Jane Doe");
        assert!(loaded.experience.is_empty());
        assert_eq!(loaded.skills, vec!["Rust"]);
    }

    #[tokio::test]
    async fn test_unreadable_profile_falls_back_to_defaults() {
        let storage = SharedStorage::in_memory();
        storage
            .backend()
            .set(keys::CANDIDATE_PROFILE, "{\"fullName\": 7}".to_string())
            .await
            .unwrap();
        assert_eq!(store(&storage).load().await.unwrap(), default_profile());
    }

    #[tokio::test]
    async fn test_experience_entries_get_unique_ids() {
        let storage = SharedStorage::in_memory();
        let store = store(&storage);

        let a = store.add_experience(Default::default()).await.unwrap();
        let b = store.add_experience(Default::default()).await.unwrap();
        assert_ne!(a.id, b.id);

        let profile = store.load().await.unwrap();
        // two default entries plus the two added
        assert_eq!(profile.experience.len(), 4);

        store.remove_experience(a.id).await.unwrap();
        let profile = store.load().await.unwrap();
        let ids: Vec<u64> = profile.experience.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, b.id]);
        assert!(matches!(
            store.remove_experience(a.id).await,
            Err(RecordError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_education_add_and_remove() {
        let storage = SharedStorage::in_memory();
        let store = store(&storage);
        let added = store
            .add_education(EducationDraft {
                degree: "M.S. Computer Science".to_string(),
                institution: "Tech University".to_string(),
                year: "2020".to_string(),
            })
            .await
            .unwrap();

        store.remove_education(1).await.unwrap();
        let profile = store.load().await.unwrap();
        assert_eq!(profile.education, vec![added]);
    }
}
