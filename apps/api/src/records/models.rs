use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRequirements {
    #[serde(default)]
    pub age: String,
    /// Ordered as entered by the recruiter.
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub location: String,
    pub salary: String,
    #[serde(default)]
    pub requirements: JobRequirements,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    /// Nil for entries written before stable ids existed; replaced on first listing.
    #[serde(default = "Uuid::nil")]
    pub id: Uuid,
    /// Not checked against the job collection; the job may since have been deleted.
    pub job_id: u64,
    pub job_title: String,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub cover_letter: String,
    pub resume_file_name: String,
    #[serde(default, rename = "linkedIn")]
    pub linked_in: String,
    #[serde(default)]
    pub portfolio: String,
    pub applied_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub id: u64,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub id: u64,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub year: String,
}

/// One profile per storage origin, not per user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub resume_name: String,
    #[serde(default, rename = "linkedIn")]
    pub linked_in: String,
    #[serde(default)]
    pub portfolio: String,
    #[serde(default)]
    pub github: String,
}

/// A list field that arrives either as a JSON array or as the comma-separated text
/// the forms produce. Entries are trimmed and blanks dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListInput(pub Vec<String>);

impl<'de> Deserialize<'de> for ListInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            List(Vec<String>),
        }

        let items = match Raw::deserialize(deserializer)? {
            Raw::Text(text) => text.split(',').map(str::to_string).collect(),
            Raw::List(items) => items,
        };
        Ok(ListInput(clean_list(items)))
    }
}

pub fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
