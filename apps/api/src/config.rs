use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::records::jobs::JobEditPolicy;

/// Application configuration loaded from environment variables.
/// Every variable has a default so a bare `cargo run` serves a local board.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Directory holding `storage.json`, the persisted key/value origin.
    pub data_dir: PathBuf,
    /// Base URL of the external authentication service (`/login`, `/register`).
    pub auth_api_url: String,
    pub job_edit_policy: JobEditPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            data_dir: std::env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
            auth_api_url: std::env::var("AUTH_API_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            job_edit_policy: parse_edit_policy(std::env::var("PERSIST_JOB_EDITS").ok())?,
        })
    }

    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join("storage.json")
    }
}

fn parse_edit_policy(raw: Option<String>) -> Result<JobEditPolicy> {
    let Some(raw) = raw else {
        return Ok(JobEditPolicy::LogOnly);
    };
    let persist = raw
        .trim()
        .parse::<bool>()
        .with_context(|| format!("PERSIST_JOB_EDITS must be 'true' or 'false', got '{raw}'"))?;
    Ok(if persist {
        JobEditPolicy::Persist
    } else {
        JobEditPolicy::LogOnly
    })
}
