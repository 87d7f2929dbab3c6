//! Auth client: the only caller of the external authentication service.
//!
//! The service owns credentials and mints tokens; this side only forwards the
//! login/register forms and hands the returned token to the session guard.
//! Failures are reported once, never retried.
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::session::Role;

const REQUEST_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Error)]
pub enum AuthClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("auth service rejected the request (status {status}): {message}")]
    Rejected { status: u16, message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    /// Echo of the token's role claim. The token stays authoritative.
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Clone)]
pub struct AuthClient {
    client: Client,
    base_url: String,
}

impl AuthClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, AuthClientError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, AuthClientError> {
        let response = self
            .client
            .post(format!("{}/login", self.base_url))
            .json(request)
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let body: LoginResponse = response.json().await?;
        debug!("Auth service issued a token for {}", request.email);
        Ok(body)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<(), AuthClientError> {
        let response = self
            .client
            .post(format!("{}/register", self.base_url))
            .json(request)
            .send()
            .await?;
        ensure_success(response).await?;
        debug!("Auth service registered {}", request.email);
        Ok(())
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, AuthClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    warn!("Auth service returned {status}: {message}");
    Err(AuthClientError::Rejected {
        status: status.as_u16(),
        message,
    })
}
