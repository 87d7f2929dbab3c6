//! Bearer token decoding.
//!
//! The token is a JWT minted by the external authentication service. Only the payload
//! is read: the signature is NOT verified here. The decoded identity drives view
//! routing only and is never an authorization of record.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Candidate,
    Recruiter,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Candidate => "candidate",
            Role::Recruiter => "recruiter",
        }
    }

    /// Landing view for a freshly authenticated user of this role.
    pub fn dashboard_path(self) -> &'static str {
        match self {
            Role::Candidate => "/dashboard/candidate",
            Role::Recruiter => "/dashboard/recruiter",
        }
    }
}

/// Who the current session belongs to. Derived from the token on every guarded request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub subject: String,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

impl Identity {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn remaining_at(&self, now: DateTime<Utc>) -> Duration {
        self.expires_at - now
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token must have three dot-separated segments, found {0}")]
    Segments(usize),

    #[error("payload is not base64url: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("payload claims are invalid: {0}")]
    Claims(#[from] serde_json::Error),

    #[error("token carries neither an 'email' nor a 'sub' claim")]
    MissingSubject,

    #[error("expiry {0} is out of range")]
    Expiry(i64),
}

#[derive(Debug, Deserialize)]
struct Claims {
    exp: i64,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    sub: Option<String>,
    role: Role,
}

/// Decodes `{exp, email | sub, role}` from a JWT payload without checking the signature.
pub fn decode_identity(token: &str) -> Result<Identity, TokenError> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != 3 {
        return Err(TokenError::Segments(segments.len()));
    }

    let payload = URL_SAFE_NO_PAD.decode(segments[1].trim_end_matches('='))?;
    let claims: Claims = serde_json::from_slice(&payload)?;

    let subject = claims
        .email
        .or(claims.sub)
        .filter(|s| !s.trim().is_empty())
        .ok_or(TokenError::MissingSubject)?;
    let expires_at = Utc
        .timestamp_opt(claims.exp, 0)
        .single()
        .ok_or(TokenError::Expiry(claims.exp))?;

    Ok(Identity {
        subject,
        role: claims.role,
        expires_at,
    })
}

/// Builds an unsigned JWT-shaped token for tests.
#[cfg(test)]
pub fn unsigned_token(claims: serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.signature")
}
