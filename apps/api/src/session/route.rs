//! Route protection: every guarded view names exactly one required role.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::json;
use tracing::debug;

use crate::errors::AppError;
use crate::state::AppState;

use super::token::{Identity, Role};

pub const LOGIN_PATH: &str = "/login";

/// Progress of identity resolution for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Pending,
    Resolved(Option<Identity>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Neutral placeholder: neither the protected content nor a redirect.
    Loading,
    Render(Identity),
    Redirect(&'static str),
}

pub fn decide(resolution: Resolution, required: Role) -> RouteDecision {
    match resolution {
        Resolution::Pending => RouteDecision::Loading,
        Resolution::Resolved(Some(identity)) if identity.role == required => {
            RouteDecision::Render(identity)
        }
        Resolution::Resolved(_) => RouteDecision::Redirect(LOGIN_PATH),
    }
}

pub async fn require_candidate(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    guard_request(state, Role::Candidate, request, next).await
}

pub async fn require_recruiter(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    guard_request(state, Role::Recruiter, request, next).await
}

async fn guard_request(
    state: AppState,
    required: Role,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let resolution = Resolution::Resolved(state.session.derive_identity().await?);

    match decide(resolution, required) {
        RouteDecision::Render(identity) => {
            request.extensions_mut().insert(identity);
            Ok(next.run(request).await)
        }
        RouteDecision::Redirect(to) => {
            debug!(
                "Redirecting {} to {to}: no {} session",
                request.uri().path(),
                required.as_str()
            );
            Ok(Redirect::to(to).into_response())
        }
        RouteDecision::Loading => {
            let body = Json(json!({ "status": "loading" }));
            Ok((StatusCode::ACCEPTED, body).into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn identity(role: Role) -> Identity {
        Identity {
            subject: "jane@example.com".to_string(),
            role,
            expires_at: Utc.timestamp_opt(1_900_000_000, 0).single().unwrap(),
        }
    }

    #[test]
    fn test_pending_never_renders_or_redirects() {
        for role in [Role::Candidate, Role::Recruiter] {
            assert_eq!(decide(Resolution::Pending, role), RouteDecision::Loading);
        }
    }

    #[test]
    fn test_absent_identity_redirects_to_login() {
        assert_eq!(
            decide(Resolution::Resolved(None), Role::Candidate),
            RouteDecision::Redirect(LOGIN_PATH)
        );
    }

    #[test]
    fn test_role_mismatch_redirects_to_login() {
        assert_eq!(
            decide(
                Resolution::Resolved(Some(identity(Role::Candidate))),
                Role::Recruiter
            ),
            RouteDecision::Redirect(LOGIN_PATH)
        );
        assert_eq!(
            decide(
                Resolution::Resolved(Some(identity(Role::Recruiter))),
                Role::Candidate
            ),
            RouteDecision::Redirect(LOGIN_PATH)
        );
    }

    #[test]
    fn test_matching_role_renders() {
        let who = identity(Role::Recruiter);
        assert_eq!(
            decide(Resolution::Resolved(Some(who.clone())), Role::Recruiter),
            RouteDecision::Render(who)
        );
    }
}
