use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::auth_client::{LoginRequest, RegisterRequest};
use crate::errors::AppError;
use crate::session::{Identity, Role, SessionError, LOGIN_PATH};
use crate::state::AppState;

const LOGIN_FAILED: &str = "Invalid email or password.";
const REGISTER_FAILED: &str = "Error registering user.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub authenticated: bool,
    pub identity: Option<Identity>,
    /// Where the client should navigate next.
    pub redirect: &'static str,
}

impl SessionResponse {
    fn from_identity(identity: Option<Identity>) -> Self {
        let redirect = identity
            .as_ref()
            .map_or(LOGIN_PATH, |who| who.role.dashboard_path());
        Self {
            authenticated: identity.is_some(),
            identity,
            redirect,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// GET /login
pub async fn handle_login_page(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "login": "POST /login {email, password}",
        "register": "POST /register {name, email, password, role}",
        "authService": state.config.auth_api_url
    }))
}

/// POST /login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let identity = login_and_establish(&state, &req, LOGIN_FAILED).await?;
    Ok(Json(SessionResponse::from_identity(Some(identity))))
}

/// POST /register
/// Registers with the auth service, then logs straight in.
pub async fn handle_register(
    State(state): State<AppState>,
    Json(form): Json<RegisterForm>,
) -> Result<Json<SessionResponse>, AppError> {
    let request = RegisterRequest {
        name: form.name,
        email: form.email,
        password: form.password,
        role: form.role,
    };
    state.auth.register(&request).await.map_err(|e| {
        warn!("Registration failed: {e}");
        AppError::Auth(REGISTER_FAILED.to_string())
    })?;
    info!("Registered {} as {}", request.email, request.role.as_str());

    let login = LoginRequest {
        email: request.email,
        password: request.password,
    };
    let identity = login_and_establish(&state, &login, REGISTER_FAILED).await?;
    Ok(Json(SessionResponse::from_identity(Some(identity))))
}

/// POST /logout
pub async fn handle_logout(State(state): State<AppState>) -> Result<Response, AppError> {
    state.session.logout().await?;
    Ok(Redirect::to(LOGIN_PATH).into_response())
}

/// GET /session
pub async fn handle_session(
    State(state): State<AppState>,
) -> Result<Json<SessionResponse>, AppError> {
    let identity = state.session.derive_identity().await?;
    Ok(Json(SessionResponse::from_identity(identity)))
}

async fn login_and_establish(
    state: &AppState,
    req: &LoginRequest,
    failure: &str,
) -> Result<Identity, AppError> {
    let issued = state.auth.login(req).await.map_err(|e| {
        warn!("Login failed for {}: {e}", req.email);
        AppError::Auth(failure.to_string())
    })?;

    let identity = state
        .session
        .establish(&issued.access_token)
        .await
        .map_err(|e| match e {
            SessionError::Storage(e) => AppError::Storage(e),
            other => {
                warn!("Auth service issued an unusable token: {other}");
                AppError::Auth(failure.to_string())
            }
        })?;

    if let Some(role) = issued.role.filter(|r| r != identity.role.as_str()) {
        warn!(
            "Login response role '{role}' disagrees with token role '{}', using the token",
            identity.role.as_str()
        );
    }
    Ok(identity)
}
