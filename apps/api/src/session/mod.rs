// Session guard: derives identity from the stored bearer token, gates role-specific
// views and evicts the token on logout, expiry or decode failure.

pub mod expiry;
pub mod guard;
pub mod route;
pub mod token;

pub use guard::{SessionError, SessionGuard};
pub use route::{require_candidate, require_recruiter, LOGIN_PATH};
pub use token::{Identity, Role};
