use std::sync::Arc;

use crate::auth_client::AuthClient;
use crate::clock::Clock;
use crate::config::Config;
use crate::records::{ApplicationBook, JobBoard, ProfileStore};
use crate::session::SessionGuard;
use crate::storage::SharedStorage;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub session: Arc<SessionGuard>,
    pub auth: AuthClient,
    pub jobs: JobBoard,
    pub applications: ApplicationBook,
    pub profile: ProfileStore,
}

impl AppState {
    /// Wires every accessor to the same storage origin and clock.
    pub fn new(
        config: Config,
        storage: SharedStorage,
        clock: Arc<dyn Clock>,
        auth: AuthClient,
    ) -> Self {
        Self {
            session: Arc::new(SessionGuard::new(storage.clone(), clock.clone())),
            jobs: JobBoard::new(storage.clone(), clock.clone(), config.job_edit_policy),
            applications: ApplicationBook::new(storage.clone(), clock.clone()),
            profile: ProfileStore::new(storage, clock),
            auth,
            config,
        }
    }
}
