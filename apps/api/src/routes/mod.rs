pub mod auth;
pub mod candidate;
pub mod health;
pub mod recruiter;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use crate::session::{require_candidate, require_recruiter};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    // Candidate views: role `candidate`
    let candidate = Router::new()
        .route("/dashboard/candidate", get(candidate::handle_dashboard))
        .route(
            "/dashboard/candidate/profile",
            get(candidate::handle_profile).put(candidate::handle_save_profile),
        )
        .route(
            "/dashboard/candidate/profile/experience",
            post(candidate::handle_add_experience),
        )
        .route(
            "/dashboard/candidate/profile/experience/:id",
            delete(candidate::handle_remove_experience),
        )
        .route(
            "/dashboard/candidate/profile/education",
            post(candidate::handle_add_education),
        )
        .route(
            "/dashboard/candidate/profile/education/:id",
            delete(candidate::handle_remove_education),
        )
        .route(
            "/dashboard/candidate/applications",
            get(candidate::handle_applications),
        )
        .route(
            "/dashboard/candidate/applications/:id",
            delete(candidate::handle_withdraw),
        )
        .route("/dashboard/candidate/job/:id", get(candidate::handle_job))
        .route(
            "/dashboard/candidate/job/:id/apply",
            post(candidate::handle_apply),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_candidate,
        ));

    // Recruiter views: role `recruiter`
    let recruiter = Router::new()
        .route("/dashboard/recruiter", get(recruiter::handle_dashboard))
        .route(
            "/dashboard/recruiter/create-job",
            post(recruiter::handle_create_job),
        )
        .route(
            "/dashboard/recruiter/job/:id",
            get(recruiter::handle_job)
                .put(recruiter::handle_update_job)
                .delete(recruiter::handle_delete_job),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_recruiter,
        ));

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/login",
            get(auth::handle_login_page).post(auth::handle_login),
        )
        .route("/register", post(auth::handle_register))
        .route("/logout", post(auth::handle_logout))
        .route("/session", get(auth::handle_session))
        .merge(candidate)
        .merge(recruiter)
        .with_state(state)
}


#[cfg(test)]
mod tests {
    use super::testing::{self, NOW};
    use crate::session::{Role, LOGIN_PATH};
    use crate::storage::keys;
    use axum::http::StatusCode;

    const GUARDED: &[(&str, Role)] = &[
        ("/dashboard/candidate", Role::Candidate),
        ("/dashboard/candidate/profile", Role::Candidate),
        ("/dashboard/candidate/applications", Role::Candidate),
        ("/dashboard/candidate/job/1", Role::Candidate),
        ("/dashboard/recruiter", Role::Recruiter),
        ("/dashboard/recruiter/job/1", Role::Recruiter),
    ];

    fn other(role: Role) -> Role {
        match role {
            Role::Candidate => Role::Recruiter,
            Role::Recruiter => Role::Candidate,
        }
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let (app, _) = testing::app();
        let (status, body) = testing::get(&app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_every_guarded_view_redirects_without_session() {
        let (app, _) = testing::app();
        for (path, _) in GUARDED {
            let (status, location) = testing::get_with_location(&app, path).await;
            assert_eq!(status, StatusCode::SEE_OTHER, "{path}");
            assert_eq!(location.as_deref(), Some(LOGIN_PATH), "{path}");
        }
    }

    #[tokio::test]
    async fn test_every_guarded_view_enforces_its_role() {
        let (app, storage) = testing::app();
        for (path, role) in GUARDED {
            testing::sign_in(&storage, other(*role)).await;
            let (status, location) = testing::get_with_location(&app, path).await;
            assert_eq!(status, StatusCode::SEE_OTHER, "{path}");
            assert_eq!(location.as_deref(), Some(LOGIN_PATH), "{path}");

            testing::sign_in(&storage, *role).await;
            let (status, _) = testing::get(&app, path).await;
            assert_eq!(status, StatusCode::OK, "{path}");
        }
    }

    #[tokio::test]
    async fn test_mutating_routes_are_guarded_too() {
        let (app, storage) = testing::app();
        testing::sign_in(&storage, Role::Candidate).await;

        let (status, _) = testing::send_json(
            &app,
            "POST",
            "/dashboard/recruiter/create-job",
            serde_json::json!({}),
        )
        .await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(
            testing::delete(&app, "/dashboard/recruiter/job/1").await,
            StatusCode::SEE_OTHER
        );
        assert!(storage
            .backend()
            .get(keys::RECRUITER_JOBS)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_expired_session_is_evicted_and_redirected() {
        let (app, storage) = testing::app();
        testing::sign_in_until(&storage, Role::Candidate, NOW).await;

        let (status, location) = testing::get_with_location(&app, "/dashboard/candidate").await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some(LOGIN_PATH));
        assert!(storage.backend().get(keys::TOKEN).await.unwrap().is_none());
        assert!(storage.backend().get(keys::ROLE).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_logout_then_guarded_view_redirects() {
        let (app, storage) = testing::app();
        testing::sign_in(&storage, Role::Recruiter).await;
        let (status, _) = testing::get(&app, "/dashboard/recruiter").await;
        assert_eq!(status, StatusCode::OK);

        testing::post_empty(&app, "/logout").await;
        let (status, location) = testing::get_with_location(&app, "/dashboard/recruiter").await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some(LOGIN_PATH));
    }
}
