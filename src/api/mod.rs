pub mod auth;
pub mod crud;
pub mod dashboard;
pub mod error;
pub mod health;
pub mod navigation;
pub mod report;
pub mod user;

use axum::{
    Router,
    routing::{get, post},
};

use crate::domain::Resource;
use crate::infrastructure::AppState;

pub fn api_router(state: AppState) -> Router {
    let mut router = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Auth
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        // Shell
        .route("/navigation", get(navigation::navigation))
        .route("/dashboard", get(dashboard::dashboard))
        .route("/screens/:resource", get(crud::describe))
        // Reports
        .route("/students/:id/report", get(report::student_report))
        // Users
        .route("/users/:id/password", post(user::reset_password));

    // Entity screens
    for resource in Resource::ALL {
        router = router.merge(crud::routes(*resource));
    }

    router.with_state(state)
}
