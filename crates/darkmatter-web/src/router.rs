//! Axum router — maps all URL paths to handlers.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    services::ServeDir,
    cors::CorsLayer,
    trace::TraceLayer,
    compression::CompressionLayer,
};
use std::path::Path;
use std::sync::Arc;
use crate::state::{AppState, SharedState};
use crate::handlers::{
    auth::{
        forgot_password_page, forgot_password_submit, login_page, login_submit, logout,
        signup_page, signup_submit,
    },
    fold::{download, fold_page, fold_submit},
    home::home,
    system::health,
};

/// Build and return the full Axum router.
pub fn build_router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        // Pages
        .route("/",                get(home))
        .route("/login",           get(login_page).post(login_submit))
        .route("/signup",          get(signup_page).post(signup_submit))
        .route("/forgot-password", get(forgot_password_page).post(forgot_password_submit))
        .route("/logout",          post(logout))
        .route("/fold",            get(fold_page).post(fold_submit))
        .route("/fold/download",   get(download))

        // Probes
        .route("/health",          get(health))

        // Static files
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))

        // Middleware
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
