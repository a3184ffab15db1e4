/// Application routes configuration
use crate::handlers::{
    get_state, health, index, randomize, randomize_api, select_date, AppState,
};
use axum::{
    routing::{get, post},
    Router,
};

/// Build the application router with all routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health))
        // Viewer page
        .route("/", get(index))
        .route("/randomize", post(randomize))
        // JSON surface
        .route("/api/state", get(get_state))
        .route("/api/randomize", post(randomize_api))
        .route("/api/select", post(select_date))
        .with_state(state)
}
