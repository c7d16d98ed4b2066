//! User API Module

mod handler;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::state::AppState;

/// User router
pub fn router() -> Router<AppState> {
    Router::new().nest("/api/users", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list).patch(handler::update_profile))
        .route("/{id}", patch(handler::update))
        .route("/{id}/status", patch(handler::update_status))
}
