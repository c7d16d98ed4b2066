//! Swap Request API Module

mod handler;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::state::AppState;

/// Swap request router
pub fn router() -> Router<AppState> {
    Router::new().nest("/api/requests", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/vigencias", get(handler::vigencias))
        .route("/summary/user", get(handler::user_summary))
        .route("/{id}", patch(handler::update).delete(handler::delete))
        .route("/{id}/status", patch(handler::update_status))
}
