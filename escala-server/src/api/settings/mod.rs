//! Settings API Module

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Settings router
pub fn router() -> Router<AppState> {
    Router::new().route("/api/settings", get(handler::get).put(handler::update))
}
