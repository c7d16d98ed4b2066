//! Audit Log API Module

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Audit log router (administrators only)
pub fn router() -> Router<AppState> {
    Router::new().route("/api/audit", get(handler::list))
}
