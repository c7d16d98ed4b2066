//! Authentication Routes

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::rate_limit::login_rate_limit;
use crate::state::AppState;

/// - /api/auth/login: public, rate limited per client IP
/// - /api/auth/me: any authenticated user
/// - /api/auth/register: administrators
pub fn router(state: AppState) -> Router<AppState> {
    let login = Router::new()
        .route("/api/auth/login", post(handler::login))
        .layer(middleware::from_fn_with_state(state, login_rate_limit));

    Router::new()
        .route("/api/auth/me", get(handler::me))
        .route("/api/auth/register", post(handler::register))
        .merge(login)
}
