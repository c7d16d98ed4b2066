//! API routes for escala-server
//!
//! Each resource module exposes a `router()`; authentication and role checks
//! are done by the `CurrentUser` / `AdminUser` extractors in the handlers.

pub mod audit;
pub mod auth;
pub mod health;
pub mod requests;
pub mod settings;
pub mod users;

use axum::routing::get;
use axum::{Json, Router};
use http::{HeaderValue, Method, header};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::ServiceError;
use crate::state::AppState;

/// Handler result: JSON body or a unified error response
pub type ApiResult<T> = Result<Json<T>, ServiceError>;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state);

    Router::new()
        .route("/health", get(health::health_check))
        .merge(auth::router(state.clone()))
        .merge(requests::router())
        .merge(users::router())
        .merge(settings::router())
        .merge(audit::router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    match state.config.cors_origin.as_deref() {
        Some(origin) => match HeaderValue::from_str(origin) {
            Ok(value) => base.allow_origin(AllowOrigin::exact(value)),
            Err(_) => {
                tracing::warn!(origin, "Invalid CORS_ORIGIN, cross-origin requests disabled");
                base
            }
        },
        None if state.config.is_development() => base.allow_origin(Any),
        None => base,
    }
}
