//! Shared types for the Escala service
//!
//! Wire/domain models, the unified error model, validation rules and audit
//! formatting. Free of any storage or HTTP server logic so that clients can
//! depend on it directly.

pub mod audit;
pub mod error;
pub mod models;
pub mod util;
pub mod validation;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, ErrorCode, ErrorResponse};
pub use models::PaginatedResponse;
