//! Unified error system for the Escala service
//!
//! - [`ErrorCode`]: numeric codes shared with clients
//! - [`ErrorCategory`]: classification by code range
//! - [`AppError`]: code + message + optional details, rendered as [`ErrorResponse`]
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ErrorResponse};
//!
//! let err = AppError::validation("Matrícula inválida").with_detail("field", "employeeIdOut");
//!
//! let body = ErrorResponse::from(&err);
//! assert_eq!(body.code, ErrorCode::ValidationFailed);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::ErrorCode;
pub use types::{AppError, ErrorResponse};
