//! Data models
//!
//! Wire types shared by the server and any client.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod audit;
pub mod settings;
pub mod swap_request;
pub mod user;

// Re-exports
pub use audit::*;
pub use settings::*;
pub use swap_request::*;
pub use user::*;
