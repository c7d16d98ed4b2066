//! Escala Server - shift swap request service
//!
//! # Module layout
//!
//! ```text
//! escala-server/src/
//! ├── config.rs     # environment configuration
//! ├── state.rs      # shared application state
//! ├── error.rs      # service-layer error
//! ├── auth/         # JWT, extractors, login rate limiting
//! ├── audit.rs      # best-effort audit writer
//! ├── db/           # SQLite repositories and migrations
//! └── api/          # HTTP routes and handlers
//! ```

pub mod api;
pub mod audit;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod state;
pub mod util;

pub use api::create_router;
pub use auth::{AdminUser, CurrentUser};
pub use config::Config;
pub use error::{ServiceError, ServiceResult};
pub use state::AppState;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

// Security logging macro
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Initialize tracing: `RUST_LOG` filter, JSON lines in production.
pub fn init_logger(json: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "escala_server=info,tower_http=info,security=info".into());

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
