//! Application state

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::BoxError;
use crate::audit::AuditService;
use crate::auth::{JwtService, RateLimiter};
use crate::config::Config;
use crate::db;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool
    pub pool: SqlitePool,
    pub config: Arc<Config>,
    pub jwt: JwtService,
    /// Rate limiter for the login route
    pub rate_limiter: RateLimiter,
    pub audit: AuditService,
}

impl AppState {
    /// Connect, migrate and seed the bootstrap administrator
    pub async fn new(config: Config) -> Result<Self, BoxError> {
        let pool = db::connect(&config.database_url).await?;
        db::seed_admin(&pool, config.bootstrap_admin.as_ref())
            .await
            .map_err(|e| BoxError::from(e.to_string()))?;
        Ok(Self::with_pool(pool, config))
    }

    /// Build state around an already-migrated pool
    pub fn with_pool(pool: SqlitePool, config: Config) -> Self {
        let jwt = JwtService::new(&config.jwt_secret, config.jwt_expiration_hours);
        Self {
            audit: AuditService::new(pool.clone()),
            pool,
            config: Arc::new(config),
            jwt,
            rate_limiter: RateLimiter::new(),
        }
    }

    /// Today's date in the business timezone
    pub fn today(&self) -> chrono::NaiveDate {
        crate::util::today_in(self.config.business_tz)
    }
}
