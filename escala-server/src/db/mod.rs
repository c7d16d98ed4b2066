//! Database Module
//!
//! SQLite connection pool, embedded migrations and bootstrap seeding.
//! Repositories are plain async functions over `&SqlitePool`.

pub mod audit;
pub mod request_query;
pub mod settings;
pub mod swap_requests;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use shared::models::Role;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};

use crate::BoxError;
use crate::config::BootstrapAdmin;
use crate::error::ServiceResult;
use crate::util::hash_password;

/// Open the pool and apply migrations.
///
/// In-memory URLs get a single long-lived connection, since every SQLite
/// connection to `:memory:` is its own database.
pub async fn connect(database_url: &str) -> Result<SqlitePool, BoxError> {
    let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");

    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| format!("Invalid DATABASE_URL: {e}"))?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    let options = if in_memory {
        options
    } else {
        options
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
    };

    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    let pool = pool_options
        .connect_with(options)
        .await
        .map_err(|e| format!("Failed to open database: {e}"))?;
    tracing::info!(in_memory, "Database connection established");

    migrate(&pool).await?;
    Ok(pool)
}

pub async fn migrate(pool: &SqlitePool) -> Result<(), BoxError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| format!("Failed to apply migrations: {e}"))?;
    tracing::info!("Database migrations applied");
    Ok(())
}

/// Create the first administrator when the database has none.
///
/// Returns `true` if a user was created.
pub async fn seed_admin(pool: &SqlitePool, admin: Option<&BootstrapAdmin>) -> ServiceResult<bool> {
    if users::count_active_admins(pool).await? > 0 {
        return Ok(false);
    }

    let Some(admin) = admin else {
        tracing::warn!(
            "No administrator exists; set ADMIN_LOGIN and ADMIN_PASSWORD to create one at startup"
        );
        return Ok(false);
    };

    let password_hash = hash_password(&admin.password)
        .map_err(|e| BoxError::from(format!("Failed to hash admin password: {e}")))?;
    let user = users::create(
        pool,
        users::NewUser {
            name: admin.name.trim(),
            login: admin.login.trim(),
            password_hash: &password_hash,
            role: Role::Administrador,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, login = %user.login, "Bootstrap administrator created");
    Ok(true)
}
