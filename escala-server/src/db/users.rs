//! User Repository

use shared::error::{AppError, ErrorCode};
use shared::models::{Role, User, UserListQuery};
use sqlx::SqlitePool;

use crate::error::{ServiceError, ServiceResult};

const USER_COLUMNS: &str = "id, name, login, role, is_active, created_at, updated_at";

pub struct NewUser<'a> {
    pub name: &'a str,
    pub login: &'a str,
    pub password_hash: &'a str,
    pub role: Role,
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    #[sqlx(flatten)]
    user: User,
    password_hash: String,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> ServiceResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// User plus stored password hash, for login and password changes.
/// Login lookup is case-insensitive (`COLLATE NOCASE` on the column).
pub async fn find_credentials(
    pool: &SqlitePool,
    login: &str,
) -> ServiceResult<Option<(User, String)>> {
    let row = sqlx::query_as::<_, CredentialRow>(&format!(
        "SELECT {USER_COLUMNS}, password_hash FROM users WHERE login = ?"
    ))
    .bind(login)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|r| (r.user, r.password_hash)))
}

pub async fn find_password_hash(pool: &SqlitePool, id: i64) -> ServiceResult<Option<String>> {
    let hash = sqlx::query_scalar::<_, String>("SELECT password_hash FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(hash)
}

pub async fn list(pool: &SqlitePool, query: &UserListQuery) -> ServiceResult<Vec<User>> {
    let mut sql = format!("SELECT {USER_COLUMNS} FROM users WHERE 1 = 1");
    if query.role.is_some() {
        sql.push_str(" AND role = ?");
    }
    if query.is_active.is_some() {
        sql.push_str(" AND is_active = ?");
    }
    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{}%", escape_like(s)));
    if search.is_some() {
        sql.push_str(" AND (name LIKE ? ESCAPE '\\' OR login LIKE ? ESCAPE '\\')");
    }
    sql.push_str(" ORDER BY name COLLATE NOCASE ASC, id ASC");

    let mut q = sqlx::query_as::<_, User>(&sql);
    if let Some(role) = query.role {
        q = q.bind(role);
    }
    if let Some(active) = query.is_active {
        q = q.bind(active);
    }
    if let Some(pattern) = &search {
        q = q.bind(pattern.clone()).bind(pattern.clone());
    }
    Ok(q.fetch_all(pool).await?)
}

/// Escape LIKE wildcards so user input matches literally
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

pub async fn create(pool: &SqlitePool, new: NewUser<'_>) -> ServiceResult<User> {
    let now = shared::util::now_millis();
    let result = sqlx::query(
        "INSERT INTO users (name, login, password_hash, role, is_active, created_at, updated_at) VALUES (?, ?, ?, ?, 1, ?, ?)",
    )
    .bind(new.name)
    .bind(new.login)
    .bind(new.password_hash)
    .bind(new.role)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(ServiceError::from);

    let result = match result {
        Ok(r) => r,
        Err(e) if e.is_unique_violation() => {
            return Err(AppError::with_message(
                ErrorCode::UserLoginExists,
                format!("Login {} já está em uso", new.login),
            )
            .into());
        }
        Err(e) => return Err(e),
    };

    fetch(pool, result.last_insert_rowid()).await
}

/// Update own name and/or password hash
pub async fn update_profile(
    pool: &SqlitePool,
    id: i64,
    name: Option<&str>,
    password_hash: Option<&str>,
) -> ServiceResult<User> {
    sqlx::query(
        "UPDATE users SET name = COALESCE(?, name), password_hash = COALESCE(?, password_hash), updated_at = ? WHERE id = ?",
    )
    .bind(name)
    .bind(password_hash)
    .bind(shared::util::now_millis())
    .bind(id)
    .execute(pool)
    .await?;
    fetch(pool, id).await
}

/// Admin update of name and/or role
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    name: Option<&str>,
    role: Option<Role>,
) -> ServiceResult<User> {
    sqlx::query(
        "UPDATE users SET name = COALESCE(?, name), role = COALESCE(?, role), updated_at = ? WHERE id = ?",
    )
    .bind(name)
    .bind(role)
    .bind(shared::util::now_millis())
    .bind(id)
    .execute(pool)
    .await?;
    fetch(pool, id).await
}

pub async fn set_active(pool: &SqlitePool, id: i64, is_active: bool) -> ServiceResult<User> {
    sqlx::query("UPDATE users SET is_active = ?, updated_at = ? WHERE id = ?")
        .bind(is_active)
        .bind(shared::util::now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    fetch(pool, id).await
}

pub async fn count_active_admins(pool: &SqlitePool) -> ServiceResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM users WHERE role = 'ADMINISTRADOR' AND is_active = 1",
    )
    .fetch_one(pool)
    .await?;
    Ok(count)
}

async fn fetch(pool: &SqlitePool, id: i64) -> ServiceResult<User> {
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound).into())
}
