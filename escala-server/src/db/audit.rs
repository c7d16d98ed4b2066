//! Audit log operations

use sqlx::SqlitePool;

use crate::error::ServiceResult;

/// Row to append
#[derive(Debug, Clone)]
pub struct NewAuditLog<'a> {
    pub timestamp: i64,
    pub action: &'a str,
    pub details: &'a serde_json::Value,
    pub user_id: Option<i64>,
    pub user_login: Option<&'a str>,
    pub target_resource_id: Option<&'a str>,
    pub target_resource_type: Option<&'a str>,
}

pub async fn insert(pool: &SqlitePool, entry: &NewAuditLog<'_>) -> ServiceResult<i64> {
    let result = sqlx::query(
        "INSERT INTO audit_logs (timestamp, action, details, user_id, user_login, target_resource_id, target_resource_type) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(entry.timestamp)
    .bind(entry.action)
    .bind(entry.details.to_string())
    .bind(entry.user_id)
    .bind(entry.user_login)
    .bind(entry.target_resource_id)
    .bind(entry.target_resource_type)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

/// Stored audit row (details still as JSON text)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AuditRow {
    pub id: i64,
    pub timestamp: i64,
    pub action: String,
    pub details: String,
    pub user_id: Option<i64>,
    pub user_login: Option<String>,
    pub target_resource_id: Option<String>,
    pub target_resource_type: Option<String>,
}

/// Filter for `query`; time bounds are Unix millis, `to_exclusive` is exclusive
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub action: Option<String>,
    pub user_id: Option<i64>,
    pub from: Option<i64>,
    pub to_exclusive: Option<i64>,
    pub limit: i64,
    pub offset: i64,
}

/// Newest-first page of audit rows plus the total count
pub async fn query(pool: &SqlitePool, filter: &AuditFilter) -> ServiceResult<(Vec<AuditRow>, u64)> {
    let mut where_sql = String::from("WHERE 1 = 1");
    if filter.action.is_some() {
        where_sql.push_str(" AND action = ?");
    }
    if filter.user_id.is_some() {
        where_sql.push_str(" AND user_id = ?");
    }
    if filter.from.is_some() {
        where_sql.push_str(" AND timestamp >= ?");
    }
    if filter.to_exclusive.is_some() {
        where_sql.push_str(" AND timestamp < ?");
    }

    let count_sql = format!("SELECT COUNT(*) FROM audit_logs {where_sql}");
    let mut count = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(action) = &filter.action {
        count = count.bind(action.clone());
    }
    if let Some(user_id) = filter.user_id {
        count = count.bind(user_id);
    }
    if let Some(from) = filter.from {
        count = count.bind(from);
    }
    if let Some(to) = filter.to_exclusive {
        count = count.bind(to);
    }
    let total = count.fetch_one(pool).await?;

    let data_sql = format!(
        "SELECT id, timestamp, action, details, user_id, user_login, target_resource_id, target_resource_type \
         FROM audit_logs {where_sql} ORDER BY timestamp DESC, id DESC LIMIT ? OFFSET ?"
    );
    let mut data = sqlx::query_as::<_, AuditRow>(&data_sql);
    if let Some(action) = &filter.action {
        data = data.bind(action.clone());
    }
    if let Some(user_id) = filter.user_id {
        data = data.bind(user_id);
    }
    if let Some(from) = filter.from {
        data = data.bind(from);
    }
    if let Some(to) = filter.to_exclusive {
        data = data.bind(to);
    }
    let rows = data
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(pool)
        .await?;

    Ok((rows, total.max(0) as u64))
}
