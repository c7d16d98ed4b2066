//! Audit Log API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde_json::Value;
use shared::audit::format_audit_entry;
use shared::error::AppError;
use shared::models::{AuditAction, AuditLogEntry, AuditQuery, PaginatedResponse};

use crate::api::ApiResult;
use crate::auth::AdminUser;
use crate::db;
use crate::db::audit::{AuditFilter, AuditRow};
use crate::db::request_query::page_params;
use crate::state::AppState;
use crate::util::{day_end_millis, day_start_millis};

fn to_entry(row: AuditRow) -> AuditLogEntry {
    let action = AuditAction::from(row.action);
    let details = serde_json::from_str(&row.details).unwrap_or_else(|e| {
        tracing::warn!(id = row.id, error = %e, "Audit details are not valid JSON");
        Value::String(row.details.clone())
    });
    let description = format_audit_entry(&action, &details, row.user_login.as_deref());

    AuditLogEntry {
        id: row.id,
        timestamp: row.timestamp,
        action,
        details,
        user_id: row.user_id,
        user_login: row.user_login,
        target_resource_id: row.target_resource_id,
        target_resource_type: row.target_resource_type,
        description,
    }
}

/// Audit entries, newest first. `from`/`to` are inclusive business-timezone dates.
pub async fn list(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<AuditQuery>,
) -> ApiResult<PaginatedResponse<AuditLogEntry>> {
    if let (Some(from), Some(to)) = (query.from, query.to)
        && from > to
    {
        return Err(AppError::validation("Data inicial deve ser anterior à data final").into());
    }

    let tz = state.config.business_tz;
    let (page, page_size) = page_params(query.page, query.page_size);
    let filter = AuditFilter {
        action: query.action.as_ref().map(|a| a.as_str().to_owned()),
        user_id: query.user_id,
        from: query.from.map(|d| day_start_millis(d, tz)),
        to_exclusive: query.to.map(|d| day_end_millis(d, tz)),
        limit: page_size as i64,
        offset: (page as i64 - 1) * page_size as i64,
    };

    let (rows, total) = db::audit::query(&state.pool, &filter).await?;
    let entries = rows.into_iter().map(to_entry).collect();
    Ok(Json(PaginatedResponse::new(entries, total, page, page_size)))
}
