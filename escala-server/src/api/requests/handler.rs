//! Swap Request API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Datelike;
use serde_json::json;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    AuditAction, CreateSwapRequest, PaginatedResponse, StatusSummary, SummaryQuery, SwapRequest,
    SwapRequestQuery, UpdateStatusRequest, UpdateSwapRequest,
};
use shared::validation::{parse_vigencia, validate_payload, validate_swap_request};

use crate::api::ApiResult;
use crate::audit::AuditEvent;
use crate::auth::{AdminUser, CurrentUser};
use crate::db;
use crate::db::request_query::{Scope, build_list_query};
use crate::state::AppState;

const RESOURCE: &str = "swap_request";

fn scope_for(user: &CurrentUser) -> Scope {
    if user.is_admin() {
        Scope::All
    } else {
        Scope::Submitter(user.id)
    }
}

async fn fetch(state: &AppState, id: i64) -> Result<SwapRequest, AppError> {
    db::swap_requests::find_by_id(&state.pool, id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::RequestNotFound))
}

/// List requests: filters, sort and paging. Encarregados only see their own.
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<SwapRequestQuery>,
) -> ApiResult<PaginatedResponse<SwapRequest>> {
    let list_query = build_list_query(&query, scope_for(&user))?;
    let (rows, total) = db::swap_requests::list(&state.pool, &list_query).await?;
    Ok(Json(PaginatedResponse::new(
        rows,
        total,
        list_query.page,
        list_query.page_size,
    )))
}

/// Create a request (a TROCA also creates its mirror)
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<CreateSwapRequest>,
) -> ApiResult<SwapRequest> {
    let today = state.today();

    if !user.is_admin() {
        let settings = db::settings::get(&state.pool).await?;
        if !settings.is_open_on(today.weekday()) {
            tracing::info!(
                user_id = user.id,
                start = %settings.submission_start_day,
                end = %settings.submission_end_day,
                "Request rejected outside submission window"
            );
            return Err(AppError::new(ErrorCode::SubmissionWindowClosed).into());
        }
    }

    validate_swap_request(&payload, today)?;

    let created = db::swap_requests::create(&state.pool, user.id, &payload).await?;
    let request = created.request;

    state
        .audit
        .log(
            AuditEvent::new(AuditAction::RequestCreated)
                .by(&user)
                .target(RESOURCE, request.id)
                .details(json!({
                    "requestId": request.id,
                    "eventType": request.event_type.as_str(),
                    "employeeIdOut": request.employee_id_out,
                    "employeeIdIn": request.employee_id_in,
                    "mirrorId": created.mirror.as_ref().map(|m| m.id),
                })),
        )
        .await;

    tracing::info!(
        request_id = request.id,
        event_type = request.event_type.as_str(),
        user_id = user.id,
        "Swap request created"
    );
    Ok(Json(request))
}

/// Change status of a request and its related row
pub async fn update_status(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateStatusRequest>,
) -> ApiResult<SwapRequest> {
    validate_payload(&payload)?;

    let existing = fetch(&state, id).await?;
    let updated = db::swap_requests::update(
        &state.pool,
        id,
        Some(payload.status),
        payload.observation.as_deref(),
    )
    .await?;

    state
        .audit
        .log(
            AuditEvent::new(AuditAction::RequestStatusUpdated)
                .by(&admin)
                .target(RESOURCE, id)
                .details(json!({
                    "requestId": id,
                    "oldStatus": existing.status.as_str(),
                    "newStatus": updated.status.as_str(),
                })),
        )
        .await;

    Ok(Json(updated))
}

/// Update observation and/or status
pub async fn update(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateSwapRequest>,
) -> ApiResult<SwapRequest> {
    if payload.status.is_none() && payload.observation.is_none() {
        return Err(AppError::validation("Informe ao menos um campo para atualizar").into());
    }
    validate_payload(&payload)?;

    let existing = fetch(&state, id).await?;
    let updated = db::swap_requests::update(
        &state.pool,
        id,
        payload.status,
        payload.observation.as_deref(),
    )
    .await?;

    let mut fields = Vec::new();
    if payload.status.is_some() {
        fields.push("status");
    }
    if payload.observation.is_some() {
        fields.push("observation");
    }

    state
        .audit
        .log(
            AuditEvent::new(AuditAction::RequestUpdated)
                .by(&admin)
                .target(RESOURCE, id)
                .details(json!({
                    "requestId": id,
                    "fields": fields,
                    "oldStatus": existing.status.as_str(),
                    "newStatus": updated.status.as_str(),
                })),
        )
        .await;

    Ok(Json(updated))
}

/// Delete an own request (and its mirror) while it is still deletable
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    let existing = fetch(&state, id).await?;

    if existing.submitted_by_id != user.id {
        tracing::warn!(request_id = id, user_id = user.id, "Delete attempt by non-owner");
        return Err(AppError::new(ErrorCode::NotRequestOwner).into());
    }
    if !existing.status.is_deletable() {
        return Err(AppError::new(ErrorCode::RequestNotDeletable)
            .with_detail("status", existing.status.as_str())
            .into());
    }

    let deleted = db::swap_requests::delete_pair(&state.pool, id).await?;

    state
        .audit
        .log(
            AuditEvent::new(AuditAction::RequestDeleted)
                .by(&user)
                .target(RESOURCE, id)
                .details(json!({ "requestId": id, "deletedIds": deleted })),
        )
        .await;

    Ok(Json(json!({ "deletedIds": deleted })))
}

/// Distinct vigências, newest first
pub async fn vigencias(State(state): State<AppState>, user: CurrentUser) -> ApiResult<Vec<String>> {
    let rows = db::swap_requests::vigencias(&state.pool, scope_for(&user)).await?;
    Ok(Json(rows))
}

/// Per-status counts of the caller's own requests
pub async fn user_summary(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<SummaryQuery>,
) -> ApiResult<StatusSummary> {
    let vigencia = match query.vigencia.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => {
            let (year, month) = parse_vigencia(v)?;
            Some(format!("{year:04}-{month:02}"))
        }
        _ => None,
    };
    let summary =
        db::swap_requests::summary_for_user(&state.pool, user.id, vigencia.as_deref()).await?;
    Ok(Json(summary))
}
