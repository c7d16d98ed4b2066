//! User API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::json;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    AuditAction, Role, UpdateProfileRequest, UpdateUserRequest, UpdateUserStatusRequest, User,
    UserListQuery,
};
use shared::validation::{FieldErrors, MAX_NAME_LEN, validate_payload, validate_required_text};

use crate::api::ApiResult;
use crate::audit::AuditEvent;
use crate::auth::{AdminUser, CurrentUser};
use crate::db;
use crate::security_log;
use crate::state::AppState;
use crate::util::{hash_password, verify_password};

const RESOURCE: &str = "user";

async fn fetch(state: &AppState, id: i64) -> Result<User, AppError> {
    db::users::find_by_id(&state.pool, id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))
}

/// List users (administrators only)
pub async fn list(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<UserListQuery>,
) -> ApiResult<Vec<User>> {
    let users = db::users::list(&state.pool, &query).await?;
    Ok(Json(users))
}

/// Change own name and/or password
pub async fn update_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<User> {
    if payload.name.is_none() && payload.new_password.is_none() {
        return Err(AppError::validation("Informe ao menos um campo para atualizar").into());
    }
    validate_payload(&payload)?;

    let name = payload.name.as_deref().map(str::trim);
    if let Some(name) = name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }

    let password_hash = match payload.new_password.as_deref() {
        Some(new_password) => {
            let Some(current) = payload.current_password.as_deref() else {
                let mut errors = FieldErrors::new();
                errors.add("currentPassword", "Senha atual é obrigatória");
                return Err(errors.into());
            };
            let stored = db::users::find_password_hash(&state.pool, user.id)
                .await?
                .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
            if !verify_password(current, &stored) {
                security_log!("WARN", "password_change_rejected", user_id = user.id);
                return Err(AppError::new(ErrorCode::CurrentPasswordInvalid).into());
            }
            let hash = hash_password(new_password)
                .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;
            Some(hash)
        }
        None => None,
    };

    let updated =
        db::users::update_profile(&state.pool, user.id, name, password_hash.as_deref()).await?;

    if name.is_some() {
        state
            .audit
            .log(
                AuditEvent::new(AuditAction::UserUpdated)
                    .by(&user)
                    .target(RESOURCE, user.id)
                    .details(json!({ "targetLogin": updated.login, "fields": ["name"] })),
            )
            .await;
    }
    if password_hash.is_some() {
        state
            .audit
            .log(
                AuditEvent::new(AuditAction::PasswordChanged)
                    .by(&user)
                    .target(RESOURCE, user.id),
            )
            .await;
    }

    Ok(Json(updated))
}

/// Admin update of another user's name and/or role
pub async fn update(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<User> {
    if payload.name.is_none() && payload.role.is_none() {
        return Err(AppError::validation("Informe ao menos um campo para atualizar").into());
    }
    validate_payload(&payload)?;

    let name = payload.name.as_deref().map(str::trim);
    if let Some(name) = name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }

    if id == admin.id && payload.role.is_some_and(|r| r != Role::Administrador) {
        security_log!("WARN", "self_demotion", user_id = admin.id);
        return Err(AppError::new(ErrorCode::CannotModifySelf).into());
    }

    fetch(&state, id).await?;
    let updated = db::users::update(&state.pool, id, name, payload.role).await?;

    let mut fields = Vec::new();
    if name.is_some() {
        fields.push("name");
    }
    if payload.role.is_some() {
        fields.push("role");
    }

    state
        .audit
        .log(
            AuditEvent::new(AuditAction::UserUpdated)
                .by(&admin)
                .target(RESOURCE, id)
                .details(json!({
                    "targetLogin": updated.login,
                    "userId": id,
                    "fields": fields,
                })),
        )
        .await;

    Ok(Json(updated))
}

/// Activate or deactivate another user
pub async fn update_status(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserStatusRequest>,
) -> ApiResult<User> {
    if id == admin.id {
        security_log!("WARN", "self_status_change", user_id = admin.id);
        return Err(AppError::new(ErrorCode::CannotModifySelf).into());
    }

    fetch(&state, id).await?;
    let updated = db::users::set_active(&state.pool, id, payload.is_active).await?;

    state
        .audit
        .log(
            AuditEvent::new(AuditAction::UserStatusChanged)
                .by(&admin)
                .target(RESOURCE, id)
                .details(json!({
                    "targetLogin": updated.login,
                    "userId": id,
                    "isActive": updated.is_active,
                })),
        )
        .await;

    tracing::info!(user_id = id, is_active = updated.is_active, "User status changed");
    Ok(Json(updated))
}
