//! Authentication Handlers

use axum::{Json, extract::State};
use serde_json::json;
use shared::error::{AppError, ErrorCode};
use shared::models::{AuditAction, LoginRequest, LoginResponse, RegisterUserRequest, User};
use shared::validation::{
    MAX_LOGIN_LEN, MAX_NAME_LEN, validate_payload, validate_required_text,
};

use crate::api::ApiResult;
use crate::audit::AuditEvent;
use crate::auth::{AdminUser, CurrentUser};
use crate::db;
use crate::security_log;
use crate::state::AppState;
use crate::util::{hash_password, verify_password};

/// Authenticate credentials and issue a JWT
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let login = req.login.trim();

    let credentials = db::users::find_credentials(&state.pool, login).await?;

    // Same error for unknown login and wrong password
    let user = match credentials {
        Some((user, hash)) if verify_password(&req.password, &hash) => user,
        _ => {
            state
                .audit
                .log(
                    AuditEvent::new(AuditAction::LoginFailed)
                        .actor(None, login)
                        .details(json!({ "login": login, "reason": "invalid_credentials" })),
                )
                .await;
            security_log!("WARN", "login_failed", login = login);
            return Err(AppError::invalid_credentials().into());
        }
    };

    if !user.is_active {
        state
            .audit
            .log(
                AuditEvent::new(AuditAction::LoginFailed)
                    .actor(Some(user.id), &user.login)
                    .target("user", user.id)
                    .details(json!({ "login": login, "reason": "account_disabled" })),
            )
            .await;
        security_log!("WARN", "login_inactive", user_id = user.id);
        return Err(AppError::new(ErrorCode::AccountDisabled).into());
    }

    let token = state
        .jwt
        .generate_token(&user)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    state
        .audit
        .log(
            AuditEvent::new(AuditAction::LoginSuccess)
                .actor(Some(user.id), &user.login)
                .target("user", user.id),
        )
        .await;

    tracing::info!(user_id = user.id, login = %user.login, role = %user.role, "User logged in");

    Ok(Json(LoginResponse { token, user }))
}

/// Current user, fresh from the database
pub async fn me(State(state): State<AppState>, current: CurrentUser) -> ApiResult<User> {
    let user = db::users::find_by_id(&state.pool, current.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(Json(user))
}

/// Create a user (administrators only)
pub async fn register(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(req): Json<RegisterUserRequest>,
) -> ApiResult<User> {
    validate_payload(&req)?;
    validate_required_text(&req.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&req.login, "login", MAX_LOGIN_LEN)?;

    let password_hash = hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;

    let user = db::users::create(
        &state.pool,
        db::users::NewUser {
            name: req.name.trim(),
            login: req.login.trim(),
            password_hash: &password_hash,
            role: req.role,
        },
    )
    .await?;

    state
        .audit
        .log(
            AuditEvent::new(AuditAction::UserCreated)
                .by(&admin)
                .target("user", user.id)
                .details(json!({
                    "name": user.name,
                    "login": user.login,
                    "role": user.role.as_str(),
                })),
        )
        .await;

    tracing::info!(user_id = user.id, login = %user.login, "User created");
    Ok(Json(user))
}
