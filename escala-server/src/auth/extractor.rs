//! Authenticated-user extractors
//!
//! `CurrentUser` validates the bearer token and re-reads the user row, so a
//! deactivated account loses access immediately. `AdminUser` additionally
//! requires the administrator role.

use axum::{extract::FromRequestParts, http::request::Parts};
use shared::error::{AppError, ErrorCode};
use shared::models::{Role, User};

use crate::auth::{JwtError, JwtService};
use crate::db;
use crate::security_log;
use crate::state::AppState;

/// User making the request
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub name: String,
    pub login: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            login: user.login,
            role: user.role,
        }
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let token = match auth_header {
            Some(header) => JwtService::extract_from_header(header)
                .ok_or_else(AppError::invalid_token)?,
            None => {
                security_log!("WARN", "auth_missing", uri = parts.uri.to_string());
                return Err(AppError::unauthorized());
            }
        };

        let claims = state.jwt.validate_token(token).map_err(|e| {
            security_log!(
                "WARN",
                "auth_failed",
                error = e.to_string(),
                uri = parts.uri.to_string()
            );
            match e {
                JwtError::ExpiredToken => AppError::token_expired(),
                _ => AppError::invalid_token(),
            }
        })?;

        let user_id = claims
            .user_id()
            .map_err(|_| AppError::invalid_token())?;

        let user = db::users::find_by_id(&state.pool, user_id)
            .await
            .map_err(AppError::from)?;

        let user = match user {
            Some(u) if u.is_active => u,
            _ => {
                security_log!("WARN", "auth_inactive_user", user_id = user_id);
                return Err(AppError::new(ErrorCode::AccountDisabled));
            }
        };

        let current = CurrentUser::from(user);
        parts.extensions.insert(current.clone());
        Ok(current)
    }
}

/// Administrator making the request
#[derive(Debug, Clone)]
pub struct AdminUser(pub CurrentUser);

impl std::ops::Deref for AdminUser {
    type Target = CurrentUser;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            security_log!(
                "WARN",
                "admin_required",
                user_id = user.id,
                uri = parts.uri.to_string()
            );
            return Err(AppError::new(ErrorCode::AdminRequired));
        }
        Ok(AdminUser(user))
    }
}
