//! User Model

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::{MAX_LOGIN_LEN, MAX_NAME_LEN, MAX_PASSWORD_LEN, MIN_PASSWORD_LEN};

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Reviews and manages requests, users and settings
    Administrador,
    /// Supervisor who submits swap requests
    Encarregado,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Administrador => "ADMINISTRADOR",
            Role::Encarregado => "ENCARREGADO",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Administrador)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMINISTRADOR" => Ok(Role::Administrador),
            "ENCARREGADO" => Ok(Role::Encarregado),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// User response (without password hash)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    /// Badge / login identifier
    pub login: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// POST /api/auth/login payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

/// POST /api/auth/login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// POST /api/auth/register payload (admin only)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterUserRequest {
    #[validate(length(min = 1, max = (MAX_NAME_LEN as u64), message = "Nome deve ter entre 1 e 100 caracteres"))]
    pub name: String,
    #[validate(length(min = 1, max = (MAX_LOGIN_LEN as u64), message = "Login deve ter entre 1 e 50 caracteres"))]
    pub login: String,
    #[validate(length(min = (MIN_PASSWORD_LEN as u64), max = (MAX_PASSWORD_LEN as u64), message = "Senha deve ter entre 6 e 128 caracteres"))]
    pub password: String,
    pub role: Role,
}

/// PATCH /api/users payload (own profile)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = (MAX_NAME_LEN as u64), message = "Nome deve ter entre 1 e 100 caracteres"))]
    pub name: Option<String>,
    pub current_password: Option<String>,
    #[validate(length(min = (MIN_PASSWORD_LEN as u64), max = (MAX_PASSWORD_LEN as u64), message = "Senha deve ter entre 6 e 128 caracteres"))]
    pub new_password: Option<String>,
}

/// PATCH /api/users/:id payload (admin)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = (MAX_NAME_LEN as u64), message = "Nome deve ter entre 1 e 100 caracteres"))]
    pub name: Option<String>,
    pub role: Option<Role>,
}

/// PATCH /api/users/:id/status payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserStatusRequest {
    pub is_active: bool,
}

/// GET /api/users query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListQuery {
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    /// Case-insensitive substring of name or login
    pub search: Option<String>,
}
