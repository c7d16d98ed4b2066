//! Audit Log Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Audit action tag
///
/// Stored as text. Tags written by older or newer builds that this build does
/// not know are kept verbatim in [`AuditAction::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AuditAction {
    // ═══ Auth ═══
    LoginSuccess,
    LoginFailed,

    // ═══ Users ═══
    UserCreated,
    UserUpdated,
    UserStatusChanged,
    PasswordChanged,

    // ═══ Swap requests ═══
    RequestCreated,
    RequestUpdated,
    RequestStatusUpdated,
    RequestDeleted,

    // ═══ Settings ═══
    SettingsUpdated,

    /// Unrecognized tag read back from storage
    Other(String),
}

impl AuditAction {
    pub fn as_str(&self) -> &str {
        match self {
            AuditAction::LoginSuccess => "LOGIN_SUCCESS",
            AuditAction::LoginFailed => "LOGIN_FAILED",
            AuditAction::UserCreated => "USER_CREATED",
            AuditAction::UserUpdated => "USER_UPDATED",
            AuditAction::UserStatusChanged => "USER_STATUS_CHANGED",
            AuditAction::PasswordChanged => "PASSWORD_CHANGED",
            AuditAction::RequestCreated => "REQUEST_CREATED",
            AuditAction::RequestUpdated => "REQUEST_UPDATED",
            AuditAction::RequestStatusUpdated => "REQUEST_STATUS_UPDATED",
            AuditAction::RequestDeleted => "REQUEST_DELETED",
            AuditAction::SettingsUpdated => "SETTINGS_UPDATED",
            AuditAction::Other(raw) => raw,
        }
    }
}

impl From<&str> for AuditAction {
    fn from(tag: &str) -> Self {
        match tag {
            "LOGIN_SUCCESS" => AuditAction::LoginSuccess,
            "LOGIN_FAILED" => AuditAction::LoginFailed,
            "USER_CREATED" => AuditAction::UserCreated,
            "USER_UPDATED" => AuditAction::UserUpdated,
            "USER_STATUS_CHANGED" => AuditAction::UserStatusChanged,
            "PASSWORD_CHANGED" => AuditAction::PasswordChanged,
            "REQUEST_CREATED" => AuditAction::RequestCreated,
            "REQUEST_UPDATED" => AuditAction::RequestUpdated,
            "REQUEST_STATUS_UPDATED" => AuditAction::RequestStatusUpdated,
            "REQUEST_DELETED" => AuditAction::RequestDeleted,
            "SETTINGS_UPDATED" => AuditAction::SettingsUpdated,
            other => AuditAction::Other(other.to_string()),
        }
    }
}

impl From<String> for AuditAction {
    fn from(tag: String) -> Self {
        AuditAction::from(tag.as_str())
    }
}

impl From<AuditAction> for String {
    fn from(action: AuditAction) -> Self {
        action.as_str().to_string()
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audit log entry as returned by `GET /api/audit`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: i64,
    /// Unix millis
    pub timestamp: i64,
    pub action: AuditAction,
    /// Structured details (JSON)
    pub details: serde_json::Value,
    /// Actor, `None` for failed logins of unknown users
    pub user_id: Option<i64>,
    pub user_login: Option<String>,
    pub target_resource_id: Option<String>,
    pub target_resource_type: Option<String>,
    /// Human-readable sentence rendered from action and details
    pub description: String,
}

/// GET /api/audit query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditQuery {
    pub action: Option<AuditAction>,
    pub user_id: Option<i64>,
    /// Inclusive, business timezone
    pub from: Option<NaiveDate>,
    /// Inclusive, business timezone
    pub to: Option<NaiveDate>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}
