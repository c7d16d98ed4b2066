//! Audit trail writer
//!
//! Writes are best-effort: a failed insert is logged and swallowed, the
//! action that triggered it still succeeds.

use serde_json::Value;
use shared::models::AuditAction;
use sqlx::SqlitePool;

use crate::auth::CurrentUser;
use crate::db;

/// One audit event under construction
#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub action: AuditAction,
    pub user_id: Option<i64>,
    pub user_login: Option<String>,
    pub target_resource_type: Option<&'static str>,
    pub target_resource_id: Option<String>,
    pub details: Value,
}

impl AuditEvent {
    pub fn new(action: AuditAction) -> Self {
        Self {
            action,
            user_id: None,
            user_login: None,
            target_resource_type: None,
            target_resource_id: None,
            details: Value::Object(Default::default()),
        }
    }

    pub fn by(mut self, user: &CurrentUser) -> Self {
        self.user_id = Some(user.id);
        self.user_login = Some(user.login.clone());
        self
    }

    pub fn actor(mut self, user_id: Option<i64>, login: impl Into<String>) -> Self {
        self.user_id = user_id;
        self.user_login = Some(login.into());
        self
    }

    pub fn target(mut self, resource_type: &'static str, id: impl ToString) -> Self {
        self.target_resource_type = Some(resource_type);
        self.target_resource_id = Some(id.to_string());
        self
    }

    pub fn details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }
}

#[derive(Clone)]
pub struct AuditService {
    pool: SqlitePool,
}

impl AuditService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn log(&self, event: AuditEvent) {
        let entry = db::audit::NewAuditLog {
            timestamp: shared::util::now_millis(),
            action: event.action.as_str(),
            details: &event.details,
            user_id: event.user_id,
            user_login: event.user_login.as_deref(),
            target_resource_id: event.target_resource_id.as_deref(),
            target_resource_type: event.target_resource_type,
        };

        if let Err(e) = db::audit::insert(&self.pool, &entry).await {
            tracing::error!(
                action = %event.action,
                error = %e,
                "Failed to write audit log entry"
            );
        }
    }
}
