//! Audit entry formatting
//!
//! Renders an audit action plus its structured details as a Portuguese
//! sentence for the admin audit screen. Details are written by the server
//! with the camelCase keys read below; any missing key degrades to a generic
//! sentence for that action.

use serde_json::Value;

use crate::models::AuditAction;

const UNKNOWN_ACTOR: &str = "desconhecido";

/// Read a detail as text (strings verbatim, numbers and bools via Display).
fn text(details: &Value, key: &str) -> Option<String> {
    match details.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn nested(details: &Value, outer: &str, key: &str) -> Option<String> {
    details.get(outer).and_then(|v| text(v, key))
}

/// `{"requestId": 12}` → `"#12"`
fn request_ref(details: &Value) -> Option<String> {
    text(details, "requestId").map(|id| format!("#{id}"))
}

/// Human-readable description of an audit entry.
pub fn format_audit_entry(action: &AuditAction, details: &Value, login: Option<&str>) -> String {
    let who = login.unwrap_or(UNKNOWN_ACTOR);

    match action {
        AuditAction::LoginSuccess => format!("{who} entrou no sistema"),

        AuditAction::LoginFailed => match text(details, "login") {
            Some(attempted) => format!("Tentativa de login malsucedida para {attempted}"),
            None => "Tentativa de login malsucedida".to_string(),
        },

        AuditAction::UserCreated => {
            match (text(details, "name"), text(details, "login"), text(details, "role")) {
                (Some(name), Some(new_login), Some(role)) => {
                    format!("{who} criou o usuário {name} ({new_login}) com perfil {role}")
                }
                _ => format!("{who} criou um usuário"),
            }
        }

        AuditAction::UserUpdated => {
            let target = text(details, "targetLogin")
                .or_else(|| text(details, "userId").map(|id| format!("#{id}")));
            let fields = details
                .get("fields")
                .and_then(Value::as_array)
                .map(|f| {
                    f.iter()
                        .filter_map(Value::as_str)
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .filter(|f| !f.is_empty());
            match (target, fields) {
                (Some(t), Some(f)) => format!("{who} atualizou o usuário {t} ({f})"),
                (Some(t), None) => format!("{who} atualizou o usuário {t}"),
                _ => format!("{who} atualizou um usuário"),
            }
        }

        AuditAction::UserStatusChanged => {
            let target = text(details, "targetLogin")
                .or_else(|| text(details, "userId").map(|id| format!("#{id}")));
            let active = details.get("isActive").and_then(Value::as_bool);
            match (target, active) {
                (Some(t), Some(true)) => format!("{who} ativou o usuário {t}"),
                (Some(t), Some(false)) => format!("{who} desativou o usuário {t}"),
                _ => format!("{who} alterou o status de um usuário"),
            }
        }

        AuditAction::PasswordChanged => format!("{who} alterou a própria senha"),

        AuditAction::RequestCreated => match (
            request_ref(details),
            text(details, "eventType"),
            text(details, "employeeIdOut"),
            text(details, "employeeIdIn"),
        ) {
            (Some(id), Some(kind), Some(out), Some(inn)) => {
                format!("{who} criou a solicitação {id} ({kind}) de {out} para {inn}")
            }
            (Some(id), ..) => format!("{who} criou a solicitação {id}"),
            _ => format!("{who} criou uma solicitação"),
        },

        AuditAction::RequestUpdated => match request_ref(details) {
            Some(id) => format!("{who} atualizou a solicitação {id}"),
            None => format!("{who} atualizou uma solicitação"),
        },

        AuditAction::RequestStatusUpdated => match (
            request_ref(details),
            text(details, "oldStatus"),
            text(details, "newStatus"),
        ) {
            (Some(id), Some(old), Some(new)) => {
                format!("{who} alterou o status da solicitação {id} de {old} para {new}")
            }
            (Some(id), None, Some(new)) => {
                format!("{who} alterou o status da solicitação {id} para {new}")
            }
            (Some(id), ..) => format!("{who} alterou o status da solicitação {id}"),
            _ => format!("{who} alterou o status de uma solicitação"),
        },

        AuditAction::RequestDeleted => match request_ref(details) {
            Some(id) => format!("{who} excluiu a solicitação {id}"),
            None => format!("{who} excluiu uma solicitação"),
        },

        AuditAction::SettingsUpdated => match (
            nested(details, "old", "submissionStartDay"),
            nested(details, "old", "submissionEndDay"),
            nested(details, "new", "submissionStartDay"),
            nested(details, "new", "submissionEndDay"),
        ) {
            (Some(os), Some(oe), Some(ns), Some(ne)) => format!(
                "{who} alterou a janela de envio de {os} a {oe} para {ns} a {ne}"
            ),
            _ => format!("{who} alterou as configurações"),
        },

        AuditAction::Other(tag) => format!("{who} executou {tag}"),
    }
}
