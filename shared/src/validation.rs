//! Input validation rules
//!
//! Length limits, field-level error collection and the cross-field rules for
//! swap requests. Everything here is pure so clients can run the same checks
//! before submitting.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use validator::Validate;

use crate::error::AppError;
use crate::models::CreateSwapRequest;

// ── Text length limits ──────────────────────────────────────────────

/// Badge numbers (matrícula)
pub const MAX_BADGE_LEN: usize = 20;

/// User display names
pub const MAX_NAME_LEN: usize = 100;

/// Login identifiers
pub const MAX_LOGIN_LEN: usize = 50;

/// Passwords (before hashing)
pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_PASSWORD_LEN: usize = 128;

/// Observations on swap requests
pub const MAX_OBSERVATION_LEN: usize = 500;

// ── Field errors ────────────────────────────────────────────────────

/// Field-level validation errors, keyed by camelCase wire field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors {
    fields: BTreeMap<String, Vec<String>>,
    #[serde(skip)]
    first: Option<String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let message = message.into();
        if self.first.is_none() {
            self.first = Some(message.clone());
        }
        self.fields.entry(field.into()).or_default().push(message);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// First message recorded, used as the top-level error message.
    pub fn first_message(&self) -> Option<&str> {
        self.first.as_deref()
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        let mut entries: Vec<_> = errors.field_errors().into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        for (field, errs) in entries {
            let key = to_camel_case(field.as_ref());
            for err in errs.iter() {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{key} inválido ({})", err.code));
                out.add(key.clone(), message);
            }
        }
        out
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        let message = errors
            .first_message()
            .unwrap_or("Dados inválidos")
            .to_string();
        let fields = serde_json::to_value(&errors).unwrap_or_default();
        AppError::validation(message).with_detail("fields", fields)
    }
}

fn to_camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper = false;
    for c in snake.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

// ── Validation helpers (handlers) ───────────────────────────────────

/// Run derive-based rules on a payload and convert failures to a 400.
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload
        .validate()
        .map_err(|e| AppError::from(FieldErrors::from(e)))
}

/// Validate that a required string is non-blank and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    let mut errors = FieldErrors::new();
    if value.trim().is_empty() {
        errors.add(field, format!("{field} não pode ser vazio"));
    } else if value.chars().count() > max_len {
        errors.add(
            field,
            format!("{field} deve ter no máximo {max_len} caracteres"),
        );
    }
    errors.into_result().map_err(AppError::from)
}

/// Validate a `YYYY-MM` vigência string.
pub fn parse_vigencia(value: &str) -> Result<(i32, u32), AppError> {
    let invalid = || {
        let mut errors = FieldErrors::new();
        errors.add("vigencia", "Vigência deve estar no formato AAAA-MM");
        AppError::from(errors)
    };
    let (year, month) = value.split_once('-').ok_or_else(invalid)?;
    if year.len() != 4 || month.len() != 2 {
        return Err(invalid());
    }
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}

// ── Swap request rules ──────────────────────────────────────────────

fn is_badge(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

/// Validate a new swap request against `today` (business timezone).
///
/// All violations are collected; nothing short-circuits.
pub fn validate_swap_request(
    payload: &CreateSwapRequest,
    today: NaiveDate,
) -> Result<(), FieldErrors> {
    let mut errors = match payload.validate() {
        Ok(()) => FieldErrors::new(),
        Err(e) => FieldErrors::from(e),
    };

    for (field, badge) in [
        ("employeeIdOut", &payload.employee_id_out),
        ("employeeIdIn", &payload.employee_id_in),
    ] {
        if !badge.is_empty() && !is_badge(badge) {
            errors.add(field, "Matrícula deve conter apenas números");
        }
    }

    if !payload.employee_id_out.is_empty() && payload.employee_id_out == payload.employee_id_in {
        errors.add(
            "employeeIdIn",
            "Matrícula de entrada deve ser diferente da matrícula de saída",
        );
    }

    if payload.swap_date < today {
        errors.add("swapDate", "Data da troca não pode estar no passado");
    }
    if payload.payback_date < today {
        errors.add("paybackDate", "Data do pagamento não pode estar no passado");
    }

    if payload.swap_date == payload.payback_date {
        errors.add(
            "paybackDate",
            "Data do pagamento deve ser diferente da data da troca",
        );
    } else if payload.swap_date.year() != payload.payback_date.year()
        || payload.swap_date.month() != payload.payback_date.month()
    {
        errors.add(
            "paybackDate",
            "Data da troca e data do pagamento devem estar no mesmo mês",
        );
    }

    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::models::{EmployeeFunction, EventType, ReliefGroup};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2026, 5, 4)
    }

    fn payload() -> CreateSwapRequest {
        CreateSwapRequest {
            employee_id_out: "1001".into(),
            employee_id_in: "2002".into(),
            swap_date: date(2026, 5, 10),
            payback_date: date(2026, 5, 24),
            employee_function: EmployeeFunction::Motorista,
            group_out: ReliefGroup::A,
            group_in: ReliefGroup::B,
            event_type: EventType::Troca,
            observation: None,
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(validate_swap_request(&payload(), today()).is_ok());
    }

    #[test]
    fn test_same_badge_rejected() {
        let mut p = payload();
        p.employee_id_in = p.employee_id_out.clone();
        let errors = validate_swap_request(&p, today()).unwrap_err();
        assert!(errors.contains("employeeIdIn"));
        assert!(!errors.contains("employeeIdOut"));
    }

    #[test]
    fn test_past_dates_rejected() {
        let mut p = payload();
        p.swap_date = date(2026, 5, 3);
        p.payback_date = date(2026, 5, 1);
        let errors = validate_swap_request(&p, today()).unwrap_err();
        assert!(errors.contains("swapDate"));
        assert!(errors.contains("paybackDate"));
    }

    #[test]
    fn test_today_is_allowed() {
        let mut p = payload();
        p.swap_date = today();
        assert!(validate_swap_request(&p, today()).is_ok());
    }

    #[test]
    fn test_equal_dates_rejected() {
        let mut p = payload();
        p.payback_date = p.swap_date;
        let errors = validate_swap_request(&p, today()).unwrap_err();
        assert_eq!(errors.get("paybackDate").unwrap().len(), 1);
        assert!(!errors.contains("swapDate"));
    }

    #[test]
    fn test_different_month_rejected() {
        let mut p = payload();
        p.payback_date = date(2026, 6, 2);
        let errors = validate_swap_request(&p, today()).unwrap_err();
        assert!(errors.contains("paybackDate"));
    }

    #[test]
    fn test_same_month_different_year_rejected() {
        let mut p = payload();
        p.payback_date = date(2027, 5, 24);
        let errors = validate_swap_request(&p, today()).unwrap_err();
        assert_eq!(
            errors.get("paybackDate").unwrap(),
            ["Data da troca e data do pagamento devem estar no mesmo mês"]
        );
    }

    #[test]
    fn test_badge_format_rules() {
        let mut p = payload();
        p.employee_id_out = "12a4".into();
        p.employee_id_in = "1".repeat(MAX_BADGE_LEN + 1);
        let errors = validate_swap_request(&p, today()).unwrap_err();
        assert!(errors.contains("employeeIdOut"));
        assert!(errors.contains("employeeIdIn"));

        let mut p = payload();
        p.employee_id_out = String::new();
        let errors = validate_swap_request(&p, today()).unwrap_err();
        assert_eq!(errors.get("employeeIdOut").unwrap().len(), 1);
    }

    #[test]
    fn test_observation_length() {
        let mut p = payload();
        p.observation = Some("x".repeat(MAX_OBSERVATION_LEN));
        assert!(validate_swap_request(&p, today()).is_ok());
        p.observation = Some("x".repeat(MAX_OBSERVATION_LEN + 1));
        let errors = validate_swap_request(&p, today()).unwrap_err();
        assert!(errors.contains("observation"));
    }

    #[test]
    fn test_errors_are_collected() {
        let mut p = payload();
        p.employee_id_in = p.employee_id_out.clone();
        p.swap_date = date(2026, 4, 30);
        p.payback_date = date(2026, 5, 20);
        let errors = validate_swap_request(&p, today()).unwrap_err();
        assert!(errors.contains("employeeIdIn"));
        assert!(errors.contains("swapDate"));
        assert!(errors.contains("paybackDate"));
    }

    #[test]
    fn test_field_errors_into_app_error() {
        let mut errors = FieldErrors::new();
        errors.add("swapDate", "first");
        errors.add("employeeIdIn", "second");
        let err = AppError::from(errors);
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.message, "first");
        let fields = &err.details.unwrap()["fields"];
        assert_eq!(fields["swapDate"][0], "first");
        assert_eq!(fields["employeeIdIn"][0], "second");
    }

    #[test]
    fn test_validator_errors_use_camel_case_keys() {
        use crate::models::{RegisterUserRequest, Role};

        let req = RegisterUserRequest {
            name: String::new(),
            login: "maria".into(),
            password: "123".into(),
            role: Role::Encarregado,
        };
        let errors = FieldErrors::from(req.validate().unwrap_err());
        assert!(errors.contains("name"));
        assert!(errors.contains("password"));
        assert!(!errors.contains("login"));
        assert_eq!(to_camel_case("employee_id_out"), "employeeIdOut");
    }

    #[test]
    fn test_length_limits_follow_constants() {
        use crate::models::{RegisterUserRequest, Role};

        let mut p = payload();
        p.employee_id_in = "2".repeat(MAX_BADGE_LEN);
        assert!(validate_swap_request(&p, today()).is_ok());

        let req = |login: String, password: String| RegisterUserRequest {
            name: "Ana".into(),
            login,
            password,
            role: Role::Encarregado,
        };
        assert!(req("a".repeat(MAX_LOGIN_LEN), "x".repeat(MIN_PASSWORD_LEN)).validate().is_ok());
        assert!(req("a".repeat(MAX_LOGIN_LEN + 1), "x".repeat(MAX_PASSWORD_LEN)).validate().is_err());
        assert!(req("ana".into(), "x".repeat(MIN_PASSWORD_LEN - 1)).validate().is_err());
        assert!(req("ana".into(), "x".repeat(MAX_PASSWORD_LEN + 1)).validate().is_err());
    }

    #[test]
    fn test_text_helpers() {
        assert!(validate_required_text("  ", "name", 10).is_err());
        assert!(validate_required_text("Ana", "name", 10).is_ok());
        assert!(validate_required_text("Ananananana", "name", 10).is_err());
    }

    #[test]
    fn test_parse_vigencia() {
        assert_eq!(parse_vigencia("2026-03").unwrap(), (2026, 3));
        assert!(parse_vigencia("2026-13").is_err());
        assert!(parse_vigencia("2026-3").is_err());
        assert!(parse_vigencia("march").is_err());
    }
}
