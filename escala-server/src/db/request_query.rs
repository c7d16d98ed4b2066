//! Swap request list query building
//!
//! Turns `SwapRequestQuery` into a WHERE clause, bind values and ORDER BY.
//! Column names come only from this module; user input is always bound.

use chrono::NaiveDate;
use shared::error::AppError;
use shared::models::SwapRequestQuery;
use shared::validation::parse_vigencia;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Which rows the caller may see
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Administrators
    All,
    /// Encarregados: only their own submissions
    Submitter(i64),
}

/// A positional bind value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bind {
    Text(String),
    Int(i64),
    Date(NaiveDate),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Empty or `WHERE ...`
    pub where_sql: String,
    pub binds: Vec<Bind>,
    /// `ORDER BY ...`
    pub order_sql: String,
    pub page: u32,
    pub page_size: u32,
}

impl ListQuery {
    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.page_size as i64
    }
}

/// Clamp paging input: page ≥ 1, page size 1..=100.
pub fn page_params(page: Option<u32>, page_size: Option<u32>) -> (u32, u32) {
    let page = page.unwrap_or(1).max(1);
    let page_size = page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    (page, page_size)
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

pub fn build_list_query(query: &SwapRequestQuery, scope: Scope) -> Result<ListQuery, AppError> {
    let mut clauses: Vec<&'static str> = Vec::new();
    let mut binds = Vec::new();

    match scope {
        Scope::Submitter(user_id) => {
            clauses.push("r.submitted_by_id = ?");
            binds.push(Bind::Int(user_id));
        }
        Scope::All => {
            if let Some(user_id) = query.submitted_by_id {
                clauses.push("r.submitted_by_id = ?");
                binds.push(Bind::Int(user_id));
            }
        }
    }

    if !query.include_mirrors.unwrap_or(false) {
        clauses.push("r.is_mirror = 0");
    }

    if let Some(status) = query.status {
        clauses.push("r.status = ?");
        binds.push(Bind::Text(status.as_str().into()));
    }
    if let Some(badge) = non_blank(&query.employee_id_out) {
        clauses.push("r.employee_id_out = ?");
        binds.push(Bind::Text(badge.into()));
    }
    if let Some(badge) = non_blank(&query.employee_id_in) {
        clauses.push("r.employee_id_in = ?");
        binds.push(Bind::Text(badge.into()));
    }
    if let Some(badge) = non_blank(&query.employee_id) {
        clauses.push("(r.employee_id_out = ? OR r.employee_id_in = ?)");
        binds.push(Bind::Text(badge.into()));
        binds.push(Bind::Text(badge.into()));
    }
    if let Some(function) = query.employee_function {
        clauses.push("r.employee_function = ?");
        binds.push(Bind::Text(function.as_str().into()));
    }
    if let Some(group) = query.group_out {
        clauses.push("r.group_out = ?");
        binds.push(Bind::Text(group.as_str().into()));
    }
    if let Some(group) = query.group_in {
        clauses.push("r.group_in = ?");
        binds.push(Bind::Text(group.as_str().into()));
    }
    if let Some(event_type) = query.event_type {
        clauses.push("r.event_type = ?");
        binds.push(Bind::Text(event_type.as_str().into()));
    }

    for (value, clause) in [
        (query.swap_date_from, "r.swap_date >= ?"),
        (query.swap_date_to, "r.swap_date <= ?"),
        (query.payback_date_from, "r.payback_date >= ?"),
        (query.payback_date_to, "r.payback_date <= ?"),
    ] {
        if let Some(date) = value {
            clauses.push(clause);
            binds.push(Bind::Date(date));
        }
    }

    if let Some(vigencia) = non_blank(&query.vigencia) {
        let (year, month) = parse_vigencia(vigencia)?;
        clauses.push("substr(r.swap_date, 1, 7) = ?");
        binds.push(Bind::Text(format!("{year:04}-{month:02}")));
    }

    let where_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", clauses.join(" AND "))
    };

    let sort_by = query.sort_by.unwrap_or_default();
    let direction = query.sort_order.unwrap_or_default().sql();
    let order_sql = format!("ORDER BY {} {direction}, r.id {direction}", sort_by.column());

    let (page, page_size) = page_params(query.page, query.page_size);

    Ok(ListQuery {
        where_sql,
        binds,
        order_sql,
        page,
        page_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;
    use shared::models::{EventType, ReliefGroup, RequestStatus, SortBy, SortOrder};

    #[test]
    fn test_defaults_hide_mirrors_and_sort_newest_first() {
        let q = build_list_query(&SwapRequestQuery::default(), Scope::All).unwrap();
        assert_eq!(q.where_sql, "WHERE r.is_mirror = 0");
        assert!(q.binds.is_empty());
        assert_eq!(q.order_sql, "ORDER BY r.created_at DESC, r.id DESC");
        assert_eq!((q.page, q.page_size), (1, DEFAULT_PAGE_SIZE));
        assert_eq!(q.offset(), 0);
    }

    #[test]
    fn test_encarregado_scope_ignores_submitter_filter() {
        let query = SwapRequestQuery {
            submitted_by_id: Some(99),
            include_mirrors: Some(true),
            ..Default::default()
        };
        let q = build_list_query(&query, Scope::Submitter(7)).unwrap();
        assert_eq!(q.where_sql, "WHERE r.submitted_by_id = ?");
        assert_eq!(q.binds, vec![Bind::Int(7)]);

        let q = build_list_query(&query, Scope::All).unwrap();
        assert_eq!(q.binds, vec![Bind::Int(99)]);
    }

    #[test]
    fn test_filters_map_to_clauses_in_order() {
        let date = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
        let query = SwapRequestQuery {
            status: Some(RequestStatus::Agendado),
            employee_id: Some(" 1234 ".into()),
            group_out: Some(ReliefGroup::C),
            event_type: Some(EventType::Troca),
            swap_date_from: Some(date),
            vigencia: Some("2026-07".into()),
            ..Default::default()
        };
        let q = build_list_query(&query, Scope::All).unwrap();
        assert_eq!(
            q.where_sql,
            "WHERE r.is_mirror = 0 AND r.status = ? AND (r.employee_id_out = ? OR r.employee_id_in = ?) \
             AND r.group_out = ? AND r.event_type = ? AND r.swap_date >= ? AND substr(r.swap_date, 1, 7) = ?"
        );
        assert_eq!(
            q.binds,
            vec![
                Bind::Text("AGENDADO".into()),
                Bind::Text("1234".into()),
                Bind::Text("1234".into()),
                Bind::Text("C".into()),
                Bind::Text("TROCA".into()),
                Bind::Date(date),
                Bind::Text("2026-07".into()),
            ]
        );
    }

    #[test]
    fn test_blank_text_filters_are_ignored() {
        let query = SwapRequestQuery {
            employee_id_out: Some("   ".into()),
            vigencia: Some(String::new()),
            include_mirrors: Some(true),
            ..Default::default()
        };
        let q = build_list_query(&query, Scope::All).unwrap();
        assert!(q.where_sql.is_empty());
    }

    #[test]
    fn test_sort_and_paging() {
        let query = SwapRequestQuery {
            sort_by: Some(SortBy::SwapDate),
            sort_order: Some(SortOrder::Asc),
            page: Some(3),
            page_size: Some(500),
            ..Default::default()
        };
        let q = build_list_query(&query, Scope::All).unwrap();
        assert_eq!(q.order_sql, "ORDER BY r.swap_date ASC, r.id ASC");
        assert_eq!(q.page_size, MAX_PAGE_SIZE);
        assert_eq!(q.offset(), 200);

        assert_eq!(page_params(Some(0), Some(0)), (1, 1));
    }

    #[test]
    fn test_invalid_vigencia() {
        let query = SwapRequestQuery {
            vigencia: Some("07/2026".into()),
            ..Default::default()
        };
        let err = build_list_query(&query, Scope::All).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
