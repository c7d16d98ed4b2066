//! Swap Request Model (trocas e substituições)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::{MAX_BADGE_LEN, MAX_OBSERVATION_LEN};

/// Employee function on the vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmployeeFunction {
    Motorista,
    Cobrador,
}

impl EmployeeFunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeFunction::Motorista => "MOTORISTA",
            EmployeeFunction::Cobrador => "COBRADOR",
        }
    }
}

/// Relief group (grupo de folga): the weekly day-off rotation cohort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum ReliefGroup {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl ReliefGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReliefGroup::A => "A",
            ReliefGroup::B => "B",
            ReliefGroup::C => "C",
            ReliefGroup::D => "D",
            ReliefGroup::E => "E",
            ReliefGroup::F => "F",
            ReliefGroup::G => "G",
        }
    }
}

/// Kind of shift-change event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// Two employees exchange days; paid back on `payback_date`
    Troca,
    /// One employee covers for another
    Substituicao,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Troca => "TROCA",
            EventType::Substituicao => "SUBSTITUICAO",
        }
    }
}

/// Request status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    #[default]
    Solicitado,
    Agendado,
    NaoRealizada,
    Realizado,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Solicitado => "SOLICITADO",
            RequestStatus::Agendado => "AGENDADO",
            RequestStatus::NaoRealizada => "NAO_REALIZADA",
            RequestStatus::Realizado => "REALIZADO",
        }
    }

    /// Owners may only delete requests that were never carried out.
    pub fn is_deletable(&self) -> bool {
        matches!(self, RequestStatus::Solicitado | RequestStatus::NaoRealizada)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Swap request row, joined with the submitter's name and login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
    pub id: i64,
    /// Badge of the employee leaving the shift
    pub employee_id_out: String,
    /// Badge of the employee taking the shift
    pub employee_id_in: String,
    pub swap_date: NaiveDate,
    pub payback_date: NaiveDate,
    pub employee_function: EmployeeFunction,
    pub group_out: ReliefGroup,
    pub group_in: ReliefGroup,
    pub event_type: EventType,
    pub status: RequestStatus,
    pub observation: Option<String>,
    pub submitted_by_id: i64,
    pub submitted_by_name: String,
    pub submitted_by_login: String,
    /// True for the generated counterpart of a TROCA
    pub is_mirror: bool,
    pub related_request_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// POST /api/requests payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSwapRequest {
    #[validate(length(min = 1, max = (MAX_BADGE_LEN as u64), message = "Matrícula deve ter entre 1 e 20 caracteres"))]
    pub employee_id_out: String,
    #[validate(length(min = 1, max = (MAX_BADGE_LEN as u64), message = "Matrícula deve ter entre 1 e 20 caracteres"))]
    pub employee_id_in: String,
    pub swap_date: NaiveDate,
    pub payback_date: NaiveDate,
    pub employee_function: EmployeeFunction,
    pub group_out: ReliefGroup,
    pub group_in: ReliefGroup,
    pub event_type: EventType,
    #[validate(length(max = (MAX_OBSERVATION_LEN as u64), message = "Observação deve ter no máximo 500 caracteres"))]
    pub observation: Option<String>,
}

/// PATCH /api/requests/:id/status payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    pub status: RequestStatus,
    #[validate(length(max = (MAX_OBSERVATION_LEN as u64), message = "Observação deve ter no máximo 500 caracteres"))]
    pub observation: Option<String>,
}

/// PATCH /api/requests/:id payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateSwapRequest {
    pub status: Option<RequestStatus>,
    #[validate(length(max = (MAX_OBSERVATION_LEN as u64), message = "Observação deve ter no máximo 500 caracteres"))]
    pub observation: Option<String>,
}

/// Sortable columns for the request list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    #[default]
    CreatedAt,
    SwapDate,
    PaybackDate,
    Status,
    EmployeeIdOut,
    EmployeeIdIn,
    EventType,
}

impl SortBy {
    /// SQL column (whitelisted, never taken from input)
    pub fn column(&self) -> &'static str {
        match self {
            SortBy::CreatedAt => "r.created_at",
            SortBy::SwapDate => "r.swap_date",
            SortBy::PaybackDate => "r.payback_date",
            SortBy::Status => "r.status",
            SortBy::EmployeeIdOut => "r.employee_id_out",
            SortBy::EmployeeIdIn => "r.employee_id_in",
            SortBy::EventType => "r.event_type",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// GET /api/requests query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequestQuery {
    pub status: Option<RequestStatus>,
    pub employee_id_out: Option<String>,
    pub employee_id_in: Option<String>,
    /// Matches either side of the request
    pub employee_id: Option<String>,
    pub employee_function: Option<EmployeeFunction>,
    pub group_out: Option<ReliefGroup>,
    pub group_in: Option<ReliefGroup>,
    pub event_type: Option<EventType>,
    pub swap_date_from: Option<NaiveDate>,
    pub swap_date_to: Option<NaiveDate>,
    pub payback_date_from: Option<NaiveDate>,
    pub payback_date_to: Option<NaiveDate>,
    /// `YYYY-MM`
    pub vigencia: Option<String>,
    pub submitted_by_id: Option<i64>,
    pub include_mirrors: Option<bool>,
    pub sort_by: Option<SortBy>,
    pub sort_order: Option<SortOrder>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// GET /api/requests/summary/user query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryQuery {
    pub vigencia: Option<String>,
}

/// Request counts per status for one submitter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    pub total: i64,
    pub solicitado: i64,
    pub agendado: i64,
    pub nao_realizada: i64,
    pub realizado: i64,
}

impl StatusSummary {
    pub fn add(&mut self, status: RequestStatus, count: i64) {
        match status {
            RequestStatus::Solicitado => self.solicitado += count,
            RequestStatus::Agendado => self.agendado += count,
            RequestStatus::NaoRealizada => self.nao_realizada += count,
            RequestStatus::Realizado => self.realizado += count,
        }
        self.total += count;
    }
}

/// Paginated list response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: u64, page: u32, page_size: u32) -> Self {
        let total_pages = if page_size > 0 {
            total.div_ceil(page_size as u64) as u32
        } else {
            1
        };

        Self {
            data,
            total,
            page,
            page_size,
            total_pages,
        }
    }
}
