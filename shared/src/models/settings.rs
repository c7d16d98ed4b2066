//! System Settings Model (singleton)

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Day of the week, Portuguese names on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayOfWeek {
    Domingo,
    Segunda,
    Terca,
    Quarta,
    Quinta,
    Sexta,
    Sabado,
}

impl DayOfWeek {
    /// 0 = Domingo .. 6 = Sabado
    pub fn index(&self) -> u8 {
        match self {
            DayOfWeek::Domingo => 0,
            DayOfWeek::Segunda => 1,
            DayOfWeek::Terca => 2,
            DayOfWeek::Quarta => 3,
            DayOfWeek::Quinta => 4,
            DayOfWeek::Sexta => 5,
            DayOfWeek::Sabado => 6,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DayOfWeek::Domingo => "DOMINGO",
            DayOfWeek::Segunda => "SEGUNDA",
            DayOfWeek::Terca => "TERCA",
            DayOfWeek::Quarta => "QUARTA",
            DayOfWeek::Quinta => "QUINTA",
            DayOfWeek::Sexta => "SEXTA",
            DayOfWeek::Sabado => "SABADO",
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Sun => DayOfWeek::Domingo,
            Weekday::Mon => DayOfWeek::Segunda,
            Weekday::Tue => DayOfWeek::Terca,
            Weekday::Wed => DayOfWeek::Quarta,
            Weekday::Thu => DayOfWeek::Quinta,
            Weekday::Fri => DayOfWeek::Sexta,
            Weekday::Sat => DayOfWeek::Sabado,
        }
    }
}

impl std::fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings row (`id = 1`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub submission_start_day: DayOfWeek,
    pub submission_end_day: DayOfWeek,
    pub updated_at: i64,
    pub updated_by_id: Option<i64>,
}

impl Settings {
    /// Whether `day` falls inside the submission window.
    ///
    /// The window is inclusive on both ends and may wrap the week,
    /// e.g. `SEXTA..TERCA` covers Fri, Sat, Sun, Mon and Tue.
    pub fn is_open_on(&self, day: impl Into<DayOfWeek>) -> bool {
        let d = day.into().index();
        let start = self.submission_start_day.index();
        let end = self.submission_end_day.index();
        if start <= end {
            start <= d && d <= end
        } else {
            d >= start || d <= end
        }
    }
}

/// PUT /api/settings payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    pub submission_start_day: DayOfWeek,
    pub submission_end_day: DayOfWeek,
}

/// GET /api/settings response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    pub submission_start_day: DayOfWeek,
    pub submission_end_day: DayOfWeek,
    pub updated_at: i64,
    /// Evaluated for the current day in the business timezone
    pub is_submission_open: bool,
}

impl SettingsResponse {
    pub fn new(settings: &Settings, today: impl Into<DayOfWeek>) -> Self {
        Self {
            submission_start_day: settings.submission_start_day,
            submission_end_day: settings.submission_end_day,
            updated_at: settings.updated_at,
            is_submission_open: settings.is_open_on(today),
        }
    }
}
