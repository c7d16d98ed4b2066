//! Settings Repository (singleton row `id = 1`)

use shared::error::{AppError, ErrorCode};
use shared::models::{DayOfWeek, Settings};
use sqlx::SqlitePool;

use crate::error::ServiceResult;

pub async fn get(pool: &SqlitePool) -> ServiceResult<Settings> {
    let settings = sqlx::query_as::<_, Settings>(
        "SELECT submission_start_day, submission_end_day, updated_at, updated_by_id FROM settings WHERE id = 1",
    )
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::new(ErrorCode::SettingsNotFound))?;
    Ok(settings)
}

pub async fn update(
    pool: &SqlitePool,
    start: DayOfWeek,
    end: DayOfWeek,
    updated_by_id: i64,
) -> ServiceResult<Settings> {
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO settings (id, submission_start_day, submission_end_day, updated_at, updated_by_id) VALUES (1, ?1, ?2, ?3, ?4) \
         ON CONFLICT(id) DO UPDATE SET submission_start_day = ?1, submission_end_day = ?2, updated_at = ?3, updated_by_id = ?4",
    )
    .bind(start)
    .bind(end)
    .bind(now)
    .bind(updated_by_id)
    .execute(pool)
    .await?;
    get(pool).await
}
