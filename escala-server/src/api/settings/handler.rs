//! Settings API Handlers

use axum::{Json, extract::State};
use chrono::Datelike;
use serde_json::json;
use shared::models::{AuditAction, SettingsResponse, UpdateSettingsRequest};

use crate::api::ApiResult;
use crate::audit::AuditEvent;
use crate::auth::{AdminUser, CurrentUser};
use crate::db;
use crate::state::AppState;

/// Current submission window and whether it is open today
pub async fn get(State(state): State<AppState>, _user: CurrentUser) -> ApiResult<SettingsResponse> {
    let settings = db::settings::get(&state.pool).await?;
    Ok(Json(SettingsResponse::new(&settings, state.today().weekday())))
}

/// Replace the submission window (administrators only)
pub async fn update(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(payload): Json<UpdateSettingsRequest>,
) -> ApiResult<SettingsResponse> {
    let old = db::settings::get(&state.pool).await?;
    let settings = db::settings::update(
        &state.pool,
        payload.submission_start_day,
        payload.submission_end_day,
        admin.id,
    )
    .await?;

    state
        .audit
        .log(
            AuditEvent::new(AuditAction::SettingsUpdated)
                .by(&admin)
                .target("settings", 1)
                .details(json!({
                    "old": {
                        "submissionStartDay": old.submission_start_day.as_str(),
                        "submissionEndDay": old.submission_end_day.as_str(),
                    },
                    "new": {
                        "submissionStartDay": settings.submission_start_day.as_str(),
                        "submissionEndDay": settings.submission_end_day.as_str(),
                    },
                })),
        )
        .await;

    tracing::info!(
        start = %settings.submission_start_day,
        end = %settings.submission_end_day,
        user_id = admin.id,
        "Submission window updated"
    );
    Ok(Json(SettingsResponse::new(&settings, state.today().weekday())))
}
