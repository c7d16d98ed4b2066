//! Swap Request Repository
//!
//! Multi-row writes (mirror pairs, status propagation, pair deletion) run in a
//! single transaction.

use shared::error::{AppError, ErrorCode};
use shared::models::{
    CreateSwapRequest, EmployeeFunction, EventType, ReliefGroup, RequestStatus, StatusSummary,
    SwapRequest,
};
use sqlx::{SqliteConnection, SqlitePool};

use super::request_query::{Bind, ListQuery, Scope};
use crate::error::ServiceResult;

const SELECT_REQUEST: &str = "SELECT r.id, r.employee_id_out, r.employee_id_in, r.swap_date, r.payback_date, \
     r.employee_function, r.group_out, r.group_in, r.event_type, r.status, r.observation, \
     r.submitted_by_id, u.name AS submitted_by_name, u.login AS submitted_by_login, \
     r.is_mirror, r.related_request_id, r.created_at, r.updated_at \
     FROM swap_requests r JOIN users u ON u.id = r.submitted_by_id";

/// Apply `Bind` values to a query in order
macro_rules! bind_all {
    ($query:expr, $binds:expr) => {{
        let mut q = $query;
        for bind in $binds {
            q = match bind {
                Bind::Text(v) => q.bind(v.clone()),
                Bind::Int(v) => q.bind(*v),
                Bind::Date(v) => q.bind(*v),
            };
        }
        q
    }};
}

/// Blank observations are stored as NULL
fn normalize_observation(observation: Option<&str>) -> Option<&str> {
    observation.map(str::trim).filter(|s| !s.is_empty())
}

struct NewRow<'a> {
    employee_id_out: &'a str,
    employee_id_in: &'a str,
    swap_date: chrono::NaiveDate,
    payback_date: chrono::NaiveDate,
    employee_function: EmployeeFunction,
    group_out: ReliefGroup,
    group_in: ReliefGroup,
    event_type: EventType,
    observation: Option<&'a str>,
    submitted_by_id: i64,
    is_mirror: bool,
    related_request_id: Option<i64>,
    now: i64,
}

async fn insert_row(conn: &mut SqliteConnection, row: NewRow<'_>) -> ServiceResult<i64> {
    let result = sqlx::query(
        "INSERT INTO swap_requests (employee_id_out, employee_id_in, swap_date, payback_date, employee_function, \
         group_out, group_in, event_type, status, observation, submitted_by_id, is_mirror, related_request_id, \
         created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, 'SOLICITADO', ?, ?, ?, ?, ?, ?)",
    )
    .bind(row.employee_id_out)
    .bind(row.employee_id_in)
    .bind(row.swap_date)
    .bind(row.payback_date)
    .bind(row.employee_function)
    .bind(row.group_out)
    .bind(row.group_in)
    .bind(row.event_type)
    .bind(row.observation)
    .bind(row.submitted_by_id)
    .bind(row.is_mirror)
    .bind(row.related_request_id)
    .bind(row.now)
    .bind(row.now)
    .execute(conn)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> ServiceResult<Option<SwapRequest>> {
    let row = sqlx::query_as::<_, SwapRequest>(&format!("{SELECT_REQUEST} WHERE r.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

async fn fetch(pool: &SqlitePool, id: i64) -> ServiceResult<SwapRequest> {
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RequestNotFound).into())
}

/// A created request and, for TROCA, its mirror
#[derive(Debug, Clone)]
pub struct CreatedRequest {
    pub request: SwapRequest,
    pub mirror: Option<SwapRequest>,
}

/// Insert a request. A TROCA also gets a mirror row (badges, groups and dates
/// swapped) linked both ways through `related_request_id`.
pub async fn create(
    pool: &SqlitePool,
    submitted_by_id: i64,
    payload: &CreateSwapRequest,
) -> ServiceResult<CreatedRequest> {
    let now = shared::util::now_millis();
    let observation = normalize_observation(payload.observation.as_deref());
    let employee_id_out = payload.employee_id_out.trim();
    let employee_id_in = payload.employee_id_in.trim();

    let mut tx = pool.begin().await?;

    let id = insert_row(
        &mut tx,
        NewRow {
            employee_id_out,
            employee_id_in,
            swap_date: payload.swap_date,
            payback_date: payload.payback_date,
            employee_function: payload.employee_function,
            group_out: payload.group_out,
            group_in: payload.group_in,
            event_type: payload.event_type,
            observation,
            submitted_by_id,
            is_mirror: false,
            related_request_id: None,
            now,
        },
    )
    .await?;

    let mirror_id = if payload.event_type == EventType::Troca {
        let mirror_id = insert_row(
            &mut tx,
            NewRow {
                employee_id_out: employee_id_in,
                employee_id_in: employee_id_out,
                swap_date: payload.payback_date,
                payback_date: payload.swap_date,
                employee_function: payload.employee_function,
                group_out: payload.group_in,
                group_in: payload.group_out,
                event_type: payload.event_type,
                observation,
                submitted_by_id,
                is_mirror: true,
                related_request_id: Some(id),
                now,
            },
        )
        .await?;

        sqlx::query("UPDATE swap_requests SET related_request_id = ? WHERE id = ?")
            .bind(mirror_id)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        Some(mirror_id)
    } else {
        None
    };

    tx.commit().await?;

    let request = fetch(pool, id).await?;
    let mirror = match mirror_id {
        Some(mid) => Some(fetch(pool, mid).await?),
        None => None,
    };
    Ok(CreatedRequest { request, mirror })
}

/// Update status (propagated to the related row) and/or observation (this row only).
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    status: Option<RequestStatus>,
    observation: Option<&str>,
) -> ServiceResult<SwapRequest> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let related: Option<Option<i64>> =
        sqlx::query_scalar("SELECT related_request_id FROM swap_requests WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
    let Some(related) = related else {
        return Err(AppError::new(ErrorCode::RequestNotFound).into());
    };

    if let Some(status) = status {
        sqlx::query(
            "UPDATE swap_requests SET status = ?, updated_at = ? WHERE id = ? OR (? IS NOT NULL AND id = ?)",
        )
        .bind(status)
        .bind(now)
        .bind(id)
        .bind(related)
        .bind(related)
        .execute(&mut *tx)
        .await?;
    }

    if let Some(observation) = observation {
        sqlx::query("UPDATE swap_requests SET observation = ?, updated_at = ? WHERE id = ?")
            .bind(normalize_observation(Some(observation)))
            .bind(now)
            .bind(id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    fetch(pool, id).await
}

/// Delete a request together with its related row. Returns the deleted ids.
pub async fn delete_pair(pool: &SqlitePool, id: i64) -> ServiceResult<Vec<i64>> {
    let mut tx = pool.begin().await?;

    let related: Option<Option<i64>> =
        sqlx::query_scalar("SELECT related_request_id FROM swap_requests WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
    let Some(related) = related else {
        return Err(AppError::new(ErrorCode::RequestNotFound).into());
    };

    let mut ids = vec![id];
    ids.extend(related);

    for target in &ids {
        sqlx::query("DELETE FROM swap_requests WHERE id = ?")
            .bind(target)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(ids)
}

/// One page of requests plus the total row count for the filter
pub async fn list(pool: &SqlitePool, query: &ListQuery) -> ServiceResult<(Vec<SwapRequest>, u64)> {
    let count_sql = format!("SELECT COUNT(*) FROM swap_requests r {}", query.where_sql);
    let total: i64 = bind_all!(sqlx::query_scalar::<_, i64>(&count_sql), &query.binds)
        .fetch_one(pool)
        .await?;

    let data_sql = format!(
        "{SELECT_REQUEST} {} {} LIMIT ? OFFSET ?",
        query.where_sql, query.order_sql
    );
    let rows = bind_all!(sqlx::query_as::<_, SwapRequest>(&data_sql), &query.binds)
        .bind(query.page_size as i64)
        .bind(query.offset())
        .fetch_all(pool)
        .await?;

    Ok((rows, total.max(0) as u64))
}

/// Distinct vigências (`YYYY-MM`), newest first
pub async fn vigencias(pool: &SqlitePool, scope: Scope) -> ServiceResult<Vec<String>> {
    let rows = match scope {
        Scope::All => {
            sqlx::query_scalar::<_, String>(
                "SELECT DISTINCT substr(swap_date, 1, 7) AS vigencia FROM swap_requests \
                 WHERE is_mirror = 0 ORDER BY vigencia DESC",
            )
            .fetch_all(pool)
            .await?
        }
        Scope::Submitter(user_id) => {
            sqlx::query_scalar::<_, String>(
                "SELECT DISTINCT substr(swap_date, 1, 7) AS vigencia FROM swap_requests \
                 WHERE is_mirror = 0 AND submitted_by_id = ? ORDER BY vigencia DESC",
            )
            .bind(user_id)
            .fetch_all(pool)
            .await?
        }
    };
    Ok(rows)
}

/// Per-status counts of a user's own requests (mirrors excluded)
pub async fn summary_for_user(
    pool: &SqlitePool,
    user_id: i64,
    vigencia: Option<&str>,
) -> ServiceResult<StatusSummary> {
    let mut sql = String::from(
        "SELECT status, COUNT(*) FROM swap_requests WHERE submitted_by_id = ? AND is_mirror = 0",
    );
    if vigencia.is_some() {
        sql.push_str(" AND substr(swap_date, 1, 7) = ?");
    }
    sql.push_str(" GROUP BY status");

    let mut q = sqlx::query_as::<_, (RequestStatus, i64)>(&sql).bind(user_id);
    if let Some(v) = vigencia {
        q = q.bind(v);
    }
    let rows = q.fetch_all(pool).await?;

    let mut summary = StatusSummary::default();
    for (status, count) in rows {
        summary.add(status, count);
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::request_query::build_list_query;
    use crate::db::testing;
    use chrono::NaiveDate;
    use shared::models::{Role, SwapRequestQuery};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn payload(event_type: EventType) -> CreateSwapRequest {
        CreateSwapRequest {
            employee_id_out: "1001".into(),
            employee_id_in: "2002".into(),
            swap_date: date(2030, 3, 5),
            payback_date: date(2030, 3, 19),
            employee_function: EmployeeFunction::Cobrador,
            group_out: ReliefGroup::A,
            group_in: ReliefGroup::E,
            event_type,
            observation: Some("  troca combinada  ".into()),
        }
    }

    #[tokio::test]
    async fn test_troca_creates_linked_mirror() {
        let pool = testing::pool().await;
        let user = testing::user(&pool, "4000", Role::Encarregado).await;

        let created = create(&pool, user.id, &payload(EventType::Troca)).await.unwrap();
        let original = created.request;
        let mirror = created.mirror.unwrap();

        assert!(!original.is_mirror);
        assert!(mirror.is_mirror);
        assert_eq!(original.related_request_id, Some(mirror.id));
        assert_eq!(mirror.related_request_id, Some(original.id));
        assert_eq!(mirror.employee_id_out, "2002");
        assert_eq!(mirror.employee_id_in, "1001");
        assert_eq!(mirror.group_out, ReliefGroup::E);
        assert_eq!(mirror.group_in, ReliefGroup::A);
        assert_eq!(mirror.swap_date, date(2030, 3, 19));
        assert_eq!(mirror.payback_date, date(2030, 3, 5));
        assert_eq!(original.status, RequestStatus::Solicitado);
        assert_eq!(original.observation.as_deref(), Some("troca combinada"));
        assert_eq!(original.submitted_by_login, "4000");
    }

    #[tokio::test]
    async fn test_substituicao_has_no_mirror() {
        let pool = testing::pool().await;
        let user = testing::user(&pool, "4000", Role::Encarregado).await;

        let created = create(&pool, user.id, &payload(EventType::Substituicao))
            .await
            .unwrap();
        assert!(created.mirror.is_none());
        assert!(created.request.related_request_id.is_none());
    }

    #[tokio::test]
    async fn test_status_propagates_to_mirror() {
        let pool = testing::pool().await;
        let user = testing::user(&pool, "4000", Role::Encarregado).await;
        let created = create(&pool, user.id, &payload(EventType::Troca)).await.unwrap();
        let mirror_id = created.mirror.unwrap().id;

        let updated = update(
            &pool,
            created.request.id,
            Some(RequestStatus::Agendado),
            Some("confirmado"),
        )
        .await
        .unwrap();
        assert_eq!(updated.status, RequestStatus::Agendado);
        assert_eq!(updated.observation.as_deref(), Some("confirmado"));

        let mirror = find_by_id(&pool, mirror_id).await.unwrap().unwrap();
        assert_eq!(mirror.status, RequestStatus::Agendado);
        assert_eq!(mirror.observation.as_deref(), Some("troca combinada"));

        let cleared = update(&pool, created.request.id, None, Some("   ")).await.unwrap();
        assert!(cleared.observation.is_none());
        assert_eq!(cleared.status, RequestStatus::Agendado);
    }

    #[tokio::test]
    async fn test_update_missing_request() {
        let pool = testing::pool().await;
        let err = update(&pool, 77, Some(RequestStatus::Realizado), None)
            .await
            .unwrap_err();
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::RequestNotFound);
    }

    #[tokio::test]
    async fn test_delete_pair_from_either_side() {
        let pool = testing::pool().await;
        let user = testing::user(&pool, "4000", Role::Encarregado).await;
        let created = create(&pool, user.id, &payload(EventType::Troca)).await.unwrap();
        let mirror_id = created.mirror.unwrap().id;

        let deleted = delete_pair(&pool, mirror_id).await.unwrap();
        assert_eq!(deleted, vec![mirror_id, created.request.id]);
        assert!(find_by_id(&pool, created.request.id).await.unwrap().is_none());
        assert!(find_by_id(&pool, mirror_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_with_filters_and_paging() {
        let pool = testing::pool().await;
        let a = testing::user(&pool, "4000", Role::Encarregado).await;
        let b = testing::user(&pool, "5000", Role::Encarregado).await;

        for _ in 0..3 {
            create(&pool, a.id, &payload(EventType::Troca)).await.unwrap();
        }
        let mut other = payload(EventType::Substituicao);
        other.employee_id_out = "3003".into();
        other.swap_date = date(2030, 4, 2);
        other.payback_date = date(2030, 4, 9);
        create(&pool, b.id, &other).await.unwrap();

        let q = build_list_query(&SwapRequestQuery::default(), Scope::All).unwrap();
        let (rows, total) = list(&pool, &q).await.unwrap();
        assert_eq!(total, 4);
        assert!(rows.iter().all(|r| !r.is_mirror));

        let with_mirrors = SwapRequestQuery {
            include_mirrors: Some(true),
            page_size: Some(5),
            ..Default::default()
        };
        let q = build_list_query(&with_mirrors, Scope::All).unwrap();
        let (rows, total) = list(&pool, &q).await.unwrap();
        assert_eq!(total, 7);
        assert_eq!(rows.len(), 5);

        let q = build_list_query(&SwapRequestQuery::default(), Scope::Submitter(b.id)).unwrap();
        let (rows, total) = list(&pool, &q).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows[0].employee_id_out, "3003");

        let by_badge = SwapRequestQuery {
            employee_id: Some("3003".into()),
            ..Default::default()
        };
        let q = build_list_query(&by_badge, Scope::All).unwrap();
        assert_eq!(list(&pool, &q).await.unwrap().1, 1);

        let by_vigencia = SwapRequestQuery {
            vigencia: Some("2030-03".into()),
            sort_by: Some(shared::models::SortBy::SwapDate),
            sort_order: Some(shared::models::SortOrder::Asc),
            ..Default::default()
        };
        let q = build_list_query(&by_vigencia, Scope::All).unwrap();
        let (rows, total) = list(&pool, &q).await.unwrap();
        assert_eq!(total, 3);
        assert!(rows.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[tokio::test]
    async fn test_vigencias_and_summary() {
        let pool = testing::pool().await;
        let a = testing::user(&pool, "4000", Role::Encarregado).await;
        let b = testing::user(&pool, "5000", Role::Encarregado).await;

        let first = create(&pool, a.id, &payload(EventType::Troca)).await.unwrap();
        create(&pool, a.id, &payload(EventType::Substituicao)).await.unwrap();
        let mut april = payload(EventType::Substituicao);
        april.swap_date = date(2030, 4, 2);
        april.payback_date = date(2030, 4, 9);
        create(&pool, b.id, &april).await.unwrap();

        update(&pool, first.request.id, Some(RequestStatus::Realizado), None)
            .await
            .unwrap();

        assert_eq!(
            vigencias(&pool, Scope::All).await.unwrap(),
            vec!["2030-04".to_string(), "2030-03".to_string()]
        );
        assert_eq!(
            vigencias(&pool, Scope::Submitter(a.id)).await.unwrap(),
            vec!["2030-03".to_string()]
        );

        let summary = summary_for_user(&pool, a.id, None).await.unwrap();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.realizado, 1);
        assert_eq!(summary.solicitado, 1);

        let empty = summary_for_user(&pool, a.id, Some("2030-04")).await.unwrap();
        assert_eq!(empty, StatusSummary::default());
    }
}
