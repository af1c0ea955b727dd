//! Handlers for the `/admin` analytics dashboard.
//!
//! All endpoints require the `admin` role. Report sections degrade to empty
//! values instead of failing; only `user_stats` can answer 404.

use axum::extract::{Path, Query, State};
use axum::Json;
use moviehub_core::analytics::{clamp_error_limit, ReportPeriod};
use moviehub_core::error::CoreError;
use moviehub_core::types::DbId;
use moviehub_db::models::admin_stats::UserStats;
use serde::Deserialize;

use crate::admin_stats::report::{
    ActiveUsersReport, AiReport, DbCheck, ErrorLogReport, FullReport, NewReviewsReport,
    NewUsersReport, SearchQueriesReport, StatusReport, TopMoviesReport, TopPagesReport,
};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Query parameters for `GET /admin/logs_errors`.
#[derive(Debug, Deserialize)]
pub struct ErrorLogParams {
    pub limit: Option<i64>,
}

/// Query parameters for `GET /admin/top_movies`.
#[derive(Debug, Deserialize)]
pub struct TopMoviesParams {
    pub period: Option<String>,
}

/// GET /api/admin/status
pub async fn status(_admin: RequireAdmin, State(state): State<AppState>) -> Json<StatusReport> {
    Json(state.admin_stats().status().await)
}

/// GET /api/admin/db_check
pub async fn db_check(_admin: RequireAdmin, State(state): State<AppState>) -> Json<DbCheck> {
    Json(state.admin_stats().db_check().await)
}

/// GET /api/admin/logs_errors?limit=
///
/// `limit` is clamped to `1..=50`, default 10.
pub async fn logs_errors(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<ErrorLogParams>,
) -> Json<ErrorLogReport> {
    let limit = clamp_error_limit(params.limit);
    Json(state.admin_stats().recent_errors(limit).await)
}

/// GET /api/admin/top_movies?period=24h|7d
pub async fn top_movies(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<TopMoviesParams>,
) -> AppResult<Json<TopMoviesReport>> {
    let period = match params.period.as_deref() {
        Some(raw) => raw.parse::<ReportPeriod>()?,
        None => ReportPeriod::default(),
    };
    Ok(Json(state.admin_stats().top_movies(period).await))
}

/// GET /api/admin/new_reviews
pub async fn new_reviews(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Json<NewReviewsReport> {
    Json(state.admin_stats().new_reviews().await)
}

/// GET /api/admin/search_stats_none
///
/// Queries that found nothing, most frequent first.
pub async fn search_stats_none(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Json<SearchQueriesReport> {
    Json(state.admin_stats().top_search_queries(true).await)
}

/// GET /api/admin/top_search
pub async fn top_search(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Json<SearchQueriesReport> {
    Json(state.admin_stats().top_search_queries(false).await)
}

/// GET /api/admin/top_pages
pub async fn top_pages(_admin: RequireAdmin, State(state): State<AppState>) -> Json<TopPagesReport> {
    Json(state.admin_stats().top_pages().await)
}

/// GET /api/admin/new_users
pub async fn new_users(_admin: RequireAdmin, State(state): State<AppState>) -> Json<NewUsersReport> {
    Json(state.admin_stats().new_users().await)
}

/// GET /api/admin/active_users
pub async fn active_users(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Json<ActiveUsersReport> {
    Json(state.admin_stats().active_users().await)
}

/// GET /api/admin/user_stats/{id}
pub async fn user_stats(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserStats>> {
    state
        .admin_stats()
        .user_stats(id)
        .await?
        .map(Json)
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))
}

/// GET /api/admin/full_report
pub async fn full_report(_admin: RequireAdmin, State(state): State<AppState>) -> Json<FullReport> {
    Json(state.admin_stats().full_report().await)
}

/// GET /api/admin/ai_report
///
/// Full report plus the LLM summary. Always 200; a failed summary is
/// reported in the `error` field.
pub async fn ai_report(_admin: RequireAdmin, State(state): State<AppState>) -> Json<AiReport> {
    Json(state.admin_stats().ai_report().await)
}
