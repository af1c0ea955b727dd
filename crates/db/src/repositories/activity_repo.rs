//! Repository for the append-only activity log tables.
//!
//! Writers only insert; nothing in the service updates or deletes log rows.
//! Callers treat every write as best-effort.

use moviehub_core::types::DbId;
use sqlx::PgPool;

use crate::models::activity::{
    ErrorLog, MovieViewLog, NewErrorLog, NewSearchLog, PageViewLog, SearchLog, ERROR_LEVEL,
};

/// Inserts into `search_logs`, `page_view_logs`, `movie_view_logs` and
/// `error_logs`.
pub struct ActivityLogRepo;

impl ActivityLogRepo {
    /// Record one search execution.
    pub async fn record_search(
        pool: &PgPool,
        input: &NewSearchLog,
    ) -> Result<SearchLog, sqlx::Error> {
        sqlx::query_as::<_, SearchLog>(
            "INSERT INTO search_logs (query, has_results, results_count, user_id)
             VALUES ($1, $2, $3, $4)
             RETURNING id, query, has_results, results_count, user_id, created_at",
        )
        .bind(&input.query)
        .bind(input.has_results())
        .bind(input.results_count)
        .bind(input.user_id)
        .fetch_one(pool)
        .await
    }

    /// Record one page view.
    pub async fn record_page_view(
        pool: &PgPool,
        path: &str,
        user_id: Option<DbId>,
    ) -> Result<PageViewLog, sqlx::Error> {
        sqlx::query_as::<_, PageViewLog>(
            "INSERT INTO page_view_logs (path, user_id)
             VALUES ($1, $2)
             RETURNING id, path, user_id, created_at",
        )
        .bind(path)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Record one movie-detail view.
    pub async fn record_movie_view(
        pool: &PgPool,
        movie_id: DbId,
        user_id: Option<DbId>,
    ) -> Result<MovieViewLog, sqlx::Error> {
        sqlx::query_as::<_, MovieViewLog>(
            "INSERT INTO movie_view_logs (movie_id, user_id)
             VALUES ($1, $2)
             RETURNING id, movie_id, user_id, created_at",
        )
        .bind(movie_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Persist one error event.
    pub async fn record_error(pool: &PgPool, input: &NewErrorLog) -> Result<ErrorLog, sqlx::Error> {
        sqlx::query_as::<_, ErrorLog>(
            "INSERT INTO error_logs (level, message, details)
             VALUES ($1, $2, $3)
             RETURNING id, level, message, details, created_at",
        )
        .bind(input.level.as_deref().unwrap_or(ERROR_LEVEL))
        .bind(&input.message)
        .bind(&input.details)
        .fetch_one(pool)
        .await
    }
}
