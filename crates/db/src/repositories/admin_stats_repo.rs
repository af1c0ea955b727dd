//! Read-only aggregate queries behind the admin analytics dashboard.
//!
//! Every method propagates `sqlx::Error`; deciding whether a failure
//! degrades to an empty result is left to the caller.

use moviehub_core::analytics::TimeWindow;
use moviehub_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::activity::ErrorLog;
use crate::models::admin_stats::{MovieViewCount, PathCount, QueryCount, UserStats};

/// Entity tables whose total row count is reported by `db_check`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountedTable {
    Movies,
    Users,
    Reviews,
    Lists,
}

impl CountedTable {
    fn table_name(self) -> &'static str {
        match self {
            CountedTable::Movies => "movies",
            CountedTable::Users => "users",
            CountedTable::Reviews => "reviews",
            CountedTable::Lists => "movie_lists",
        }
    }
}

/// Aggregations over the entity and activity log tables.
pub struct AdminStatsRepo;

impl AdminStatsRepo {
    /// Total number of rows in `table`.
    pub async fn count_rows(pool: &PgPool, table: CountedTable) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM {}", table.table_name());
        sqlx::query_scalar::<_, i64>(&query).fetch_one(pool).await
    }

    /// The most recent `limit` error log rows, newest first.
    pub async fn recent_errors(pool: &PgPool, limit: i64) -> Result<Vec<ErrorLog>, sqlx::Error> {
        sqlx::query_as::<_, ErrorLog>(
            "SELECT id, level, message, details, created_at FROM error_logs
             ORDER BY created_at DESC, id DESC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Movies ranked by detail views recorded at or after `since`.
    ///
    /// Ties are ordered by movie id so the ranking is deterministic.
    pub async fn top_movies_by_views(
        pool: &PgPool,
        since: Timestamp,
        limit: i64,
    ) -> Result<Vec<MovieViewCount>, sqlx::Error> {
        sqlx::query_as::<_, MovieViewCount>(
            "SELECT m.id AS movie_id, m.title, COUNT(v.id) AS views
             FROM movie_view_logs v
             JOIN movies m ON m.id = v.movie_id
             WHERE v.created_at >= $1
             GROUP BY m.id, m.title
             ORDER BY views DESC, m.id ASC
             LIMIT $2",
        )
        .bind(since)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Reviews created inside `window`.
    pub async fn count_reviews_in(pool: &PgPool, window: &TimeWindow) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM reviews WHERE created_at >= $1 AND created_at < $2",
        )
        .bind(window.start)
        .bind(window.end)
        .fetch_one(pool)
        .await
    }

    /// Users registered inside `window`.
    pub async fn count_users_in(pool: &PgPool, window: &TimeWindow) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE created_at >= $1 AND created_at < $2",
        )
        .bind(window.start)
        .bind(window.end)
        .fetch_one(pool)
        .await
    }

    /// Distinct authors of reviews created at or after `since`.
    pub async fn count_active_reviewers(pool: &PgPool, since: Timestamp) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(DISTINCT author_id) FROM reviews WHERE created_at >= $1",
        )
        .bind(since)
        .fetch_one(pool)
        .await
    }

    /// Snapshot of one user with review and list counts.
    ///
    /// Returns `None` if no user with the given `id` exists.
    pub async fn user_stats(pool: &PgPool, id: DbId) -> Result<Option<UserStats>, sqlx::Error> {
        sqlx::query_as::<_, UserStats>(
            "SELECT u.id, u.email, u.username, u.created_at,
                    (SELECT COUNT(*) FROM reviews r WHERE r.author_id = u.id) AS reviews_count,
                    (SELECT COUNT(*) FROM movie_lists l WHERE l.owner_id = u.id) AS lists_count
             FROM users u
             WHERE u.id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Search queries grouped by exact text, most frequent first.
    ///
    /// With `only_without_results`, only executions that found nothing count.
    pub async fn top_search_queries(
        pool: &PgPool,
        limit: i64,
        only_without_results: bool,
    ) -> Result<Vec<QueryCount>, sqlx::Error> {
        sqlx::query_as::<_, QueryCount>(
            "SELECT query, COUNT(id) AS count
             FROM search_logs
             WHERE ($1 = false OR has_results = false)
             GROUP BY query
             ORDER BY count DESC, query ASC
             LIMIT $2",
        )
        .bind(only_without_results)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Request paths grouped by exact text, most viewed first.
    pub async fn top_pages(pool: &PgPool, limit: i64) -> Result<Vec<PathCount>, sqlx::Error> {
        sqlx::query_as::<_, PathCount>(
            "SELECT path, COUNT(id) AS count
             FROM page_view_logs
             GROUP BY path
             ORDER BY count DESC, path ASC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
