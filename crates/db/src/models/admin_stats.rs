//! Aggregate rows produced by the admin statistics queries.

use moviehub_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Total row counts of the main entity tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow, Serialize)]
pub struct EntityCounts {
    pub movies_count: i64,
    pub users_count: i64,
    pub reviews_count: i64,
    pub lists_count: i64,
}

/// One entry of the "top movies by views" ranking.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct MovieViewCount {
    pub movie_id: DbId,
    pub title: String,
    pub views: i64,
}

/// One entry of a search-query ranking.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct QueryCount {
    pub query: String,
    pub count: i64,
}

/// One entry of the "top pages" ranking.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct PathCount {
    pub path: String,
    pub count: i64,
}

/// Per-user snapshot used by `user_stats`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserStats {
    pub id: DbId,
    pub email: String,
    pub username: String,
    pub created_at: Timestamp,
    pub reviews_count: i64,
    pub lists_count: i64,
}
