//! Append-only activity log rows: searches, page views, movie views and
//! persisted errors.
//!
//! Every `created_at` is assigned by the database on insert.

use moviehub_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Default severity stored in `error_logs.level`.
pub const ERROR_LEVEL: &str = "ERROR";

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SearchLog {
    pub id: DbId,
    pub query: String,
    pub has_results: bool,
    pub results_count: i32,
    pub user_id: Option<DbId>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PageViewLog {
    pub id: DbId,
    pub path: String,
    pub user_id: Option<DbId>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MovieViewLog {
    pub id: DbId,
    pub movie_id: DbId,
    pub user_id: Option<DbId>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ErrorLog {
    pub id: DbId,
    pub level: String,
    pub message: String,
    pub details: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for recording one search execution.
#[derive(Debug, Clone)]
pub struct NewSearchLog {
    pub query: String,
    pub results_count: i32,
    pub user_id: Option<DbId>,
}

impl NewSearchLog {
    pub fn has_results(&self) -> bool {
        self.results_count > 0
    }
}

/// DTO for recording one persisted error.
#[derive(Debug, Clone)]
pub struct NewErrorLog {
    /// Defaults to [`ERROR_LEVEL`] if omitted.
    pub level: Option<String>,
    pub message: String,
    pub details: Option<String>,
}
