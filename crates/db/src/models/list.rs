//! Movie list model and DTOs.

use moviehub_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `movie_lists` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MovieList {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub owner_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A list together with the number of movies it holds.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MovieListSummary {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub owner_id: DbId,
    pub movie_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new list.
#[derive(Debug, Clone)]
pub struct CreateList {
    pub owner_id: DbId,
    pub title: String,
    pub description: Option<String>,
}

/// DTO for updating an existing list. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateList {
    pub title: Option<String>,
    pub description: Option<String>,
}
