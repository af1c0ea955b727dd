//! Review entity model and DTOs.

use moviehub_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A review row from the `reviews` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Review {
    pub id: DbId,
    pub content: Option<String>,
    pub rating: i32,
    pub author_id: DbId,
    pub movie_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new review.
#[derive(Debug, Clone)]
pub struct CreateReview {
    pub author_id: DbId,
    pub movie_id: DbId,
    pub rating: i32,
    pub content: Option<String>,
}

/// DTO for updating an existing review. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateReview {
    pub rating: Option<i32>,
    pub content: Option<String>,
}
