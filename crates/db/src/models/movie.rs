//! Movie entity model and DTOs.

use chrono::NaiveDate;
use moviehub_core::search::MovieSort;
use moviehub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A movie row from the `movies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Movie {
    pub id: DbId,
    pub kp_id: i64,
    pub title: String,
    pub english_title: Option<String>,
    pub kp_rating: Option<f64>,
    pub imdb_rating: Option<f64>,
    pub critics_rating: Option<f64>,
    pub site_rating: Option<f64>,
    pub combined_rating: Option<f64>,
    pub sum_votes: Option<i64>,
    pub fees_world: Option<i64>,
    pub budget: Option<i64>,
    pub poster_url: Option<String>,
    pub movie_length: Option<i32>,
    pub description: Option<String>,
    pub world_premiere: Option<NaiveDate>,
    pub year_release: Option<i32>,
    pub age_rating: Option<i32>,
    pub genres: Vec<String>,
    pub countries: Vec<String>,
    pub persons: Option<serde_json::Value>,
    pub director: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new movie.
///
/// `combined_rating` is not accepted from callers; the repository receives it
/// already derived from the source ratings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateMovie {
    pub kp_id: i64,
    pub title: String,
    pub english_title: Option<String>,
    pub kp_rating: Option<f64>,
    pub imdb_rating: Option<f64>,
    pub critics_rating: Option<f64>,
    pub site_rating: Option<f64>,
    pub sum_votes: Option<i64>,
    pub fees_world: Option<i64>,
    pub budget: Option<i64>,
    pub poster_url: Option<String>,
    pub movie_length: Option<i32>,
    pub description: Option<String>,
    pub world_premiere: Option<NaiveDate>,
    pub year_release: Option<i32>,
    pub age_rating: Option<i32>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub countries: Vec<String>,
    pub persons: Option<serde_json::Value>,
    pub director: Option<serde_json::Value>,
}

/// Catalog filters. `None` fields do not restrict the result.
#[derive(Debug, Clone, Default)]
pub struct MovieFilter {
    /// Exact genre name the movie must carry.
    pub genre: Option<String>,
    pub year: Option<i32>,
    /// Lower bound on `combined_rating`.
    pub min_rating: Option<f64>,
    /// Case-insensitive substring of the title.
    pub title_query: Option<String>,
    pub sort: MovieSort,
}
