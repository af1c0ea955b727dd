//! Pagination clamping, search-query normalisation and movie sort orders.

use serde::Deserialize;

use crate::error::CoreError;

/// Default page size for movie catalog listings.
pub const DEFAULT_MOVIE_LIMIT: i64 = 250;
/// Maximum page size for movie catalog listings.
pub const MAX_MOVIE_LIMIT: i64 = 250;
/// Default page size for `/movies/search`, reviews and lists.
pub const DEFAULT_PAGE_LIMIT: i64 = 50;
/// Maximum page size for `/movies/search`, reviews and lists.
pub const MAX_PAGE_LIMIT: i64 = 250;
/// Longest search string accepted; longer input is truncated.
pub const MAX_QUERY_CHARS: usize = 255;

/// Clamp a user-provided limit to `[1, max]`, falling back to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Trim a search string and cap its length. Blank input is rejected.
pub fn normalize_query(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Search query must not be empty".into()));
    }
    Ok(trimmed.chars().take(MAX_QUERY_CHARS).collect())
}

/// Escape `%`, `_` and `\` so user text matches literally inside `ILIKE`.
pub fn escape_like(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Sort orders accepted by the movie catalog (`?sort_by=`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovieSort {
    /// `combined_rating DESC, sum_votes DESC`.
    #[default]
    Rating,
    Year,
    Title,
    Votes,
}

impl MovieSort {
    /// SQL `ORDER BY` clause for this sort order. Ties always fall back to `id`.
    pub fn order_clause(self) -> &'static str {
        match self {
            MovieSort::Rating => {
                "combined_rating DESC NULLS LAST, sum_votes DESC NULLS LAST, id ASC"
            }
            MovieSort::Year => "year_release DESC NULLS LAST, id ASC",
            MovieSort::Title => "title ASC, id ASC",
            MovieSort::Votes => "sum_votes DESC NULLS LAST, id ASC",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_limit_uses_default_when_none() {
        assert_eq!(clamp_limit(None, 50, 250), 50);
    }

    #[test]
    fn clamp_limit_respects_max() {
        assert_eq!(clamp_limit(Some(1000), 50, 250), 250);
    }

    #[test]
    fn clamp_limit_floors_at_one() {
        assert_eq!(clamp_limit(Some(0), 50, 250), 1);
        assert_eq!(clamp_limit(Some(-3), 50, 250), 1);
    }

    #[test]
    fn clamp_offset_floors_at_zero() {
        assert_eq!(clamp_offset(None), 0);
        assert_eq!(clamp_offset(Some(-10)), 0);
        assert_eq!(clamp_offset(Some(40)), 40);
    }

    #[test]
    fn normalize_query_trims_and_rejects_blank() {
        assert_eq!(normalize_query("  dune ").unwrap(), "dune");
        assert!(normalize_query("   ").is_err());
    }

    #[test]
    fn normalize_query_caps_length_on_char_boundary() {
        let long = "я".repeat(MAX_QUERY_CHARS + 10);
        assert_eq!(normalize_query(&long).unwrap().chars().count(), MAX_QUERY_CHARS);
    }

    #[test]
    fn escape_like_escapes_wildcards() {
        assert_eq!(escape_like("100%_a\\b"), "100\\%\\_a\\\\b");
        assert_eq!(escape_like("Дюна"), "Дюна");
    }

    #[test]
    fn movie_sort_deserializes_lowercase() {
        let sort: MovieSort = serde_json::from_str("\"votes\"").unwrap();
        assert_eq!(sort, MovieSort::Votes);
        assert!(serde_json::from_str::<MovieSort>("\"budget\"").is_err());
    }
}
