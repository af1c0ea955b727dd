//! Review rating bounds and the derived `combined_rating` of a movie.

use crate::error::CoreError;

/// Lowest rating a review may carry.
pub const MIN_REVIEW_RATING: i32 = 0;
/// Highest rating a review may carry.
pub const MAX_REVIEW_RATING: i32 = 10;

/// Reject review ratings outside `0..=10`.
pub fn validate_review_rating(rating: i32) -> Result<(), CoreError> {
    if (MIN_REVIEW_RATING..=MAX_REVIEW_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Rating must be between {MIN_REVIEW_RATING} and {MAX_REVIEW_RATING}, got {rating}"
        )))
    }
}

/// Average of the site, IMDB and critics ratings that are present and
/// positive, rounded to one decimal place.
///
/// Returns `None` when no source rating is usable. A zero rating means
/// "not rated yet" in the imported data, so it is skipped.
pub fn combined_rating(site: Option<f64>, imdb: Option<f64>, critics: Option<f64>) -> Option<f64> {
    let ratings: Vec<f64> = [site, imdb, critics]
        .into_iter()
        .flatten()
        .filter(|r| r.is_finite() && *r > 0.0)
        .collect();

    if ratings.is_empty() {
        return None;
    }

    let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
    Some((mean * 10.0).round() / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds_are_inclusive() {
        assert!(validate_review_rating(0).is_ok());
        assert!(validate_review_rating(10).is_ok());
        assert!(validate_review_rating(-1).is_err());
        assert!(validate_review_rating(11).is_err());
    }

    #[test]
    fn combined_rating_averages_present_values() {
        assert_eq!(combined_rating(Some(8.0), Some(7.0), None), Some(7.5));
        assert_eq!(combined_rating(Some(7.3), Some(8.1), Some(6.6)), Some(7.3));
    }

    #[test]
    fn combined_rating_skips_zero_and_missing() {
        assert_eq!(combined_rating(Some(0.0), Some(9.0), None), Some(9.0));
        assert_eq!(combined_rating(None, None, None), None);
        assert_eq!(combined_rating(Some(0.0), None, Some(0.0)), None);
    }
}
