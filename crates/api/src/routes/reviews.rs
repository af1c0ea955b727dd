//! Route definitions for the `/reviews` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::reviews;
use crate::state::AppState;

/// Routes mounted at `/reviews`.
///
/// ```text
/// POST   /                  -> create_review (requires auth)
/// PUT    /{id}              -> update_review (author or admin)
/// DELETE /{id}              -> delete_review (author or admin)
/// GET    /movie/{movie_id}  -> list_movie_reviews
/// GET    /user/{user_id}    -> list_user_reviews
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(reviews::create_review))
        .route(
            "/{id}",
            put(reviews::update_review).delete(reviews::delete_review),
        )
        .route("/movie/{movie_id}", get(reviews::list_movie_reviews))
        .route("/user/{user_id}", get(reviews::list_user_reviews))
}
