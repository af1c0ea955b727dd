//! Route definitions for the `/movies` catalog.

use axum::routing::get;
use axum::Router;

use crate::handlers::movies;
use crate::state::AppState;

/// Routes mounted at `/movies`.
///
/// ```text
/// GET  /              -> list_movies
/// POST /              -> create_movie (admin only)
/// GET  /top           -> top_movies
/// GET  /search        -> search_movies
/// GET  /{id}          -> get_movie
/// GET  /{id}/similar  -> similar_movies
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(movies::list_movies).post(movies::create_movie))
        .route("/top", get(movies::top_movies))
        .route("/search", get(movies::search_movies))
        .route("/{id}", get(movies::get_movie))
        .route("/{id}/similar", get(movies::similar_movies))
}
