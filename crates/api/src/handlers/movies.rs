//! Handlers for the `/movies` catalog.
//!
//! Searches and detail views are recorded in the activity log tables on a
//! best-effort basis.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use moviehub_core::error::CoreError;
use moviehub_core::rating::combined_rating;
use moviehub_core::search::{
    clamp_limit, clamp_offset, normalize_query, MovieSort, DEFAULT_MOVIE_LIMIT,
    DEFAULT_PAGE_LIMIT, MAX_MOVIE_LIMIT, MAX_PAGE_LIMIT,
};
use moviehub_core::types::DbId;
use moviehub_db::models::activity::NewSearchLog;
use moviehub_db::models::movie::{CreateMovie, Movie, MovieFilter};
use moviehub_db::repositories::{ActivityLogRepo, MovieRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::MaybeAuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Default number of similar movies returned.
const DEFAULT_SIMILAR_LIMIT: i64 = 10;
/// Upper bound for `/similar?limit=`.
const MAX_SIMILAR_LIMIT: i64 = 50;

/// Query parameters for `GET /movies` and `GET /movies/top`.
#[derive(Debug, Default, Deserialize)]
pub struct MovieListParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub min_rating: Option<f64>,
    pub sort_by: Option<MovieSort>,
    /// Title substring; the search is recorded in the search log.
    pub q: Option<String>,
}

/// Query parameters for `GET /movies/search`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

/// Query parameters for `GET /movies/{id}/similar`.
#[derive(Debug, Deserialize)]
pub struct SimilarParams {
    pub limit: Option<i64>,
}

/// GET /api/movies
///
/// Filtered, sorted catalog page.
pub async fn list_movies(
    State(state): State<AppState>,
    caller: MaybeAuthUser,
    Query(params): Query<MovieListParams>,
) -> AppResult<Json<Vec<Movie>>> {
    let sort = params.sort_by.unwrap_or_default();
    filtered_movies(&state, &caller, params, sort).await
}

/// GET /api/movies/top
///
/// Same filters as the catalog, always ordered by rating then votes.
pub async fn top_movies(
    State(state): State<AppState>,
    caller: MaybeAuthUser,
    Query(params): Query<MovieListParams>,
) -> AppResult<Json<Vec<Movie>>> {
    filtered_movies(&state, &caller, params, MovieSort::Rating).await
}

/// GET /api/movies/search
///
/// Case-insensitive title search. Every execution is recorded with its
/// result count.
pub async fn search_movies(
    State(state): State<AppState>,
    caller: MaybeAuthUser,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<Movie>>> {
    let query = normalize_query(&params.q)?;
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.skip);

    let movies = MovieRepo::search(&state.pool, &query, limit, offset).await?;
    record_search(&state, query, movies.len(), caller.user_id()).await;

    Ok(Json(movies))
}

/// GET /api/movies/{id}
///
/// Movie details. Each successful lookup is recorded as a movie view.
pub async fn get_movie(
    State(state): State<AppState>,
    caller: MaybeAuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Movie>> {
    let movie = MovieRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Movie", id }))?;

    if let Err(e) = ActivityLogRepo::record_movie_view(&state.pool, movie.id, caller.user_id()).await
    {
        tracing::warn!(movie_id = movie.id, error = %e, "Failed to record movie view");
    }

    Ok(Json(movie))
}

/// GET /api/movies/{id}/similar
///
/// Explicitly linked similar movies, or the best rated movies sharing the
/// first genre when no links exist. Unknown ids yield an empty list.
pub async fn similar_movies(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<SimilarParams>,
) -> AppResult<Json<Vec<Movie>>> {
    let limit = clamp_limit(params.limit, DEFAULT_SIMILAR_LIMIT, MAX_SIMILAR_LIMIT);

    let Some(movie) = MovieRepo::find_by_id(&state.pool, id).await? else {
        return Ok(Json(Vec::new()));
    };

    let linked = MovieRepo::list_linked_similar(&state.pool, movie.id, limit).await?;
    if !linked.is_empty() {
        return Ok(Json(linked));
    }

    let first_genre = movie.genres.first().map(String::as_str);
    let same_genre = MovieRepo::list_same_genre(&state.pool, movie.id, first_genre, limit).await?;
    Ok(Json(same_genre))
}

/// POST /api/movies
///
/// Admin-only. `combined_rating` is derived from the source ratings.
pub async fn create_movie(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateMovie>,
) -> AppResult<(StatusCode, Json<Movie>)> {
    if input.title.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Title must not be empty".into(),
        )));
    }
    if MovieRepo::find_by_kp_id(&state.pool, input.kp_id).await?.is_some() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Movie with kp_id {} already exists",
            input.kp_id
        ))));
    }

    let rating = combined_rating(input.site_rating, input.imdb_rating, input.critics_rating);
    let movie = MovieRepo::create(&state.pool, &input, rating).await?;

    tracing::info!(admin_id = admin.user_id, movie_id = movie.id, "Movie created");
    Ok((StatusCode::CREATED, Json(movie)))
}

async fn filtered_movies(
    state: &AppState,
    caller: &MaybeAuthUser,
    params: MovieListParams,
    sort: MovieSort,
) -> AppResult<Json<Vec<Movie>>> {
    let limit = clamp_limit(params.limit, DEFAULT_MOVIE_LIMIT, MAX_MOVIE_LIMIT);
    let offset = clamp_offset(params.skip);
    let title_query = params.q.as_deref().and_then(|q| normalize_query(q).ok());

    let filter = MovieFilter {
        genre: params.genre.filter(|g| !g.trim().is_empty()),
        year: params.year,
        min_rating: params.min_rating,
        title_query: title_query.clone(),
        sort,
    };
    let movies = MovieRepo::list(&state.pool, &filter, limit, offset).await?;

    if let Some(query) = title_query {
        record_search(state, query, movies.len(), caller.user_id()).await;
    }

    Ok(Json(movies))
}

/// Best-effort search log insert.
async fn record_search(state: &AppState, query: String, results: usize, user_id: Option<DbId>) {
    let entry = NewSearchLog {
        query,
        results_count: i32::try_from(results).unwrap_or(i32::MAX),
        user_id,
    };
    if let Err(e) = ActivityLogRepo::record_search(&state.pool, &entry).await {
        tracing::warn!(query = %entry.query, error = %e, "Failed to record search");
    }
}
