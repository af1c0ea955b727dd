//! Handlers for the `/lists` resource (user movie lists).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use moviehub_core::error::CoreError;
use moviehub_core::lists::dedup_movie_ids;
use moviehub_core::roles::ensure_owner_or_admin;
use moviehub_core::types::DbId;
use moviehub_db::models::list::{CreateList, MovieList, MovieListSummary, UpdateList};
use moviehub_db::models::movie::Movie;
use moviehub_db::repositories::ListRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `POST /lists`.
#[derive(Debug, Deserialize)]
pub struct CreateListRequest {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub movie_ids: Vec<DbId>,
}

/// Request body for `PUT /lists/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateListRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Request body for adding or removing movies.
#[derive(Debug, Deserialize)]
pub struct ListMoviesRequest {
    pub movie_ids: Vec<DbId>,
}

/// A list with its movies.
#[derive(Debug, Serialize)]
pub struct ListDetail {
    #[serde(flatten)]
    pub list: MovieList,
    pub movie_count: usize,
    pub movies: Vec<Movie>,
}

/// POST /api/lists
///
/// Create a list owned by the caller, optionally seeded with movies.
pub async fn create_list(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<CreateListRequest>,
) -> AppResult<(StatusCode, Json<ListDetail>)> {
    let title = validate_title(&input.title)?;

    let movie_ids = dedup_movie_ids(&input.movie_ids);
    let list = ListRepo::create_with_movies(
        &state.pool,
        &CreateList {
            owner_id: auth_user.user_id,
            title,
            description: input.description,
        },
        &movie_ids,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(list_detail(&state, list).await?)))
}

/// GET /api/lists/{id}
pub async fn get_list(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ListDetail>> {
    let list = find_list(&state, id).await?;
    Ok(Json(list_detail(&state, list).await?))
}

/// GET /api/lists/user/{user_id}
///
/// All lists of one user with their movie counts.
pub async fn list_user_lists(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<Vec<MovieListSummary>>> {
    let lists = ListRepo::list_by_owner(&state.pool, user_id).await?;
    Ok(Json(lists))
}

/// PUT /api/lists/{id}
///
/// Owner or admin only.
pub async fn update_list(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateListRequest>,
) -> AppResult<Json<ListDetail>> {
    let list = find_owned_list(&state, &auth_user, id, "update this list").await?;

    let title = input.title.as_deref().map(validate_title).transpose()?;
    let updated = ListRepo::update(
        &state.pool,
        list.id,
        &UpdateList {
            title,
            description: input.description,
        },
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound { entity: "List", id }))?;

    Ok(Json(list_detail(&state, updated).await?))
}

/// DELETE /api/lists/{id}
///
/// Owner or admin only. Returns 204.
pub async fn delete_list(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    find_owned_list(&state, &auth_user, id, "delete this list").await?;

    if ListRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "List", id }))
    }
}

/// POST /api/lists/{id}/movies
///
/// Add movies. Unknown ids and movies already in the list are ignored.
pub async fn add_list_movies(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<ListMoviesRequest>,
) -> AppResult<Json<ListDetail>> {
    let list = find_owned_list(&state, &auth_user, id, "modify this list").await?;
    ListRepo::add_movies(&state.pool, list.id, &dedup_movie_ids(&input.movie_ids)).await?;
    Ok(Json(list_detail(&state, list).await?))
}

/// DELETE /api/lists/{id}/movies
///
/// Remove movies. Ids not in the list are ignored.
pub async fn remove_list_movies(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<ListMoviesRequest>,
) -> AppResult<Json<ListDetail>> {
    let list = find_owned_list(&state, &auth_user, id, "modify this list").await?;
    ListRepo::remove_movies(&state.pool, list.id, &dedup_movie_ids(&input.movie_ids)).await?;
    Ok(Json(list_detail(&state, list).await?))
}

fn validate_title(title: &str) -> AppResult<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "List title must not be empty".into(),
        )));
    }
    Ok(trimmed.to_string())
}

async fn find_list(state: &AppState, id: DbId) -> AppResult<MovieList> {
    ListRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "List", id }))
}

async fn find_owned_list(
    state: &AppState,
    auth_user: &AuthUser,
    id: DbId,
    action: &str,
) -> AppResult<MovieList> {
    let list = find_list(state, id).await?;
    ensure_owner_or_admin(list.owner_id, auth_user.user_id, &auth_user.role, action)?;
    Ok(list)
}

async fn list_detail(state: &AppState, list: MovieList) -> AppResult<ListDetail> {
    let movies = ListRepo::list_movies(&state.pool, list.id).await?;
    Ok(ListDetail {
        list,
        movie_count: movies.len(),
        movies,
    })
}
