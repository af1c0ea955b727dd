//! Handlers for the `/reviews` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use moviehub_core::error::CoreError;
use moviehub_core::rating::validate_review_rating;
use moviehub_core::roles::ensure_owner_or_admin;
use moviehub_core::search::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use moviehub_core::types::DbId;
use moviehub_db::models::review::{CreateReview, Review, UpdateReview};
use moviehub_db::repositories::{MovieRepo, ReviewRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::state::AppState;

/// Request body for `POST /reviews`.
#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub movie_id: DbId,
    pub rating: i32,
    pub content: Option<String>,
}

/// Request body for `PUT /reviews/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateReviewRequest {
    pub rating: Option<i32>,
    pub content: Option<String>,
}

/// POST /api/reviews
///
/// One review per user and movie. Returns 201.
pub async fn create_review(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<CreateReviewRequest>,
) -> AppResult<(StatusCode, Json<Review>)> {
    validate_review_rating(input.rating)?;

    if MovieRepo::find_by_id(&state.pool, input.movie_id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Movie",
            id: input.movie_id,
        }));
    }

    let existing =
        ReviewRepo::find_by_author_and_movie(&state.pool, auth_user.user_id, input.movie_id)
            .await?;
    if existing.is_some() {
        return Err(AppError::Core(CoreError::Validation(
            "You have already reviewed this movie".into(),
        )));
    }

    let review = ReviewRepo::create(
        &state.pool,
        &CreateReview {
            author_id: auth_user.user_id,
            movie_id: input.movie_id,
            rating: input.rating,
            content: input.content,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(review)))
}

/// PUT /api/reviews/{id}
///
/// Author or admin only.
pub async fn update_review(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateReviewRequest>,
) -> AppResult<Json<Review>> {
    if let Some(rating) = input.rating {
        validate_review_rating(rating)?;
    }

    let review = find_review(&state, id).await?;
    ensure_owner_or_admin(
        review.author_id,
        auth_user.user_id,
        &auth_user.role,
        "update this review",
    )?;

    let update = UpdateReview {
        rating: input.rating,
        content: input.content,
    };
    let updated = ReviewRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Review", id }))?;

    Ok(Json(updated))
}

/// DELETE /api/reviews/{id}
///
/// Author or admin only. Returns 204.
pub async fn delete_review(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let review = find_review(&state, id).await?;
    ensure_owner_or_admin(
        review.author_id,
        auth_user.user_id,
        &auth_user.role,
        "delete this review",
    )?;

    if ReviewRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Review", id }))
    }
}

/// GET /api/reviews/movie/{movie_id}
pub async fn list_movie_reviews(
    State(state): State<AppState>,
    Path(movie_id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Vec<Review>>> {
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.skip);
    let reviews = ReviewRepo::list_by_movie(&state.pool, movie_id, limit, offset).await?;
    Ok(Json(reviews))
}

/// GET /api/reviews/user/{user_id}
pub async fn list_user_reviews(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Vec<Review>>> {
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.skip);
    let reviews = ReviewRepo::list_by_author(&state.pool, user_id, limit, offset).await?;
    Ok(Json(reviews))
}

async fn find_review(state: &AppState, id: DbId) -> AppResult<Review> {
    ReviewRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Review", id }))
}
