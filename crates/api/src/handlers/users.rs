//! Handlers for the `/users` resource: registration, authentication and
//! profiles.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use moviehub_core::error::CoreError;
use moviehub_core::lists::DEFAULT_LIST_TITLES;
use moviehub_core::roles::validate_role;
use moviehub_core::types::DbId;
use moviehub_db::models::list::CreateList;
use moviehub_db::models::session::CreateSession;
use moviehub_db::models::user::{CreateUser, UpdateUser, User, UserActivityCounts, UserResponse};
use moviehub_db::repositories::{ListRepo, SessionRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /users/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, max = 50, message = "Username must be 1-50 characters"))]
    pub username: String,
    pub password: String,
}

/// Request body for `POST /users/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /users/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Request body for `PUT /users/me`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMeRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Username must be 1-50 characters"))]
    pub username: Option<String>,
}

/// Request body for `PUT /users/me/password`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Successful authentication response returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

/// Public profile: the user plus review and list totals.
#[derive(Debug, Serialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: UserResponse,
    #[serde(flatten)]
    pub counts: UserActivityCounts,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/users/register
///
/// Create an account with the default lists. Returns 201.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;
    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let email = input.email.trim().to_lowercase();
    let username = input.username.trim().to_string();
    ensure_unique_identity(&state, Some(&email), Some(&username), None).await?;

    let hashed_password = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email,
            username,
            hashed_password,
            role: None,
        },
    )
    .await?;

    create_default_lists(&state, user.id).await;

    tracing::info!(user_id = user.id, "User registered");
    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// POST /api/users/login
///
/// Authenticate with email + password. Returns access and refresh tokens.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let invalid = || {
        AppError::Core(CoreError::Unauthorized(
            "Incorrect email or password".into(),
        ))
    };

    let user = UserRepo::find_by_email(&state.pool, &input.email.trim().to_lowercase())
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.hashed_password)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(invalid());
    }

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let response = create_auth_response(&state, &user).await?;
    Ok(Json(response))
}

/// POST /api/users/refresh
///
/// Exchange a valid refresh token for a new token pair. The old session is revoked.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let invalid = || {
        AppError::Core(CoreError::Unauthorized(
            "Invalid or expired refresh token".into(),
        ))
    };

    let token_hash = hash_refresh_token(&input.refresh_token);
    let session = SessionRepo::find_active_by_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(invalid)?;

    // Token rotation: a concurrent refresh with the same token loses here.
    if !SessionRepo::revoke(&state.pool, session.id).await? {
        return Err(invalid());
    }

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let response = create_auth_response(&state, &user).await?;
    Ok(Json(response))
}

/// POST /api/users/logout
///
/// Revoke all sessions for the authenticated user. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, auth_user: AuthUser) -> AppResult<StatusCode> {
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, auth_user.user_id).await?;
    tracing::info!(user_id = auth_user.user_id, revoked, "User logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/users/me
pub async fn get_me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<UserResponse>> {
    let user = find_user(&state, auth_user.user_id).await?;
    Ok(Json(UserResponse::from(&user)))
}

/// PUT /api/users/me
///
/// Change the caller's email and/or username.
pub async fn update_me(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<UpdateMeRequest>,
) -> AppResult<Json<UserResponse>> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let update = UpdateUser {
        email: input.email.map(|e| e.trim().to_lowercase()),
        username: input.username.map(|u| u.trim().to_string()),
        ..Default::default()
    };
    let user = apply_user_update(&state, auth_user.user_id, update).await?;
    Ok(Json(UserResponse::from(&user)))
}

/// PUT /api/users/me/password
///
/// Change the caller's password after verifying the old one.
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    let user = find_user(&state, auth_user.user_id).await?;

    let old_valid = verify_password(&input.old_password, &user.hashed_password)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !old_valid {
        return Err(AppError::Core(CoreError::Validation(
            "Incorrect old password".into(),
        )));
    }

    validate_password_strength(&input.new_password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let hashed = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, user.id, &hashed).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/users/{id}
///
/// Public profile with review and list totals.
pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserProfile>> {
    let user = find_user(&state, id).await?;
    let counts = UserRepo::activity_counts(&state.pool, id).await?;
    Ok(Json(UserProfile {
        user: UserResponse::from(&user),
        counts,
    }))
}

/// PUT /api/users/{id}
///
/// Admin-only update of any user, including role and active flag.
pub async fn admin_update_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<Json<UserResponse>> {
    if let Some(role) = &input.role {
        validate_role(role)?;
    }

    let update = UpdateUser {
        email: input.email.map(|e| e.trim().to_lowercase()),
        username: input.username.map(|u| u.trim().to_string()),
        ..input
    };
    let user = apply_user_update(&state, id, update).await?;

    tracing::info!(admin_id = admin.user_id, user_id = id, "User updated by admin");
    Ok(Json(UserResponse::from(&user)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_user(state: &AppState, id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))
}

/// Reject an email or username already held by another account.
async fn ensure_unique_identity(
    state: &AppState,
    email: Option<&str>,
    username: Option<&str>,
    current_user: Option<DbId>,
) -> AppResult<()> {
    let taken_by_other = |owner: Option<User>| owner.is_some_and(|u| Some(u.id) != current_user);

    if let Some(email) = email {
        if taken_by_other(UserRepo::find_by_email(&state.pool, email).await?) {
            return Err(AppError::Core(CoreError::Validation(
                "Email already registered".into(),
            )));
        }
    }
    if let Some(username) = username {
        if taken_by_other(UserRepo::find_by_username(&state.pool, username).await?) {
            return Err(AppError::Core(CoreError::Validation(
                "Username already taken".into(),
            )));
        }
    }
    Ok(())
}

async fn apply_user_update(state: &AppState, id: DbId, update: UpdateUser) -> AppResult<User> {
    ensure_unique_identity(
        state,
        update.email.as_deref(),
        update.username.as_deref(),
        Some(id),
    )
    .await?;

    UserRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))
}

/// Create the default lists of a new account. Failures are logged and skipped.
pub(crate) async fn create_default_lists(state: &AppState, user_id: DbId) {
    for title in DEFAULT_LIST_TITLES {
        let input = CreateList {
            owner_id: user_id,
            title: title.to_string(),
            description: None,
        };
        if let Err(e) = ListRepo::create(&state.pool, &input).await {
            tracing::warn!(user_id, title, error = %e, "Failed to create default list");
        }
    }
}

/// Generate access + refresh tokens, persist a session row, and build the response.
pub(crate) async fn create_auth_response(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let access_token = generate_access_token(user.id, &user.username, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_plaintext, refresh_hash) = generate_refresh_token();
    let expires_at =
        Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);

    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: refresh_hash,
            expires_at,
        },
    )
    .await?;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        token_type: "bearer",
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user: UserResponse::from(user),
    })
}
