//! Yandex OAuth login flow.
//!
//! Both endpoints answer with redirects. The callback never surfaces an
//! error page; failures send the browser back to the frontend login page
//! with an `error` reason.

use axum::extract::{Query, State};
use axum::response::Redirect;
use moviehub_core::error::CoreError;
use moviehub_db::models::user::{CreateUser, User};
use moviehub_db::repositories::UserRepo;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::hash_password;
use crate::auth::yandex::{OAuthError, YandexUserInfo};
use crate::error::{AppError, AppResult};
use crate::handlers::users::create_default_lists;
use crate::state::AppState;

/// Attempts at `login_2`, `login_3`, ... before falling back to a random suffix.
const MAX_USERNAME_SUFFIX: u32 = 50;

/// Query string Yandex appends to the callback URL.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
}

/// GET /api/auth/yandex
///
/// Redirect the browser to the Yandex consent page. 500 when OAuth is not configured.
pub async fn yandex_login(State(state): State<AppState>) -> AppResult<Redirect> {
    let url = state.yandex_oauth().authorize_url().map_err(|e| match e {
        OAuthError::NotConfigured => AppError::InternalError("Yandex OAuth не настроен".into()),
        other => AppError::InternalError(other.to_string()),
    })?;
    Ok(Redirect::temporary(&url))
}

/// GET /api/auth/yandex/callback
///
/// Exchange the code, find or create the account and hand an access token
/// to the frontend.
pub async fn yandex_callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Redirect {
    let frontend = &state.config.frontend_url;

    if params.error.is_some() {
        return login_redirect(frontend, "error=oauth_cancelled");
    }
    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        return login_redirect(frontend, "error=no_code");
    };

    let info = match state.yandex_oauth().fetch_user(&code).await {
        Ok(info) => info,
        Err(e) => {
            tracing::warn!(error = %e, "Yandex OAuth exchange failed");
            return login_redirect(frontend, "error=oauth_failed");
        }
    };

    match sign_in_yandex_user(&state, &info).await {
        Ok(token) => login_redirect(frontend, &format!("token={token}&success=true")),
        Err(e) => {
            tracing::error!(error = %e, yandex_id = %info.id, "Yandex OAuth sign-in failed");
            login_redirect(frontend, "error=oauth_error")
        }
    }
}

fn login_redirect(frontend: &str, query: &str) -> Redirect {
    Redirect::temporary(&format!("{frontend}/login?{query}"))
}

/// Find the account by email (creating it on first login) and issue an access token.
async fn sign_in_yandex_user(state: &AppState, info: &YandexUserInfo) -> AppResult<String> {
    let email = info.email().trim().to_lowercase();

    let user = match UserRepo::find_by_email(&state.pool, &email).await? {
        Some(user) => user,
        None => create_yandex_user(state, &email, &info.preferred_username()).await?,
    };

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    generate_access_token(user.id, &user.username, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))
}

async fn create_yandex_user(state: &AppState, email: &str, preferred: &str) -> AppResult<User> {
    let username = available_username(state, preferred).await?;

    // The account can only be used through OAuth until the owner sets a password.
    let random_password = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
    let hashed_password = hash_password(&random_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: email.to_string(),
            username,
            hashed_password,
            role: None,
        },
    )
    .await?;
    create_default_lists(state, user.id).await;

    tracing::info!(user_id = user.id, "User registered via Yandex OAuth");
    Ok(user)
}

/// `preferred` if free, else the first free `preferred_N`.
async fn available_username(state: &AppState, preferred: &str) -> AppResult<String> {
    if UserRepo::find_by_username(&state.pool, preferred).await?.is_none() {
        return Ok(preferred.to_string());
    }
    for n in 2..=MAX_USERNAME_SUFFIX {
        let candidate = format!("{preferred}_{n}");
        if UserRepo::find_by_username(&state.pool, &candidate).await?.is_none() {
            return Ok(candidate);
        }
    }
    let random = Uuid::new_v4().simple().to_string();
    Ok(format!("{preferred}_{}", &random[..8]))
}
