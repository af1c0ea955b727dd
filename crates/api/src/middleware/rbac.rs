//! Admin gate for the statistics dashboard, movie creation and user
//! management routes.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use moviehub_core::error::CoreError;
use moviehub_core::roles::is_admin;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// An [`AuthUser`] whose role is `admin`.
///
/// Missing or invalid tokens reject with 401 (from [`AuthUser`]); any other
/// role rejects with 403.
pub struct RequireAdmin(pub AuthUser);

impl RequireAdmin {
    fn check(user: AuthUser) -> Result<Self, AppError> {
        if is_admin(&user.role) {
            Ok(Self(user))
        } else {
            tracing::debug!(user_id = user.user_id, role = %user.role, "Admin route denied");
            Err(AppError::Core(CoreError::Forbidden("Admin role required".into())))
        }
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        Self::check(user)
    }
}
