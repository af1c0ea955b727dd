//! Route definitions for the `/users` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// POST /register     -> register
/// POST /login        -> login
/// POST /refresh      -> refresh
/// POST /logout       -> logout (requires auth)
/// GET  /me           -> get_me (requires auth)
/// PUT  /me           -> update_me (requires auth)
/// PUT  /me/password  -> change_password (requires auth)
/// GET  /{id}         -> get_profile
/// PUT  /{id}         -> admin_update_user (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route("/refresh", post(users::refresh))
        .route("/logout", post(users::logout))
        .route("/me", get(users::get_me).put(users::update_me))
        .route("/me/password", put(users::change_password))
        .route(
            "/{id}",
            get(users::get_profile).put(users::admin_update_user),
        )
}
