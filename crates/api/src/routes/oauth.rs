//! Route definitions for OAuth logins.

use axum::routing::get;
use axum::Router;

use crate::handlers::oauth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// GET /yandex           -> yandex_login (redirect)
/// GET /yandex/callback  -> yandex_callback (redirect)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/yandex", get(oauth::yandex_login))
        .route("/yandex/callback", get(oauth::yandex_callback))
}
