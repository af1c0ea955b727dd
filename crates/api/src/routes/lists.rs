//! Route definitions for the `/lists` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::lists;
use crate::state::AppState;

/// Routes mounted at `/lists`.
///
/// ```text
/// POST   /               -> create_list (requires auth)
/// GET    /{id}           -> get_list
/// PUT    /{id}           -> update_list (owner or admin)
/// DELETE /{id}           -> delete_list (owner or admin)
/// POST   /{id}/movies    -> add_list_movies (owner or admin)
/// DELETE /{id}/movies    -> remove_list_movies (owner or admin)
/// GET    /user/{user_id} -> list_user_lists
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(lists::create_list))
        .route(
            "/{id}",
            get(lists::get_list)
                .put(lists::update_list)
                .delete(lists::delete_list),
        )
        .route(
            "/{id}/movies",
            post(lists::add_list_movies).delete(lists::remove_list_movies),
        )
        .route("/user/{user_id}", get(lists::list_user_lists))
}
