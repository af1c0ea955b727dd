pub mod admin;
pub mod health;
pub mod lists;
pub mod movies;
pub mod oauth;
pub mod reviews;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /users/register                 register (public)
/// /users/login                    login (public)
/// /users/refresh                  refresh (public)
/// /users/logout                   logout (requires auth)
/// /users/me                       get, update (requires auth)
/// /users/me/password              change password (requires auth)
/// /users/{id}                     profile (public), update (admin only)
///
/// /movies                         list (public), create (admin only)
/// /movies/top                     top rated
/// /movies/search                  title search (recorded)
/// /movies/{id}                    detail (view recorded)
/// /movies/{id}/similar            similar movies
///
/// /reviews                        create (requires auth)
/// /reviews/{id}                   update, delete (author or admin)
/// /reviews/movie/{movie_id}       reviews of a movie
/// /reviews/user/{user_id}         reviews by a user
///
/// /lists                          create (requires auth)
/// /lists/{id}                     get, update, delete
/// /lists/{id}/movies              add, remove movies
/// /lists/user/{user_id}           lists of a user
///
/// /auth/yandex                    OAuth redirect
/// /auth/yandex/callback           OAuth callback
///
/// /admin/*                        analytics dashboard (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/movies", movies::router())
        .nest("/reviews", reviews::router())
        .nest("/lists", lists::router())
        .nest("/auth", oauth::router())
        .nest("/admin", admin::router())
}
