//! Route definitions for the admin analytics dashboard.

use axum::routing::get;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`. All require the `admin` role.
///
/// ```text
/// GET /status             -> status
/// GET /db_check           -> db_check
/// GET /logs_errors        -> logs_errors (?limit=)
/// GET /top_movies         -> top_movies (?period=24h|7d)
/// GET /new_reviews        -> new_reviews
/// GET /search_stats_none  -> search_stats_none
/// GET /top_search         -> top_search
/// GET /top_pages          -> top_pages
/// GET /new_users          -> new_users
/// GET /active_users       -> active_users
/// GET /user_stats/{id}    -> user_stats
/// GET /full_report        -> full_report
/// GET /ai_report          -> ai_report
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/status", get(admin::status))
        .route("/db_check", get(admin::db_check))
        .route("/logs_errors", get(admin::logs_errors))
        .route("/top_movies", get(admin::top_movies))
        .route("/new_reviews", get(admin::new_reviews))
        .route("/search_stats_none", get(admin::search_stats_none))
        .route("/top_search", get(admin::top_search))
        .route("/top_pages", get(admin::top_pages))
        .route("/new_users", get(admin::new_users))
        .route("/active_users", get(admin::active_users))
        .route("/user_stats/{id}", get(admin::user_stats))
        .route("/full_report", get(admin::full_report))
        .route("/ai_report", get(admin::ai_report))
}
