//! Request-level activity recording: page views and persisted 500s.
//!
//! Both writes are best-effort. A failed insert is logged at `warn` and the
//! response is returned unchanged.

use axum::extract::{Request, State};
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use moviehub_db::models::activity::{NewErrorLog, ERROR_LEVEL};
use moviehub_db::repositories::ActivityLogRepo;

use super::auth::AuthUser;
use crate::error::InternalErrorReport;
use crate::state::AppState;

/// Generic message stored for 500s that carry no report (panics, timeouts
/// of inner services).
const UNREPORTED_ERROR: &str = "Unhandled internal server error";

/// Page views are recorded for `GET` requests under this prefix.
const API_PREFIX: &str = "/api";
/// Admin analytics traffic is not counted as page views.
const ADMIN_PREFIX: &str = "/api/admin";

/// Record page views and persist internal errors.
///
/// Must sit outside `CatchPanicLayer` so panics are seen as 500 responses.
pub async fn record_activity(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let user_id = AuthUser::from_headers(request.headers(), &state.config.jwt)
        .ok()
        .map(|u| u.user_id);

    let mut response = next.run(request).await;
    let status = response.status();

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        let message = response
            .extensions_mut()
            .remove::<InternalErrorReport>()
            .map(|report| report.0)
            .unwrap_or_else(|| UNREPORTED_ERROR.to_string());

        let entry = NewErrorLog {
            level: Some(ERROR_LEVEL.to_string()),
            message,
            details: Some(format!("{method} {path}")),
        };
        if let Err(e) = ActivityLogRepo::record_error(&state.pool, &entry).await {
            tracing::warn!(error = %e, %path, "Failed to persist error log");
        }
    } else if is_page_view(&method, &path, status) {
        if let Err(e) = ActivityLogRepo::record_page_view(&state.pool, &path, user_id).await {
            tracing::warn!(error = %e, %path, "Failed to record page view");
        }
    }

    response
}

fn is_page_view(method: &Method, path: &str, status: StatusCode) -> bool {
    method == Method::GET
        && !status.is_server_error()
        && is_under(path, API_PREFIX)
        && !is_under(path, ADMIN_PREFIX)
}

/// `true` if `path` equals `prefix` or continues it with a `/`.
fn is_under(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_public_api_gets() {
        assert!(is_page_view(&Method::GET, "/api/movies/3", StatusCode::OK));
        assert!(is_page_view(&Method::GET, "/api/movies/999", StatusCode::NOT_FOUND));
    }

    #[test]
    fn skips_admin_and_non_api_paths() {
        assert!(!is_page_view(&Method::GET, "/api/admin/status", StatusCode::OK));
        assert!(!is_page_view(&Method::GET, "/health", StatusCode::OK));
        assert!(!is_page_view(&Method::GET, "/apiary", StatusCode::OK));
    }

    #[test]
    fn skips_writes_and_server_errors() {
        assert!(!is_page_view(&Method::POST, "/api/reviews", StatusCode::CREATED));
        assert!(!is_page_view(
            &Method::GET,
            "/api/movies",
            StatusCode::SERVICE_UNAVAILABLE
        ));
    }
}
