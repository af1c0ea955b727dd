//! JSON shapes returned by the admin analytics endpoints.

use moviehub_core::analytics::ReportPeriod;
use moviehub_db::models::activity::ErrorLog;
use moviehub_db::models::admin_stats::{EntityCounts, MovieViewCount, PathCount, QueryCount};
use serde::Serialize;

/// `ok` / `error` state of one probed service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    Ok,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub status: ServiceState,
    pub message: String,
}

impl ServiceStatus {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: ServiceState::Ok,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ServiceState::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ServicesStatus {
    pub backend_api: ServiceStatus,
    pub database: ServiceStatus,
    pub frontend_ui: ServiceStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub services: ServicesStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct DbCheck {
    /// Always `"OK"`; individual counts degrade to zero instead.
    pub status: &'static str,
    #[serde(flatten)]
    pub counts: EntityCounts,
    pub users_created_list: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorLogReport {
    pub count: usize,
    pub items: Vec<ErrorLog>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopMoviesReport {
    pub period: ReportPeriod,
    pub items: Vec<MovieViewCount>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct NewReviewsReport {
    pub today_reviews: i64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct NewUsersReport {
    pub today: i64,
    pub last_7_days: i64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ActiveUsersReport {
    pub active_users_last_7_days: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchQueriesReport {
    pub items: Vec<QueryCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopPagesReport {
    pub items: Vec<PathCount>,
}

/// Every section of the dashboard computed with fixed parameters.
#[derive(Debug, Clone, Serialize)]
pub struct FullReport {
    pub status: StatusReport,
    pub db_check: DbCheck,
    pub logs_errors: ErrorLogReport,
    pub top_movies_24h: TopMoviesReport,
    pub new_reviews: NewReviewsReport,
    pub search_stats_none: SearchQueriesReport,
    pub top_search: SearchQueriesReport,
    pub new_users: NewUsersReport,
    pub active_users: ActiveUsersReport,
    pub top_pages: TopPagesReport,
}

/// Full report plus the model's analysis. `analysis` is `null` and `error`
/// is set whenever the summary could not be produced.
#[derive(Debug, Clone, Serialize)]
pub struct AiReport {
    pub report: FullReport,
    pub analysis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
