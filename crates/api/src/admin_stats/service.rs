//! Aggregation service behind the admin dashboard and the Telegram bot.
//!
//! Report sections never fail: a database error is logged and the section
//! falls back to its empty/zero value. Only `user_stats` propagates errors,
//! since "no such user" has to be distinguishable from "no data".

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use moviehub_core::analytics::{
    activity_since, day_window, users_created_lists, week_window, ReportPeriod,
    DEFAULT_ERROR_LIMIT, SEARCH_STATS_LIMIT, TOP_MOVIES_LIMIT, TOP_PAGES_LIMIT,
};
use moviehub_core::types::DbId;
use moviehub_db::is_schema_error;
use moviehub_db::models::admin_stats::{EntityCounts, UserStats};
use moviehub_db::repositories::admin_stats_repo::CountedTable;
use moviehub_db::repositories::AdminStatsRepo;
use sqlx::PgPool;
use tokio::time::Instant;

use super::llm::{LlmClient, LlmError};
use super::report::{
    ActiveUsersReport, AiReport, DbCheck, ErrorLogReport, FullReport, NewReviewsReport,
    NewUsersReport, SearchQueriesReport, ServiceStatus, ServicesStatus, StatusReport,
    TopMoviesReport, TopPagesReport,
};

/// Where and how long to probe the frontend for the status section.
#[derive(Debug, Clone)]
pub struct FrontendProbe {
    pub url: String,
    pub timeout: Duration,
}

/// Computes admin report sections against one clock value.
pub struct AdminStatsService {
    pool: PgPool,
    http: reqwest::Client,
    frontend: FrontendProbe,
    llm: LlmClient,
    now: DateTime<Local>,
    /// Point after which the model call in [`Self::ai_report`] is abandoned.
    deadline: Option<Instant>,
}

impl AdminStatsService {
    pub fn new(pool: PgPool, http: reqwest::Client, frontend: FrontendProbe, llm: LlmClient) -> Self {
        Self {
            pool,
            http,
            frontend,
            llm,
            now: Local::now(),
            deadline: None,
        }
    }

    /// Pin the clock used for day/week windows.
    pub fn with_now(mut self, now: DateTime<Local>) -> Self {
        self.now = now;
        self
    }

    /// Bound the model call of [`Self::ai_report`] to end by `deadline`.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    fn now_utc(&self) -> DateTime<Utc> {
        self.now.with_timezone(&Utc)
    }

    /// Health of the API itself, the database and the frontend.
    pub async fn status(&self) -> StatusReport {
        let database = match moviehub_db::health_check(&self.pool).await {
            Ok(()) => ServiceStatus::ok("Соединение с БД установлено"),
            Err(e) => {
                tracing::warn!(error = %e, "Database health probe failed");
                ServiceStatus::error(format!("Ошибка соединения: {e}"))
            }
        };

        let frontend_ui = match self.probe_frontend().await {
            Ok(()) => ServiceStatus::ok("Фронтенд работает исправно"),
            Err(detail) => {
                tracing::warn!(url = %self.frontend.url, error = %detail, "Frontend probe failed");
                ServiceStatus::error(format!("Ошибка фронтенда: {detail}"))
            }
        };

        StatusReport {
            services: ServicesStatus {
                backend_api: ServiceStatus::ok("API запущен и отвечает"),
                database,
                frontend_ui,
            },
        }
    }

    async fn probe_frontend(&self) -> Result<(), String> {
        let response = self
            .http
            .get(&self.frontend.url)
            .timeout(self.frontend.timeout)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if response.status() == reqwest::StatusCode::OK {
            Ok(())
        } else {
            Err(format!("HTTP {}", response.status().as_u16()))
        }
    }

    /// Entity totals. Each count degrades to zero independently.
    pub async fn db_check(&self) -> DbCheck {
        let counts = EntityCounts {
            movies_count: self.count(CountedTable::Movies).await,
            users_count: self.count(CountedTable::Users).await,
            reviews_count: self.count(CountedTable::Reviews).await,
            lists_count: self.count(CountedTable::Lists).await,
        };

        DbCheck {
            status: "OK",
            users_created_list: users_created_lists(counts.lists_count, counts.users_count),
            counts,
        }
    }

    async fn count(&self, table: CountedTable) -> i64 {
        or_default("db_check", AdminStatsRepo::count_rows(&self.pool, table)).await
    }

    /// Most recent persisted errors, newest first.
    pub async fn recent_errors(&self, limit: i64) -> ErrorLogReport {
        let items = or_default("logs_errors", AdminStatsRepo::recent_errors(&self.pool, limit)).await;
        ErrorLogReport {
            count: items.len(),
            items,
        }
    }

    /// Movies ranked by views within `period`.
    pub async fn top_movies(&self, period: ReportPeriod) -> TopMoviesReport {
        let since = period.since(self.now_utc());
        let items = or_default(
            "top_movies",
            AdminStatsRepo::top_movies_by_views(&self.pool, since, TOP_MOVIES_LIMIT),
        )
        .await;
        TopMoviesReport { period, items }
    }

    /// Reviews created since local midnight.
    pub async fn new_reviews(&self) -> NewReviewsReport {
        let window = day_window(&self.now);
        NewReviewsReport {
            today_reviews: or_default(
                "new_reviews",
                AdminStatsRepo::count_reviews_in(&self.pool, &window),
            )
            .await,
        }
    }

    /// Registrations today and over the last seven days plus today.
    pub async fn new_users(&self) -> NewUsersReport {
        let today = day_window(&self.now);
        let week = week_window(&self.now);
        NewUsersReport {
            today: or_default("new_users", AdminStatsRepo::count_users_in(&self.pool, &today)).await,
            last_7_days: or_default("new_users", AdminStatsRepo::count_users_in(&self.pool, &week))
                .await,
        }
    }

    /// Distinct review authors over the rolling seven-day window.
    pub async fn active_users(&self) -> ActiveUsersReport {
        let since = activity_since(self.now_utc());
        ActiveUsersReport {
            active_users_last_7_days: or_default(
                "active_users",
                AdminStatsRepo::count_active_reviewers(&self.pool, since),
            )
            .await,
        }
    }

    /// Snapshot of one user, `None` if the user does not exist.
    pub async fn user_stats(&self, user_id: DbId) -> Result<Option<UserStats>, sqlx::Error> {
        AdminStatsRepo::user_stats(&self.pool, user_id).await
    }

    /// Most frequent search queries, optionally only those that found nothing.
    pub async fn top_search_queries(&self, only_without_results: bool) -> SearchQueriesReport {
        SearchQueriesReport {
            items: or_default(
                "search_stats",
                AdminStatsRepo::top_search_queries(&self.pool, SEARCH_STATS_LIMIT, only_without_results),
            )
            .await,
        }
    }

    /// Most viewed paths.
    pub async fn top_pages(&self) -> TopPagesReport {
        TopPagesReport {
            items: or_default("top_pages", AdminStatsRepo::top_pages(&self.pool, TOP_PAGES_LIMIT))
                .await,
        }
    }

    /// Every section with its fixed parameters.
    pub async fn full_report(&self) -> FullReport {
        FullReport {
            status: self.status().await,
            db_check: self.db_check().await,
            logs_errors: self.recent_errors(DEFAULT_ERROR_LIMIT).await,
            top_movies_24h: self.top_movies(ReportPeriod::Last24Hours).await,
            new_reviews: self.new_reviews().await,
            search_stats_none: self.top_search_queries(true).await,
            top_search: self.top_search_queries(false).await,
            new_users: self.new_users().await,
            active_users: self.active_users().await,
            top_pages: self.top_pages().await,
        }
    }

    /// Full report plus the model's summary. Never fails: any problem with
    /// the model call ends up in the `error` field.
    pub async fn ai_report(&self) -> AiReport {
        let report = self.full_report().await;

        let report_json = match serde_json::to_string_pretty(&report) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize full report");
                return AiReport {
                    report,
                    analysis: None,
                    error: Some(e.to_string()),
                };
            }
        };

        let analysis = match self.deadline {
            Some(deadline) => {
                let budget = deadline.saturating_duration_since(Instant::now());
                tokio::time::timeout_at(deadline, self.llm.analyze_report(&report_json))
                    .await
                    .unwrap_or_else(|_| Err(LlmError::Timeout(budget.as_secs())))
            }
            None => self.llm.analyze_report(&report_json).await,
        };

        match analysis {
            Ok(analysis) => AiReport {
                report,
                analysis: Some(analysis),
                error: None,
            },
            Err(e) => {
                tracing::warn!(error = %e, "LLM analysis unavailable");
                AiReport {
                    report,
                    analysis: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

/// Await a query, degrading any error to `T::default()`.
///
/// Missing tables or columns are expected on partially migrated databases
/// and log at warn; anything else logs at error.
async fn or_default<T, F>(section: &'static str, query: F) -> T
where
    T: Default,
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match query.await {
        Ok(value) => value,
        Err(e) if is_schema_error(&e) => {
            tracing::warn!(section, error = %e, "Report section skipped: schema mismatch");
            T::default()
        }
        Err(e) => {
            tracing::error!(section, error = %e, "Report section query failed");
            T::default()
        }
    }
}
