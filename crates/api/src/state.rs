use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::admin_stats::llm::LlmClient;
use crate::admin_stats::{AdminStatsService, FrontendProbe};
use crate::auth::yandex::YandexOAuthClient;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: moviehub_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Outbound HTTP client shared by the LLM, OAuth and frontend probe calls.
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(pool: moviehub_db::DbPool, config: ServerConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            http: reqwest::Client::new(),
        }
    }

    /// Admin statistics service bound to the current clock.
    ///
    /// Its model call must finish inside this request's timeout budget.
    pub fn admin_stats(&self) -> AdminStatsService {
        let deadline = Instant::now() + self.config.ai_report_budget();
        AdminStatsService::new(
            self.pool.clone(),
            self.http.clone(),
            FrontendProbe {
                url: self.config.frontend_url.clone(),
                timeout: Duration::from_secs(self.config.frontend_health_timeout_secs),
            },
            LlmClient::new(self.http.clone(), self.config.llm.clone()),
        )
        .with_deadline(deadline)
    }

    pub fn yandex_oauth(&self) -> YandexOAuthClient {
        YandexOAuthClient::new(self.http.clone(), self.config.yandex.clone())
    }
}
