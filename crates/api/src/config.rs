use std::time::Duration;

use crate::admin_stats::llm::LlmConfig;
use crate::auth::jwt::JwtConfig;
use crate::auth::yandex::YandexOAuthConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development except
/// the database URL and JWT secret, which must be provided.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Maximum size of the PostgreSQL pool (default: `20`).
    pub database_max_connections: u32,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, algorithm, expiry durations).
    pub jwt: JwtConfig,
    /// Public frontend base URL. Probed by the admin status report and used
    /// as the OAuth redirect target.
    pub frontend_url: String,
    /// Timeout of the frontend health probe in seconds (default: `5`).
    pub frontend_health_timeout_secs: u64,
    /// Chat-completion settings for the AI report.
    pub llm: LlmConfig,
    /// Yandex OAuth settings.
    pub yandex: YandexOAuthConfig,
}

/// Share of the request timeout kept free for serialising the AI report
/// after the model call.
const AI_REPORT_RESERVE: Duration = Duration::from_secs(1);

impl ServerConfig {
    /// Time the AI report may spend before its model call is abandoned, so
    /// the response is sent before `TimeoutLayer` answers 408.
    pub fn ai_report_budget(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs).saturating_sub(AI_REPORT_RESERVE)
    }

    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                        | Default                                                              |
    /// |--------------------------------|----------------------------------------------------------------------|
    /// | `HOST`                         | `0.0.0.0`                                                            |
    /// | `PORT`                         | `8000`                                                               |
    /// | `DATABASE_MAX_CONNECTIONS`     | `20`                                                                 |
    /// | `CORS_ORIGINS`                 | `http://localhost:3000,http://127.0.0.1:3000,http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`         | `30`                                                                 |
    /// | `FRONTEND_URL`                 | `http://localhost:5173`                                              |
    /// | `FRONTEND_HEALTH_TIMEOUT_SECS` | `5`                                                                  |
    ///
    /// JWT, LLM and OAuth settings are read by their own `from_env`.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let database_max_connections: u32 = std::env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "20".into())
            .parse()
            .expect("DATABASE_MAX_CONNECTIONS must be a valid u32");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| {
                "http://localhost:3000,http://127.0.0.1:3000,http://localhost:5173".into()
            })
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let frontend_url = std::env::var("FRONTEND_URL")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .trim_end_matches('/')
            .to_string();

        let frontend_health_timeout_secs: u64 = std::env::var("FRONTEND_HEALTH_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("FRONTEND_HEALTH_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            database_max_connections,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            frontend_url,
            frontend_health_timeout_secs,
            llm: LlmConfig::from_env(),
            yandex: YandexOAuthConfig::from_env(),
        }
    }
}
