use std::collections::HashSet;

/// Bot configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub telegram_token: String,
    pub telegram_api_base_url: String,
    /// Telegram usernames allowed to run admin commands, without `@`.
    pub admin_usernames: HashSet<String>,
    /// Backend base URL including the `/api` prefix.
    pub admin_api_base_url: String,
    /// Bearer token of an admin account, sent with every backend call.
    pub admin_api_token: Option<String>,
    pub poll_timeout_secs: u64,
    /// Timeout for ordinary backend calls.
    pub admin_api_timeout_secs: u64,
    /// Timeout for `/admin/ai_report`; must exceed the backend's
    /// `REQUEST_TIMEOUT_SECS`.
    pub ai_report_timeout_secs: u64,
}

impl BotConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                      | Default                     |
    /// |------------------------------|-----------------------------|
    /// | `TELEGRAM_BOT_TOKEN`         | **required**                |
    /// | `TELEGRAM_ADMIN_USERNAMES`   | empty                       |
    /// | `TELEGRAM_API_BASE_URL`      | `https://api.telegram.org`  |
    /// | `ADMIN_API_BASE_URL`         | `http://localhost:8000/api` |
    /// | `ADMIN_API_TOKEN`            | unset                       |
    /// | `TELEGRAM_POLL_TIMEOUT_SECS` | `30`                        |
    /// | `ADMIN_API_TIMEOUT_SECS`     | `10`                        |
    /// | `AI_REPORT_TIMEOUT_SECS`     | `60`                        |
    pub fn from_env() -> Self {
        let telegram_token =
            std::env::var("TELEGRAM_BOT_TOKEN").expect("TELEGRAM_BOT_TOKEN must be set");
        assert!(
            !telegram_token.trim().is_empty(),
            "TELEGRAM_BOT_TOKEN must not be empty"
        );

        let poll_timeout_secs: u64 = std::env::var("TELEGRAM_POLL_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("TELEGRAM_POLL_TIMEOUT_SECS must be a valid u64");

        let admin_api_timeout_secs = parse_secs("ADMIN_API_TIMEOUT_SECS", 10);
        let ai_report_timeout_secs = parse_secs("AI_REPORT_TIMEOUT_SECS", 60);

        Self {
            telegram_token,
            telegram_api_base_url: std::env::var("TELEGRAM_API_BASE_URL")
                .unwrap_or_else(|_| "https://api.telegram.org".into()),
            admin_usernames: parse_usernames(
                &std::env::var("TELEGRAM_ADMIN_USERNAMES").unwrap_or_default(),
            ),
            admin_api_base_url: std::env::var("ADMIN_API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8000/api".into()),
            admin_api_token: std::env::var("ADMIN_API_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
            poll_timeout_secs,
            admin_api_timeout_secs,
            ai_report_timeout_secs,
        }
    }
}

fn parse_secs(var: &str, default: u64) -> u64 {
    match std::env::var(var) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{var} must be a valid u64")),
        Err(_) => default,
    }
}

/// Parse a comma-separated username list, dropping blanks and leading `@`.
pub fn parse_usernames(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(|name| name.trim().trim_start_matches('@'))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
