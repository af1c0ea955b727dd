//! Update loop and command dispatch.

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::admin_api::{AdminApiClient, AdminApiError};
use crate::commands::{self, Command};
use crate::format::{self, MAX_MESSAGE_CHARS};
use crate::telegram::{Message, TelegramApi, TelegramError};

/// Pause after a failed `getUpdates` before polling again.
const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Default wait for `/admin/ai_report`, which includes a model call.
pub const AI_REPORT_TIMEOUT: Duration = Duration::from_secs(60);

pub struct AdminBot<T> {
    telegram: T,
    admin_api: AdminApiClient,
    admins: HashSet<String>,
    poll_timeout_secs: u64,
    ai_report_timeout: Duration,
}

impl<T: TelegramApi> AdminBot<T> {
    pub fn new(
        telegram: T,
        admin_api: AdminApiClient,
        admins: HashSet<String>,
        poll_timeout_secs: u64,
    ) -> Self {
        Self {
            telegram,
            admin_api,
            admins,
            poll_timeout_secs,
            ai_report_timeout: AI_REPORT_TIMEOUT,
        }
    }

    /// Override how long `/ai_report` waits for the backend.
    pub fn with_ai_report_timeout(mut self, timeout: Duration) -> Self {
        self.ai_report_timeout = timeout;
        self
    }

    /// Consume the bot and return its Telegram client.
    pub fn into_telegram(self) -> T {
        self.telegram
    }

    /// Register the command menu with Telegram.
    pub async fn register_commands(&self) -> Result<(), TelegramError> {
        self.telegram.set_my_commands(&commands::menu()).await
    }

    /// Poll and handle updates until `shutdown` resolves.
    pub async fn run(&self, shutdown: impl Future<Output = ()>) {
        tokio::pin!(shutdown);
        let mut offset = 0;

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Shutdown signal received, stopping polling");
                    return;
                }
                next = self.poll_once(offset) => match next {
                    Ok(next) => offset = next,
                    Err(e) => {
                        tracing::warn!(error = %e, "getUpdates failed, retrying");
                        tokio::time::sleep(RETRY_DELAY).await;
                    }
                },
            }
        }
    }

    /// Fetch one batch of updates, handle them and return the next offset.
    pub async fn poll_once(&self, offset: i64) -> Result<i64, TelegramError> {
        let updates = self
            .telegram
            .get_updates(offset, self.poll_timeout_secs)
            .await?;

        let mut next = offset;
        for update in updates {
            next = next.max(update.update_id + 1);
            if let Some(message) = update.message {
                self.handle_message(&message).await;
            }
        }
        Ok(next)
    }

    /// Answer one message. Non-command text is ignored.
    pub async fn handle_message(&self, message: &Message) {
        let Some(command) = message.text.as_deref().and_then(commands::parse) else {
            return;
        };

        let username = message
            .from
            .as_ref()
            .and_then(|user| user.username.as_deref())
            .unwrap_or_default();
        let reply = if self.is_admin(username) {
            tracing::info!(username, ?command, "Handling admin command");
            self.reply(command).await
        } else {
            tracing::warn!(username, "Rejected command from non-admin");
            format::ACCESS_DENIED.to_string()
        };

        self.send(message.chat.id, &reply).await;
    }

    fn is_admin(&self, username: &str) -> bool {
        let username = username.trim_start_matches('@');
        !username.is_empty() && self.admins.contains(username)
    }

    /// Build the reply text for an authorised command.
    pub async fn reply(&self, command: Command) -> String {
        match command {
            Command::Help | Command::Unknown(_) => format::help(),
            Command::Status => self.fetch("admin/status", &[], format::status).await,
            Command::DbCheck => self.fetch("admin/db_check", &[], format::db_check).await,
            Command::LogsErrors => {
                self.fetch("admin/logs_errors", &[("limit", "10")], format::logs_errors)
                    .await
            }
            Command::TopMovies(period) => {
                self.fetch(
                    "admin/top_movies",
                    &[("period", period.as_str())],
                    format::top_movies,
                )
                .await
            }
            Command::NewReviews => {
                self.fetch("admin/new_reviews", &[], format::new_reviews).await
            }
            Command::SearchStatsNone => {
                self.fetch("admin/search_stats_none", &[], |report: &format::SearchQueriesReport| {
                    format::search_queries("Топ 'пустых' поисков:", report)
                })
                .await
            }
            Command::TopSearch => {
                self.fetch("admin/top_search", &[], |report: &format::SearchQueriesReport| {
                    format::search_queries("Топ поисковых запросов:", report)
                })
                .await
            }
            Command::TopPages => self.fetch("admin/top_pages", &[], format::top_pages).await,
            Command::NewUsers => self.fetch("admin/new_users", &[], format::new_users).await,
            Command::ActiveUsers => {
                self.fetch("admin/active_users", &[], format::active_users).await
            }
            Command::UserStats(None) => format::USER_STATS_USAGE.to_string(),
            Command::UserStats(Some(id)) => {
                self.fetch(&format!("admin/user_stats/{id}"), &[], format::user_stats)
                    .await
            }
            Command::FullReport => {
                self.fetch("admin/full_report", &[], format::full_report).await
            }
            Command::AiReport => {
                let result: Result<format::AiReport, _> = self
                    .admin_api
                    .get_with_timeout("admin/ai_report", &[], self.ai_report_timeout)
                    .await;
                render_or_error("admin/ai_report", result, format::ai_report)
            }
        }
    }

    async fn fetch<R, F>(&self, path: &str, query: &[(&str, &str)], render: F) -> String
    where
        R: DeserializeOwned,
        F: FnOnce(&R) -> String,
    {
        render_or_error(path, self.admin_api.get(path, query).await, render)
    }

    async fn send(&self, chat_id: i64, text: &str) {
        for chunk in format::split_message(text, MAX_MESSAGE_CHARS) {
            if let Err(e) = self.telegram.send_message(chat_id, &chunk).await {
                tracing::warn!(chat_id, error = %e, "Failed to send reply");
                return;
            }
        }
    }
}

fn render_or_error<R, F>(path: &str, result: Result<R, AdminApiError>, render: F) -> String
where
    F: FnOnce(&R) -> String,
{
    match result {
        Ok(body) => render(&body),
        Err(e) => {
            tracing::warn!(path, error = %e, "Admin API request failed");
            format::api_error(&e)
        }
    }
}
