//! Minimal Telegram Bot API client: long polling, sending messages and
//! registering the command menu.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Error type for Bot API calls.
#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Telegram API error: {0}")]
    Api(String),
}

/// One entry of a `getUpdates` response. Only message updates are used.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
}

/// An entry of the bot's command menu.
#[derive(Debug, Clone, Serialize)]
pub struct BotCommand {
    pub command: String,
    pub description: String,
}

/// Operations the bot needs from the Telegram Bot API.
#[async_trait]
pub trait TelegramApi: Send + Sync {
    /// Long-poll for updates with `update_id >= offset`.
    async fn get_updates(&self, offset: i64, timeout_secs: u64)
        -> Result<Vec<Update>, TelegramError>;

    /// Send a plain-text message to a chat.
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError>;

    /// Replace the bot's command menu.
    async fn set_my_commands(&self, commands: &[BotCommand]) -> Result<(), TelegramError>;
}

/// Bot API envelope: `{"ok": bool, "result": ..., "description": ...}`.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

impl<T> ApiResponse<T> {
    fn into_result(self) -> Result<T, TelegramError> {
        match (self.ok, self.result) {
            (true, Some(result)) => Ok(result),
            _ => Err(TelegramError::Api(
                self.description
                    .unwrap_or_else(|| "request was not successful".into()),
            )),
        }
    }
}

#[derive(Debug, Serialize)]
struct GetUpdatesRequest<'a> {
    offset: i64,
    timeout: u64,
    allowed_updates: &'a [&'a str],
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct SetMyCommandsRequest<'a> {
    commands: &'a [BotCommand],
}

/// `reqwest`-backed [`TelegramApi`] implementation.
#[derive(Debug, Clone)]
pub struct HttpTelegramApi {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpTelegramApi {
    pub fn new(client: reqwest::Client, base_url: &str, token: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.base_url, self.token)
    }

    async fn call<B, T>(
        &self,
        method: &str,
        body: &B,
        timeout: Duration,
    ) -> Result<T, TelegramError>
    where
        B: Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .client
            .post(self.method_url(method))
            .timeout(timeout)
            .json(body)
            .send()
            .await?;
        let envelope: ApiResponse<T> = response.json().await?;
        envelope.into_result()
    }
}

/// Timeout for non-polling calls.
const CALL_TIMEOUT: Duration = Duration::from_secs(10);

#[async_trait]
impl TelegramApi for HttpTelegramApi {
    async fn get_updates(
        &self,
        offset: i64,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        let body = GetUpdatesRequest {
            offset,
            timeout: timeout_secs,
            allowed_updates: &["message"],
        };
        // The HTTP timeout must outlast the server-side long poll.
        let timeout = Duration::from_secs(timeout_secs) + CALL_TIMEOUT;
        self.call("getUpdates", &body, timeout).await
    }

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        let body = SendMessageRequest { chat_id, text };
        let _: serde_json::Value = self.call("sendMessage", &body, CALL_TIMEOUT).await?;
        Ok(())
    }

    async fn set_my_commands(&self, commands: &[BotCommand]) -> Result<(), TelegramError> {
        let body = SetMyCommandsRequest { commands };
        let _: bool = self.call("setMyCommands", &body, CALL_TIMEOUT).await?;
        Ok(())
    }
}
