//! Client for the backend's admin statistics endpoints.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Default per-request timeout for backend calls.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Error type for backend calls. `Display` is what the admin sees in chat.
#[derive(Debug, thiserror::Error)]
pub enum AdminApiError {
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Ошибка соединения с API: {0}")]
    Connection(reqwest::Error),

    #[error("Некорректный ответ API: {0}")]
    Decode(reqwest::Error),
}

/// JSON error body: `{"error": ..., "code": ...}` from this backend,
/// `{"detail": ...}` from FastAPI-style services.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    detail: Option<String>,
}

/// Human-readable detail of an error response body, JSON or plain text.
fn error_detail(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error.or(parsed.detail),
        Err(_) => Some(body.to_string()),
    }
}

/// Thin JSON client for `{base_url}/admin/*`.
#[derive(Debug, Clone)]
pub struct AdminApiClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl AdminApiClient {
    pub fn new(client: reqwest::Client, base_url: &str, token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Replace the default per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `GET {base_url}/{path}` and decode the JSON body.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, AdminApiError> {
        self.get_with_timeout(path, query, self.timeout).await
    }

    /// [`Self::get`] with a timeout for one slow endpoint.
    pub async fn get_with_timeout<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<T, AdminApiError> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut request = self
            .client
            .get(&url)
            .query(query)
            .timeout(timeout);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(AdminApiError::Connection)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_detail(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string()
            });
            return Err(AdminApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response.json().await.map_err(AdminApiError::Decode)
    }
}
