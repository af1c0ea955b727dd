//! Yandex OAuth 2.0 authorization-code client.
//!
//! The browser is redirected to [`YandexOAuthClient::authorize_url`]; Yandex
//! calls back with a `code`, which is exchanged for an access token and then
//! for the account's profile.

use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;

/// HTTP timeout for the token exchange and profile requests.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the Yandex OAuth integration.
#[derive(Debug, Clone)]
pub struct YandexOAuthConfig {
    /// `None` disables the OAuth routes.
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
    pub authorize_url: String,
    pub token_url: String,
    pub user_info_url: String,
}

impl YandexOAuthConfig {
    /// Load OAuth configuration from environment variables.
    ///
    /// | Env Var                | Default                                          |
    /// |------------------------|--------------------------------------------------|
    /// | `YANDEX_CLIENT_ID`     | unset (OAuth disabled)                           |
    /// | `YANDEX_CLIENT_SECRET` | unset                                            |
    /// | `YANDEX_REDIRECT_URI`  | `http://localhost:8000/api/auth/yandex/callback` |
    /// | `YANDEX_AUTHORIZE_URL` | `https://oauth.yandex.ru/authorize`              |
    /// | `YANDEX_TOKEN_URL`     | `https://oauth.yandex.ru/token`                  |
    /// | `YANDEX_USER_INFO_URL` | `https://login.yandex.ru/info`                   |
    pub fn from_env() -> Self {
        let non_empty = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            client_id: non_empty("YANDEX_CLIENT_ID"),
            client_secret: non_empty("YANDEX_CLIENT_SECRET"),
            redirect_uri: non_empty("YANDEX_REDIRECT_URI")
                .unwrap_or_else(|| "http://localhost:8000/api/auth/yandex/callback".into()),
            authorize_url: non_empty("YANDEX_AUTHORIZE_URL")
                .unwrap_or_else(|| "https://oauth.yandex.ru/authorize".into()),
            token_url: non_empty("YANDEX_TOKEN_URL")
                .unwrap_or_else(|| "https://oauth.yandex.ru/token".into()),
            user_info_url: non_empty("YANDEX_USER_INFO_URL")
                .unwrap_or_else(|| "https://login.yandex.ru/info".into()),
        }
    }
}

/// Error type for the OAuth flow.
#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    #[error("Yandex OAuth is not configured")]
    NotConfigured,

    #[error("Invalid OAuth URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Yandex returned HTTP {0}")]
    HttpStatus(u16),

    #[error("Token response did not contain an access token")]
    MissingAccessToken,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// Profile returned by `login.yandex.ru/info`.
#[derive(Debug, Clone, Deserialize)]
pub struct YandexUserInfo {
    pub id: String,
    pub login: Option<String>,
    pub default_email: Option<String>,
    #[serde(default)]
    pub emails: Vec<String>,
}

impl YandexUserInfo {
    /// Best available email: the default one, else the first listed, else a
    /// synthetic address derived from the Yandex id.
    pub fn email(&self) -> String {
        self.default_email
            .clone()
            .or_else(|| self.emails.first().cloned())
            .unwrap_or_else(|| format!("yandex_{}@yandex.oauth", self.id))
    }

    /// Preferred username: the Yandex login, else the email's local part.
    pub fn preferred_username(&self) -> String {
        if let Some(login) = self.login.as_deref().filter(|l| !l.is_empty()) {
            return login.to_string();
        }
        let email = self.email();
        match email.split_once('@') {
            Some((local, _)) if !local.is_empty() => local.to_string(),
            _ => format!("user_{}", self.id),
        }
    }
}

/// Client for the three Yandex OAuth endpoints.
#[derive(Clone)]
pub struct YandexOAuthClient {
    http: reqwest::Client,
    config: YandexOAuthConfig,
}

impl YandexOAuthClient {
    pub fn new(http: reqwest::Client, config: YandexOAuthConfig) -> Self {
        Self { http, config }
    }

    /// URL the browser is redirected to in order to start the flow.
    pub fn authorize_url(&self) -> Result<String, OAuthError> {
        let client_id = self.config.client_id.as_deref().ok_or(OAuthError::NotConfigured)?;
        let mut url = Url::parse(&self.config.authorize_url)
            .map_err(|e| OAuthError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri);
        Ok(url.into())
    }

    /// Exchange an authorization code for the account profile.
    pub async fn fetch_user(&self, code: &str) -> Result<YandexUserInfo, OAuthError> {
        let token = self.exchange_code(code).await?;
        self.user_info(&token).await
    }

    async fn exchange_code(&self, code: &str) -> Result<String, OAuthError> {
        let client_id = self.config.client_id.as_deref().ok_or(OAuthError::NotConfigured)?;
        let client_secret = self.config.client_secret.as_deref().unwrap_or_default();

        let response = self
            .http
            .post(&self.config.token_url)
            .timeout(REQUEST_TIMEOUT)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", client_id),
                ("client_secret", client_secret),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(OAuthError::HttpStatus(response.status().as_u16()));
        }

        let body: TokenResponse = response.json().await?;
        body.access_token
            .filter(|t| !t.is_empty())
            .ok_or(OAuthError::MissingAccessToken)
    }

    async fn user_info(&self, access_token: &str) -> Result<YandexUserInfo, OAuthError> {
        let response = self
            .http
            .get(&self.config.user_info_url)
            .timeout(REQUEST_TIMEOUT)
            .header(reqwest::header::AUTHORIZATION, format!("OAuth {access_token}"))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(OAuthError::HttpStatus(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn config(base: &str, client_id: Option<&str>) -> YandexOAuthConfig {
        YandexOAuthConfig {
            client_id: client_id.map(str::to_string),
            client_secret: Some("secret".to_string()),
            redirect_uri: "http://localhost:8000/api/auth/yandex/callback".to_string(),
            authorize_url: format!("{base}/authorize"),
            token_url: format!("{base}/token"),
            user_info_url: format!("{base}/info"),
        }
    }

    #[test]
    fn authorize_url_encodes_parameters() {
        let client = YandexOAuthClient::new(reqwest::Client::new(), config("https://oauth.example", Some("abc")));
        let url = client.authorize_url().unwrap();
        assert!(url.starts_with("https://oauth.example/authorize?response_type=code&client_id=abc"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8000%2Fapi%2Fauth%2Fyandex%2Fcallback"));
    }

    #[test]
    fn authorize_url_requires_client_id() {
        let client = YandexOAuthClient::new(reqwest::Client::new(), config("https://oauth.example", None));
        assert_matches!(client.authorize_url(), Err(OAuthError::NotConfigured));
    }

    #[test]
    fn user_info_fallbacks() {
        let info = YandexUserInfo {
            id: "42".to_string(),
            login: None,
            default_email: None,
            emails: vec!["neo@ya.ru".to_string()],
        };
        assert_eq!(info.email(), "neo@ya.ru");
        assert_eq!(info.preferred_username(), "neo");

        let bare = YandexUserInfo {
            id: "7".to_string(),
            login: None,
            default_email: None,
            emails: vec![],
        };
        assert_eq!(bare.email(), "yandex_7@yandex.oauth");
        assert_eq!(bare.preferred_username(), "yandex_7");
    }

    #[tokio::test]
    async fn fetch_user_exchanges_code_then_reads_profile() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("code=the-code"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"access_token": "tok"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/info"))
            .and(header("authorization", "OAuth tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "100",
                "login": "neo",
                "default_email": "neo@yandex.ru"
            })))
            .mount(&server)
            .await;

        let client = YandexOAuthClient::new(reqwest::Client::new(), config(&server.uri(), Some("abc")));
        let info = client.fetch_user("the-code").await.unwrap();
        assert_eq!(info.login.as_deref(), Some("neo"));
        assert_eq!(info.email(), "neo@yandex.ru");
    }

    #[tokio::test]
    async fn token_endpoint_failure_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        let client = YandexOAuthClient::new(reqwest::Client::new(), config(&server.uri(), Some("abc")));
        assert_matches!(client.fetch_user("bad").await, Err(OAuthError::HttpStatus(400)));
    }
}
