//! Chat-completion client used to turn the full admin report into a
//! natural-language marketing summary.
//!
//! Speaks the OpenAI-compatible `POST {base_url}/chat/completions` protocol
//! (OpenRouter by default) with a bearer API key.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Upper bound on the summary length requested from the model, in characters.
pub const MAX_ANALYSIS_CHARS: usize = 3500;

/// Configuration for the LLM summarisation call.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    /// `None` disables the AI report; it degrades to an `error` field.
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

impl LlmConfig {
    /// Load LLM configuration from environment variables.
    ///
    /// | Env Var                          | Default                        |
    /// |----------------------------------|--------------------------------|
    /// | `OPENROUTER_API_KEY` / `API_KEY` | unset                          |
    /// | `LLM_BASE_URL`                   | `https://openrouter.ai/api/v1` |
    /// | `LLM_MODEL`                      | `x-ai/grok-4.1-fast`           |
    /// | `LLM_TIMEOUT_SECS`               | `120`                          |
    pub fn from_env() -> Self {
        let api_key = std::env::var("OPENROUTER_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var("API_KEY").ok().filter(|k| !k.trim().is_empty()));

        let timeout_secs: u64 = std::env::var("LLM_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".into())
            .parse()
            .expect("LLM_TIMEOUT_SECS must be a valid u64");

        Self {
            base_url: std::env::var("LLM_BASE_URL")
                .unwrap_or_else(|_| "https://openrouter.ai/api/v1".into()),
            api_key,
            model: std::env::var("LLM_MODEL").unwrap_or_else(|_| "x-ai/grok-4.1-fast".into()),
            timeout_secs,
        }
    }
}

/// Error type for the summarisation call.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("API_KEY или OPENROUTER_API_KEY не настроен")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("LLM не ответила за {0} с")]
    Timeout(u64),

    #[error("LLM endpoint returned HTTP {0}")]
    HttpStatus(u16),

    #[error("Malformed LLM response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Client for the chat-completion endpoint.
#[derive(Clone)]
pub struct LlmClient {
    http: reqwest::Client,
    config: LlmConfig,
}

impl LlmClient {
    pub fn new(http: reqwest::Client, config: LlmConfig) -> Self {
        Self { http, config }
    }

    /// Ask the model for a marketing analysis of `report_json`.
    pub async fn analyze_report(&self, report_json: &str) -> Result<String, LlmError> {
        let api_key = self.config.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;
        let prompt = build_prompt(report_json);

        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LlmError::HttpStatus(response.status().as_u16()));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::MalformedResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| LlmError::MalformedResponse("missing choices[0].message.content".into()))
    }
}

/// Fixed analyst prompt with the serialized report appended.
pub fn build_prompt(report_json: &str) -> String {
    format!(
        "Ты опытный маркетинговый аналитик и продуктовый консультант онлайн-платформы \
для оценки фильмов (в духе Кинопоиска и Letterboxd).

Ниже JSON с полным техническим отчётом о состоянии сервиса MovieHub. \
Изучи данные и подготовь маркетинговый отчёт из следующих разделов:

1. **ОБЩАЯ ОЦЕНКА СИСТЕМЫ** (2-3 предложения): состояние платформы и ключевые показатели здоровья.

2. **АНАЛИЗ ПОЛЬЗОВАТЕЛЬСКОЙ АКТИВНОСТИ**: новые регистрации и активность, \
вовлечённость (отзывы, списки, просмотры), заметные паттерны поведения.

3. **КОНТЕНТ-АНАЛИЗ**: самые популярные фильмы, поисковые запросы без результатов, \
возможности для пополнения каталога.

4. **ТЕХНИЧЕСКОЕ СОСТОЯНИЕ**: стабильность сервисов, критические ошибки и их влияние на пользователей.

5. **МАРКЕТИНГОВЫЕ ВЫВОДЫ И РЕКОМЕНДАЦИИ** (5-7 пунктов): рост аудитории, \
пользовательский опыт, оптимизация контента, удержание, монетизация.

6. **ПРИОРИТЕТНЫЕ ЗАДАЧИ** (3-5 пунктов): что сделать в первую очередь, \
краткосрочные и долгосрочные цели.

Пиши структурированно и конкретно, рекомендации делай измеримыми. \
Весь ответ не длиннее {MAX_ANALYSIS_CHARS} символов.

Отчёт в формате JSON:
{report_json}"
    )
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn config(base_url: &str, api_key: Option<&str>) -> LlmConfig {
        LlmConfig {
            base_url: base_url.to_string(),
            api_key: api_key.map(str::to_string),
            model: "test-model".to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn prompt_embeds_report_and_sections() {
        let prompt = build_prompt("{\"db_check\":{}}");
        assert!(prompt.ends_with("{\"db_check\":{}}"));
        assert!(prompt.contains("ОБЩАЯ ОЦЕНКА СИСТЕМЫ"));
        assert!(prompt.contains("ПРИОРИТЕТНЫЕ ЗАДАЧИ"));
        assert!(prompt.contains(&MAX_ANALYSIS_CHARS.to_string()));
    }

    #[tokio::test]
    async fn missing_key_fails_without_network() {
        let client = LlmClient::new(reqwest::Client::new(), config("http://127.0.0.1:9", None));
        assert_matches!(client.analyze_report("{}").await, Err(LlmError::MissingApiKey));
    }

    #[tokio::test]
    async fn returns_first_choice_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(serde_json::json!({"model": "test-model"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "Всё хорошо"}}]
            })))
            .mount(&server)
            .await;

        let client = LlmClient::new(reqwest::Client::new(), config(&server.uri(), Some("sk-test")));
        assert_eq!(client.analyze_report("{}").await.unwrap(), "Всё хорошо");
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(402))
            .mount(&server)
            .await;

        let client = LlmClient::new(reqwest::Client::new(), config(&server.uri(), Some("k")));
        assert_matches!(client.analyze_report("{}").await, Err(LlmError::HttpStatus(402)));
    }

    #[tokio::test]
    async fn empty_choices_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
            .mount(&server)
            .await;

        let client = LlmClient::new(reqwest::Client::new(), config(&server.uri(), Some("k")));
        assert_matches!(client.analyze_report("{}").await, Err(LlmError::MalformedResponse(_)));
    }
}
