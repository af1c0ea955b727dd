//! End-to-end command handling: a recording Telegram double in front, a
//! `wiremock` admin backend behind.

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use moviehub_bot::admin_api::AdminApiClient;
use moviehub_bot::bot::AdminBot;
use moviehub_bot::format::{ACCESS_DENIED, LLM_UNAVAILABLE, MAX_MESSAGE_CHARS, USER_STATS_USAGE};
use moviehub_bot::telegram::{BotCommand, TelegramApi, TelegramError, Update};

/// Telegram double: serves queued updates once and records sent messages.
#[derive(Default)]
struct RecordingTelegram {
    updates: Mutex<Vec<Update>>,
    sent: Mutex<Vec<(i64, String)>>,
    commands: Mutex<Vec<BotCommand>>,
}

impl RecordingTelegram {
    fn with_updates(updates: Value) -> Self {
        Self {
            updates: Mutex::new(serde_json::from_value(updates).unwrap()),
            ..Default::default()
        }
    }

    fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl TelegramApi for RecordingTelegram {
    async fn get_updates(&self, offset: i64, _timeout: u64) -> Result<Vec<Update>, TelegramError> {
        let mut queued = self.updates.lock().unwrap();
        let ready = queued
            .iter()
            .filter(|u| u.update_id >= offset)
            .cloned()
            .collect();
        queued.clear();
        Ok(ready)
    }

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        self.sent.lock().unwrap().push((chat_id, text.to_string()));
        Ok(())
    }

    async fn set_my_commands(&self, commands: &[BotCommand]) -> Result<(), TelegramError> {
        *self.commands.lock().unwrap() = commands.to_vec();
        Ok(())
    }
}

fn message(update_id: i64, username: &str, text: &str) -> Value {
    json!({
        "update_id": update_id,
        "message": {
            "message_id": update_id,
            "chat": { "id": 100 },
            "from": { "id": 1, "username": username },
            "text": text
        }
    })
}

fn bot(telegram: RecordingTelegram, backend: &MockServer) -> AdminBot<RecordingTelegram> {
    let admin_api = AdminApiClient::new(
        reqwest::Client::new(),
        &format!("{}/api", backend.uri()),
        Some("admin-token".into()),
    );
    let admins = HashSet::from(["boss".to_string()]);
    AdminBot::new(telegram, admin_api, admins, 0)
}

async fn mount_json(backend: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(header("authorization", "Bearer admin-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(backend)
        .await;
}

/// Run one poll cycle over `updates` and return the sent messages.
async fn exchange(backend: &MockServer, updates: Value) -> Vec<(i64, String)> {
    let bot = bot(RecordingTelegram::with_updates(updates), backend);
    bot.poll_once(0).await.unwrap();
    bot.into_telegram().sent()
}

#[tokio::test]
async fn non_admin_is_rejected_without_backend_call() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&backend)
        .await;

    let sent = exchange(&backend, json!([message(1, "stranger", "/status")])).await;

    assert_eq!(sent, vec![(100, ACCESS_DENIED.to_string())]);
}

#[tokio::test]
async fn poll_advances_offset_past_last_update() {
    let backend = MockServer::start().await;
    let bot = bot(
        RecordingTelegram::with_updates(json!([
            message(7, "boss", "hello"),
            { "update_id": 9 }
        ])),
        &backend,
    );

    assert_eq!(bot.poll_once(0).await.unwrap(), 10);
    assert_eq!(bot.poll_once(10).await.unwrap(), 10);
    assert!(bot.into_telegram().sent().is_empty());
}

#[tokio::test]
async fn new_users_report_is_rendered() {
    let backend = MockServer::start().await;
    mount_json(
        &backend,
        "/api/admin/new_users",
        json!({ "today": 2, "last_7_days": 5 }),
    )
    .await;

    let sent = exchange(&backend, json!([message(1, "@boss", "/new_users")])).await;

    assert_eq!(
        sent[0].1,
        "Новых пользователей сегодня: 2\nЗа последние 7 дней: 5"
    );
}

#[tokio::test]
async fn top_movies_week_argument_selects_period() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/top_movies"))
        .and(query_param("period", "7d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "period": "7d",
            "items": [{ "movie_id": 1, "title": "Дюна", "views": 4 }]
        })))
        .expect(1)
        .mount(&backend)
        .await;

    let sent = exchange(&backend, json!([message(1, "boss", "/top_movies@moviehub_bot 7d")])).await;

    assert_eq!(sent[0].1, "Топ фильмов за 7d:\nДюна — 4 просмотров");
}

#[tokio::test]
async fn user_stats_usage_and_not_found() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/user_stats/999"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": "User with id 999 not found",
            "code": "NOT_FOUND"
        })))
        .mount(&backend)
        .await;

    let sent = exchange(
        &backend,
        json!([
            message(1, "boss", "/user_stats"),
            message(2, "boss", "/user_stats 999")
        ]),
    )
    .await;

    assert_eq!(sent[0].1, USER_STATS_USAGE);
    assert_eq!(
        sent[1].1,
        "Ошибка запроса к API: HTTP 404: User with id 999 not found"
    );
}

#[tokio::test]
async fn ai_report_without_analysis_falls_back() {
    let backend = MockServer::start().await;
    mount_json(
        &backend,
        "/api/admin/ai_report",
        json!({ "report": {}, "analysis": null, "error": "API_KEY не настроен" }),
    )
    .await;

    let sent = exchange(&backend, json!([message(1, "boss", "/ai_report")])).await;

    assert_eq!(sent[0].1, LLM_UNAVAILABLE);
}

#[tokio::test]
async fn ai_report_waits_longer_than_other_commands() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/ai_report"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "report": {}, "analysis": "Рост аудитории" }))
                .set_delay(Duration::from_millis(1500)),
        )
        .mount(&backend)
        .await;

    let admin_api = AdminApiClient::new(
        reqwest::Client::new(),
        &format!("{}/api", backend.uri()),
        None,
    )
    .with_timeout(Duration::from_millis(500));
    let telegram = RecordingTelegram::with_updates(json!([message(1, "boss", "/ai_report")]));
    let bot = AdminBot::new(telegram, admin_api, HashSet::from(["boss".to_string()]), 0)
        .with_ai_report_timeout(Duration::from_secs(5));

    bot.poll_once(0).await.unwrap();

    assert_eq!(bot.into_telegram().sent()[0].1, "Рост аудитории");
}

#[tokio::test]
async fn long_full_report_is_split() {
    let backend = MockServer::start().await;
    let items: Vec<Value> = (0..400)
        .map(|i| json!({ "query": format!("запрос номер {i}"), "count": i }))
        .collect();
    mount_json(
        &backend,
        "/api/admin/full_report",
        json!({ "top_search": { "items": items } }),
    )
    .await;

    let sent = exchange(&backend, json!([message(1, "boss", "/full_report")])).await;

    assert!(sent.len() > 1);
    assert!(sent[0].1.starts_with("Полный отчёт:"));
    assert!(sent
        .iter()
        .all(|(chat, text)| *chat == 100 && text.chars().count() <= MAX_MESSAGE_CHARS));
}

#[tokio::test]
async fn unknown_command_answers_with_help() {
    let backend = MockServer::start().await;

    let sent = exchange(&backend, json!([message(1, "boss", "/nonsense")])).await;

    assert!(sent[0].1.contains("/status"));
    assert!(sent[0].1.contains("/ai_report"));
}

#[tokio::test]
async fn register_commands_sends_menu() {
    let backend = MockServer::start().await;
    let bot = bot(RecordingTelegram::default(), &backend);

    bot.register_commands().await.unwrap();

    let telegram = bot.into_telegram();
    let commands = telegram.commands.lock().unwrap();
    assert_eq!(commands.len(), 15);
    assert_eq!(commands[0].command, "start");
}
