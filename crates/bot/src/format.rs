//! Backend report payloads and their chat renderings.
//!
//! Every payload field defaults when absent so that a partially degraded
//! report still renders.

use serde::Deserialize;
use serde_json::Value;

/// Telegram rejects messages above 4096 characters; stay below with margin.
pub const MAX_MESSAGE_CHARS: usize = 4000;

pub const ACCESS_DENIED: &str = "Доступ запрещён. Вы не являетесь администратором.";
pub const USER_STATS_USAGE: &str = "Использование: /user_stats <user_id>";
pub const LLM_UNAVAILABLE: &str = "LLM-аналитика недоступна.";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ServiceStatus {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Services {
    pub backend_api: ServiceStatus,
    pub database: ServiceStatus,
    pub frontend_ui: ServiceStatus,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StatusReport {
    pub services: Services,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DbCheck {
    pub status: String,
    pub movies_count: i64,
    pub users_count: i64,
    pub reviews_count: i64,
    pub lists_count: i64,
    pub users_created_list: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ErrorLogItem {
    pub level: String,
    pub message: String,
    pub created_at: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ErrorLogReport {
    pub items: Vec<ErrorLogItem>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MovieViews {
    pub title: String,
    pub views: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TopMoviesReport {
    pub period: String,
    pub items: Vec<MovieViews>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewReviewsReport {
    pub today_reviews: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct QueryCount {
    pub query: String,
    pub count: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchQueriesReport {
    pub items: Vec<QueryCount>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PageCount {
    pub path: String,
    pub count: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TopPagesReport {
    pub items: Vec<PageCount>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewUsersReport {
    pub today: i64,
    pub last_7_days: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ActiveUsersReport {
    pub active_users_last_7_days: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserStats {
    pub id: i64,
    pub username: String,
    pub created_at: String,
    pub reviews_count: i64,
    pub lists_count: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AiReport {
    pub analysis: Option<String>,
}

pub fn help() -> String {
    "Админ-бот MovieHub.\n\
     Доступные команды:\n\
     /status, /db_check, /logs_errors, /top_movies, /new_reviews,\n\
     /search_stats_none, /top_search, /top_pages, /new_users,\n\
     /active_users, /user_stats, /full_report, /ai_report"
        .to_string()
}

pub fn api_error(err: &impl std::fmt::Display) -> String {
    format!("Ошибка запроса к API: {err}")
}

fn service_line(label: &str, service: &ServiceStatus) -> String {
    let mark = if service.status == "ok" { "✅" } else { "❌" };
    format!("{mark} {label}: {}", service.message)
}

pub fn status(report: &StatusReport) -> String {
    let services = &report.services;
    [
        "Статус сервисов:".to_string(),
        service_line("Backend API", &services.backend_api),
        service_line("База данных", &services.database),
        service_line("Фронтенд", &services.frontend_ui),
    ]
    .join("\n")
}

pub fn db_check(check: &DbCheck) -> String {
    format!(
        "БД: {}\n\
         Фильмов: {}\n\
         Пользователей: {}\n\
         Отзывов: {}\n\
         Списков: {}\n\
         Списков, созданных пользователями: {}",
        check.status,
        check.movies_count,
        check.users_count,
        check.reviews_count,
        check.lists_count,
        check.users_created_list,
    )
}

pub fn logs_errors(report: &ErrorLogReport) -> String {
    if report.items.is_empty() {
        return "Нет ошибок.".to_string();
    }
    report
        .items
        .iter()
        .map(|item| format!("[{}] {}: {}", item.created_at, item.level, item.message))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn top_movies(report: &TopMoviesReport) -> String {
    let mut lines = vec![format!("Топ фильмов за {}:", report.period)];
    if report.items.is_empty() {
        lines.push("Пока нет данных о просмотрах фильмов.".to_string());
    }
    lines.extend(
        report
            .items
            .iter()
            .map(|item| format!("{} — {} просмотров", item.title, item.views)),
    );
    lines.join("\n")
}

pub fn new_reviews(report: &NewReviewsReport) -> String {
    format!("Новых отзывов сегодня: {}", report.today_reviews)
}

pub fn search_queries(title: &str, report: &SearchQueriesReport) -> String {
    let mut lines = vec![title.to_string()];
    if report.items.is_empty() {
        lines.push("Нет данных.".to_string());
    }
    lines.extend(
        report
            .items
            .iter()
            .map(|item| format!("\"{}\" — {} запросов", item.query, item.count)),
    );
    lines.join("\n")
}

pub fn top_pages(report: &TopPagesReport) -> String {
    let mut lines = vec!["Топ страниц:".to_string()];
    if report.items.is_empty() {
        lines.push("Нет данных.".to_string());
    }
    lines.extend(
        report
            .items
            .iter()
            .map(|item| format!("{} — {} посещений", item.path, item.count)),
    );
    lines.join("\n")
}

pub fn new_users(report: &NewUsersReport) -> String {
    format!(
        "Новых пользователей сегодня: {}\nЗа последние 7 дней: {}",
        report.today, report.last_7_days
    )
}

pub fn active_users(report: &ActiveUsersReport) -> String {
    format!(
        "Активных пользователей за последние 7 дней: {}",
        report.active_users_last_7_days
    )
}

pub fn user_stats(stats: &UserStats) -> String {
    format!(
        "Пользователь {} (id={})\nСоздан: {}\nОтзывы: {}\nСписки: {}",
        stats.username, stats.id, stats.created_at, stats.reviews_count, stats.lists_count
    )
}

pub fn full_report(report: &Value) -> String {
    let body = serde_json::to_string_pretty(report).unwrap_or_else(|_| report.to_string());
    format!("Полный отчёт:\n{body}")
}

pub fn ai_report(report: &AiReport) -> String {
    report
        .analysis
        .as_deref()
        .filter(|text| !text.trim().is_empty())
        .unwrap_or(LLM_UNAVAILABLE)
        .to_string()
}

/// Split `text` into chunks of at most `max_chars` characters.
///
/// Cuts at the last newline inside the window when there is one, otherwise
/// at the character limit. Never splits inside a UTF-8 character.
pub fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut rest = text;

    while rest.chars().count() > max_chars {
        // Byte offset just past the first `max_chars` characters.
        let window_end = rest
            .char_indices()
            .nth(max_chars)
            .map_or(rest.len(), |(idx, _)| idx);
        let window = &rest[..window_end];

        let (chunk, next) = match window.rfind('\n') {
            Some(newline) if newline > 0 => (&rest[..newline], &rest[newline + 1..]),
            _ => (window, &rest[window_end..]),
        };
        chunks.push(chunk.to_string());
        rest = next;
    }

    if !rest.is_empty() || chunks.is_empty() {
        chunks.push(rest.to_string());
    }
    chunks
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn status_marks_failing_services() {
        let report: StatusReport = serde_json::from_value(json!({
            "services": {
                "backend_api": { "status": "ok", "message": "API запущен и отвечает" },
                "database": { "status": "ok", "message": "Соединение с БД установлено" },
                "frontend_ui": { "status": "error", "message": "Ошибка фронтенда: timeout" }
            }
        }))
        .unwrap();

        let text = status(&report);

        assert!(text.contains("✅ Backend API: API запущен и отвечает"));
        assert!(text.contains("❌ Фронтенд: Ошибка фронтенда: timeout"));
    }

    #[test]
    fn top_movies_lists_items_or_placeholder() {
        let report: TopMoviesReport = serde_json::from_value(json!({
            "period": "7d",
            "items": [{ "movie_id": 1, "title": "Дюна", "views": 12 }]
        }))
        .unwrap();
        assert_eq!(top_movies(&report), "Топ фильмов за 7d:\nДюна — 12 просмотров");

        let empty: TopMoviesReport =
            serde_json::from_value(json!({ "period": "24h", "items": [] })).unwrap();
        assert!(top_movies(&empty).ends_with("Пока нет данных о просмотрах фильмов."));
    }

    #[test]
    fn logs_errors_empty() {
        assert_eq!(logs_errors(&ErrorLogReport::default()), "Нет ошибок.");
    }

    #[test]
    fn missing_fields_default_to_zero() {
        let report: NewUsersReport = serde_json::from_value(json!({})).unwrap();
        assert_eq!(
            new_users(&report),
            "Новых пользователей сегодня: 0\nЗа последние 7 дней: 0"
        );
    }

    #[test]
    fn ai_report_falls_back_when_analysis_missing() {
        let report: AiReport =
            serde_json::from_value(json!({ "report": {}, "analysis": null, "error": "x" }))
                .unwrap();
        assert_eq!(ai_report(&report), LLM_UNAVAILABLE);

        let report: AiReport =
            serde_json::from_value(json!({ "analysis": "Всё хорошо" })).unwrap();
        assert_eq!(ai_report(&report), "Всё хорошо");
    }

    #[test]
    fn short_message_is_not_split() {
        assert_eq!(split_message("hello", 10), vec!["hello"]);
        assert_eq!(split_message("", 10), vec![""]);
    }

    #[test]
    fn split_prefers_line_boundaries() {
        let text = "aaaa\nbbbb\ncccc";
        assert_eq!(split_message(text, 10), vec!["aaaa\nbbbb", "cccc"]);
    }

    #[test]
    fn split_long_line_on_char_boundary() {
        let text = "я".repeat(25);
        let chunks = split_message(&text, 10);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn split_respects_telegram_limit() {
        let line = "строка отчёта с данными\n";
        let text = line.repeat(500);
        let chunks = split_message(&text, MAX_MESSAGE_CHARS);
        assert!(chunks.len() > 1);
        assert!(chunks
            .iter()
            .all(|c| c.chars().count() <= MAX_MESSAGE_CHARS));
    }
}
