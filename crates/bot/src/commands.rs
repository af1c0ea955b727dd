//! Parsing of admin chat commands.

use crate::telegram::BotCommand;

/// Reporting window of `/top_movies`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopMoviesPeriod {
    Day,
    Week,
}

impl TopMoviesPeriod {
    /// Value of the backend's `period` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            TopMoviesPeriod::Day => "24h",
            TopMoviesPeriod::Week => "7d",
        }
    }

    /// Any argument mentioning `7` selects the weekly window.
    fn from_args(args: &str) -> Self {
        if args.contains('7') {
            TopMoviesPeriod::Week
        } else {
            TopMoviesPeriod::Day
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/start` and `/commands`.
    Help,
    Status,
    DbCheck,
    LogsErrors,
    TopMovies(TopMoviesPeriod),
    NewReviews,
    SearchStatsNone,
    TopSearch,
    TopPages,
    NewUsers,
    ActiveUsers,
    /// `None` when the argument is missing or not a number.
    UserStats(Option<i64>),
    FullReport,
    AiReport,
    Unknown(String),
}

/// Command menu registered with `setMyCommands`.
pub const MENU: [(&str, &str); 15] = [
    ("start", "Показать список команд"),
    ("commands", "Показать список команд"),
    ("status", "Проверить статус API"),
    ("db_check", "Проверить статус подключения к БД"),
    ("logs_errors", "Последние ошибки в логах"),
    ("top_movies", "Топ-10 просматриваемых фильмов"),
    ("new_reviews", "Количество новых отзывов"),
    ("search_stats_none", "Топ 'пустых' поисков"),
    ("top_search", "Топ поисковых запросов"),
    ("top_pages", "Топ-10 посещаемых страниц"),
    ("new_users", "Статистика по новым пользователям"),
    ("active_users", "Количество активных пользователей"),
    ("user_stats", "Статистика по пользователю (ID)"),
    ("full_report", "Полный отчет о системе"),
    ("ai_report", "Аналитический отчет от LLM"),
];

pub fn menu() -> Vec<BotCommand> {
    MENU.iter()
        .map(|(command, description)| BotCommand {
            command: command.to_string(),
            description: description.to_string(),
        })
        .collect()
}

/// Parse a message text. Returns `None` for text that is not a command.
///
/// Accepts the `/command@botname args` form.
pub fn parse(text: &str) -> Option<Command> {
    let text = text.trim();
    let rest = text.strip_prefix('/')?;
    let (head, args) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    let name = head.split('@').next().unwrap_or(head);
    if name.is_empty() {
        return None;
    }
    let args = args.trim();

    let command = match name {
        "start" | "commands" => Command::Help,
        "status" => Command::Status,
        "db_check" => Command::DbCheck,
        "logs_errors" => Command::LogsErrors,
        "top_movies" => Command::TopMovies(TopMoviesPeriod::from_args(args)),
        "new_reviews" => Command::NewReviews,
        "search_stats_none" => Command::SearchStatsNone,
        "top_search" => Command::TopSearch,
        "top_pages" => Command::TopPages,
        "new_users" => Command::NewUsers,
        "active_users" => Command::ActiveUsers,
        "user_stats" => Command::UserStats(parse_user_id(args)),
        "full_report" => Command::FullReport,
        "ai_report" => Command::AiReport,
        other => Command::Unknown(other.to_string()),
    };
    Some(command)
}

fn parse_user_id(args: &str) -> Option<i64> {
    let first = args.split_whitespace().next()?;
    if !first.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    first.parse().ok()
}
