use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use moviehub_bot::admin_api::AdminApiClient;
use moviehub_bot::bot::AdminBot;
use moviehub_bot::config::BotConfig;
use moviehub_bot::telegram::HttpTelegramApi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moviehub_bot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = BotConfig::from_env();
    if config.admin_usernames.is_empty() {
        tracing::warn!("TELEGRAM_ADMIN_USERNAMES is empty, every command will be rejected");
    }
    if config.admin_api_token.is_none() {
        tracing::warn!("ADMIN_API_TOKEN is not set, admin endpoints will answer 401");
    }

    // --- Clients ---
    let http = reqwest::Client::builder()
        .build()
        .context("Failed to build HTTP client")?;
    let telegram = HttpTelegramApi::new(
        http.clone(),
        &config.telegram_api_base_url,
        &config.telegram_token,
    );
    let admin_api = AdminApiClient::new(
        http,
        &config.admin_api_base_url,
        config.admin_api_token.clone(),
    )
    .with_timeout(Duration::from_secs(config.admin_api_timeout_secs));

    let bot = AdminBot::new(
        telegram,
        admin_api,
        config.admin_usernames.clone(),
        config.poll_timeout_secs,
    )
    .with_ai_report_timeout(Duration::from_secs(config.ai_report_timeout_secs));

    bot.register_commands()
        .await
        .context("Failed to register bot commands")?;
    tracing::info!(
        admins = config.admin_usernames.len(),
        api = %config.admin_api_base_url,
        "Bot started, polling for updates"
    );

    bot.run(shutdown_signal()).await;
    tracing::info!("Bot stopped");
    Ok(())
}

/// Resolve on SIGINT (Ctrl-C) or SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
