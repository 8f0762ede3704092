mod bot;
mod config;
mod error;
mod homework;
mod platform;
mod practicum;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::bot::HomeworkBot;
use crate::config::{check_tokens, Config, Credentials};
use crate::platform::telegram::TelegramNotifier;
use crate::practicum::PracticumClient;

/// Log to stdout and mirror every record into `log_file` (truncated on start).
fn init_logging(log_file: &Path) -> Result<()> {
    let file = File::create(log_file)
        .with_context(|| format!("Failed to create log file: {}", log_file.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,homework_bot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let (config_path, required) = match std::env::args().nth(1) {
        Some(path) => (PathBuf::from(path), true),
        None => (PathBuf::from("config.toml"), false),
    };
    let config = Config::load(&config_path, required)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    init_logging(&config.logging.file)?;

    let credentials = Credentials::from_env();
    if !check_tokens(&credentials) {
        let message = "Not all required environment variables are set \
                       (PRACTICUM_TOKEN, TELEGRAM_TOKEN, TELEGRAM_CHAT_ID)";
        error!(critical = true, "{}", message);
        anyhow::bail!(message);
    }

    info!("Configuration loaded successfully");
    info!("  Endpoint: {}", config.practicum.endpoint);
    info!("  Retry period: {:?}", config.practicum.retry_period());
    info!("  Request timeout: {:?}", config.practicum.request_timeout());
    info!("  Cursor: {}", config.practicum.cursor);

    let api = PracticumClient::new(
        &config.practicum.endpoint,
        &credentials.practicum_token,
        config.practicum.request_timeout(),
    )
    .context("Failed to build HTTP client")?;
    let notifier = TelegramNotifier::new(
        &credentials.telegram_token,
        &credentials.telegram_chat_id,
    );

    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown requested");
            stop_tx.send(true).ok();
        }
    });

    let started_at = chrono::Utc::now().timestamp();
    let mut bot = HomeworkBot::new(
        api,
        notifier,
        config.practicum.retry_period(),
        config.practicum.cursor,
        started_at,
    );

    info!("Bot is starting...");
    bot.run(stop_rx).await;
    info!("Last cursor: {}", bot.cursor());

    Ok(())
}
