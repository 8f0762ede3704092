use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variables holding the credentials, with their legacy names.
const PRACTICUM_TOKEN_VARS: &[&str] = &["PRACTICUM_TOKEN", "pr_token"];
const TELEGRAM_TOKEN_VARS: &[&str] = &["TELEGRAM_TOKEN", "telega_token"];
const TELEGRAM_CHAT_ID_VARS: &[&str] = &["TELEGRAM_CHAT_ID", "telega_id"];

/// How the `from_date` cursor moves between polls.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CursorPolicy {
    /// Keep the startup timestamp for the whole process lifetime.
    #[default]
    Static,
    /// Move to the `current_date` returned by the last valid response.
    Advance,
}

impl std::fmt::Display for CursorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CursorPolicy::Static => write!(f, "static"),
            CursorPolicy::Advance => write!(f, "advance"),
        }
    }
}

/// Secrets supplied through the environment. Missing values are empty strings.
#[derive(Clone, Default)]
pub struct Credentials {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
}

impl Credentials {
    /// Read credentials from the process environment, loading `.env` first if present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve each credential through `lookup`, trying the canonical name
    /// before the legacy one.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |names: &[&str]| {
            names
                .iter()
                .find_map(|name| lookup(*name).filter(|v| !v.trim().is_empty()))
                .unwrap_or_default()
        };
        Self {
            practicum_token: first(PRACTICUM_TOKEN_VARS),
            telegram_token: first(TELEGRAM_TOKEN_VARS),
            telegram_chat_id: first(TELEGRAM_CHAT_ID_VARS),
        }
    }
}

/// True only when every credential is present and non-blank.
pub fn check_tokens(credentials: &Credentials) -> bool {
    [
        &credentials.practicum_token,
        &credentials.telegram_token,
        &credentials.telegram_chat_id,
    ]
    .iter()
    .all(|value| !value.trim().is_empty())
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub practicum: PracticumConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PracticumConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_retry_period_secs")]
    pub retry_period_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub cursor: CursorPolicy,
}

impl Default for PracticumConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            retry_period_secs: default_retry_period_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            cursor: CursorPolicy::default(),
        }
    }
}

impl PracticumConfig {
    pub fn retry_period(&self) -> Duration {
        Duration::from_secs(self.retry_period_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_file")]
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
        }
    }
}

fn default_endpoint() -> String {
    "https://practicum.yandex.ru/api/user_api/homework_statuses/".to_string()
}

fn default_retry_period_secs() -> u64 {
    600
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_log_file() -> PathBuf {
    PathBuf::from("main.log")
}

impl Config {
    /// Load tunables from a TOML file. When `required` is false a missing
    /// file yields the defaults.
    pub fn load(path: &Path, required: bool) -> Result<Self> {
        if !path.exists() && !required {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;

        if config.practicum.retry_period_secs == 0 {
            anyhow::bail!("practicum.retry_period_secs must be greater than zero");
        }
        if config.practicum.request_timeout_secs == 0 {
            anyhow::bail!("practicum.request_timeout_secs must be greater than zero");
        }

        Ok(config)
    }
}
