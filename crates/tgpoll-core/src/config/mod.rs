mod defaults;


use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::PollError;
use crate::update::UpdateType;
use defaults::*;

/// Largest `limit` the Bot API accepts for `getUpdates`.
pub const MAX_LIMIT: u8 = 100;

/// Top-level tgpoll configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Process-level settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory for a daily-rolling log file. Unset = stderr only.
    #[serde(default)]
    pub log_dir: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

/// Telegram bot credentials and endpoint.
#[derive(Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            api_base_url: default_api_base_url(),
        }
    }
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &redact_token(&self.bot_token))
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

/// `getUpdates` parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Seconds the server may hold a request open. 0 = short polling.
    #[serde(default)]
    pub timeout_secs: u32,
    /// Updates per call, 1..=100. 0 = server default.
    #[serde(default)]
    pub limit: u8,
    /// Empty = all update types.
    #[serde(default)]
    pub allowed_updates: Vec<UpdateType>,
    /// Added to `timeout_secs` for the client-side HTTP timeout.
    #[serde(default = "default_request_margin")]
    pub request_margin_secs: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 0,
            limit: 0,
            allowed_updates: Vec::new(),
            request_margin_secs: default_request_margin(),
        }
    }
}

/// Backoff between failed polling iterations.
///
/// `initial_backoff_ms = 0` disables the delay entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
    #[serde(default = "default_multiplier")]
    pub multiplier: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            multiplier: default_multiplier(),
        }
    }
}

impl Config {
    /// Reject configurations the polling client cannot run with.
    pub fn validate(&self) -> Result<(), PollError> {
        if self.telegram.bot_token.trim().is_empty() {
            return Err(PollError::Config(
                "telegram.bot_token is empty. Set it in config.toml or TELEGRAM_BOT_TOKEN env var."
                    .into(),
            ));
        }
        if self.telegram.api_base_url.trim().is_empty() {
            return Err(PollError::Config("telegram.api_base_url is empty".into()));
        }
        if self.polling.limit > MAX_LIMIT {
            return Err(PollError::Config(format!(
                "polling.limit must be 0 or 1..={MAX_LIMIT}, got {}",
                self.polling.limit
            )));
        }
        if self.retry.multiplier == 0 {
            return Err(PollError::Config("retry.multiplier must be >= 1".into()));
        }
        Ok(())
    }
}

/// Mask everything after the bot id so tokens never land in logs.
///
/// `123456:ABC-DEF` becomes `123456:***`.
pub fn redact_token(token: &str) -> String {
    match token.split_once(':') {
        Some((id, _)) => format!("{id}:***"),
        None if token.is_empty() => String::new(),
        None => "***".to_string(),
    }
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, PollError> {
    let path = Path::new(path);
    if !path.exists() {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| PollError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| PollError::Config(format!("failed to parse config: {}", e)))?;

    Ok(config)
}
