//! Telegram Bot API channel.
//!
//! Uses long polling via `getUpdates`, advancing an offset cursor past every
//! update it has seen.
//! Docs: <https://core.telegram.org/bots/api#getupdates>

mod backoff;
mod polling;
mod request;
mod sink;
mod transport;


pub use backoff::Backoff;
pub use polling::{advance_cursor, decode_updates};
pub use request::{build_url, join_allowed_updates, PollOptions};
pub use sink::LogSink;
pub use transport::{HttpResponse, ReqwestTransport, Transport};

use std::sync::Arc;
use tgpoll_core::{
    config::{Config, RetryConfig},
    error::PollError,
    traits::UpdateSink,
};

/// Telegram `getUpdates` client.
///
/// Owns the bot token and the offset cursor. One instance drives one
/// sequential polling loop; the cursor is only touched through `&mut self`.
pub struct PollingClient {
    token: String,
    base_url: String,
    transport: Arc<dyn Transport>,
    sink: Arc<dyn UpdateSink>,
    retry: RetryConfig,
    request_margin_secs: u64,
    /// Next offset to request. Starts at 0.
    cursor: i64,
}

impl PollingClient {
    /// Create a client against the public Bot API with default settings.
    pub fn new(token: impl Into<String>) -> Result<Self, PollError> {
        let mut config = Config::default();
        config.telegram.bot_token = token.into();
        Self::from_config(&config)
    }

    /// Create a client from a validated config.
    pub fn from_config(config: &Config) -> Result<Self, PollError> {
        config.validate()?;
        Ok(Self {
            token: config.telegram.bot_token.trim().to_string(),
            base_url: config.telegram.api_base_url.trim_end_matches('/').to_string(),
            transport: Arc::new(ReqwestTransport::new()),
            sink: Arc::new(LogSink),
            retry: config.retry.clone(),
            request_margin_secs: config.polling.request_margin_secs,
            cursor: 0,
        })
    }

    /// Replace the HTTP transport.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    /// Replace the sink that receives decoded updates.
    pub fn with_sink(mut self, sink: Arc<dyn UpdateSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Replace the retry policy.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Current cursor: the offset the next `getUpdates` call will send.
    pub fn cursor(&self) -> i64 {
        self.cursor
    }
}
