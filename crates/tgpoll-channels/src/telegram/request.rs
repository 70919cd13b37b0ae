//! `getUpdates` request parameters and URL construction.

use tgpoll_core::{
    config::{PollingConfig, MAX_LIMIT},
    error::PollError,
    update::UpdateType,
};

/// Parameters for one polling session.
///
/// All fields default to "let the server decide": `timeout = 0` (short
/// polling), `limit = 0` (server default of 100), no `allowed_updates`
/// filter (all types except the opt-in ones).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollOptions {
    pub timeout: u32,
    pub limit: u8,
    pub allowed_updates: Vec<UpdateType>,
}

impl PollOptions {
    pub fn new(timeout: u32, limit: u8, allowed_updates: Vec<UpdateType>) -> Self {
        Self {
            timeout,
            limit,
            allowed_updates: dedup(allowed_updates),
        }
    }

    pub fn with_timeout(timeout: u32) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }

    pub fn with_limit(limit: u8) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    pub fn with_allowed_updates(allowed_updates: Vec<UpdateType>) -> Self {
        Self {
            allowed_updates: dedup(allowed_updates),
            ..Self::default()
        }
    }

    /// Parse update type names, rejecting anything outside the known set.
    ///
    /// Blank entries are skipped, so `[""]` means "no filter".
    pub fn parse_allowed_updates<S: AsRef<str>>(
        names: &[S],
    ) -> Result<Vec<UpdateType>, PollError> {
        names
            .iter()
            .map(|n| n.as_ref().trim())
            .filter(|n| !n.is_empty())
            .map(str::parse)
            .collect()
    }

    pub fn validate(&self) -> Result<(), PollError> {
        if self.limit > MAX_LIMIT {
            return Err(PollError::Config(format!(
                "limit must be 0 or 1..={MAX_LIMIT}, got {}",
                self.limit
            )));
        }
        Ok(())
    }
}

impl From<&PollingConfig> for PollOptions {
    fn from(cfg: &PollingConfig) -> Self {
        Self::new(cfg.timeout_secs, cfg.limit, cfg.allowed_updates.clone())
    }
}

/// Keep the first occurrence of each type, in order.
fn dedup(types: Vec<UpdateType>) -> Vec<UpdateType> {
    let mut seen = Vec::with_capacity(types.len());
    for t in types {
        if !seen.contains(&t) {
            seen.push(t);
        }
    }
    seen
}

/// Comma-join update type names in order. Empty input gives an empty string.
pub fn join_allowed_updates(types: &[UpdateType]) -> String {
    types
        .iter()
        .map(UpdateType::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

/// Build the full `getUpdates` URL. The result embeds the token; never log it.
pub fn build_url(base_url: &str, token: &str, options: &PollOptions, offset: i64) -> String {
    format!(
        "{}/bot{token}/getUpdates?timeout={}&limit={}&offset={offset}&allowed_updates={}",
        base_url.trim_end_matches('/'),
        options.timeout,
        options.limit,
        join_allowed_updates(&options.allowed_updates),
    )
}
