//! Long-polling update loop and the single-fetch step it repeats.

use super::backoff::Backoff;
use super::request::{build_url, join_allowed_updates, PollOptions};
use super::transport::HttpResponse;
use super::PollingClient;
use std::time::Duration;
use tgpoll_core::{
    config::redact_token,
    error::PollError,
    update::{ApiResponse, Update},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Longest body excerpt kept in a [`PollError::Status`].
const MAX_ERROR_BODY: usize = 256;

/// Advance the cursor past every update in the batch.
///
/// A max-fold: the result never goes backwards and does not depend on the
/// order of the batch. An empty batch leaves the cursor unchanged.
pub fn advance_cursor(cursor: i64, updates: &[Update]) -> i64 {
    updates
        .iter()
        .fold(cursor, |acc, u| acc.max(u.update_id.saturating_add(1)))
}

/// Decode a `getUpdates` response into its batch of updates.
///
/// `ok: false` envelopes become [`PollError::Api`] whatever the status code;
/// other non-2xx responses become [`PollError::Status`].
pub fn decode_updates(response: &HttpResponse) -> Result<Vec<Update>, PollError> {
    let envelope = serde_json::from_str::<ApiResponse<Vec<Update>>>(&response.body);

    if !response.is_success() {
        return Err(match envelope {
            Ok(env) if !env.ok => env.into_api_error(),
            _ => PollError::Status {
                status: response.status,
                body: response.body.chars().take(MAX_ERROR_BODY).collect(),
            },
        });
    }

    let envelope = envelope?;
    if !envelope.ok {
        return Err(envelope.into_api_error());
    }
    Ok(envelope.result.unwrap_or_default())
}

impl PollingClient {
    /// One `getUpdates` round trip.
    ///
    /// On success the cursor has moved past the returned batch. On any error
    /// the cursor is untouched.
    pub async fn poll_once(&mut self, options: &PollOptions) -> Result<Vec<Update>, PollError> {
        let url = build_url(&self.base_url, &self.token, options, self.cursor);
        let timeout = Duration::from_secs(u64::from(options.timeout) + self.request_margin_secs);

        debug!(
            "telegram: getUpdates offset={} timeout={}s limit={}",
            self.cursor, options.timeout, options.limit
        );

        let response = self.transport.get(&url, timeout).await?;
        debug!(
            "telegram: getUpdates response ({}): {}",
            response.status, response.body
        );

        let updates = decode_updates(&response)?;

        let previous = self.cursor;
        self.cursor = advance_cursor(previous, &updates);
        if !updates.is_empty() {
            info!(
                "telegram: received {} update(s), offset {previous} -> {}",
                updates.len(),
                self.cursor
            );
        }

        Ok(updates)
    }

    /// Poll until `cancel` fires.
    ///
    /// Fetches run strictly one after another. Every per-iteration error is
    /// logged and followed by a backoff delay; none of them ends the loop.
    /// Returns an error only if `options` are invalid.
    pub async fn start_polling(
        &mut self,
        options: PollOptions,
        cancel: CancellationToken,
    ) -> Result<(), PollError> {
        options.validate()?;

        info!(
            "telegram: start polling as {} (timeout={}s, limit={}, allowed_updates=[{}], sink={})",
            redact_token(&self.token),
            options.timeout,
            options.limit,
            join_allowed_updates(&options.allowed_updates),
            self.sink.name()
        );

        let mut backoff = Backoff::new(&self.retry);

        loop {
            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                result = self.poll_once(&options) => Some(result),
            };
            let Some(outcome) = outcome else {
                break;
            };

            match outcome {
                Ok(updates) => {
                    backoff.reset();
                    for update in &updates {
                        self.sink.deliver(update).await;
                    }
                }
                Err(e) => {
                    let delay = match &e {
                        PollError::Api {
                            retry_after: Some(secs),
                            ..
                        } => Duration::from_secs(*secs),
                        _ => backoff.next_delay(),
                    };
                    error!("telegram poll error (retry in {delay:?}): {e}");

                    if !delay.is_zero() {
                        tokio::select! {
                            biased;
                            _ = cancel.cancelled() => break,
                            _ = tokio::time::sleep(delay) => {}
                        }
                    }
                }
            }
        }

        info!("telegram: polling stopped at offset {}", self.cursor);
        Ok(())
    }
}
