use thiserror::Error;

/// Top-level error type for tgpoll.
///
/// Every failure of a single `getUpdates` round trip maps to one of the
/// first four variants; the polling loop logs them and carries on.
#[derive(Debug, Error)]
pub enum PollError {
    /// DNS, connect, TLS or timeout failure before a response arrived.
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-2xx HTTP status whose body was not an API error envelope.
    #[error("http status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not match the expected envelope shape.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// `ok: false` envelope returned by the Bot API.
    #[error("api error: {description}")]
    Api {
        error_code: Option<i64>,
        description: String,
        /// Seconds the server asked us to wait before retrying.
        retry_after: Option<u64>,
    },

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// An `allowed_updates` entry outside the known update types.
    #[error("unknown update type '{0}'")]
    UnknownUpdateType(String),
}
