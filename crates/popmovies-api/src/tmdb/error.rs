//! Error taxonomy for the TMDB client.

/// Result type returned by every fallible TMDB operation.
pub type Result<T> = std::result::Result<T, TmdbError>;

/// Errors raised while building, fetching or decoding TMDB requests.
///
/// Field-level problems inside an otherwise valid document are never
/// reported here; those fields fall back to their default values.
#[derive(Debug, thiserror::Error)]
#[allow(clippy::module_name_repetitions)]
pub enum TmdbError {
    /// A required client setting was not provided.
    #[error("{0} is required")]
    MissingSetting(&'static str),

    /// A request URL could not be constructed.
    #[error("malformed URL: {0}")]
    MalformedUrl(#[from] url::ParseError),

    /// The HTTP request failed (connect, timeout, body read).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server replied with a non-success HTTP status and no TMDB error body.
    #[error("TMDB API error (HTTP {status}): {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The body is not a JSON object, or its `status_code` is not an integer.
    #[error("failed to decode TMDB response: {0}")]
    Decode(String),

    /// The body carries a non-success TMDB `status_code`.
    #[error("TMDB API error: code={code}, message={message}")]
    Api {
        /// TMDB status code (e.g. 7 = invalid API key, 34 = not found).
        code: i64,
        /// Provider supplied `status_message`.
        message: String,
    },
}

impl TmdbError {
    /// Returns `true` for a TMDB status-code error.
    #[must_use]
    pub const fn is_api(&self) -> bool {
        matches!(self, Self::Api { .. })
    }

    /// Returns `true` when the body could not be decoded.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    /// Returns `true` for network level failures, including bare HTTP errors.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::HttpStatus { .. })
    }
}
