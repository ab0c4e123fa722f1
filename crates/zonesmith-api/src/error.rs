use thiserror::Error;

/// Top-level error type for the `zonesmith-api` crate.
///
/// Covers every failure mode of the NetBox HTTP surface: authentication,
/// transport, API-level rejections, and response decoding.
/// `zonesmith-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Token rejected by NetBox (401/403).
    #[error("Invalid API token")]
    InvalidToken,

    /// Token contains bytes that cannot be sent as an HTTP header.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── API ─────────────────────────────────────────────────────────
    /// Non-success response from NetBox.
    #[error("NetBox API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Success status with an empty body.
    #[error("NetBox returned an empty response for {endpoint}")]
    EmptyResponse { endpoint: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error indicates a rejected credential.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::InvalidToken | Self::Authentication { .. })
    }

    /// Returns `true` if this is a transient transport error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }
}
