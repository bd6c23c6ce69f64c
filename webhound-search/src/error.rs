//! Error types for the webhound-search crate.
//!
//! All errors use stable string messages suitable for display to users
//! and programmatic handling. Query text never appears in error messages.

/// Errors that can occur while fetching, extracting or classifying.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// A transport-level HTTP failure (connection refused, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(String),

    /// A single request attempt exceeded its timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The server answered with a client or server error status.
    #[error("HTTP status {status} from {url}")]
    Status {
        /// Numeric HTTP status code.
        status: u16,
        /// The URL that produced the status.
        url: String,
    },

    /// Failed to parse HTML, a selector, or a URL.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid search, fetch or detection configuration.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error (page log, configuration files).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SearchError {
    /// Returns `true` for failures that a retry may resolve.
    ///
    /// Transport errors, timeouts and HTTP error statuses are transient;
    /// configuration and parse errors are not.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Timeout(_) | Self::Status { .. }
        )
    }
}

/// Convenience type alias for webhound-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
