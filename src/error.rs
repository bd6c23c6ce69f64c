//! Error types for the webhound application.

use webhound_search::SearchError;

/// Top-level error type for a webhound run.
///
/// Only configuration problems stop a query; network and extraction
/// failures are contained inside the search library and merely shrink the
/// report.
#[derive(Debug, thiserror::Error)]
pub enum WebhoundError {
    /// Invalid or unreadable application configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Error from the search library (detection config, registry, client setup).
    #[error(transparent)]
    Search(#[from] SearchError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Report or configuration serialization failure.
    #[error("serialize error: {0}")]
    Serialize(String),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, WebhoundError>;
