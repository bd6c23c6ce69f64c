//! Tracing subscriber setup.
//!
//! Console output goes to stderr so JSON reports on stdout stay clean. When
//! `[logging] file` is set, a second non-blocking layer records everything
//! at debug level to that file.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::error::{Result, WebhoundError};

const FILE_DIRECTIVES: &str = "webhound=debug,webhound_search=debug";

/// Default console directives for `level`; noisy dependencies stay at warn.
pub fn console_directives(level: &str) -> String {
    format!("warn,webhound={level},webhound_search={level}")
}

/// Install the global subscriber.
///
/// The returned guard flushes the file layer on drop; keep it alive for the
/// lifetime of the program.
///
/// # Errors
///
/// Returns an error if the level is not a valid filter, the log directory
/// cannot be created, or a subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let console_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(console_directives(&config.level))
            .map_err(|e| WebhoundError::Config(format!("invalid log level {:?}: {e}", config.level)))?,
    };

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(console_filter);

    let (file_layer, guard) = match config.file {
        Some(ref path) => {
            let dir = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => std::path::PathBuf::from("."),
            };
            let file_name = path.file_name().ok_or_else(|| {
                WebhoundError::Config(format!("log file {} has no file name", path.display()))
            })?;
            std::fs::create_dir_all(&dir)?;

            let appender = tracing_appender::rolling::never(&dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(EnvFilter::new(FILE_DIRECTIVES));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| WebhoundError::Config(format!("cannot install logger: {e}")))?;

    if let Some(ref path) = config.file {
        tracing::debug!(path = %path.display(), "file logging enabled");
    }
    Ok(guard)
}
