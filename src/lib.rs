//! Webhound: multi-engine result-page search with content classification.
//!
//! The core lives in the `webhound-search` crate. This crate adds the
//! application layer:
//!
//! - **Config**: TOML file with `[search]`, `[fetch]`, `[detection]`,
//!   `[logging]`, `[output]` and `[[engines]]` sections
//! - **Logging**: `tracing` console layer plus an optional debug file layer
//! - **Pipeline**: search → page log → extract → classify
//! - **Report**: console text or JSON
//! - **Progress**: per-engine progress bars

pub mod config;
pub mod error;
pub mod logging;
pub mod paths;
pub mod pipeline;
pub mod progress;
pub mod report;

pub use config::{OutputFormat, WebhoundConfig};
pub use error::{Result, WebhoundError};
pub use pipeline::{AnnotatedResult, EngineReport, Pipeline, SearchReport};
pub use progress::ProgressRenderer;
