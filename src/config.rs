//! Application configuration loaded from TOML.
//!
//! ```toml
//! [search]
//! engines = ["Google", "Bing"]   # empty = every registered engine
//! pages = 11
//! workers_per_engine = 10
//! throttle_ms = [500, 1500]
//!
//! [fetch]
//! timeout_seconds = 10
//! max_attempts = 3
//! retry_backoff_ms = [1000, 3000]
//!
//! [detection]
//! config = "/etc/webhound/social_platforms.json"
//!
//! [logging]
//! level = "info"
//! file = "/var/log/webhound/webhound.log"
//!
//! [output]
//! format = "json"
//! page_log = "page-contents.log"
//!
//! [[engines]]
//! name = "Local"
//! url_template = "http://localhost:8080/search?q="
//! dialect = "generic"
//! ```
//!
//! Every section and field is optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use webhound_search::{DetectionConfig, EngineRegistry, FetchConfig, SearchConfig, SearchTarget};

use crate::error::{Result, WebhoundError};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhoundConfig {
    /// Fan-out and pagination.
    pub search: SearchSection,
    /// Per-page retrieval.
    pub fetch: FetchConfig,
    /// Classification.
    pub detection: DetectionSection,
    /// Log output.
    pub logging: LoggingConfig,
    /// Report and page-log output.
    pub output: OutputConfig,
    /// Replacement engine registry. Empty keeps the built-in engines.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub engines: Vec<SearchTarget>,
}

/// `[search]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSection {
    /// Engines searched when none are given on the command line.
    pub engines: Vec<String>,
    /// Result pages per engine.
    pub pages: usize,
    /// Result positions between pages.
    pub page_stride: usize,
    /// Concurrent fetches per engine.
    pub workers_per_engine: usize,
    /// Delay range in milliseconds a worker rests after each fetch.
    pub throttle_ms: (u64, u64),
}

impl Default for SearchSection {
    fn default() -> Self {
        let defaults = SearchConfig::default();
        Self {
            engines: Vec::new(),
            pages: defaults.pages,
            page_stride: defaults.page_stride,
            workers_per_engine: defaults.workers_per_engine,
            throttle_ms: defaults.throttle_ms,
        }
    }
}

/// `[detection]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionSection {
    /// JSON detection config. `None` uses the built-in categories and platforms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<PathBuf>,
    /// Also classify the visible text of every fetched page.
    pub classify_pages: bool,
}

impl Default for DetectionSection {
    fn default() -> Self {
        Self {
            config: None,
            classify_pages: true,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Console level for webhound's own targets. `RUST_LOG` wins if set.
    pub level: String,
    /// Debug-level log file, written in addition to the console.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            file: None,
        }
    }
}

/// Report format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable console text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// `[output]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Report format.
    pub format: OutputFormat,
    /// Append raw result pages to this file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_log: Option<PathBuf>,
}

impl WebhoundConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            WebhoundError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config: Self =
            toml::from_str(&content).map_err(|e| WebhoundError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, else from [`default_config_path`] if that
    /// file exists, else use defaults.
    ///
    /// [`default_config_path`]: WebhoundConfig::default_config_path
    ///
    /// # Errors
    ///
    /// An explicit `path` must exist; any file that is read must be valid.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        let default_path = Self::default_config_path();
        if default_path.is_file() {
            Self::from_file(&default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| WebhoundError::Serialize(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/webhound/config.toml`.
    pub fn default_config_path() -> PathBuf {
        crate::paths::config_file()
    }

    /// Check the search settings and engine overrides.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<()> {
        self.search_config().validate()?;
        self.registry()?;
        Ok(())
    }

    /// Library search settings assembled from `[search]` and `[fetch]`.
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            pages: self.search.pages,
            page_stride: self.search.page_stride,
            workers_per_engine: self.search.workers_per_engine,
            throttle_ms: self.search.throttle_ms,
            fetch: self.fetch.clone(),
        }
    }

    /// The configured engine registry, or the built-in one.
    ///
    /// # Errors
    ///
    /// Returns an error if an `[[engines]]` entry is invalid.
    pub fn registry(&self) -> Result<EngineRegistry> {
        if self.engines.is_empty() {
            return Ok(EngineRegistry::default());
        }
        Ok(EngineRegistry::new(self.engines.clone())?)
    }

    /// Load the detection configuration named in `[detection]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or invalid.
    pub fn detection(&self) -> Result<DetectionConfig> {
        match self.detection.config {
            Some(ref path) => Ok(DetectionConfig::from_file(path)?),
            None => Ok(DetectionConfig::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use webhound_search::FilterDialect;

    #[test]
    fn default_config_is_valid() {
        let config = WebhoundConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.search_config(), SearchConfig::default());
        assert_eq!(config.registry().unwrap().len(), 4);
        assert!(config.detection.classify_pages);
        assert_eq!(config.output.format, OutputFormat::Text);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: WebhoundConfig = toml::from_str(
            r#"
            [search]
            pages = 2
            engines = ["Bing"]

            [output]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.search.pages, 2);
        assert_eq!(config.search.workers_per_engine, 10);
        assert_eq!(config.search.engines, vec!["Bing"]);
        assert_eq!(config.fetch.max_attempts, 3);
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn engine_overrides_replace_registry() {
        let config: WebhoundConfig = toml::from_str(
            r#"
            [[engines]]
            name = "Local"
            url_template = "http://localhost:8080/search?q="

            [[engines]]
            name = "Mirror"
            url_template = "https://mirror.example/?q="
            dialect = "bing"
            "#,
        )
        .unwrap();
        let registry = config.registry().unwrap();
        assert_eq!(registry.names(), vec!["Local", "Mirror"]);
        assert_eq!(registry.get("local").unwrap().dialect, FilterDialect::Generic);
        assert_eq!(registry.get("mirror").unwrap().dialect, FilterDialect::Bing);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = WebhoundConfig::default();
        config.search.pages = 3;
        config.fetch.timeout_seconds = 4;
        config.logging.file = Some(dir.path().join("webhound.log"));
        config.output.page_log = Some(PathBuf::from("pages.log"));

        config.save_to_file(&path).unwrap();
        let loaded = WebhoundConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn invalid_values_rejected_at_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[search]\nworkers_per_engine = 0\n").unwrap();
        let err = WebhoundConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("workers_per_engine"));
    }

    #[test]
    fn invalid_engine_override_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[[engines]]\nname = \"Bad\"\nurl_template = \"ftp://x/?q=\"\n",
        )
        .unwrap();
        assert!(WebhoundConfig::from_file(&path).is_err());
    }

    #[test]
    fn from_file_nonexistent_returns_error() {
        let result = WebhoundConfig::from_file(Path::new("/nonexistent/path/config.toml"));
        assert!(result.unwrap_err().to_string().contains("cannot read"));
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        assert!(WebhoundConfig::load(Some(Path::new("/nonexistent/webhound.toml"))).is_err());
    }

    #[test]
    fn from_file_invalid_toml_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[search\npages = ").unwrap();
        assert!(WebhoundConfig::from_file(&path).is_err());
    }

    #[test]
    fn detection_defaults_without_path() {
        let detection = WebhoundConfig::default().detection().unwrap();
        assert_eq!(detection.categories().len(), 2);
    }

    #[test]
    fn detection_path_must_exist() {
        let mut config = WebhoundConfig::default();
        config.detection.config = Some(PathBuf::from("/nonexistent/social_platforms.json"));
        assert!(config.detection().is_err());
    }
}
