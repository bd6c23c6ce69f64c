//! Application directory paths.
//!
//! Uses the [`dirs`] crate for platform-appropriate locations. On Linux
//! [`config_dir`] honours `XDG_CONFIG_HOME`, so the default config file is
//! `$XDG_CONFIG_HOME/webhound/config.toml`.
//!
//! # Environment Overrides
//!
//! - `WEBHOUND_CONFIG_DIR` overrides [`config_dir`]
//! - `WEBHOUND_DATA_DIR` overrides [`data_dir`]

use std::path::PathBuf;

/// Application config directory.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("WEBHOUND_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("webhound"))
        .unwrap_or_else(|| PathBuf::from("/tmp/webhound-config"))
}

/// Application data directory, home of logs and page dumps.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("WEBHOUND_DATA_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::data_dir()
        .map(|d| d.join("webhound"))
        .unwrap_or_else(|| PathBuf::from("/tmp/webhound-data"))
}

/// Main config file path (`config_dir()/config.toml`).
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// Log file directory (`data_dir()/logs/`).
#[must_use]
pub fn logs_dir() -> PathBuf {
    data_dir().join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_dir_contains_webhound() {
        let dir = config_dir();
        let s = dir.to_string_lossy();
        assert!(s.contains("webhound"), "config_dir should contain 'webhound': {s}");
    }

    #[test]
    fn config_file_ends_with_config_toml() {
        let path = config_file();
        assert!(path.ends_with("config.toml"), "config_file: {}", path.display());
    }

    #[test]
    fn logs_dir_is_under_data_dir() {
        assert!(logs_dir().starts_with(data_dir()));
    }
}
