//! Fetch and search configuration with sensible defaults.
//!
//! [`FetchConfig`] controls a single page retrieval (timeout, retry budget,
//! backoff jitter). [`SearchConfig`] controls the fan-out: how many result
//! pages per engine, how many fetches are in flight per engine, and how long
//! each worker slot rests between fetches. The defaults are tuned for
//! polite scraping rather than raw speed.

use crate::error::SearchError;
use serde::{Deserialize, Serialize};

/// Configuration for a single page fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-attempt HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// Total request attempts per page, including the first one.
    pub max_attempts: u32,
    /// Random backoff range in milliseconds `(min, max)` slept between attempts.
    pub retry_backoff_ms: (u64, u64),
    /// Custom User-Agent string. If `None`, every attempt picks a fresh one
    /// from a built-in list of realistic browser User-Agents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            max_attempts: 3,
            retry_backoff_ms: (1000, 3000),
            user_agent: None,
        }
    }
}

impl FetchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(SearchError::Config(
                "max_attempts must be greater than 0".into(),
            ));
        }
        if self.retry_backoff_ms.0 > self.retry_backoff_ms.1 {
            return Err(SearchError::Config(
                "retry_backoff_ms min must be <= max".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration for a multi-engine, multi-page search.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of result pages requested per engine.
    pub pages: usize,
    /// Result positions between consecutive pages.
    pub page_stride: usize,
    /// Maximum concurrent in-flight fetches per engine.
    pub workers_per_engine: usize,
    /// Random delay range in milliseconds `(min, max)` a worker waits after
    /// each fetch before taking the next page. Spreads requests over time
    /// to reduce rate limiting.
    pub throttle_ms: (u64, u64),
    /// Per-page fetch behaviour.
    pub fetch: FetchConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            pages: 11,
            page_stride: 10,
            workers_per_engine: 10,
            throttle_ms: (500, 1500),
            fetch: FetchConfig::default(),
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `pages`, `page_stride` and `workers_per_engine` must be greater than 0
    /// - `throttle_ms.0` must be <= `throttle_ms.1`
    /// - the nested [`FetchConfig`] must be valid
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.pages == 0 {
            return Err(SearchError::Config("pages must be greater than 0".into()));
        }
        if self.page_stride == 0 {
            return Err(SearchError::Config(
                "page_stride must be greater than 0".into(),
            ));
        }
        if self.workers_per_engine == 0 {
            return Err(SearchError::Config(
                "workers_per_engine must be greater than 0".into(),
            ));
        }
        if self.throttle_ms.0 > self.throttle_ms.1 {
            return Err(SearchError::Config(
                "throttle_ms min must be <= max".into(),
            ));
        }
        self.fetch.validate()
    }

    /// Pagination offsets requested for every engine: `0, stride, 2*stride, …`.
    pub fn offsets(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.pages).map(move |page| page * self.page_stride)
    }
}
