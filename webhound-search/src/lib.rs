//! # webhound-search
//!
//! Concurrent multi-engine result-page retrieval, result extraction and
//! content classification.
//!
//! ## Design
//!
//! - Paginated result-page URLs per engine, fetched with a bounded worker
//!   pool per engine and all engines concurrently
//! - Per-attempt timeout, User-Agent rotation and jittered retry backoff
//! - Ordered CSS-selector strategies turn pages into [`ResultItem`]s,
//!   deduplicated by link per engine
//! - Keyword, query-mention, social-platform and entity classification
//!   driven by an immutable [`DetectionConfig`]
//! - Graceful degradation: failed pages and engines are logged and skipped
//!
//! Queries are logged only at trace level.

pub mod classify;
pub mod config;
pub mod content;
pub mod engine;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod filters;
pub mod http;
pub mod orchestrator;
pub mod page_log;
pub mod progress;
pub mod types;

use std::collections::BTreeMap;

pub use classify::{Classifier, DetectionConfig, DetectionResult, EntityRecognizer};
pub use config::{FetchConfig, SearchConfig};
pub use engine::{EngineRegistry, SearchTarget};
pub use error::{Result, SearchError};
pub use extract::{ResultCollector, ResultExtractor};
pub use fetcher::Fetcher;
pub use filters::{DateRange, FilterDialect, SearchFilters};
pub use orchestrator::{EngineDocuments, SearchOrchestrator};
pub use page_log::PageLog;
pub use progress::{ProgressCallback, SearchEvent};
pub use types::{Document, FetchOutcome, PageRequest, ResultItem};

/// Engine name → deduplicated result items in page order.
pub type EngineResults = BTreeMap<String, Vec<ResultItem>>;

/// Search `engines` (empty = every engine in `registry`) and extract results.
///
/// Engines that yield no documents are absent from the map. Engines whose
/// documents contain no recognisable results map to an empty list.
///
/// # Errors
///
/// Returns [`SearchError::Config`] if `config` is invalid. Network failures
/// never surface here; they only shrink the result.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> webhound_search::Result<()> {
/// use webhound_search::{EngineRegistry, SearchConfig, SearchFilters};
///
/// let results = webhound_search::search(
///     "rust async",
///     &["DuckDuckGo".to_string()],
///     &SearchFilters::default(),
///     EngineRegistry::default(),
///     SearchConfig::default(),
/// )
/// .await?;
/// for (engine, items) in &results {
///     for item in items {
///         println!("[{engine}] {}: {}", item.title, item.url);
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(
    query: &str,
    engines: &[String],
    filters: &SearchFilters,
    registry: EngineRegistry,
    config: SearchConfig,
) -> Result<EngineResults> {
    let orchestrator = SearchOrchestrator::new(registry, config)?;
    let extractor = ResultExtractor::standard()?;
    let documents = orchestrator.search_all(query, engines, filters).await;

    Ok(documents
        .into_iter()
        .map(|(engine, docs)| {
            let items = extractor.collect(&docs);
            (engine, items)
        })
        .collect())
}
