//! Core orchestrator: per-engine page fan-out under a bounded worker pool.
//!
//! # Pipeline
//!
//! 1. Resolve requested engine names against the [`EngineRegistry`];
//!    unknown names are logged and skipped
//! 2. Build paginated [`PageRequest`](crate::types::PageRequest)s per engine
//! 3. Fetch pages with at most `workers_per_engine` in flight per engine,
//!    all engines concurrently
//! 4. Drop failed pages (logged), sort the rest by offset
//! 5. Omit engines that produced no documents

use std::collections::BTreeMap;
use std::pin::pin;

use futures::stream::{self, StreamExt};

use crate::config::SearchConfig;
use crate::engine::{EngineRegistry, SearchTarget};
use crate::error::SearchError;
use crate::fetcher::Fetcher;
use crate::filters::SearchFilters;
use crate::http;
use crate::progress::{ProgressCallback, SearchEvent};
use crate::types::{Document, FetchOutcome};

use super::pages::page_requests;

/// Engine name → that engine's documents in ascending offset order.
pub type EngineDocuments = BTreeMap<String, Vec<Document>>;

/// Fans a query out across engines and pages.
pub struct SearchOrchestrator {
    registry: EngineRegistry,
    fetcher: Fetcher,
    config: SearchConfig,
    progress: Option<ProgressCallback>,
}

impl SearchOrchestrator {
    /// Create an orchestrator with its own shared HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `config` is invalid.
    pub fn new(registry: EngineRegistry, config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let fetcher = Fetcher::new(config.fetch.clone())?;
        Ok(Self {
            registry,
            fetcher,
            config,
            progress: None,
        })
    }

    /// Create an orchestrator around an existing fetcher.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `config` is invalid.
    pub fn with_fetcher(
        registry: EngineRegistry,
        fetcher: Fetcher,
        config: SearchConfig,
    ) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Self {
            registry,
            fetcher,
            config,
            progress: None,
        })
    }

    /// Attach a progress callback.
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// The registry engines are resolved against.
    pub fn registry(&self) -> &EngineRegistry {
        &self.registry
    }

    /// Search every named engine and collect its result-page documents.
    ///
    /// Never fails: per-page and per-engine problems are logged and the
    /// affected engine is simply absent from the returned map. An empty
    /// `engines` slice searches every registered engine.
    pub async fn search_all(
        &self,
        query: &str,
        engines: &[String],
        filters: &SearchFilters,
    ) -> EngineDocuments {
        tracing::trace!(query, "search requested");
        let targets = self.resolve(engines);

        let outcomes = futures::future::join_all(
            targets
                .into_iter()
                .map(|target| self.search_engine(target, query, filters)),
        )
        .await;

        let mut results = EngineDocuments::new();
        for (engine, documents) in outcomes {
            if documents.is_empty() {
                tracing::warn!(%engine, "no results");
            } else {
                results.insert(engine, documents);
            }
        }
        results
    }

    /// Map requested names to targets, skipping unknown names and repeats.
    fn resolve(&self, engines: &[String]) -> Vec<&SearchTarget> {
        if engines.is_empty() {
            return self.registry.iter().collect();
        }

        let mut targets: Vec<&SearchTarget> = Vec::with_capacity(engines.len());
        for name in engines {
            match self.registry.get(name) {
                Some(target) => {
                    if !targets.iter().any(|t| t.name == target.name) {
                        targets.push(target);
                    }
                }
                None => {
                    tracing::warn!(engine = %name, "search engine is not supported");
                }
            }
        }
        targets
    }

    /// Fetch all pages of one engine and return them sorted by offset.
    async fn search_engine(
        &self,
        target: &SearchTarget,
        query: &str,
        filters: &SearchFilters,
    ) -> (String, Vec<Document>) {
        let engine = target.name.clone();
        let requests = page_requests(target, query, filters, &self.config);

        tracing::info!(%engine, pages = requests.len(), "searching");
        self.emit(SearchEvent::EngineStarted {
            engine: engine.clone(),
            pages: requests.len(),
        });

        let mut completed = pin!(stream::iter(requests)
            .map(|request| async move {
                let outcome = self.fetcher.fetch(&request).await;
                // Rest this worker slot before it takes another page.
                tokio::time::sleep(http::jitter(self.config.throttle_ms)).await;
                outcome
            })
            .buffer_unordered(self.config.workers_per_engine));

        let mut documents = Vec::new();
        while let Some(outcome) = completed.next().await {
            match outcome {
                FetchOutcome::Document(document) => {
                    self.emit(SearchEvent::PageFetched {
                        engine: engine.clone(),
                        offset: document.offset,
                    });
                    documents.push(document);
                }
                FetchOutcome::Failed(failure) => {
                    tracing::warn!(
                        %engine,
                        offset = failure.offset,
                        attempts = failure.attempts,
                        error = %failure.error,
                        "page skipped"
                    );
                    self.emit(SearchEvent::PageFailed {
                        engine: engine.clone(),
                        offset: failure.offset,
                        reason: failure.error.to_string(),
                    });
                }
            }
        }

        documents.sort_by_key(|d| d.offset);

        if !documents.is_empty() {
            tracing::info!(%engine, documents = documents.len(), "search completed");
        }
        self.emit(SearchEvent::EngineFinished {
            engine: engine.clone(),
            documents: documents.len(),
        });

        (engine, documents)
    }

    fn emit(&self, event: SearchEvent) {
        if let Some(ref callback) = self.progress {
            callback(event);
        }
    }
}
