//! The webhound run: search → page log → extract → classify.
//!
//! Network work happens inside [`SearchOrchestrator::search_all`]; everything
//! after it is synchronous and runs engine by engine in name order.

use std::sync::Arc;

use serde::Serialize;
use webhound_search::content::page_text;
use webhound_search::{
    Classifier, DetectionResult, Document, PageLog, ProgressCallback, ResultExtractor, ResultItem,
    SearchFilters, SearchOrchestrator,
};

use crate::config::WebhoundConfig;
use crate::error::Result;

/// One extracted result with its classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotatedResult {
    /// Title, link and description.
    #[serde(flatten)]
    pub item: ResultItem,
    /// Classification of the item's text.
    pub detection: DetectionResult,
}

/// Classification of a whole result page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageDetection {
    /// Pagination offset of the page.
    pub offset: usize,
    /// Final page URL.
    pub url: String,
    /// Classification of the page's visible text.
    pub detection: DetectionResult,
}

/// Everything found on one engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineReport {
    /// Engine display name.
    pub engine: String,
    /// Pages that were retrieved.
    pub pages_retrieved: usize,
    /// Link-unique results in page order.
    pub results: Vec<AnnotatedResult>,
    /// Per-page classification, empty when page classification is off.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub page_detections: Vec<PageDetection>,
}

/// Outcome of one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchReport {
    /// The query as entered.
    pub query: String,
    /// Engines that returned at least one page, in name order.
    pub engines: Vec<EngineReport>,
}

impl SearchReport {
    /// Total results across engines.
    pub fn total_results(&self) -> usize {
        self.engines.iter().map(|e| e.results.len()).sum()
    }

    /// Returns `true` when no engine returned a page.
    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}

/// A configured search-and-classify pipeline.
pub struct Pipeline {
    orchestrator: SearchOrchestrator,
    extractor: ResultExtractor,
    classifier: Classifier,
    page_log: Option<PageLog>,
    classify_pages: bool,
}

impl Pipeline {
    /// Build every component from the application config.
    ///
    /// Detection config and page log are opened here, so a bad path fails
    /// before any request is sent.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid settings, an unreadable detection config,
    /// or a page log that cannot be opened.
    pub fn from_config(config: &WebhoundConfig) -> Result<Self> {
        let orchestrator = SearchOrchestrator::new(config.registry()?, config.search_config())?;
        let classifier = Classifier::from_config(Arc::new(config.detection()?))?;
        let page_log = match config.output.page_log {
            Some(ref path) => Some(PageLog::open(path)?),
            None => None,
        };

        let mut pipeline = Self::new(orchestrator, ResultExtractor::standard()?, classifier);
        pipeline.page_log = page_log;
        pipeline.classify_pages = config.detection.classify_pages;
        Ok(pipeline)
    }

    /// Assemble a pipeline from parts. Page classification is on, no page log.
    pub fn new(
        orchestrator: SearchOrchestrator,
        extractor: ResultExtractor,
        classifier: Classifier,
    ) -> Self {
        Self {
            orchestrator,
            extractor,
            classifier,
            page_log: None,
            classify_pages: true,
        }
    }

    /// Append every retrieved page to `log`.
    pub fn with_page_log(mut self, log: PageLog) -> Self {
        self.page_log = Some(log);
        self
    }

    /// Turn whole-page classification on or off.
    pub fn with_page_classification(mut self, enabled: bool) -> Self {
        self.classify_pages = enabled;
        self
    }

    /// Report search progress through `callback`.
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.orchestrator = self.orchestrator.with_progress(callback);
        self
    }

    /// Run one query.
    ///
    /// Never fails: unreachable engines are missing from the report and a
    /// page-log write error is logged and the log disabled.
    pub async fn run(
        &mut self,
        query: &str,
        engines: &[String],
        filters: &SearchFilters,
    ) -> SearchReport {
        let documents = self.orchestrator.search_all(query, engines, filters).await;

        let mut reports = Vec::with_capacity(documents.len());
        for (engine, docs) in documents {
            self.log_pages(&engine, &docs);
            let report = self.annotate(&engine, &docs, query);
            tracing::info!(
                engine = %report.engine,
                pages = report.pages_retrieved,
                results = report.results.len(),
                "engine processed"
            );
            reports.push(report);
        }

        SearchReport {
            query: query.to_owned(),
            engines: reports,
        }
    }

    /// Extract, deduplicate and classify one engine's documents.
    pub fn annotate(&self, engine: &str, documents: &[Document], query: &str) -> EngineReport {
        let results = self
            .extractor
            .collect(documents)
            .into_iter()
            .map(|item| {
                let detection = self.classifier.classify(&item.analysis_text(), query);
                AnnotatedResult { item, detection }
            })
            .collect();

        let page_detections = if self.classify_pages {
            documents
                .iter()
                .map(|doc| PageDetection {
                    offset: doc.offset,
                    url: doc.url.clone(),
                    detection: self.classifier.classify(&page_text(&doc.body), query),
                })
                .collect()
        } else {
            Vec::new()
        };

        EngineReport {
            engine: engine.to_owned(),
            pages_retrieved: documents.len(),
            results,
            page_detections,
        }
    }

    fn log_pages(&mut self, engine: &str, documents: &[Document]) {
        let Some(log) = self.page_log.as_mut() else {
            return;
        };
        for (index, doc) in documents.iter().enumerate() {
            if let Err(e) = log.append(engine, index, &doc.body) {
                tracing::warn!(path = %log.path().display(), "page log disabled: {e}");
                self.page_log = None;
                return;
            }
        }
    }
}
