//! Progress events emitted by the orchestrator.
//!
//! Callback-based reporting that decouples the fetch pipeline from
//! presentation (CLI progress bars, structured logs, tests).

/// Progress events emitted while searching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    /// An engine's page fetches have been scheduled.
    EngineStarted {
        /// Engine display name.
        engine: String,
        /// Number of pages that will be requested.
        pages: usize,
    },

    /// A page was fetched successfully.
    PageFetched {
        /// Engine display name.
        engine: String,
        /// Pagination offset of the page.
        offset: usize,
    },

    /// A page failed after exhausting its retry budget.
    PageFailed {
        /// Engine display name.
        engine: String,
        /// Pagination offset of the page.
        offset: usize,
        /// Human-readable reason from the last attempt.
        reason: String,
    },

    /// All pages of an engine have completed.
    EngineFinished {
        /// Engine display name.
        engine: String,
        /// Pages that produced a document.
        documents: usize,
    },
}

impl SearchEvent {
    /// Engine the event belongs to.
    pub fn engine(&self) -> &str {
        match self {
            Self::EngineStarted { engine, .. }
            | Self::PageFetched { engine, .. }
            | Self::PageFailed { engine, .. }
            | Self::EngineFinished { engine, .. } => engine,
        }
    }
}

/// Callback type for receiving search progress events.
///
/// Invoked from whichever task completes the work, so implementations must
/// be `Send + Sync`.
pub type ProgressCallback = Box<dyn Fn(SearchEvent) + Send + Sync>;
