//! Core types flowing through the fetch → extract → classify pipeline.

use crate::error::SearchError;
use scraper::Html;
use serde::{Deserialize, Serialize};

/// Placeholder used when a result has no heading element.
pub const TITLE_UNAVAILABLE: &str = "Title not available";

/// Placeholder used when a result has no description element.
pub const DESCRIPTION_UNAVAILABLE: &str = "Description not available";

/// One result page to retrieve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Absolute URL of the result page.
    pub url: String,
    /// Pagination offset (result position of the first item on the page).
    pub offset: usize,
    /// Total attempts allowed for this page.
    pub max_attempts: u32,
}

/// The body of a successfully fetched result page.
///
/// HTML parsing is deferred to [`Document::html`] so documents can cross
/// task boundaries; the parsed tree itself is not `Send`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Final URL after redirects.
    pub url: String,
    /// Pagination offset of the request that produced this document.
    pub offset: usize,
    /// Complete response body.
    pub body: String,
}

impl Document {
    /// Parse the body into a queryable HTML tree.
    pub fn html(&self) -> Html {
        Html::parse_document(&self.body)
    }
}

/// Why a page could not be retrieved.
#[derive(Debug)]
pub struct FetchFailure {
    /// The URL that was requested.
    pub url: String,
    /// Pagination offset of the failed page.
    pub offset: usize,
    /// Attempts actually made.
    pub attempts: u32,
    /// The error from the final attempt.
    pub error: SearchError,
}

/// Result of fetching one page: a complete document or a failure, never both.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The page was retrieved with a success status.
    Document(Document),
    /// Every attempt failed.
    Failed(FetchFailure),
}

impl FetchOutcome {
    /// Returns the document, discarding failure details.
    pub fn into_document(self) -> Option<Document> {
        match self {
            Self::Document(doc) => Some(doc),
            Self::Failed(_) => None,
        }
    }

    /// Returns `true` if the fetch produced a document.
    pub fn is_document(&self) -> bool {
        matches!(self, Self::Document(_))
    }
}

/// A single search result extracted from a result page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultItem {
    /// Heading text, or [`TITLE_UNAVAILABLE`].
    pub title: String,
    /// Target link. Unique within one engine's result set.
    pub url: String,
    /// Snippet text, or [`DESCRIPTION_UNAVAILABLE`].
    pub description: String,
}

impl ResultItem {
    /// Text handed to the classifier for this item: title, link and
    /// description on separate lines. Placeholders are left out.
    pub fn analysis_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(3);
        if self.title != TITLE_UNAVAILABLE {
            parts.push(&self.title);
        }
        parts.push(&self.url);
        if self.description != DESCRIPTION_UNAVAILABLE {
            parts.push(&self.description);
        }
        parts.join("\n")
    }
}
