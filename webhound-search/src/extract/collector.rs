//! Engine-scoped result deduplication by link.
//!
//! A [`ResultCollector`] accumulates items across every document of one
//! engine. The first item seen for a link is kept; later items with the same
//! link are dropped. The collector is owned by the single task aggregating an
//! engine's documents, so no locking is needed.

use std::collections::HashSet;

use crate::types::ResultItem;

/// Ordered, link-unique result set for one engine.
#[derive(Debug, Default)]
pub struct ResultCollector {
    seen: HashSet<String>,
    items: Vec<ResultItem>,
}

impl ResultCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item unless its link was already seen. Returns `true` if added.
    pub fn push(&mut self, item: ResultItem) -> bool {
        if self.seen.contains(&item.url) {
            tracing::trace!(url = %item.url, "duplicate link dropped");
            return false;
        }
        self.seen.insert(item.url.clone());
        self.items.push(item);
        true
    }

    /// Add items in order. Returns how many were new.
    pub fn extend<I>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = ResultItem>,
    {
        let mut added = 0;
        for item in items {
            if self.push(item) {
                added += 1;
            }
        }
        added
    }

    /// Whether a link has already been collected.
    pub fn contains(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    /// Number of unique items collected so far.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing has been collected.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consume the collector, returning items in first-seen order.
    pub fn into_items(self) -> Vec<ResultItem> {
        self.items
    }
}
