//! Result extraction: documents → deduplicated [`ResultItem`]s.
//!
//! Engine markup differs, so extraction runs an ordered chain of
//! [`ExtractionStrategy`]s. For each document the first strategy that finds
//! any result container handles the whole document; the rest are not
//! consulted. Containers without a usable link are skipped.

pub mod collector;
pub mod links;
pub mod strategy;

pub use collector::ResultCollector;
pub use strategy::{standard_strategies, ExtractionStrategy, SelectorStrategy};

use crate::error::SearchError;
use crate::types::{Document, ResultItem};

/// Applies the strategy chain to documents.
pub struct ResultExtractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl ResultExtractor {
    /// Extractor using [`standard_strategies`].
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Parse`] if a built-in selector fails to compile.
    pub fn standard() -> Result<Self, SearchError> {
        Ok(Self::new(standard_strategies()?))
    }

    /// Extractor with a custom strategy chain, tried in the given order.
    pub fn new(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Extract items from one document, in document order.
    ///
    /// Items are not deduplicated here; use [`ResultExtractor::collect`] or a
    /// [`ResultCollector`] for engine-wide uniqueness.
    pub fn extract(&self, document: &Document) -> Vec<ResultItem> {
        let html = document.html();

        for strategy in &self.strategies {
            let containers = strategy.containers(&html);
            if containers.is_empty() {
                continue;
            }

            tracing::trace!(
                strategy = strategy.name(),
                containers = containers.len(),
                offset = document.offset,
                "extraction strategy matched"
            );

            let mut items = Vec::with_capacity(containers.len());
            for container in containers {
                match strategy.item(container, &document.url) {
                    Some(item) => items.push(item),
                    None => tracing::debug!(
                        strategy = strategy.name(),
                        offset = document.offset,
                        "skipping result without a link"
                    ),
                }
            }
            return items;
        }

        tracing::debug!(offset = document.offset, "no extraction strategy matched");
        Vec::new()
    }

    /// Extract and deduplicate across all documents of one engine.
    ///
    /// `documents` must already be in processing order (ascending offset);
    /// the first occurrence of each link is kept.
    pub fn collect(&self, documents: &[Document]) -> Vec<ResultItem> {
        let mut collector = ResultCollector::new();
        for document in documents {
            let added = collector.extend(self.extract(document));
            tracing::trace!(offset = document.offset, added, "document processed");
        }
        collector.into_items()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(offset: usize, body: &str) -> Document {
        Document {
            url: "https://www.google.com/search?q=rust".into(),
            offset,
            body: body.into(),
        }
    }

    const GOOGLE_PAGE: &str = r#"<html><body>
        <div class="tF2Cxc">
            <a href="https://www.rust-lang.org/"><h3>Rust Programming Language</h3></a>
            <div class="VwiC3b">A language empowering everyone.</div>
        </div>
        <div class="tF2Cxc">
            <a href="/url?q=https://doc.rust-lang.org/book/&amp;sa=U"><h3>The Book</h3></a>
            <div class="VwiC3b">Learn Rust.</div>
        </div>
        <li class="b_algo"><h2><a href="https://bing-only.example/">Bing markup</a></h2></li>
    </body></html>"#;

    const BING_PAGE: &str = r#"<html><body><ol id="b_results">
        <li class="b_algo">
            <h2><a href="https://www.rust-lang.org/">Rust</a></h2>
            <div class="b_caption"><p>Reliable and efficient software.</p></div>
        </li>
        <li class="b_algo">
            <h2><a href="https://crates.io/">crates.io</a></h2>
            <div class="b_caption"><p>The Rust community's crate registry.</p></div>
        </li>
    </ol></body></html>"#;

    const DDG_PAGE: &str = r#"<html><body>
        <div class="result results_links web-result">
            <h2 class="result__title">
                <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.rust-lang.org%2F&amp;rut=abc">Rust</a>
            </h2>
            <a class="result__snippet" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.rust-lang.org%2F">Fast and safe.</a>
        </div>
        <div class="result result--ad">
            <h2><a class="result__a" href="https://ads.example/">Sponsored</a></h2>
        </div>
    </body></html>"#;

    #[test]
    fn first_matching_strategy_wins() {
        let extractor = ResultExtractor::standard().expect("extractor");
        let items = extractor.extract(&doc(0, GOOGLE_PAGE));
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.url != "https://bing-only.example/"));
        assert_eq!(items[0].title, "Rust Programming Language");
        assert_eq!(items[0].description, "A language empowering everyone.");
        assert_eq!(items[1].url, "https://doc.rust-lang.org/book/");
    }

    #[test]
    fn falls_back_to_later_strategy() {
        let extractor = ResultExtractor::standard().expect("extractor");
        let items = extractor.extract(&doc(0, BING_PAGE));
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].title, "crates.io");
        assert_eq!(items[1].description, "The Rust community's crate registry.");
    }

    #[test]
    fn duckduckgo_links_unwrapped_and_ads_skipped() {
        let extractor = ResultExtractor::standard().expect("extractor");
        let items = extractor.extract(&doc(0, DDG_PAGE));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].url, "https://www.rust-lang.org/");
        assert_eq!(items[0].description, "Fast and safe.");
    }

    #[test]
    fn legacy_google_markup_handled() {
        let page = r#"<html><body><div class="g">
            <a href="/url?q=https://www.rust-lang.org/learn&amp;sa=U"><h3>Learn Rust</h3></a>
            <span class="st">Get started.</span>
        </div></body></html>"#;
        let extractor = ResultExtractor::standard().expect("extractor");
        let items = extractor.extract(&doc(0, page));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].url, "https://www.rust-lang.org/learn");
        assert_eq!(items[0].description, "Get started.");
    }

    #[test]
    fn unmatched_document_yields_nothing() {
        let extractor = ResultExtractor::standard().expect("extractor");
        assert!(extractor
            .extract(&doc(0, "<html><body><p>captcha</p></body></html>"))
            .is_empty());
    }

    #[test]
    fn duplicate_links_in_one_document_collapse() {
        let page = r#"<html><body>
            <li class="b_algo"><h2><a href="https://same.example/">One</a></h2></li>
            <li class="b_algo"><h2><a href="https://same.example/">Two</a></h2></li>
        </body></html>"#;
        let extractor = ResultExtractor::standard().expect("extractor");
        let items = extractor.collect(&[doc(0, page)]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "One");
    }

    #[test]
    fn dedup_is_engine_wide_across_pages() {
        let extractor = ResultExtractor::standard().expect("extractor");
        let items = extractor.collect(&[doc(0, GOOGLE_PAGE), doc(10, BING_PAGE)]);
        let urls: Vec<&str> = items.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://www.rust-lang.org/",
                "https://doc.rust-lang.org/book/",
                "https://crates.io/",
            ]
        );
        // The Google page came first, so its title wins.
        assert_eq!(items[0].title, "Rust Programming Language");
    }

    #[test]
    fn malformed_items_skipped_without_aborting() {
        let page = r#"<html><body>
            <li class="b_algo"><h2>No link here</h2></li>
            <li class="b_algo"><h2><a href="https://ok.example/">Fine</a></h2></li>
        </body></html>"#;
        let extractor = ResultExtractor::standard().expect("extractor");
        let items = extractor.extract(&doc(0, page));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].url, "https://ok.example/");
    }

    #[test]
    fn custom_chain_order_respected() {
        let chain: Vec<Box<dyn ExtractionStrategy>> = vec![
            Box::new(SelectorStrategy::new("cards", "article.card", "h1", "a", "p").expect("s")),
        ];
        let extractor = ResultExtractor::new(chain);
        let page = r#"<html><body><article class="card"><h1>Card</h1><a href="https://card.example/">go</a></article></body></html>"#;
        let items = extractor.extract(&doc(0, page));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Card");
    }
}
