//! Selector-based extraction strategies, one per engine markup family.

use scraper::{ElementRef, Html, Selector};

use crate::content::element_text;
use crate::error::SearchError;
use crate::types::{ResultItem, DESCRIPTION_UNAVAILABLE, TITLE_UNAVAILABLE};

use super::links::resolve_link;

/// One way of locating result items in a result page.
///
/// Strategies are tried in order; the first one whose [`containers`]
/// matches anything handles the whole document.
///
/// [`containers`]: ExtractionStrategy::containers
pub trait ExtractionStrategy: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Result container elements in document order.
    fn containers<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>>;

    /// Build an item from one container. `None` means the container is
    /// malformed (no usable link) and must be skipped.
    fn item(&self, container: ElementRef<'_>, page_url: &str) -> Option<ResultItem>;
}

/// A strategy defined by four CSS selectors.
#[derive(Debug)]
pub struct SelectorStrategy {
    name: String,
    container: Selector,
    title: Selector,
    link: Selector,
    description: Selector,
}

impl SelectorStrategy {
    /// Compile a strategy from selector strings.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Parse`] if any selector is invalid.
    pub fn new(
        name: impl Into<String>,
        container: &str,
        title: &str,
        link: &str,
        description: &str,
    ) -> Result<Self, SearchError> {
        Ok(Self {
            name: name.into(),
            container: parse_selector(container, "container")?,
            title: parse_selector(title, "title")?,
            link: parse_selector(link, "link")?,
            description: parse_selector(description, "description")?,
        })
    }
}

fn parse_selector(css: &str, role: &str) -> Result<Selector, SearchError> {
    Selector::parse(css).map_err(|e| SearchError::Parse(format!("invalid {role} selector {css:?}: {e:?}")))
}

impl ExtractionStrategy for SelectorStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn containers<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        document.select(&self.container).collect()
    }

    fn item(&self, container: ElementRef<'_>, page_url: &str) -> Option<ResultItem> {
        let url = container
            .select(&self.link)
            .next()
            .and_then(|a| a.value().attr("href"))
            .and_then(|href| resolve_link(href, page_url))?;

        let title = first_text(container, &self.title)
            .unwrap_or_else(|| TITLE_UNAVAILABLE.to_owned());
        let description = first_text(container, &self.description)
            .unwrap_or_else(|| DESCRIPTION_UNAVAILABLE.to_owned());

        Some(ResultItem {
            title,
            url,
            description,
        })
    }
}

/// Trimmed text of the first match, if it has any.
fn first_text(container: ElementRef<'_>, selector: &Selector) -> Option<String> {
    container
        .select(selector)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
}

/// The built-in strategy chain, most specific markup first.
///
/// # Errors
///
/// Returns [`SearchError::Parse`] if a built-in selector fails to compile.
pub fn standard_strategies() -> Result<Vec<Box<dyn ExtractionStrategy>>, SearchError> {
    let strategies: Vec<Box<dyn ExtractionStrategy>> = vec![
        // Google organic results.
        Box::new(SelectorStrategy::new(
            "google",
            "div.tF2Cxc",
            "h3, h2",
            "a",
            "div.VwiC3b, div.IsZvec, p",
        )?),
        // Older Google markup, only consulted when no tF2Cxc block exists.
        Box::new(SelectorStrategy::new(
            "google-legacy",
            "div.g",
            "h3",
            "a",
            "div.VwiC3b, span.st, p",
        )?),
        // DuckDuckGo HTML endpoint.
        Box::new(SelectorStrategy::new(
            "duckduckgo",
            "div.result:not(.result--ad)",
            "h2, a.result__a",
            "a",
            ".result__snippet, p",
        )?),
        // Bing organic results.
        Box::new(SelectorStrategy::new(
            "bing",
            "li.b_algo",
            "h2, h3",
            "a",
            ".b_caption p, .b_lineclamp2, p",
        )?),
        // Startpage.
        Box::new(SelectorStrategy::new(
            "startpage",
            "div.w-gl__result",
            ".w-gl__result-title, h2, h3",
            "a",
            ".w-gl__description, p",
        )?),
    ];
    Ok(strategies)
}
