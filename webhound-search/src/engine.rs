//! Search targets and the engine registry.
//!
//! A [`SearchTarget`] is a named URL template: the raw query is URL-escaped
//! and appended to the template, followed by filter and pagination
//! parameters in the target's [`FilterDialect`]. The [`EngineRegistry`] is
//! the immutable set of targets a search may name.

use crate::error::SearchError;
use crate::filters::{FilterDialect, SearchFilters};
use serde::{Deserialize, Serialize};

/// A configured search provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchTarget {
    /// Display name, matched case-insensitively.
    pub name: String,
    /// Base URL ending where the escaped query goes, e.g.
    /// `https://www.bing.com/search?q=`.
    pub url_template: String,
    /// Filter and pagination encoding.
    #[serde(default)]
    pub dialect: FilterDialect,
}

impl SearchTarget {
    /// Create a target.
    pub fn new(name: impl Into<String>, url_template: impl Into<String>, dialect: FilterDialect) -> Self {
        Self {
            name: name.into(),
            url_template: url_template.into(),
            dialect,
        }
    }

    /// Absolute URL of the result page at `offset`.
    ///
    /// `page_index` is the zero-based page number, used by dialects that
    /// paginate by page rather than by result position.
    pub fn page_url(
        &self,
        query: &str,
        page_index: usize,
        offset: usize,
        filters: &SearchFilters,
    ) -> String {
        let mut url = format!("{}{}", self.url_template, urlencoding::encode(query));

        let mut params = filters.query_params(self.dialect);
        params.push(self.pagination_param(page_index, offset));

        for (key, value) in params {
            let sep = if url.contains('?') { '&' } else { '?' };
            url.push(sep);
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(&value));
        }
        url
    }

    fn pagination_param(&self, page_index: usize, offset: usize) -> (&'static str, String) {
        match self.dialect {
            FilterDialect::Google | FilterDialect::Generic => ("start", offset.to_string()),
            // Bing counts results from 1.
            FilterDialect::Bing => ("first", (offset + 1).to_string()),
            FilterDialect::DuckDuckGo => ("s", offset.to_string()),
            FilterDialect::Startpage => ("page", (page_index + 1).to_string()),
        }
    }
}

/// Immutable name → [`SearchTarget`] lookup.
#[derive(Debug, Clone)]
pub struct EngineRegistry {
    targets: Vec<SearchTarget>,
}

impl EngineRegistry {
    /// Build a registry from explicit targets.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if a name is blank or duplicated
    /// (case-insensitively), or a template is not an `http(s)` URL.
    pub fn new(targets: Vec<SearchTarget>) -> Result<Self, SearchError> {
        if targets.is_empty() {
            return Err(SearchError::Config(
                "engine registry must contain at least one engine".into(),
            ));
        }
        for (i, target) in targets.iter().enumerate() {
            if target.name.trim().is_empty() {
                return Err(SearchError::Config("engine name must not be empty".into()));
            }
            if !(target.url_template.starts_with("http://")
                || target.url_template.starts_with("https://"))
            {
                return Err(SearchError::Config(format!(
                    "engine {} has a non-HTTP url_template",
                    target.name
                )));
            }
            if targets[..i]
                .iter()
                .any(|earlier| earlier.name.eq_ignore_ascii_case(&target.name))
            {
                return Err(SearchError::Config(format!(
                    "engine {} is defined more than once",
                    target.name
                )));
            }
        }
        Ok(Self { targets })
    }

    /// Look up a target by name, ignoring ASCII case.
    pub fn get(&self, name: &str) -> Option<&SearchTarget> {
        let name = name.trim();
        self.targets
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Names of all registered engines, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.targets.iter().map(|t| t.name.clone()).collect()
    }

    /// Iterate over all targets.
    pub fn iter(&self) -> impl Iterator<Item = &SearchTarget> {
        self.targets.iter()
    }

    /// Number of registered engines.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Always `false`; a registry cannot be built empty.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl Default for EngineRegistry {
    /// The built-in providers.
    fn default() -> Self {
        Self {
            targets: vec![
                SearchTarget::new(
                    "Google",
                    "https://www.google.com/search?q=",
                    FilterDialect::Google,
                ),
                SearchTarget::new(
                    "DuckDuckGo",
                    "https://duckduckgo.com/html/?q=",
                    FilterDialect::DuckDuckGo,
                ),
                SearchTarget::new(
                    "StartPage",
                    "https://www.startpage.com/do/dsearch?query=",
                    FilterDialect::Startpage,
                ),
                SearchTarget::new(
                    "Bing",
                    "https://www.bing.com/search?q=",
                    FilterDialect::Bing,
                ),
            ],
        }
    }
}
