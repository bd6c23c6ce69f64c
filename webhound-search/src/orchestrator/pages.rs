//! Paginated result-page requests for one engine.

use crate::config::SearchConfig;
use crate::engine::SearchTarget;
use crate::filters::SearchFilters;
use crate::types::PageRequest;

/// Build one [`PageRequest`] per configured page, in ascending offset order.
///
/// Offsets advance by `config.page_stride` and stop after `config.pages`
/// pages, so the number of requests is always bounded by the configuration.
pub fn page_requests(
    target: &SearchTarget,
    query: &str,
    filters: &SearchFilters,
    config: &SearchConfig,
) -> Vec<PageRequest> {
    config
        .offsets()
        .enumerate()
        .map(|(page_index, offset)| PageRequest {
            url: target.page_url(query, page_index, offset, filters),
            offset,
            max_attempts: config.fetch.max_attempts,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::FilterDialect;

    fn target() -> SearchTarget {
        SearchTarget::new("Google", "https://www.google.com/search?q=", FilterDialect::Google)
    }

    #[test]
    fn default_config_yields_eleven_pages() {
        let requests = page_requests(
            &target(),
            "test",
            &SearchFilters::default(),
            &SearchConfig::default(),
        );
        assert_eq!(requests.len(), 11);
        assert_eq!(requests[0].url, "https://www.google.com/search?q=test&start=0");
        assert_eq!(
            requests[10].url,
            "https://www.google.com/search?q=test&start=100"
        );
    }

    #[test]
    fn offsets_follow_stride() {
        let config = SearchConfig {
            pages: 3,
            page_stride: 10,
            ..Default::default()
        };
        let offsets: Vec<usize> = page_requests(&target(), "q", &SearchFilters::default(), &config)
            .iter()
            .map(|r| r.offset)
            .collect();
        assert_eq!(offsets, vec![0, 10, 20]);
    }

    #[test]
    fn requests_carry_retry_budget() {
        let mut config = SearchConfig {
            pages: 1,
            ..Default::default()
        };
        config.fetch.max_attempts = 7;
        let requests = page_requests(&target(), "q", &SearchFilters::default(), &config);
        assert_eq!(requests[0].max_attempts, 7);
    }
}
