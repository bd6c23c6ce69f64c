//! Single-page retrieval with per-attempt identity, timeout and retry.
//!
//! A [`Fetcher`] owns the shared [`reqwest::Client`]; cloning it is cheap and
//! every clone reuses the same connection pool. Each attempt is independent:
//! fresh User-Agent, its own timeout, and an HTTP error status counts exactly
//! like a transport failure. Between attempts the fetcher sleeps a jittered
//! backoff. Every failure path resolves to [`FetchOutcome::Failed`].

use crate::config::FetchConfig;
use crate::error::SearchError;
use crate::http;
use crate::types::{Document, FetchFailure, FetchOutcome, PageRequest};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use std::time::Duration;

/// Retrieves result pages with retry and backoff.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    config: FetchConfig,
}

impl Fetcher {
    /// Create a fetcher with a freshly built shared client.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `config` is invalid, or
    /// [`SearchError::Http`] if the client cannot be built.
    pub fn new(config: FetchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let client = http::build_client(&config)?;
        Ok(Self { client, config })
    }

    /// Create a fetcher around an existing client.
    pub fn with_client(client: reqwest::Client, config: FetchConfig) -> Self {
        Self { client, config }
    }

    /// The fetch configuration in effect.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Build a [`PageRequest`] using this fetcher's retry budget.
    pub fn request(&self, url: impl Into<String>, offset: usize) -> PageRequest {
        PageRequest {
            url: url.into(),
            offset,
            max_attempts: self.config.max_attempts,
        }
    }

    /// Fetch one page, retrying up to `request.max_attempts` times in total.
    pub async fn fetch(&self, request: &PageRequest) -> FetchOutcome {
        let mut last_error = None;

        for attempt in 1..=request.max_attempts {
            match self.attempt(&request.url, request.offset).await {
                Ok(document) => {
                    tracing::trace!(
                        url = %request.url,
                        attempt,
                        bytes = document.body.len(),
                        "page fetched"
                    );
                    return FetchOutcome::Document(document);
                }
                Err(err) => {
                    tracing::error!(url = %request.url, attempt, error = %err, "request failed");
                    let remaining = request.max_attempts - attempt;
                    if remaining > 0 {
                        let backoff = http::jitter(self.config.retry_backoff_ms);
                        tracing::warn!(
                            url = %request.url,
                            remaining,
                            backoff_ms = backoff.as_millis() as u64,
                            "retrying"
                        );
                        tokio::time::sleep(backoff).await;
                    } else {
                        tracing::warn!(url = %request.url, "maximum attempts reached, giving up on page");
                    }
                    last_error = Some(err);
                }
            }
        }

        let error = last_error
            .unwrap_or_else(|| SearchError::Config("retry budget of zero attempts".into()));
        FetchOutcome::Failed(FetchFailure {
            url: request.url.clone(),
            offset: request.offset,
            attempts: request.max_attempts,
            error,
        })
    }

    /// One GET with a fresh identity. Error statuses become [`SearchError::Status`].
    async fn attempt(&self, url: &str, offset: usize) -> Result<Document, SearchError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, http::user_agent(&self.config))
            .header(ACCEPT, "text/html,application/xhtml+xml")
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .timeout(Duration::from_secs(self.config.timeout_seconds))
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(SearchError::Status {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let final_url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(url, e))?;

        Ok(Document {
            url: final_url,
            offset,
            body,
        })
    }
}

fn transport_error(url: &str, err: reqwest::Error) -> SearchError {
    if err.is_timeout() {
        SearchError::Timeout(format!("{url}: {err}"))
    } else {
        SearchError::Http(format!("{url}: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_config(max_attempts: u32) -> FetchConfig {
        FetchConfig {
            timeout_seconds: 1,
            max_attempts,
            retry_backoff_ms: (0, 0),
            user_agent: None,
        }
    }

    #[test]
    fn fetcher_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Fetcher>();
    }

    #[test]
    fn new_rejects_invalid_config() {
        let result = Fetcher::new(fast_config(0));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn success_returns_document_with_offset() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(header_exists("user-agent"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(fast_config(3)).expect("fetcher");
        let request = fetcher.request(format!("{}/search?q=rust", server.uri()), 20);
        match fetcher.fetch(&request).await {
            FetchOutcome::Document(doc) => {
                assert_eq!(doc.offset, 20);
                assert_eq!(doc.body, "<html>ok</html>");
                assert!(doc.url.starts_with(&server.uri()));
            }
            FetchOutcome::Failed(f) => panic!("unexpected failure: {}", f.error),
        }
    }

    #[tokio::test]
    async fn permanent_error_status_uses_exactly_the_budget() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(fast_config(3)).expect("fetcher");
        let request = fetcher.request(format!("{}/search", server.uri()), 0);
        match fetcher.fetch(&request).await {
            FetchOutcome::Failed(failure) => {
                assert_eq!(failure.attempts, 3);
                assert!(matches!(
                    failure.error,
                    SearchError::Status { status: 503, .. }
                ));
            }
            FetchOutcome::Document(_) => panic!("503 must not produce a document"),
        }
    }

    #[tokio::test]
    async fn client_error_status_is_retried_too() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .expect(2)
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(fast_config(2)).expect("fetcher");
        let request = fetcher.request(server.uri(), 0);
        assert!(!fetcher.fetch(&request).await.is_document());
    }

    #[tokio::test]
    async fn recovers_after_transient_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("second time lucky"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(fast_config(3)).expect("fetcher");
        let request = fetcher.request(server.uri(), 0);
        let doc = fetcher.fetch(&request).await.into_document().expect("document");
        assert_eq!(doc.body, "second time lucky");
    }

    #[tokio::test]
    async fn timeout_consumes_an_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .expect(2)
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(fast_config(2)).expect("fetcher");
        let request = fetcher.request(server.uri(), 0);
        match fetcher.fetch(&request).await {
            FetchOutcome::Failed(failure) => {
                assert!(matches!(failure.error, SearchError::Timeout(_)));
            }
            FetchOutcome::Document(_) => panic!("slow response must time out"),
        }
    }

    #[tokio::test]
    async fn connection_refused_resolves_to_failure() {
        let fetcher = Fetcher::new(fast_config(2)).expect("fetcher");
        let request = fetcher.request("http://127.0.0.1:1/search", 0);
        match fetcher.fetch(&request).await {
            FetchOutcome::Failed(failure) => {
                assert_eq!(failure.attempts, 2);
                assert!(failure.error.is_transient());
            }
            FetchOutcome::Document(_) => panic!("nothing listens on port 1"),
        }
    }

    #[tokio::test]
    async fn zero_budget_request_fails_without_network() {
        let fetcher = Fetcher::with_client(reqwest::Client::new(), fast_config(1));
        let request = PageRequest {
            url: "http://127.0.0.1:1/".into(),
            offset: 0,
            max_attempts: 0,
        };
        match fetcher.fetch(&request).await {
            FetchOutcome::Failed(failure) => {
                assert_eq!(failure.attempts, 0);
                assert!(matches!(failure.error, SearchError::Config(_)));
            }
            FetchOutcome::Document(_) => panic!("zero attempts cannot succeed"),
        }
    }
}
