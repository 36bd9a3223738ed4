//! Europe PMC search client.
//!
//! Provides an async HTTP client with:
//! - Connection pooling via reqwest
//! - Retry middleware with exponential backoff
//! - Courtesy pacing between page requests
//! - Page-level response caching with 5-minute TTL
//!
//! Pagination failures after the first page are not fatal: the client
//! returns whatever it gathered plus a resume cursor, because a partial
//! corpus is still usable for attribution.

use std::time::Duration;

use moka::future::Cache;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};

use crate::config::{Config, api};
use crate::error::{ClientError, ClientResult};
use crate::models::{SearchCorpus, SearchOutcome, SearchPage};

/// Europe PMC RESTful search client.
#[derive(Clone)]
pub struct EuropePmcClient {
    /// HTTP client with middleware.
    client: ClientWithMiddleware,

    /// Page-level response cache.
    cache: Cache<String, serde_json::Value>,

    /// Search endpoint URL.
    search_url: String,

    /// Page size per request.
    page_size: u32,

    /// Delay between page requests.
    rate_limit_delay: Duration,
}

impl EuropePmcClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            "application/json".parse().expect("valid accept header"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(api::MAX_KEEPALIVE)
            .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
            .gzip(true)
            .build()?;

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_secs(1), Duration::from_secs(30))
            .build_with_max_retries(config.max_retries);

        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        let cache = Cache::builder()
            .max_capacity(config.cache_max_size)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            client,
            cache,
            search_url: config.search_url,
            page_size: config.page_size,
            rate_limit_delay: config.rate_limit_delay,
        })
    }

    /// Run a full paginated search for `query`.
    ///
    /// # Errors
    ///
    /// Returns error when the very first page cannot be fetched. Later
    /// page failures yield a partial [`SearchOutcome`] with a resume cursor.
    pub async fn search(&self, query: &str) -> ClientResult<SearchOutcome> {
        self.search_from(query, api::INITIAL_CURSOR).await
    }

    /// Run a paginated search resuming from a saved cursor mark.
    ///
    /// # Errors
    ///
    /// Returns error when the page at `cursor` itself cannot be fetched.
    pub async fn search_from(&self, query: &str, cursor: &str) -> ClientResult<SearchOutcome> {
        let mut corpus = SearchCorpus::default();
        let mut cursor = cursor.to_string();
        let mut pages = 0_u64;

        loop {
            let page = match self.fetch_page(query, &cursor).await {
                Ok(page) => page,
                Err(err) if pages == 0 => return Err(err),
                Err(err) => {
                    tracing::warn!(
                        query,
                        %cursor,
                        papers = corpus.len(),
                        error = %err,
                        "pagination interrupted, returning partial corpus"
                    );
                    return Ok(SearchOutcome { corpus, resume_cursor: Some(cursor) });
                }
            };
            pages += 1;

            if page.is_empty() {
                tracing::debug!(query, pages, papers = corpus.len(), "search complete");
                return Ok(SearchOutcome { corpus, resume_cursor: None });
            }

            let next = page.next_cursor_mark.clone();
            corpus.absorb(page.into_results());
            tracing::debug!(query, pages, papers = corpus.len(), "page retrieved");

            match next {
                // Europe PMC repeats the request cursor on the final page.
                Some(next) if next != cursor => cursor = next,
                _ => return Ok(SearchOutcome { corpus, resume_cursor: None }),
            }
        }
    }

    /// Fetch a single page of search results.
    async fn fetch_page(&self, query: &str, cursor: &str) -> ClientResult<SearchPage> {
        let params = vec![
            ("query".to_string(), query.to_string()),
            ("format".to_string(), "json".to_string()),
            ("resultType".to_string(), api::RESULT_TYPE.to_string()),
            ("cursorMark".to_string(), cursor.to_string()),
            ("pageSize".to_string(), self.page_size.to_string()),
        ];

        self.get(&self.search_url, &params).await
    }

    /// Make a GET request.
    async fn get<T>(&self, url: &str, params: &[(String, String)]) -> ClientResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        // Check cache
        let cache_key = self.cache_key("GET", url, params);
        if let Some(cached) = self.cache.get(&cache_key).await {
            return serde_json::from_value(cached).map_err(ClientError::from);
        }

        // Courtesy pacing
        tokio::time::sleep(self.rate_limit_delay).await;

        let response = self.client.get(url).query(params).send().await?;

        let response = self.handle_response(response).await?;
        let value: serde_json::Value = response.json().await?;

        // Cache response
        self.cache.insert(cache_key, value.clone()).await;

        serde_json::from_value(value).map_err(ClientError::from)
    }

    /// Handle API response status codes.
    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> ClientResult<reqwest::Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        match status.as_u16() {
            429 => {
                let retry_after = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(60);

                Err(ClientError::rate_limited(retry_after))
            }
            404 => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::not_found(text))
            }
            400 => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::bad_request(text))
            }
            500..=599 => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::server(status.as_u16(), text))
            }
            _ => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::UnexpectedStatus { status: status.as_u16(), message: text })
            }
        }
    }

    /// Generate cache key.
    fn cache_key(&self, method: &str, url: &str, params: &[(String, String)]) -> String {
        use md5::{Digest, Md5};

        let mut hasher = Md5::new();
        hasher.update(method.as_bytes());
        hasher.update(b"|");
        hasher.update(url.as_bytes());
        hasher.update(b"|");

        for (k, v) in params {
            hasher.update(k.as_bytes());
            hasher.update(b"=");
            hasher.update(v.as_bytes());
            hasher.update(b"&");
        }

        format!("{:x}", hasher.finalize())
    }
}

impl std::fmt::Debug for EuropePmcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EuropePmcClient")
            .field("search_url", &self.search_url)
            .field("page_size", &self.page_size)
            .finish()
    }
}
