//! Configuration for the Europe PMC client and the attribution engine.

use std::time::Duration;

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// Base URL for the Europe PMC RESTful web services.
    pub const BASE_URL: &str = "https://www.ebi.ac.uk/europepmc/webservices/rest";

    /// Result detail level requested per match. `core` carries the full
    /// author list including attached ORCIDs.
    pub const RESULT_TYPE: &str = "core";

    /// Page size for cursor-mark pagination.
    pub const PAGE_SIZE: u32 = 1000;

    /// Initial cursor mark for a fresh search.
    pub const INITIAL_CURSOR: &str = "*";

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Delay between page requests (Europe PMC asks for courtesy pacing).
    pub const RATE_LIMIT_DELAY: Duration = Duration::from_millis(200);

    /// Cache TTL (5 minutes).
    pub const CACHE_TTL: Duration = Duration::from_secs(300);

    /// Maximum cache size.
    pub const CACHE_MAX_SIZE: u64 = 200;

    /// Maximum retry attempts per page request.
    pub const MAX_RETRIES: u32 = 3;

    /// Maximum keepalive connections.
    pub const MAX_KEEPALIVE: usize = 10;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);
}

/// Affinity weights for the collaboration profile.
pub mod weights {
    /// Credit for a collaborator confirmed through a shared identifier.
    pub const IDENTIFIER_CONFIRMED: u32 = 20;

    /// Credit for a collaborator known only by name.
    pub const NAME_ONLY: u32 = 10;
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL for the search service (overridable for mock servers).
    pub search_url: String,

    /// Page size per search request.
    pub page_size: u32,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Delay between page requests.
    pub rate_limit_delay: Duration,

    /// Maximum retry attempts per page request.
    pub max_retries: u32,

    /// Cache TTL.
    pub cache_ttl: Duration,

    /// Maximum cache size.
    pub cache_max_size: u64,
}

impl Config {
    /// Create the default production configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            search_url: format!("{}/search", api::BASE_URL),
            page_size: api::PAGE_SIZE,
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            rate_limit_delay: api::RATE_LIMIT_DELAY,
            max_retries: api::MAX_RETRIES,
            cache_ttl: api::CACHE_TTL,
            cache_max_size: api::CACHE_MAX_SIZE,
        }
    }

    /// Create a test configuration pointed at a mock server.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            search_url: format!("{}/search", base_url),
            page_size: 10,
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            rate_limit_delay: Duration::from_millis(0), // No delay in tests
            max_retries: 0,                             // Fail fast in tests
            cache_ttl: Duration::from_secs(0),          // No caching in tests
            cache_max_size: 0,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// `EUROPE_PMC_URL` overrides the service base URL.
    ///
    /// # Errors
    ///
    /// Returns error if environment variables are invalid.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::new();
        if let Ok(base) = std::env::var("EUROPE_PMC_URL") {
            config.search_url = format!("{}/search", base.trim_end_matches('/'));
        }
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.search_url.starts_with("https://www.ebi.ac.uk"));
        assert_eq!(config.page_size, api::PAGE_SIZE);
    }

    #[test]
    fn test_config_for_testing() {
        let config = Config::for_testing("http://127.0.0.1:9999");
        assert_eq!(config.search_url, "http://127.0.0.1:9999/search");
        assert_eq!(config.max_retries, 0);
    }

    #[test]
    fn test_weights_ordering() {
        assert!(weights::IDENTIFIER_CONFIRMED > weights::NAME_ONLY);
    }
}
