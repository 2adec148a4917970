//! Client configuration.

use std::time::Duration;

use crate::{rate_limit::DEFAULT_MIN_INTERVAL, retry::RetryConfig};

/// SEC EDGAR API base URL
pub const EDGAR_BASE_URL: &str = "https://data.sec.gov";

/// SEC company tickers URL
pub const COMPANY_TICKERS_URL: &str = "https://www.sec.gov/files/company_tickers.json";

/// Configuration for [`EdgarClient`](crate::EdgarClient).
#[derive(Debug, Clone, PartialEq)]
pub struct EdgarConfig {
    /// Identifying user agent, `"AppName/Version (contact@email.com)"`.
    ///
    /// SEC rejects requests without one.
    pub user_agent: String,
    /// Base URL of the `data.sec.gov` APIs.
    pub base_url: String,
    /// URL of the ticker reference file.
    pub tickers_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Minimum spacing between requests.
    pub min_interval: Duration,
    /// Retry policy for transient failures.
    pub retry: RetryConfig,
    /// How long the ticker reference file is reused before refetching.
    pub ticker_ttl: Duration,
}

impl EdgarConfig {
    /// Creates a configuration with SEC defaults and the given user agent.
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            base_url: EDGAR_BASE_URL.to_string(),
            tickers_url: COMPANY_TICKERS_URL.to_string(),
            timeout: Duration::from_secs(30),
            min_interval: DEFAULT_MIN_INTERVAL,
            retry: RetryConfig::default(),
            ticker_ttl: Duration::from_secs(24 * 60 * 60),
        }
    }

    /// Sets the `data.sec.gov` base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the ticker reference URL.
    #[must_use]
    pub fn with_tickers_url(mut self, tickers_url: impl Into<String>) -> Self {
        self.tickers_url = tickers_url.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the minimum spacing between requests.
    #[must_use]
    pub const fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the ticker reference TTL.
    #[must_use]
    pub const fn with_ticker_ttl(mut self, ticker_ttl: Duration) -> Self {
        self.ticker_ttl = ticker_ttl;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EdgarConfig::new("Test/1.0 (test@example.com)");
        assert_eq!(config.base_url, EDGAR_BASE_URL);
        assert_eq!(config.min_interval, Duration::from_millis(100));
        assert!(config.retry.enabled);
    }

    #[test]
    fn test_builders() {
        let config = EdgarConfig::new("Test/1.0")
            .with_base_url("http://localhost:8080/")
            .with_timeout(Duration::from_secs(5))
            .with_min_interval(Duration::from_millis(250))
            .with_retry(RetryConfig::no_retry())
            .with_ticker_ttl(Duration::from_secs(60));

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.min_interval, Duration::from_millis(250));
        assert!(!config.retry.enabled);
        assert_eq!(config.ticker_ttl, Duration::from_secs(60));
    }
}
