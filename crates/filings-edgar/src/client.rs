//! Rate-limited SEC EDGAR client.

use async_trait::async_trait;
use filings_core::{
    Cik, CompanyFacts, CompanyProfile, DataProvider, FactsProvider, FilingsError,
    ReferenceProvider, Result, Symbol,
};
use reqwest::{StatusCode, header::RETRY_AFTER};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::{
    config::EdgarConfig,
    rate_limit::RateLimiter,
    response::{CompanySubmissions, CompanyTickerInfo, TickerDirectory},
};

const PROVIDER_NAME: &str = "SEC EDGAR";

/// SEC EDGAR client.
///
/// Fetches the ticker reference database, raw XBRL company facts and
/// company submissions. Every request waits on the [`RateLimiter`] and
/// transient failures are retried per [`RetryConfig`](crate::RetryConfig).
#[derive(Debug)]
pub struct EdgarClient {
    client: reqwest::Client,
    config: EdgarConfig,
    rate_limiter: Arc<RateLimiter>,
    tickers: RwLock<Option<TickerDirectory>>,
}

impl EdgarClient {
    /// Creates a client from the given configuration.
    ///
    /// The SEC requires identifying user agent headers. Format should be:
    /// "AppName/Version (contact@email.com)"
    pub fn new(config: EdgarConfig) -> Result<Self> {
        if config.user_agent.trim().is_empty() {
            return Err(FilingsError::InvalidConfig(
                "SEC requires a non-empty user agent".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(|e| FilingsError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(client, config))
    }

    /// Creates a client around a pre-configured `reqwest` client.
    ///
    /// The caller is responsible for setting the user agent on `client`.
    pub fn with_client(client: reqwest::Client, config: EdgarConfig) -> Self {
        let rate_limiter = RateLimiter::shared(config.min_interval);
        Self {
            client,
            config,
            rate_limiter,
            tickers: RwLock::new(None),
        }
    }

    /// Replaces the rate limiter, e.g. to share one across several clients.
    #[must_use]
    pub fn with_rate_limiter(mut self, rate_limiter: Arc<RateLimiter>) -> Self {
        self.rate_limiter = rate_limiter;
        self
    }

    /// Returns the rate limiter used by this client.
    #[must_use]
    pub fn rate_limiter(&self) -> Arc<RateLimiter> {
        Arc::clone(&self.rate_limiter)
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &EdgarConfig {
        &self.config
    }

    /// Looks up a company's CIK from its ticker symbol.
    ///
    /// The reference database is downloaded once and reused until
    /// `ticker_ttl` elapses. Share-class tickers match with either a dot or
    /// a dash (`BRK.B`, `BRK-B`).
    pub async fn lookup_cik(&self, symbol: &Symbol) -> Result<Cik> {
        if symbol.as_str().is_empty() {
            return Err(FilingsError::InvalidParameter("Empty ticker".to_string()));
        }

        {
            let tickers = self.tickers.read().await;
            if let Some(directory) = tickers.as_ref()
                && directory.is_fresh(self.config.ticker_ttl)
            {
                return Self::find_cik(directory, symbol);
            }
        }

        let mut tickers = self.tickers.write().await;
        // Another task may have refreshed while we waited for the lock.
        if let Some(directory) = tickers.as_ref()
            && directory.is_fresh(self.config.ticker_ttl)
        {
            return Self::find_cik(directory, symbol);
        }

        debug!(url = %self.config.tickers_url, "Fetching company tickers from SEC");
        let data: HashMap<String, CompanyTickerInfo> = self
            .get_json(&self.config.tickers_url, "company tickers", || {
                FilingsError::Network("Company tickers file not found".to_string())
            })
            .await?;

        let directory = TickerDirectory::from_response(data);
        debug!(count = directory.len(), "Loaded ticker reference database");
        let cik = Self::find_cik(&directory, symbol);
        *tickers = Some(directory);
        cik
    }

    fn find_cik(directory: &TickerDirectory, symbol: &Symbol) -> Result<Cik> {
        directory.get(symbol).map(|entry| entry.cik).ok_or_else(|| {
            debug!(ticker = %symbol, "Ticker not in SEC reference database");
            FilingsError::TickerNotFound(symbol.to_string())
        })
    }

    /// Fetches the raw XBRL company facts document.
    ///
    /// A 404 from SEC means the company has no XBRL facts and is reported
    /// as [`FilingsError::NoData`].
    pub async fn fetch_company_facts(&self, cik: Cik) -> Result<CompanyFacts> {
        let url = format!(
            "{}/api/xbrl/companyfacts/CIK{}.json",
            self.config.base_url,
            cik.padded()
        );

        debug!(%cik, "Fetching company facts");
        self.get_json(&url, "company facts", || FilingsError::NoData {
            cik: cik.padded(),
        })
        .await
    }

    /// Fetches the company profile and its most recent 10-K/10-Q filings.
    pub async fn company_profile(&self, cik: Cik) -> Result<CompanyProfile> {
        let url = format!(
            "{}/submissions/CIK{}.json",
            self.config.base_url,
            cik.padded()
        );

        debug!(%cik, "Fetching company submissions");
        let submissions: CompanySubmissions = self
            .get_json(&url, "submissions", || FilingsError::NoData {
                cik: cik.padded(),
            })
            .await?;

        Ok(submissions.into_profile(cik))
    }

    /// GETs and decodes a JSON document, retrying transient failures.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        what: &str,
        not_found: impl Fn() -> FilingsError,
    ) -> Result<T> {
        let mut attempt = 0;
        loop {
            let error = match self.get_json_once(url, what, &not_found).await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            let Some(delay) = self.config.retry.next_delay(&error, attempt) else {
                return Err(error);
            };

            attempt += 1;
            warn!(
                url,
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "Retrying SEC request"
            );
            sleep(delay).await;
        }
    }

    async fn get_json_once<T: DeserializeOwned>(
        &self,
        url: &str,
        what: &str,
        not_found: &impl Fn() -> FilingsError,
    ) -> Result<T> {
        self.rate_limiter.wait().await;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FilingsError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            if status == StatusCode::NOT_FOUND {
                return Err(not_found());
            }
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_retry_after);
            return Err(status_error(status, retry_after, what));
        }

        response
            .json()
            .await
            .map_err(|e| FilingsError::Parse(format!("Failed to parse {}: {}", what, e)))
    }
}

/// Parses a `Retry-After` header given in seconds.
fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

/// Maps a non-success, non-404 status to an error.
///
/// 403 and 429 are how SEC signals throttling; both are retryable, as are
/// server errors. Other client errors are not.
fn status_error(status: StatusCode, retry_after: Option<Duration>, what: &str) -> FilingsError {
    match status {
        StatusCode::FORBIDDEN => FilingsError::AccessDenied {
            provider: PROVIDER_NAME.to_string(),
            reason: format!("HTTP {} fetching {}", status, what),
        },
        StatusCode::TOO_MANY_REQUESTS => FilingsError::RateLimited {
            provider: PROVIDER_NAME.to_string(),
            retry_after,
        },
        s if s.is_server_error() => {
            FilingsError::Network(format!("Failed to fetch {}: HTTP {}", what, s))
        }
        s => FilingsError::Other(format!("Failed to fetch {}: HTTP {}", what, s)),
    }
}

impl DataProvider for EdgarClient {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn description(&self) -> &str {
        "SEC EDGAR XBRL company facts and filing history"
    }
}

#[async_trait]
impl FactsProvider for EdgarClient {
    async fn lookup_cik(&self, symbol: &Symbol) -> Result<Cik> {
        Self::lookup_cik(self, symbol).await
    }

    async fn company_facts(&self, cik: Cik) -> Result<CompanyFacts> {
        self.fetch_company_facts(cik).await
    }
}

#[async_trait]
impl ReferenceProvider for EdgarClient {
    async fn company_profile(&self, cik: Cik) -> Result<CompanyProfile> {
        Self::company_profile(self, cik).await
    }
}
