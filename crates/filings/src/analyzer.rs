//! Ticker analysis: lookup, fetch through cache, reconcile.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use filings_core::{
    Cik, CompanyFacts, CompanyProfile, FactsCache, FactsProvider, FilingRef, FilingsError,
    KeyFinancials, MetricsConfig, ReconciledResult, ReferenceProvider, Result, Symbol,
};
use filings_reconcile::{HealthAssessment, Reconciler, TrendPattern, assess_health, detect_patterns};

/// Default number of tickers analyzed at once by [`Analyzer::analyze_many`].
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Everything produced for one ticker.
#[derive(Clone, Debug, Serialize)]
pub struct TickerAnalysis {
    /// Requested ticker.
    pub symbol: Symbol,
    /// Resolved CIK.
    pub cik: Cik,
    /// Registrant name from the profile, else from the facts document.
    pub company_name: Option<String>,
    /// Aligned quarterly series with provenance and derived metrics.
    pub trends: ReconciledResult,
    /// Headline figures selected by the annual/quarterly policy.
    pub headline: KeyFinancials,
    /// Health assessment over the headline figures.
    pub health: HealthAssessment,
    /// Trend patterns over the reconciled series.
    pub patterns: Vec<TrendPattern>,
    /// Most recent 10-K/10-Q filings, newest first. Empty without a
    /// reference provider.
    pub recent_filings: Vec<FilingRef>,
}

/// Runs reconciliation for tickers.
///
/// The `Analyzer` resolves a ticker to its CIK, loads the raw company facts
/// from the cache or the facts provider, and hands them to a [`Reconciler`].
/// Passes share no mutable state; any rate limiting lives inside the
/// provider.
///
/// # Example
///
/// ```rust,ignore
/// use filings::{Analyzer, EdgarConfig, InMemoryCache, Symbol};
/// use std::sync::Arc;
///
/// let analyzer = Analyzer::edgar(EdgarConfig::new("MyApp/1.0 (contact@example.com)"))?
///     .with_cache(Arc::new(InMemoryCache::new()))
///     .with_concurrency(2);
///
/// let results = analyzer
///     .analyze_many(&[Symbol::new("AAPL"), Symbol::new("MSFT")])
///     .await;
/// ```
pub struct Analyzer {
    facts_provider: Arc<dyn FactsProvider>,
    reference_provider: Option<Arc<dyn ReferenceProvider>>,
    cache: Option<Arc<dyn FactsCache>>,
    reconciler: Reconciler,
    concurrency: usize,
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("facts_provider", &self.facts_provider.name())
            .field(
                "reference_provider",
                &self.reference_provider.as_ref().map(|p| p.name()),
            )
            .field("cache", &self.cache.as_ref().map(|_| "configured"))
            .field("reconciler", &self.reconciler)
            .field("concurrency", &self.concurrency)
            .finish()
    }
}

impl Analyzer {
    /// Creates an analyzer over a facts provider with the default metrics.
    #[must_use]
    pub fn new(facts_provider: Arc<dyn FactsProvider>) -> Self {
        Self {
            facts_provider,
            reference_provider: None,
            cache: None,
            reconciler: Reconciler::default(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Creates an analyzer backed by SEC EDGAR for both facts and profiles.
    #[cfg(feature = "edgar")]
    pub fn edgar(config: filings_edgar::EdgarConfig) -> Result<Self> {
        let client = Arc::new(filings_edgar::EdgarClient::new(config)?);
        Ok(Self::new(client.clone()).with_reference(client))
    }

    /// Sets the provider used for company profiles and recent filings.
    #[must_use]
    pub fn with_reference(mut self, provider: Arc<dyn ReferenceProvider>) -> Self {
        debug!(provider = provider.name(), "Registering reference provider");
        self.reference_provider = Some(provider);
        self
    }

    /// Sets the cache consulted before the providers.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn FactsCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Replaces the metric configuration.
    ///
    /// # Errors
    /// Returns [`FilingsError::InvalidConfig`] if the configuration is invalid.
    pub fn with_config(mut self, config: MetricsConfig) -> Result<Self> {
        self.reconciler = Reconciler::new(config)?;
        Ok(self)
    }

    /// Sets how many tickers [`analyze_many`](Self::analyze_many) runs at once.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Returns the reconciler.
    #[must_use]
    pub const fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    /// Loads the raw facts document for a CIK, cache first.
    ///
    /// Cache failures are logged and treated as misses.
    pub async fn company_facts(&self, cik: Cik) -> Result<CompanyFacts> {
        let provider = self.facts_provider.name();

        if let Some(cache) = &self.cache {
            match cache.get_facts(provider, cik).await {
                Ok(Some(cached)) => {
                    debug!(provider, %cik, "Cache hit for company facts");
                    return Ok(cached);
                }
                Ok(None) => {}
                Err(e) => warn!(provider, error = %e, "Failed to read company facts cache"),
            }
        }

        debug!(provider, %cik, "Fetching company facts");
        let facts = self.facts_provider.company_facts(cik).await?;

        if let Some(cache) = &self.cache
            && let Err(e) = cache.put_facts(provider, cik, &facts).await
        {
            warn!(provider, error = %e, "Failed to cache company facts");
        }

        Ok(facts)
    }

    /// Loads the company profile, cache first.
    ///
    /// Returns `Ok(None)` when no reference provider is configured.
    pub async fn company_profile(&self, cik: Cik) -> Result<Option<CompanyProfile>> {
        let Some(reference) = &self.reference_provider else {
            return Ok(None);
        };
        let provider = reference.name();

        if let Some(cache) = &self.cache {
            match cache.get_profile(provider, cik).await {
                Ok(Some(cached)) => {
                    debug!(provider, %cik, "Cache hit for company profile");
                    return Ok(Some(cached));
                }
                Ok(None) => {}
                Err(e) => warn!(provider, error = %e, "Failed to read company profile cache"),
            }
        }

        let profile = reference.company_profile(cik).await?;

        if let Some(cache) = &self.cache
            && let Err(e) = cache.put_profile(provider, &profile).await
        {
            warn!(provider, error = %e, "Failed to cache company profile");
        }

        Ok(Some(profile))
    }

    /// Analyzes one ticker.
    ///
    /// Fails with [`FilingsError::TickerNotFound`], [`FilingsError::NoData`]
    /// or [`FilingsError::InsufficientHistory`] when the reconciliation cannot
    /// produce a primary series; fetch failures are passed through. A failed
    /// profile fetch is logged and leaves `recent_filings` empty.
    #[instrument(skip_all, fields(symbol = %symbol))]
    pub async fn analyze(&self, symbol: &Symbol) -> Result<TickerAnalysis> {
        let cik = self.facts_provider.lookup_cik(symbol).await?;
        let raw = self.company_facts(cik).await?;

        let facts = self.reconciler.fact_set(&raw);
        let trends = self
            .reconciler
            .reconcile_fact_set(&facts)
            .map_err(|e| match e {
                FilingsError::NoData { .. } => FilingsError::NoData { cik: cik.padded() },
                e => e,
            })?;

        let headline = self.reconciler.key_financials(&facts);
        let health = assess_health(&headline);
        let patterns = detect_patterns(&trends);

        let profile = match self.company_profile(cik).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(%cik, error = %e, "Failed to fetch company profile");
                None
            }
        };

        let company_name = profile
            .as_ref()
            .map(|p| p.name.clone())
            .filter(|name| !name.is_empty())
            .or_else(|| facts.entity_name().map(str::to_string));

        debug!(
            %cik,
            quarters = trends.len(),
            patterns = patterns.len(),
            "Analysis complete"
        );

        Ok(TickerAnalysis {
            symbol: symbol.clone(),
            cik,
            company_name,
            trends,
            headline,
            health,
            patterns,
            recent_filings: profile.map(|p| p.recent_filings).unwrap_or_default(),
        })
    }

    /// Analyzes several tickers concurrently.
    ///
    /// Results are returned in input order; one ticker failing does not
    /// affect the others.
    pub async fn analyze_many(
        &self,
        symbols: &[Symbol],
    ) -> Vec<(Symbol, Result<TickerAnalysis>)> {
        debug!(
            symbol_count = symbols.len(),
            concurrency = self.concurrency,
            "Analyzing tickers"
        );

        stream::iter(symbols.iter().cloned())
            .map(|symbol| async move {
                let result = self.analyze(&symbol).await;
                (symbol, result)
            })
            .buffered(self.concurrency)
            .collect()
            .await
    }
}
