//! No-op cache implementation.

use async_trait::async_trait;
use filings_core::{Cik, CompanyFacts, CompanyProfile, FactsCache, Result};
use std::time::Duration;
use tracing::trace;

/// A no-op cache that doesn't store anything.
///
/// All `get_*` methods return `Ok(None)` and all `put_*` methods return `Ok(())`.
/// Useful for disabling caching.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

impl NoopCache {
    /// Create a new no-op cache.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FactsCache for NoopCache {
    async fn get_facts(&self, _provider: &str, _cik: Cik) -> Result<Option<CompanyFacts>> {
        trace!("NoopCache: get_facts called, returning None");
        Ok(None)
    }

    async fn put_facts(&self, _provider: &str, _cik: Cik, _facts: &CompanyFacts) -> Result<()> {
        trace!("NoopCache: put_facts called, doing nothing");
        Ok(())
    }

    async fn get_profile(&self, _provider: &str, _cik: Cik) -> Result<Option<CompanyProfile>> {
        trace!("NoopCache: get_profile called, returning None");
        Ok(None)
    }

    async fn put_profile(&self, _provider: &str, _profile: &CompanyProfile) -> Result<()> {
        trace!("NoopCache: put_profile called, doing nothing");
        Ok(())
    }

    async fn invalidate_stale(&self, _ttl: Duration) -> Result<usize> {
        Ok(0)
    }

    async fn clear(&self) -> Result<()> {
        Ok(())
    }
}
