//! In-memory cache implementation.

use async_trait::async_trait;
use chrono::Utc;
use filings_core::{Cik, CompanyFacts, CompanyProfile, FactsCache, Result};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Cache entry with timestamp for TTL-based invalidation.
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    data: T,
    cached_at: chrono::DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    fn is_stale(&self, ttl: Duration) -> bool {
        let age = Utc::now().signed_duration_since(self.cached_at);
        age > chrono::TimeDelta::from_std(ttl).unwrap_or(chrono::TimeDelta::MAX)
    }
}

/// Provider name and CIK.
type CacheKey = (String, Cik);

/// Simple in-memory cache for testing and development.
///
/// Data is stored in `RwLock`-protected `HashMap`s and is lost when the cache
/// is dropped. Documents are cloned on get/put operations.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    facts: RwLock<HashMap<CacheKey, CacheEntry<CompanyFacts>>>,
    profiles: RwLock<HashMap<CacheKey, CacheEntry<CompanyProfile>>>,
}

impl InMemoryCache {
    /// Create a new empty in-memory cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached entries across facts and profiles.
    pub async fn len(&self) -> usize {
        self.facts.read().await.len() + self.profiles.read().await.len()
    }

    /// Returns true if nothing is cached.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl FactsCache for InMemoryCache {
    #[instrument(skip(self), fields(provider = %provider, cik = %cik))]
    async fn get_facts(&self, provider: &str, cik: Cik) -> Result<Option<CompanyFacts>> {
        let cache = self.facts.read().await;
        let hit = cache
            .get(&(provider.to_string(), cik))
            .map(|entry| entry.data.clone());
        debug!(hit = hit.is_some(), "Company facts cache lookup");
        Ok(hit)
    }

    #[instrument(skip(self, facts), fields(provider = %provider, cik = %cik))]
    async fn put_facts(&self, provider: &str, cik: Cik, facts: &CompanyFacts) -> Result<()> {
        self.facts
            .write()
            .await
            .insert((provider.to_string(), cik), CacheEntry::new(facts.clone()));
        debug!("Cached company facts");
        Ok(())
    }

    #[instrument(skip(self), fields(provider = %provider, cik = %cik))]
    async fn get_profile(&self, provider: &str, cik: Cik) -> Result<Option<CompanyProfile>> {
        let cache = self.profiles.read().await;
        let hit = cache
            .get(&(provider.to_string(), cik))
            .map(|entry| entry.data.clone());
        debug!(hit = hit.is_some(), "Company profile cache lookup");
        Ok(hit)
    }

    #[instrument(skip(self, profile), fields(provider = %provider, cik = %profile.cik))]
    async fn put_profile(&self, provider: &str, profile: &CompanyProfile) -> Result<()> {
        self.profiles.write().await.insert(
            (provider.to_string(), profile.cik),
            CacheEntry::new(profile.clone()),
        );
        debug!("Cached company profile");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn invalidate_stale(&self, ttl: Duration) -> Result<usize> {
        let mut total_removed = 0;

        {
            let mut cache = self.facts.write().await;
            let before = cache.len();
            cache.retain(|_, entry| !entry.is_stale(ttl));
            total_removed += before - cache.len();
        }

        {
            let mut cache = self.profiles.write().await;
            let before = cache.len();
            cache.retain(|_, entry| !entry.is_stale(ttl));
            total_removed += before - cache.len();
        }

        if total_removed > 0 {
            debug!("Invalidated {} stale cache entries", total_removed);
        }

        Ok(total_removed)
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> Result<()> {
        self.facts.write().await.clear();
        self.profiles.write().await.clear();
        debug!("Cleared all cache entries");
        Ok(())
    }
}
