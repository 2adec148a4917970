//! Cache trait for storing fetched filing data.
//!
//! This module defines the [`FactsCache`] trait that provides a unified
//! interface for caching raw company facts and company profiles.

use async_trait::async_trait;
use std::time::Duration;

use crate::{
    error::Result,
    facts::CompanyFacts,
    types::{Cik, CompanyProfile},
};

/// Trait for caching fetched filing data.
///
/// Implementations can store data in various backends (SQLite, in-memory, etc.)
/// to avoid repeated SEC requests.
#[async_trait]
pub trait FactsCache: Send + Sync {
    /// Retrieves cached company facts.
    ///
    /// Returns `Ok(Some(facts))` if cached, `Ok(None)` if not cached.
    async fn get_facts(&self, provider: &str, cik: Cik) -> Result<Option<CompanyFacts>>;

    /// Stores company facts in the cache.
    async fn put_facts(&self, provider: &str, cik: Cik, facts: &CompanyFacts) -> Result<()>;

    /// Retrieves a cached company profile.
    ///
    /// Returns `Ok(Some(profile))` if cached, `Ok(None)` if not cached.
    async fn get_profile(&self, provider: &str, cik: Cik) -> Result<Option<CompanyProfile>>;

    /// Stores a company profile in the cache.
    async fn put_profile(&self, provider: &str, profile: &CompanyProfile) -> Result<()>;

    /// Removes cache entries older than the specified TTL.
    ///
    /// Returns the number of entries invalidated.
    async fn invalidate_stale(&self, ttl: Duration) -> Result<usize>;

    /// Clears all cached data.
    async fn clear(&self) -> Result<()>;
}
