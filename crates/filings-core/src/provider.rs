//! Provider traits for the fetch collaborators.
//!
//! This module defines the provider traits:
//!
//! - [`DataProvider`] - Base trait for all data providers
//! - [`FactsProvider`] - Ticker lookup and raw XBRL company facts
//! - [`ReferenceProvider`] - Company profile and recent filings
//!
//! The reconciler never calls a provider; facts are fetched before a pass
//! begins and handed over read-only.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::Result,
    facts::CompanyFacts,
    types::{Cik, CompanyProfile, Symbol},
};

/// Base trait for all data providers.
pub trait DataProvider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g., "SEC EDGAR").
    fn name(&self) -> &str;

    /// Returns a description of this provider.
    fn description(&self) -> &str;
}

/// Provider for raw XBRL company facts.
#[async_trait]
pub trait FactsProvider: DataProvider {
    /// Maps a ticker to its CIK.
    ///
    /// Returns [`FilingsError::TickerNotFound`](crate::FilingsError::TickerNotFound)
    /// if the ticker is not in the reference database.
    async fn lookup_cik(&self, symbol: &Symbol) -> Result<Cik>;

    /// Fetches the full `companyfacts` document for a company.
    ///
    /// Returns [`FilingsError::NoData`](crate::FilingsError::NoData) if the
    /// source has no XBRL facts for the CIK.
    async fn company_facts(&self, cik: Cik) -> Result<CompanyFacts>;
}

/// Provider for company reference data.
#[async_trait]
pub trait ReferenceProvider: DataProvider {
    /// Fetches the company profile including its most recent filings.
    async fn company_profile(&self, cik: Cik) -> Result<CompanyProfile>;
}
