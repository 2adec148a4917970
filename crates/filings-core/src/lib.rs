#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/filings/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for SEC XBRL fact reconciliation.
//!
//! This crate provides the foundational abstractions:
//!
//! - [`Fact`](types::Fact) / [`FactSet`](facts::FactSet) - Typed XBRL facts
//! - [`CompanyFacts`](facts::CompanyFacts) - Raw SEC `companyfacts` document
//! - [`MetricsConfig`](config::MetricsConfig) - Canonical metrics and their aliases
//! - [`ReconciledResult`](result::ReconciledResult) - Output of a reconciliation pass
//! - [`FactsProvider`](provider::FactsProvider) - Fetch collaborator trait
//! - [`FactsCache`](cache::FactsCache) - Caching abstraction

/// Cache trait for storing fetched data.
pub mod cache;
/// Metric configuration.
pub mod config;
/// Error types and failure classification.
pub mod error;
/// Raw company facts and the typed fact set.
pub mod facts;
/// Period classification and labels.
pub mod period;
/// Provider traits for fetching filing data.
pub mod provider;
/// Reconciliation output types.
pub mod result;
/// Core data types (Symbol, Cik, Fact, etc.).
pub mod types;

// Re-export commonly used items at crate root
pub use cache::FactsCache;
pub use config::{MetricDefinition, MetricsConfig};
pub use error::{FailureKind, FilingsError, Result};
pub use facts::{CompanyFacts, ConceptFacts, FactSet, RawFact};
pub use period::{MetricKind, PeriodClass, PeriodType};
pub use provider::{DataProvider, FactsProvider, ReferenceProvider};
pub use result::{
    KeyFinancials, Provenance, QuarterlySeries, ReconciledResult, ResolvedMetric, Unavailable,
};
pub use types::{Cik, CompanyProfile, Fact, FilingRef, SourceForm, Symbol, Unit};
