#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/filings/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Reconciled quarterly financial series from SEC XBRL company facts.
//!
//! This crate re-exports the core types, the reconciliation engine, cache
//! implementations and the SEC EDGAR client, and provides an [`Analyzer`]
//! that runs ticker → CIK → facts → reconciliation for one or many tickers.
//!
//! # Features
//!
//! - `edgar` - SEC EDGAR client
//! - `cache-sqlite` - SQLite-based caching

// Core types and traits
pub use filings_core::*;

// Reconciliation engine
pub use filings_reconcile::{
    CashPosition, HealthAssessment, PatternKind, Reconciler, Severity, TrendPattern,
    assess_health, detect_patterns,
};

// Cache implementations
#[cfg(feature = "cache-sqlite")]
pub use filings_cache::SqliteCache;
pub use filings_cache::{InMemoryCache, NoopCache};

// Providers
#[cfg(feature = "edgar")]
pub use filings_edgar::{Backoff, EdgarClient, EdgarConfig, RateLimiter, RetryConfig};

mod analyzer;
pub use analyzer::{Analyzer, DEFAULT_CONCURRENCY, TickerAnalysis};
