#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/filings/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! SEC EDGAR client for the inputs of a reconciliation pass.
//!
//! This crate provides:
//!
//! - CIK (Central Index Key) lookup from ticker symbols
//! - Raw XBRL company facts from the EDGAR API
//! - Company profiles with recent 10-K/10-Q filings
//! - An explicit, shareable rate limiter and retry policy

/// Rate-limited EDGAR client.
pub mod client;
/// Client configuration.
pub mod config;
/// Request spacing.
pub mod rate_limit;
mod response;
/// Retry policy.
pub mod retry;

pub use client::EdgarClient;
pub use config::{COMPANY_TICKERS_URL, EDGAR_BASE_URL, EdgarConfig};
pub use rate_limit::{DEFAULT_MIN_INTERVAL, RateLimiter};
pub use retry::{Backoff, RetryConfig};
