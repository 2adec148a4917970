//! Error types for fetching and reconciling filing data.
//!
//! This module defines [`FilingsError`], which covers every failure that can
//! escape to a caller, and [`FailureKind`], a coarse classification callers
//! use to tell "ticker not found" apart from "SEC has no data" and
//! "insufficient quarterly history".

use thiserror::Error;

/// Errors that can occur while fetching, caching, or reconciling filing data.
#[derive(Error, Debug)]
pub enum FilingsError {
    /// The ticker is not present in the SEC reference database.
    #[error("Ticker not found in SEC reference database: {0}")]
    TickerNotFound(String),

    /// SEC has no usable XBRL facts for this company.
    #[error("No SEC financial data available for CIK {cik}")]
    NoData {
        /// Zero-padded CIK of the company.
        cik: String,
    },

    /// Fewer than the requested number of clean quarterly observations exist.
    #[error("Insufficient quarterly history for {metric}: need {required}, found {available}")]
    InsufficientHistory {
        /// Canonical metric that failed to produce a full series.
        metric: String,
        /// Number of quarters requested.
        required: usize,
        /// Number of quarterly observations found on the best alias.
        available: usize,
    },

    /// Network-related errors (connection failures, timeouts, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// The data source refused the request (HTTP 403).
    #[error("Access denied by {provider}: {reason}")]
    AccessDenied {
        /// The provider that refused the request.
        provider: String,
        /// Description of the refused request.
        reason: String,
    },

    /// Rate limit exceeded by a provider.
    #[error("Rate limited by {provider}: retry after {retry_after:?}")]
    RateLimited {
        /// The provider that rate limited the request.
        provider: String,
        /// Suggested time to wait before retrying.
        retry_after: Option<std::time::Duration>,
    },

    /// Error parsing data from a provider.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Error interacting with the cache.
    #[error("Cache error: {0}")]
    Cache(String),

    /// The metric configuration is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The requested provider is not configured.
    #[error("Provider not configured: {0}")]
    ProviderNotConfigured(String),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

/// Coarse failure classification exposed to dashboards and CLIs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The ticker could not be mapped to a CIK.
    TickerNotFound,
    /// SEC returned no usable financial data.
    NoData,
    /// Data exists but not enough clean quarters of it.
    InsufficientHistory,
    /// Transport or upstream failure while fetching.
    Fetch,
    /// Configuration, cache, or other local failure.
    Internal,
}

impl FilingsError {
    /// Classifies this error into one of the user-visible failure kinds.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::TickerNotFound(_) => FailureKind::TickerNotFound,
            Self::NoData { .. } => FailureKind::NoData,
            Self::InsufficientHistory { .. } => FailureKind::InsufficientHistory,
            Self::Network(_)
            | Self::AccessDenied { .. }
            | Self::RateLimited { .. }
            | Self::Parse(_) => FailureKind::Fetch,
            Self::Cache(_)
            | Self::InvalidConfig(_)
            | Self::InvalidParameter(_)
            | Self::ProviderNotConfigured(_)
            | Self::Other(_) => FailureKind::Internal,
        }
    }

    /// Returns true if retrying the same request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::AccessDenied { .. } | Self::RateLimited { .. }
        )
    }
}

/// Result type alias using [`FilingsError`].
pub type Result<T> = std::result::Result<T, FilingsError>;
