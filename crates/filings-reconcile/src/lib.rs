#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/filings/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Reconciliation of SEC XBRL facts into aligned financial series.
//!
//! Data flows leaf to root:
//!
//! - [`classify`](classify::classify) - period classification by duration
//! - [`resolve`](resolve::resolve) - latest-date-wins concept resolution
//! - [`build_series`](series::build_series) - quarterly series per metric
//! - [`align`](align::align) - balance-sheet values per quarter end
//! - [`compute_derived`](derived::compute_derived) - margins, growth, ratios
//! - [`Reconciler`](reconciler::Reconciler) - the full pass
//!
//! Everything here is synchronous and free of I/O.

/// Point-in-time alignment.
pub mod align;
/// Period classification.
pub mod classify;
/// Derived metric calculators.
pub mod derived;
/// Financial health assessment.
pub mod health;
/// Trend pattern detection.
pub mod patterns;
/// Full reconciliation pass.
pub mod reconciler;
/// Concept resolution.
pub mod resolve;
/// Headline metric selection policy.
pub mod selection;
/// Quarterly series assembly.
pub mod series;

pub use align::{Alignment, align, align_facts};
pub use classify::{ANNUAL_MIN_DAYS, QUARTER_MAX_DAYS, QUARTER_MIN_DAYS, classify, classify_fact};
pub use derived::compute_derived;
pub use health::{CashPosition, HealthAssessment, assess_health};
pub use patterns::{PatternKind, Severity, TrendPattern, detect_patterns};
pub use reconciler::Reconciler;
pub use resolve::resolve;
pub use selection::{key_financials, select_headline};
pub use series::build_series;
