//! Reporting period definitions.
//!
//! This module defines [`PeriodClass`], the duration-based classification of a
//! reported value, [`PeriodType`], the label recorded in provenance, and
//! [`MetricKind`], which tells the resolver whether a metric is a duration
//! (income/cash-flow) or point-in-time (balance-sheet) figure.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Duration-based classification of a reported value.
///
/// Derived from the start/end dates of a fact, never stored and never taken
/// from the filing-form label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodClass {
    /// Balance-sheet value as of one instant (no start date).
    PointInTime,
    /// Single fiscal quarter (60 to 120 days inclusive).
    Quarterly,
    /// Full fiscal year (300 days or more).
    Annual,
    /// Any other duration, such as a nine-month cumulative figure.
    Unclassified,
}

impl PeriodClass {
    /// Returns true if values of this class may be selected.
    #[must_use]
    pub const fn is_selectable(&self) -> bool {
        !matches!(self, Self::Unclassified)
    }
}

/// Period label recorded in provenance for a selected value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodType {
    /// Point-in-time balance-sheet value.
    #[serde(rename = "Point-in-Time")]
    PointInTime,
    /// Single-quarter duration value.
    Quarterly,
    /// Full-year duration value.
    Annual,
    /// Most recent raw value whose duration matched no known class.
    #[serde(rename = "Unknown Period")]
    Unknown,
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::PointInTime => "Point-in-Time",
            Self::Quarterly => "Quarterly",
            Self::Annual => "Annual",
            Self::Unknown => "Unknown Period",
        };
        f.write_str(label)
    }
}

impl From<PeriodClass> for PeriodType {
    fn from(class: PeriodClass) -> Self {
        match class {
            PeriodClass::PointInTime => Self::PointInTime,
            PeriodClass::Quarterly => Self::Quarterly,
            PeriodClass::Annual => Self::Annual,
            PeriodClass::Unclassified => Self::Unknown,
        }
    }
}

/// Statement semantics of a canonical metric.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Income or cash-flow statement value covering a start/end period.
    #[default]
    Duration,
    /// Balance-sheet value as of one instant.
    PointInTime,
}
