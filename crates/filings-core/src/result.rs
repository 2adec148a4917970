//! Reconciliation outputs.
//!
//! - [`ResolvedMetric`] - one selected value with full provenance
//! - [`QuarterlySeries`] - N consecutive quarterly values of one metric
//! - [`ReconciledResult`] - the axis-aligned output of a full pass
//! - [`KeyFinancials`] - single-point headline figures

use chrono::{DateTime, NaiveDate};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::{
    error::{FilingsError, Result},
    period::PeriodType,
    types::{Fact, SourceForm, Unit},
};

/// A single value selected for a canonical metric.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolvedMetric {
    /// Selected value.
    pub value: f64,
    /// Period end (or instant) of the selected fact.
    pub end_date: NaiveDate,
    /// Period start of the selected fact, absent for point-in-time values.
    pub start_date: Option<NaiveDate>,
    /// Period label of the selected fact.
    pub period_type: PeriodType,
    /// Concept the value was reported under.
    pub source_concept: String,
    /// Form the value was reported on.
    pub source_form: SourceForm,
    /// Filing date of the source filing.
    pub filed_date: Option<NaiveDate>,
    /// Unit of the value.
    pub unit: Unit,
}

impl ResolvedMetric {
    /// Builds a resolved metric from the fact it was selected from.
    #[must_use]
    pub fn from_fact(fact: &Fact, period_type: PeriodType) -> Self {
        Self {
            value: fact.value,
            end_date: fact.period_end,
            start_date: fact.period_start,
            period_type,
            source_concept: fact.concept.clone(),
            source_form: fact.form.clone(),
            filed_date: fact.filed,
            unit: fact.unit,
        }
    }
}

/// Where a metric's values came from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    /// Source concept.
    pub concept: String,
    /// Form of the most recent contributing filing.
    pub form: SourceForm,
    /// Filing date of the most recent contributing filing.
    pub filed_date: Option<NaiveDate>,
    /// Period label of the contributing facts.
    pub period_type: PeriodType,
    /// Unit of the values.
    pub unit: Unit,
}

impl From<&ResolvedMetric> for Provenance {
    fn from(metric: &ResolvedMetric) -> Self {
        Self {
            concept: metric.source_concept.clone(),
            form: metric.source_form.clone(),
            filed_date: metric.filed_date,
            period_type: metric.period_type,
            unit: metric.unit,
        }
    }
}

/// N quarterly values of one metric, oldest to newest.
///
/// `periods.len() == values.len()` always holds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuarterlySeries {
    /// Canonical metric name.
    pub metric: String,
    /// Quarter end dates.
    pub periods: Vec<NaiveDate>,
    /// Selected quarterly values.
    pub values: Vec<ResolvedMetric>,
}

impl QuarterlySeries {
    /// Number of quarters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the series holds no quarters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw numeric values, oldest first.
    #[must_use]
    pub fn amounts(&self) -> Vec<f64> {
        self.values.iter().map(|v| v.value).collect()
    }

    /// Most recent quarter.
    #[must_use]
    pub fn latest(&self) -> Option<&ResolvedMetric> {
        self.values.last()
    }
}

/// Why a configured metric has no values in a result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Unavailable {
    /// No qualifying fact under any alias.
    NotFound,
    /// Quarterly facts exist but fewer than N of them.
    InsufficientHistory {
        /// Quarters requested.
        required: usize,
        /// Quarterly facts found on the best alias.
        available: usize,
    },
}

/// Axis-aligned output of one reconciliation pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconciledResult {
    /// Quarter end dates, oldest to newest.
    pub periods: Vec<NaiveDate>,
    /// Metric values aligned to `periods`.
    ///
    /// `None` marks a balance-sheet quarter with no observation within
    /// tolerance.
    pub metrics: BTreeMap<String, Vec<Option<f64>>>,
    /// Source of each metric present in `metrics`.
    pub provenance: BTreeMap<String, Provenance>,
    /// Derived series aligned to `periods`.
    pub derived: BTreeMap<String, Vec<f64>>,
    /// Configured metrics that produced no series, with the reason.
    pub unavailable: BTreeMap<String, Unavailable>,
}

impl ReconciledResult {
    /// Number of quarters on the period axis.
    #[must_use]
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Returns true if the period axis is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Values of a metric, if present.
    #[must_use]
    pub fn metric(&self, name: &str) -> Option<&[Option<f64>]> {
        self.metrics.get(name).map(Vec::as_slice)
    }

    /// Values of a metric with absent quarters read as zero.
    #[must_use]
    pub fn metric_or_zero(&self, name: &str) -> Option<Vec<f64>> {
        self.metric(name)
            .map(|values| values.iter().map(|v| v.unwrap_or(0.0)).collect())
    }

    /// Values of a derived series, if present.
    #[must_use]
    pub fn derived(&self, name: &str) -> Option<&[f64]> {
        self.derived.get(name).map(Vec::as_slice)
    }

    /// Converts the result into a DataFrame.
    ///
    /// Columns: `period` (Date), then one nullable Float64 column per metric
    /// and per derived series, in name order.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let epoch = DateTime::UNIX_EPOCH.date_naive();
        let days = self
            .periods
            .iter()
            .map(|d| {
                i32::try_from((*d - epoch).num_days())
                    .map_err(|e| FilingsError::Other(format!("Period {d} out of range: {e}")))
            })
            .collect::<Result<Vec<i32>>>()?;

        let period_col = Column::new("period".into(), days)
            .cast(&DataType::Date)
            .map_err(|e| FilingsError::Other(e.to_string()))?;

        let mut columns = Vec::with_capacity(1 + self.metrics.len() + self.derived.len());
        columns.push(period_col);
        for (name, values) in &self.metrics {
            columns.push(Column::new(name.as_str().into(), values.clone()));
        }
        for (name, values) in &self.derived {
            if self.metrics.contains_key(name) {
                continue;
            }
            columns.push(Column::new(name.as_str().into(), values.clone()));
        }

        DataFrame::new(columns).map_err(|e| FilingsError::Other(e.to_string()))
    }
}

/// Single-point headline figures selected by the annual/quarterly policy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyFinancials {
    /// Selected value per headline metric.
    pub metrics: BTreeMap<String, ResolvedMetric>,
    /// Headline metrics with no valid fact.
    pub missing: BTreeSet<String>,
}

impl KeyFinancials {
    /// Selected metric, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ResolvedMetric> {
        self.metrics.get(name)
    }

    /// Selected value, if any.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<f64> {
        self.get(name).map(|m| m.value)
    }
}
