//! Full reconciliation pass over one company's facts.

use filings_core::{
    CompanyFacts, FactSet, FilingsError, KeyFinancials, MetricsConfig, PeriodType, Provenance,
    ReconciledResult, Result, Unavailable,
};
use tracing::{debug, instrument};

use crate::{
    align::align_facts, derived::compute_derived, selection::key_financials, series::build_series,
};

/// Runs reconciliation passes with one metric configuration.
///
/// A `Reconciler` holds no per-company state; one instance can serve any
/// number of concurrent passes.
#[derive(Clone, Debug, Default)]
pub struct Reconciler {
    config: MetricsConfig,
}

impl Reconciler {
    /// Creates a reconciler after validating the configuration.
    pub fn new(config: MetricsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the metric configuration.
    #[must_use]
    pub const fn config(&self) -> &MetricsConfig {
        &self.config
    }

    /// Converts a raw document into the configured taxonomy's fact set.
    #[must_use]
    pub fn fact_set(&self, raw: &CompanyFacts) -> FactSet {
        FactSet::from_company_facts(raw, &self.config.taxonomy)
    }

    /// Reconciles a raw SEC document.
    ///
    /// Absent input (`None`) is treated as a company with no data.
    pub fn reconcile(&self, raw: Option<&CompanyFacts>) -> Result<ReconciledResult> {
        match raw {
            Some(raw) => self.reconcile_fact_set(&self.fact_set(raw)),
            None => Err(FilingsError::NoData {
                cik: "unknown".to_string(),
            }),
        }
    }

    /// Reconciles an already-typed fact set.
    ///
    /// Fails with [`FilingsError::NoData`] if the set is empty or the primary
    /// metric has no qualifying fact, and with
    /// [`FilingsError::InsufficientHistory`] if the primary metric has fewer
    /// than N quarters. Every other metric that cannot be built is recorded in
    /// [`ReconciledResult::unavailable`].
    ///
    /// Duration metrics other than the primary one keep their own N most
    /// recent quarters and are not re-matched against the primary axis.
    #[instrument(skip_all, fields(cik = ?facts.cik()))]
    pub fn reconcile_fact_set(&self, facts: &FactSet) -> Result<ReconciledResult> {
        let cik = || {
            facts
                .cik()
                .map_or_else(|| "unknown".to_string(), |c| c.padded())
        };

        if facts.is_empty() {
            return Err(FilingsError::NoData { cik: cik() });
        }

        let config = &self.config;
        let n = config.quarter_count;
        let primary = config.primary().ok_or_else(|| {
            FilingsError::InvalidConfig(format!(
                "primary metric {} is not configured",
                config.primary_metric
            ))
        })?;

        let axis = match build_series(facts, &primary.aliases, n, &primary.name) {
            Ok(series) => series,
            Err(Unavailable::NotFound) => return Err(FilingsError::NoData { cik: cik() }),
            Err(Unavailable::InsufficientHistory {
                required,
                available,
            }) => {
                return Err(FilingsError::InsufficientHistory {
                    metric: primary.name.clone(),
                    required,
                    available,
                });
            }
        };

        let mut result = ReconciledResult {
            periods: axis.periods.clone(),
            ..Default::default()
        };

        for metric in &config.duration_metrics {
            let series = if metric.name == primary.name {
                axis.clone()
            } else {
                match build_series(facts, &metric.aliases, n, &metric.name) {
                    Ok(series) => series,
                    Err(reason) => {
                        result.unavailable.insert(metric.name.clone(), reason);
                        continue;
                    }
                }
            };

            if series.periods != result.periods {
                debug!(metric = %metric.name, "Quarter ends differ from the primary axis");
            }
            if let Some(latest) = series.latest() {
                result
                    .provenance
                    .insert(metric.name.clone(), Provenance::from(latest));
            }
            result.metrics.insert(
                metric.name.clone(),
                series.values.iter().map(|v| Some(v.value)).collect(),
            );
        }

        for metric in &config.balance_sheet_metrics {
            let alignment = align_facts(
                facts,
                &metric.aliases,
                &result.periods,
                config.tolerance_days,
            );
            let Some((alignment, latest)) =
                alignment.and_then(|a| a.latest_match().map(|fact| (a, fact)))
            else {
                debug!(metric = %metric.name, "No balance-sheet observation near any quarter end");
                result
                    .unavailable
                    .insert(metric.name.clone(), Unavailable::NotFound);
                continue;
            };

            result.provenance.insert(
                metric.name.clone(),
                Provenance {
                    concept: latest.concept.clone(),
                    form: latest.form.clone(),
                    filed_date: latest.filed,
                    period_type: PeriodType::PointInTime,
                    unit: latest.unit,
                },
            );
            result
                .metrics
                .insert(metric.name.clone(), alignment.values());
        }

        result.derived = compute_derived(&result);

        debug!(
            quarters = result.periods.len(),
            metrics = result.metrics.len(),
            unavailable = result.unavailable.len(),
            "Reconciled facts"
        );
        Ok(result)
    }

    /// Selects the configured headline figures.
    #[must_use]
    pub fn key_financials(&self, facts: &FactSet) -> KeyFinancials {
        key_financials(facts, &self.config.headline_metrics)
    }
}
