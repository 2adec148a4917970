//! Metric selection policy for single-point headline figures.
//!
//! Each alias picks its own candidate. For duration metrics that goes through
//! three tiers:
//!
//! 1. Annual and quarterly facts; the later end date wins regardless of
//!    type, annual on an equal end date.
//! 2. If neither exists, the most recent valid fact of any duration, tagged
//!    [`PeriodType::Unknown`].
//! 3. Otherwise nothing.
//!
//! Point-in-time metrics take the most recent instant, falling back to the
//! most recent valid fact tagged `Unknown`.
//!
//! The alias whose candidate ends latest supplies the headline value. On an
//! equal end date the earlier alias keeps it.

use filings_core::{
    Fact, FactSet, KeyFinancials, MetricDefinition, MetricKind, PeriodClass, PeriodType,
    ResolvedMetric,
};
use std::cmp::Ordering;
use tracing::debug;

use crate::{classify::classify_fact, resolve::latest};

/// Orders typed candidates: end date, then annual over quarterly, then filing date.
fn compare_typed(a: (&Fact, PeriodClass), b: (&Fact, PeriodClass)) -> Ordering {
    let rank = |class: PeriodClass| u8::from(class == PeriodClass::Annual);
    a.0.period_end
        .cmp(&b.0.period_end)
        .then_with(|| rank(a.1).cmp(&rank(b.1)))
        .then_with(|| a.0.filed.cmp(&b.0.filed))
}

fn select_duration(candidates: &[&Fact]) -> Option<ResolvedMetric> {
    let mut best: Option<(&Fact, PeriodClass)> = None;
    for &fact in candidates {
        let class = classify_fact(fact);
        if !matches!(class, PeriodClass::Annual | PeriodClass::Quarterly) {
            continue;
        }
        let better = best.is_none_or(|current| compare_typed((fact, class), current).is_gt());
        if better {
            best = Some((fact, class));
        }
    }

    best.map(|(fact, class)| ResolvedMetric::from_fact(fact, PeriodType::from(class)))
}

fn select_point_in_time(candidates: &[&Fact]) -> Option<ResolvedMetric> {
    latest(candidates.iter().copied().filter(|f| f.is_instant()))
        .map(|fact| ResolvedMetric::from_fact(fact, PeriodType::PointInTime))
}

fn select_for_alias(candidates: &[Fact], kind: MetricKind) -> Option<ResolvedMetric> {
    let candidates: Vec<&Fact> = candidates.iter().collect();

    let typed = match kind {
        MetricKind::Duration => select_duration(&candidates),
        MetricKind::PointInTime => select_point_in_time(&candidates),
    };

    typed.or_else(|| {
        latest(candidates.iter().copied())
            .map(|fact| ResolvedMetric::from_fact(fact, PeriodType::Unknown))
    })
}

/// Selects the headline value of one metric.
#[must_use]
pub fn select_headline(
    facts: &FactSet,
    aliases: &[String],
    kind: MetricKind,
) -> Option<ResolvedMetric> {
    aliases
        .iter()
        .filter_map(|alias| select_for_alias(facts.facts(alias), kind))
        .fold(None, |best, candidate| match best {
            Some(current) if candidate.end_date <= current.end_date => Some(current),
            _ => Some(candidate),
        })
}

/// Selects every configured headline metric.
#[must_use]
pub fn key_financials(facts: &FactSet, metrics: &[MetricDefinition]) -> KeyFinancials {
    let mut out = KeyFinancials::default();
    for metric in metrics {
        match select_headline(facts, &metric.aliases, metric.kind) {
            Some(resolved) => {
                debug!(
                    metric = %metric.name,
                    concept = %resolved.source_concept,
                    period_type = %resolved.period_type,
                    end_date = %resolved.end_date,
                    "Selected headline value"
                );
                out.metrics.insert(metric.name.clone(), resolved);
            }
            None => {
                out.missing.insert(metric.name.clone());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use filings_core::{SourceForm, Unit};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn duration(concept: &str, value: f64, start: NaiveDate, end: NaiveDate) -> Fact {
        Fact::new(concept, Unit::Usd, value, end).with_start(start)
    }

    fn aliases(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    #[test]
    fn test_later_annual_beats_quarterly() {
        let facts = FactSet::from_facts([
            duration("NetIncomeLoss", 400.0, date(2024, 1, 1), date(2024, 12, 31))
                .with_form(SourceForm::TenK),
            duration("NetIncomeLoss", 90.0, date(2024, 7, 2), date(2024, 9, 30))
                .with_form(SourceForm::TenQ),
        ]);
        let picked =
            select_headline(&facts, &aliases(&["NetIncomeLoss"]), MetricKind::Duration).unwrap();
        assert_eq!(picked.value, 400.0);
        assert_eq!(picked.period_type, PeriodType::Annual);
        assert_eq!(picked.source_form, SourceForm::TenK);
    }

    #[test]
    fn test_later_quarterly_beats_annual() {
        let facts = FactSet::from_facts([
            duration("Revenues", 400.0, date(2024, 1, 1), date(2024, 12, 31)),
            duration("Revenues", 110.0, date(2025, 1, 1), date(2025, 3, 31)),
        ]);
        let picked =
            select_headline(&facts, &aliases(&["Revenues"]), MetricKind::Duration).unwrap();
        assert_eq!(picked.value, 110.0);
        assert_eq!(picked.period_type, PeriodType::Quarterly);
    }

    #[test]
    fn test_same_end_prefers_annual() {
        let facts = FactSet::from_facts([
            duration("Revenues", 110.0, date(2024, 10, 1), date(2024, 12, 31)),
            duration("Revenues", 400.0, date(2024, 1, 1), date(2024, 12, 31)),
        ]);
        let picked =
            select_headline(&facts, &aliases(&["Revenues"]), MetricKind::Duration).unwrap();
        assert_eq!(picked.period_type, PeriodType::Annual);
    }

    #[test]
    fn test_unknown_period_fallback() {
        let facts = FactSet::from_facts([
            duration("Revenues", 300.0, date(2024, 1, 1), date(2024, 9, 30)),
            duration("Revenues", 150.0, date(2024, 1, 1), date(2024, 6, 30)),
        ]);
        let picked =
            select_headline(&facts, &aliases(&["Revenues"]), MetricKind::Duration).unwrap();
        assert_eq!(picked.value, 300.0);
        assert_eq!(picked.period_type, PeriodType::Unknown);
    }

    #[test]
    fn test_across_aliases_latest_wins() {
        let facts = FactSet::from_facts([
            duration("Revenues", 400.0, date(2023, 1, 1), date(2023, 12, 31)),
            duration("SalesRevenueNet", 420.0, date(2024, 1, 1), date(2024, 12, 31)),
        ]);
        let picked = select_headline(
            &facts,
            &aliases(&["Revenues", "SalesRevenueNet"]),
            MetricKind::Duration,
        )
        .unwrap();
        assert_eq!(picked.source_concept, "SalesRevenueNet");
    }

    #[test]
    fn test_newer_unknown_alias_beats_older_annual_alias() {
        let facts = FactSet::from_facts([
            duration("Revenues", 600.0, date(2025, 1, 1), date(2025, 6, 30)),
            duration("SalesRevenueNet", 1_000.0, date(2024, 1, 1), date(2024, 12, 31)),
        ]);
        let picked = select_headline(
            &facts,
            &aliases(&["Revenues", "SalesRevenueNet"]),
            MetricKind::Duration,
        )
        .unwrap();
        assert_eq!(picked.source_concept, "Revenues");
        assert_eq!(picked.value, 600.0);
        assert_eq!(picked.period_type, PeriodType::Unknown);
    }

    #[test]
    fn test_equal_end_keeps_earlier_alias() {
        let facts = FactSet::from_facts([
            duration("Revenues", 110.0, date(2024, 10, 1), date(2024, 12, 31)),
            duration("SalesRevenueNet", 400.0, date(2024, 1, 1), date(2024, 12, 31)),
        ]);
        let picked = select_headline(
            &facts,
            &aliases(&["Revenues", "SalesRevenueNet"]),
            MetricKind::Duration,
        )
        .unwrap();
        assert_eq!(picked.source_concept, "Revenues");
        assert_eq!(picked.period_type, PeriodType::Quarterly);
    }

    #[test]
    fn test_point_in_time_headline() {
        let facts = FactSet::from_facts([
            Fact::new("Assets", Unit::Usd, 1_000.0, date(2024, 9, 30)),
            Fact::new("Assets", Unit::Usd, 1_100.0, date(2024, 12, 31)),
        ]);
        let picked =
            select_headline(&facts, &aliases(&["Assets"]), MetricKind::PointInTime).unwrap();
        assert_eq!(picked.value, 1_100.0);
        assert_eq!(picked.period_type, PeriodType::PointInTime);
    }

    #[test]
    fn test_key_financials_missing() {
        let facts = FactSet::from_facts([Fact::new("Cash", Unit::Usd, 5.0, date(2024, 12, 31))]);
        let config = filings_core::MetricsConfig::default();
        let key = key_financials(&facts, &config.headline_metrics);

        assert_eq!(key.value("cash"), Some(5.0));
        assert!(key.missing.contains("revenue"));
        assert!(key.missing.contains("total_assets"));
        assert!(key.get("revenue").is_none());
    }
}
