//! Quarterly series assembly for duration metrics.

use filings_core::{
    Fact, FactSet, MetricKind, PeriodClass, PeriodType, QuarterlySeries, ResolvedMetric,
    Unavailable,
};
use tracing::debug;

use crate::{classify::classify_fact, resolve::resolve};

/// Single-quarter facts of one concept, newest first.
///
/// Every 60-120 day fact counts, including the same quarter re-reported as a
/// comparative in a later filing. Equal end dates order by filing date.
fn quarterly_facts(facts: &[Fact]) -> Vec<&Fact> {
    let mut quarters: Vec<&Fact> = facts
        .iter()
        .filter(|f| f.period_start.is_some() && classify_fact(f) == PeriodClass::Quarterly)
        .collect();
    quarters.sort_by(|a, b| (b.period_end, b.filed).cmp(&(a.period_end, a.filed)));
    quarters
}

/// Builds the N most recent quarterly values of a duration metric.
///
/// An alias qualifies only with at least `quarter_count` quarterly facts.
/// Among qualifying aliases, the one whose newest quarter ends latest is the
/// source; the first alias wins when newest quarters end on the same date.
/// The result is ordered oldest to newest.
///
/// Fails with [`Unavailable::NotFound`] if no alias has any qualifying
/// duration fact, or [`Unavailable::InsufficientHistory`] if facts exist but
/// no alias has enough quarters.
pub fn build_series(
    facts: &FactSet,
    aliases: &[String],
    quarter_count: usize,
    metric: &str,
) -> Result<QuarterlySeries, Unavailable> {
    let mut best: Option<(&str, Vec<&Fact>)> = None;
    let mut most_available = 0;

    for alias in aliases {
        let quarters = quarterly_facts(facts.facts(alias));
        most_available = most_available.max(quarters.len());
        if quarters.is_empty() || quarters.len() < quarter_count {
            continue;
        }

        let newest = quarters.first().map(|f| f.period_end);
        let is_newer = match &best {
            None => true,
            Some((_, current)) => newest > current.first().map(|f| f.period_end),
        };
        if is_newer {
            best = Some((alias.as_str(), quarters));
        }
    }

    let Some((alias, quarters)) = best else {
        if resolve(facts, aliases, MetricKind::Duration).is_none() {
            debug!(metric, "No qualifying facts under any alias");
            return Err(Unavailable::NotFound);
        }
        debug!(
            metric,
            required = quarter_count,
            available = most_available,
            "Insufficient quarterly history"
        );
        return Err(Unavailable::InsufficientHistory {
            required: quarter_count,
            available: most_available,
        });
    };

    debug!(metric, alias, available = quarters.len(), "Selected quarterly source");

    let values: Vec<ResolvedMetric> = quarters
        .into_iter()
        .take(quarter_count)
        .rev()
        .map(|fact| ResolvedMetric::from_fact(fact, PeriodType::Quarterly))
        .collect();
    let periods = values.iter().map(|v| v.end_date).collect();

    Ok(QuarterlySeries {
        metric: metric.to_string(),
        periods,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use filings_core::{SourceForm, Unit};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Quarter ends for calendar quarters, oldest first.
    fn quarter_ends(first_year: i32, count: usize) -> Vec<NaiveDate> {
        let ends = [(3, 31), (6, 30), (9, 30), (12, 31)];
        (0..count)
            .map(|i| {
                let (m, d) = ends[i % 4];
                date(first_year + (i / 4) as i32, m, d)
            })
            .collect()
    }

    fn quarter(concept: &str, value: f64, end: NaiveDate) -> Fact {
        Fact::new(concept, Unit::Usd, value, end)
            .with_start(end - Duration::days(90))
            .with_form(SourceForm::TenQ)
            .with_filed(end + Duration::days(40))
    }

    fn aliases(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    #[test]
    fn test_exactly_n_quarters_oldest_first() {
        let ends = quarter_ends(2023, 8);
        let facts = FactSet::from_facts(
            ends.iter()
                .enumerate()
                .map(|(i, end)| quarter("Revenues", 100.0 + i as f64, *end)),
        );

        let series = build_series(&facts, &aliases(&["Revenues"]), 8, "revenue").unwrap();
        assert_eq!(series.len(), 8);
        assert_eq!(series.periods, ends);
        assert_eq!(series.amounts()[0], 100.0);
        assert_eq!(series.latest().unwrap().value, 107.0);
        assert!(series.values.iter().all(|v| v.period_type == PeriodType::Quarterly));
    }

    #[test]
    fn test_takes_most_recent_n() {
        let ends = quarter_ends(2022, 12);
        let facts = FactSet::from_facts(
            ends.iter()
                .enumerate()
                .map(|(i, end)| quarter("Revenues", i as f64, *end)),
        );

        let series = build_series(&facts, &aliases(&["Revenues"]), 3, "revenue").unwrap();
        assert_eq!(series.periods, ends[9..].to_vec());
        assert_eq!(series.amounts(), vec![9.0, 10.0, 11.0]);
    }

    #[test]
    fn test_cumulative_and_annual_facts_excluded() {
        let ends = quarter_ends(2024, 3);
        let mut facts =
            FactSet::from_facts(ends.iter().map(|end| quarter("Revenues", 10.0, *end)));
        // Nine-month year-to-date and full-year figures
        facts.insert(
            Fact::new("Revenues", Unit::Usd, 30.0, date(2024, 9, 30)).with_start(date(2024, 1, 1)),
        );
        facts.insert(
            Fact::new("Revenues", Unit::Usd, 45.0, date(2024, 12, 31)).with_start(date(2024, 1, 1)),
        );

        let series = build_series(&facts, &aliases(&["Revenues"]), 3, "revenue").unwrap();
        assert_eq!(series.amounts(), vec![10.0, 10.0, 10.0]);
        assert_eq!(series.latest().unwrap().end_date, date(2024, 9, 30));
    }

    #[test]
    fn test_latest_qualifying_alias_wins() {
        let mut facts = FactSet::new();
        for end in quarter_ends(2024, 3) {
            facts.insert(quarter("Revenues", 1.0, end));
        }
        for end in quarter_ends(2024, 4).into_iter().skip(1) {
            facts.insert(quarter("SalesRevenueNet", 2.0, end));
        }

        let series = build_series(
            &facts,
            &aliases(&["Revenues", "SalesRevenueNet"]),
            3,
            "revenue",
        )
        .unwrap();
        assert_eq!(series.latest().unwrap().source_concept, "SalesRevenueNet");
        assert_eq!(series.latest().unwrap().end_date, date(2024, 12, 31));
    }

    #[test]
    fn test_sparse_recent_alias_does_not_qualify() {
        let mut facts = FactSet::new();
        for end in quarter_ends(2024, 3) {
            facts.insert(quarter("Revenues", 1.0, end));
        }
        facts.insert(quarter("SalesRevenueNet", 2.0, date(2025, 3, 31)));

        let series = build_series(
            &facts,
            &aliases(&["SalesRevenueNet", "Revenues"]),
            3,
            "revenue",
        )
        .unwrap();
        assert_eq!(series.latest().unwrap().source_concept, "Revenues");
    }

    #[test]
    fn test_re_reported_quarter_counts_toward_n() {
        let mut facts = FactSet::from_facts([
            quarter("Revenues", 10.0, date(2024, 6, 30)),
            quarter("Revenues", 11.0, date(2024, 9, 30)),
        ]);
        // Same quarter again as a comparative in a later filing
        facts.insert(quarter("Revenues", 12.0, date(2024, 9, 30)).with_filed(date(2025, 11, 1)));

        let series = build_series(&facts, &aliases(&["Revenues"]), 3, "revenue").unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(
            series.periods,
            vec![date(2024, 6, 30), date(2024, 9, 30), date(2024, 9, 30)]
        );
        assert_eq!(series.amounts(), vec![10.0, 11.0, 12.0]);
        assert_eq!(series.latest().unwrap().filed_date, Some(date(2025, 11, 1)));

        let err = build_series(&facts, &aliases(&["Revenues"]), 4, "revenue").unwrap_err();
        assert_eq!(
            err,
            Unavailable::InsufficientHistory {
                required: 4,
                available: 3
            }
        );
    }

    #[test]
    fn test_insufficient_history_vs_not_found() {
        let facts = FactSet::from_facts(
            quarter_ends(2024, 2)
                .into_iter()
                .map(|end| quarter("Revenues", 1.0, end)),
        );
        assert_eq!(
            build_series(&facts, &aliases(&["Revenues"]), 8, "revenue").unwrap_err(),
            Unavailable::InsufficientHistory {
                required: 8,
                available: 2
            }
        );
        assert_eq!(
            build_series(&facts, &aliases(&["GrossProfit"]), 8, "gross_profit").unwrap_err(),
            Unavailable::NotFound
        );
    }

    #[test]
    fn test_annual_only_is_insufficient_history() {
        let annual = Fact::new("Revenues", Unit::Usd, 400.0, date(2024, 12, 31))
            .with_start(date(2024, 1, 1))
            .with_form(SourceForm::TenK);
        let facts = FactSet::from_facts([annual]);
        let err = build_series(&facts, &aliases(&["Revenues"]), 3, "revenue").unwrap_err();
        assert_eq!(
            err,
            Unavailable::InsufficientHistory {
                required: 3,
                available: 0
            }
        );
    }
}
