//! Concept resolution: latest-date-wins selection across all aliases.

use filings_core::{Fact, FactSet, MetricKind, PeriodType, ResolvedMetric};

use crate::classify::classify_fact;

/// Returns true if `candidate` is strictly more recent than `best`.
///
/// Recency is the period end date, then the filing date. A fact without a
/// filing date is older than one with.
pub(crate) fn is_more_recent(candidate: &Fact, best: &Fact) -> bool {
    (candidate.period_end, candidate.filed) > (best.period_end, best.filed)
}

/// Picks the most recent fact, keeping the earliest-seen fact on exact ties.
pub(crate) fn latest<'a>(facts: impl IntoIterator<Item = &'a Fact>) -> Option<&'a Fact> {
    facts.into_iter().fold(None, |best, fact| match best {
        Some(current) if !is_more_recent(fact, current) => Some(current),
        _ => Some(fact),
    })
}

/// Returns true if a fact may be selected for a metric of the given kind.
pub(crate) fn qualifies(fact: &Fact, kind: MetricKind) -> bool {
    match kind {
        MetricKind::Duration => {
            fact.period_start.is_some() && classify_fact(fact).is_selectable()
        }
        MetricKind::PointInTime => classify_fact(fact).is_selectable(),
    }
}

/// Resolves a canonical metric to its most recent qualifying fact.
///
/// Every alias is searched; the fact with the latest end date wins, ties
/// broken by the latest filing date. Alias order only matters when two
/// facts are identical in both dates. Returns `None` if no alias has a
/// qualifying fact.
#[must_use]
pub fn resolve(facts: &FactSet, aliases: &[String], kind: MetricKind) -> Option<ResolvedMetric> {
    let candidates = aliases
        .iter()
        .flat_map(|alias| facts.facts(alias))
        .filter(|fact| qualifies(fact, kind));

    latest(candidates)
        .map(|fact| ResolvedMetric::from_fact(fact, PeriodType::from(classify_fact(fact))))
}
