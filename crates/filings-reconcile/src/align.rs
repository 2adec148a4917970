//! Point-in-time alignment of balance-sheet metrics onto a period axis.

use chrono::NaiveDate;
use filings_core::{Fact, FactSet};
use tracing::debug;

/// Balance-sheet facts matched to each target date.
#[derive(Clone, Debug, PartialEq)]
pub struct Alignment<'a> {
    /// Alias the facts were taken from.
    pub concept: &'a str,
    /// Matched fact per target date, `None` when nothing lies within tolerance.
    pub matches: Vec<Option<&'a Fact>>,
}

impl<'a> Alignment<'a> {
    /// Matched values per target date.
    #[must_use]
    pub fn values(&self) -> Vec<Option<f64>> {
        self.matches.iter().map(|m| m.map(|f| f.value)).collect()
    }

    /// Most recent matched fact, used for provenance.
    #[must_use]
    pub fn latest_match(&self) -> Option<&'a Fact> {
        self.matches.iter().rev().flatten().next().copied()
    }
}

/// Finds the fact nearest to `target`, accepting it only within tolerance.
///
/// Equidistant facts are resolved in favour of the latest filing.
fn nearest<'a>(
    candidates: &[&'a Fact],
    target: NaiveDate,
    tolerance_days: i64,
) -> Option<&'a Fact> {
    let mut best: Option<(i64, &'a Fact)> = None;
    for &fact in candidates {
        let diff = (fact.period_end - target).num_days().abs();
        let better = match best {
            None => true,
            Some((best_diff, current)) => {
                diff < best_diff || (diff == best_diff && fact.filed > current.filed)
            }
        };
        if better {
            best = Some((diff, fact));
        }
    }

    best.filter(|(diff, _)| *diff <= tolerance_days)
        .map(|(_, fact)| fact)
}

/// Matches point-in-time facts to target dates.
///
/// The alias with the most point-in-time facts is used, the first alias
/// winning on equal counts, even when a sparser alias holds more recent data
/// (worth revisiting). Returns `None` if no alias has any point-in-time fact.
#[must_use]
pub fn align_facts<'a>(
    facts: &'a FactSet,
    aliases: &'a [String],
    targets: &[NaiveDate],
    tolerance_days: i64,
) -> Option<Alignment<'a>> {
    let mut best: Option<(&str, Vec<&Fact>)> = None;
    for alias in aliases {
        let instants: Vec<&Fact> = facts
            .facts(alias)
            .iter()
            .filter(|f| f.is_instant())
            .collect();
        let denser = match &best {
            None => !instants.is_empty(),
            Some((_, current)) => instants.len() > current.len(),
        };
        if denser {
            best = Some((alias.as_str(), instants));
        }
    }

    let (concept, instants) = best?;
    debug!(concept, observations = instants.len(), "Selected point-in-time source");

    let matches = targets
        .iter()
        .map(|target| nearest(&instants, *target, tolerance_days))
        .collect();

    Some(Alignment { concept, matches })
}

/// Aligns a balance-sheet metric onto `targets`.
///
/// Each slot holds the value of the nearest fact within `tolerance_days`, or
/// `None`. The result always has one slot per target.
#[must_use]
pub fn align(
    facts: &FactSet,
    aliases: &[String],
    targets: &[NaiveDate],
    tolerance_days: i64,
) -> Vec<Option<f64>> {
    align_facts(facts, aliases, targets, tolerance_days)
        .map_or_else(|| vec![None; targets.len()], |alignment| alignment.values())
}
