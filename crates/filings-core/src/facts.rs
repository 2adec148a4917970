//! Raw SEC `companyfacts` documents and their typed form.
//!
//! [`CompanyFacts`] mirrors the JSON returned by the SEC
//! `api/xbrl/companyfacts` endpoint. [`FactSet`] is the typed, read-only
//! view the reconciler works on: facts grouped by concept, one unit per
//! concept, malformed observations dropped at the boundary.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::trace;

use crate::types::{Cik, Fact, SourceForm, Unit};

/// A company's full XBRL fact document as published by SEC.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CompanyFacts {
    /// Numeric CIK.
    #[serde(default)]
    pub cik: Option<u64>,
    /// Registrant name.
    #[serde(rename = "entityName", default)]
    pub entity_name: Option<String>,
    /// Facts keyed by taxonomy (e.g. `us-gaap`, `dei`), then by concept name.
    ///
    /// `None` when the document carries no facts at all.
    #[serde(default)]
    pub facts: Option<HashMap<String, HashMap<String, ConceptFacts>>>,
}

/// All reported values of one concept, keyed by unit.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ConceptFacts {
    /// Human-readable label.
    #[serde(default)]
    pub label: Option<String>,
    /// Concept description.
    #[serde(default)]
    pub description: Option<String>,
    /// Observations keyed by unit string (`USD`, `shares`, `USD/shares`, ...).
    #[serde(default)]
    pub units: HashMap<String, Vec<RawFact>>,
}

/// A single observation as it appears in the SEC JSON.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawFact {
    /// Reported value.
    #[serde(default)]
    pub val: Option<f64>,
    /// Period start (`YYYY-MM-DD`), absent for instants.
    #[serde(default)]
    pub start: Option<String>,
    /// Period end or instant (`YYYY-MM-DD`).
    #[serde(default)]
    pub end: Option<String>,
    /// Filing form.
    #[serde(default)]
    pub form: Option<String>,
    /// Filing date (`YYYY-MM-DD`).
    #[serde(default)]
    pub filed: Option<String>,
    /// Fiscal year.
    #[serde(default)]
    pub fy: Option<i32>,
    /// Fiscal period.
    #[serde(default)]
    pub fp: Option<String>,
    /// Accession number.
    #[serde(default)]
    pub accn: Option<String>,
    /// SEC frame identifier (e.g. `CY2024Q3I`).
    #[serde(default)]
    pub frame: Option<String>,
}

impl CompanyFacts {
    /// Parses a `companyfacts` JSON document.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            crate::error::FilingsError::Parse(format!("Failed to parse company facts: {}", e))
        })
    }

    /// Returns true if the document has no taxonomy with any concept.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facts
            .as_ref()
            .is_none_or(|taxonomies| taxonomies.values().all(HashMap::is_empty))
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Picks the unit key to read for a concept, in [`Unit::PREFERENCE`] order.
fn preferred_unit(units: &HashMap<String, Vec<RawFact>>) -> Option<(Unit, &[RawFact])> {
    Unit::PREFERENCE.iter().find_map(|wanted| {
        let mut keys: Vec<&String> = units
            .keys()
            .filter(|key| Unit::parse(key) == Some(*wanted))
            .collect();
        // Canonical spelling first when both are present.
        keys.sort_by_key(|key| key.as_str() != wanted.as_str());
        keys.first()
            .and_then(|key| units.get(*key))
            .map(|facts| (*wanted, facts.as_slice()))
    })
}

/// Typed facts of one company grouped by concept.
///
/// Every contained [`Fact`] has a value and a valid end date by construction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FactSet {
    cik: Option<Cik>,
    entity_name: Option<String>,
    concepts: HashMap<String, Vec<Fact>>,
}

impl FactSet {
    /// Creates an empty fact set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a fact set from already-typed facts.
    pub fn from_facts(facts: impl IntoIterator<Item = Fact>) -> Self {
        let mut set = Self::new();
        for fact in facts {
            set.insert(fact);
        }
        set
    }

    /// Converts a raw SEC document into typed facts for one taxonomy.
    ///
    /// A document with `facts == null` or without the taxonomy yields an
    /// empty set.
    pub fn from_company_facts(raw: &CompanyFacts, taxonomy: &str) -> Self {
        let mut set = Self {
            cik: raw.cik.map(Cik::new),
            entity_name: raw.entity_name.clone(),
            concepts: HashMap::new(),
        };

        let Some(concepts) = raw.facts.as_ref().and_then(|t| t.get(taxonomy)) else {
            trace!(taxonomy, "No facts for taxonomy");
            return set;
        };

        for (concept, concept_facts) in concepts {
            let Some((unit, observations)) = preferred_unit(&concept_facts.units) else {
                trace!(concept = %concept, "No supported unit");
                continue;
            };

            let mut dropped = 0usize;
            for raw_fact in observations {
                match Self::convert(concept, unit, raw_fact) {
                    Some(fact) => set.insert(fact),
                    None => dropped += 1,
                }
            }

            if dropped > 0 {
                trace!(concept = %concept, dropped, "Dropped malformed observations");
            }
        }

        set
    }

    fn convert(concept: &str, unit: Unit, raw: &RawFact) -> Option<Fact> {
        let value = raw.val.filter(|v| v.is_finite())?;
        let period_end = raw.end.as_deref().and_then(parse_date)?;
        let period_start = match raw.start.as_deref() {
            Some(start) => Some(parse_date(start)?),
            None => None,
        };

        Some(Fact {
            concept: concept.to_string(),
            unit,
            value,
            period_start,
            period_end,
            filed: raw.filed.as_deref().and_then(parse_date),
            form: SourceForm::parse(raw.form.as_deref()),
            fiscal_year: raw.fy,
            fiscal_period: raw.fp.clone(),
            accession: raw.accn.clone(),
        })
    }

    /// Adds a fact under its concept.
    pub fn insert(&mut self, fact: Fact) {
        self.concepts
            .entry(fact.concept.clone())
            .or_default()
            .push(fact);
    }

    /// Returns all facts reported under `concept` (empty if none).
    #[must_use]
    pub fn facts(&self, concept: &str) -> &[Fact] {
        self.concepts.get(concept).map_or(&[], Vec::as_slice)
    }

    /// Returns true if at least one fact exists for `concept`.
    #[must_use]
    pub fn contains(&self, concept: &str) -> bool {
        !self.facts(concept).is_empty()
    }

    /// Iterates over concept names.
    pub fn concepts(&self) -> impl Iterator<Item = &str> {
        self.concepts.keys().map(String::as_str)
    }

    /// CIK carried over from the raw document.
    #[must_use]
    pub const fn cik(&self) -> Option<Cik> {
        self.cik
    }

    /// Registrant name carried over from the raw document.
    #[must_use]
    pub fn entity_name(&self) -> Option<&str> {
        self.entity_name.as_deref()
    }

    /// Total number of facts across all concepts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.concepts.values().map(Vec::len).sum()
    }

    /// Returns true if the set holds no facts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "cik": 320193,
        "entityName": "Apple Inc.",
        "facts": {
            "us-gaap": {
                "Revenues": {
                    "label": "Revenues",
                    "units": {
                        "USD": [
                            {"val": 100.0, "start": "2024-04-01", "end": "2024-06-30", "form": "10-Q", "filed": "2024-08-01", "fy": 2024, "fp": "Q2", "accn": "0000320193-24-000081"},
                            {"val": null, "start": "2024-07-01", "end": "2024-09-30", "form": "10-Q", "filed": "2024-11-01"},
                            {"val": 50.0, "start": "2024-07-01", "end": "not-a-date", "form": "10-Q"}
                        ]
                    }
                },
                "EarningsPerShareBasic": {
                    "units": {
                        "USD-per-shares": [
                            {"val": 1.5, "start": "2024-04-01", "end": "2024-06-30", "form": "10-Q", "filed": "2024-08-01"}
                        ]
                    }
                },
                "CommonStockSharesOutstanding": {
                    "units": {
                        "shares": [{"val": 15000.0, "end": "2024-06-30", "form": "10-Q"}],
                        "pure": [{"val": 1.0, "end": "2024-06-30"}]
                    }
                },
                "SomeRatio": {
                    "units": {"pure": [{"val": 0.5, "end": "2024-06-30"}]}
                }
            }
        }
    }"#;

    #[test]
    fn test_from_company_facts_drops_malformed() {
        let raw = CompanyFacts::from_json(SAMPLE).unwrap();
        let set = FactSet::from_company_facts(&raw, "us-gaap");

        assert_eq!(set.entity_name(), Some("Apple Inc."));
        assert_eq!(set.cik(), Some(Cik::new(320193)));
        let revenue = set.facts("Revenues");
        assert_eq!(revenue.len(), 1);
        assert_eq!(revenue[0].value, 100.0);
        assert_eq!(revenue[0].form, SourceForm::TenQ);
        assert_eq!(revenue[0].fiscal_period.as_deref(), Some("Q2"));
        assert_eq!(
            revenue[0].filed,
            NaiveDate::from_ymd_opt(2024, 8, 1)
        );
    }

    #[test]
    fn test_unit_selection() {
        let raw = CompanyFacts::from_json(SAMPLE).unwrap();
        let set = FactSet::from_company_facts(&raw, "us-gaap");

        assert_eq!(set.facts("EarningsPerShareBasic")[0].unit, Unit::UsdPerShare);
        let shares = set.facts("CommonStockSharesOutstanding");
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].unit, Unit::Shares);
        assert!(shares[0].is_instant());
        assert!(!set.contains("SomeRatio"));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_missing_facts_yield_empty_set() {
        let raw = CompanyFacts::from_json(r#"{"cik": 1, "facts": null}"#).unwrap();
        assert!(raw.is_empty());
        assert!(FactSet::from_company_facts(&raw, "us-gaap").is_empty());

        let raw = CompanyFacts::from_json(SAMPLE).unwrap();
        assert!(FactSet::from_company_facts(&raw, "ifrs-full").is_empty());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = CompanyFacts::from_json("{not json").unwrap_err();
        assert!(matches!(err, crate::error::FilingsError::Parse(_)));
    }
}
