//! Duration-based period classification.

use chrono::NaiveDate;
use filings_core::{Fact, PeriodClass};

/// Shortest duration, in days, accepted as a single quarter.
pub const QUARTER_MIN_DAYS: i64 = 60;
/// Longest duration, in days, accepted as a single quarter.
pub const QUARTER_MAX_DAYS: i64 = 120;
/// Shortest duration, in days, accepted as a full year.
pub const ANNUAL_MIN_DAYS: i64 = 300;

/// Classifies a reporting period by its length.
///
/// Filing-form labels are ignored. A nine-month cumulative figure (about 270
/// days) is [`PeriodClass::Unclassified`], never quarterly.
#[must_use]
pub fn classify(start: Option<NaiveDate>, end: NaiveDate) -> PeriodClass {
    let Some(start) = start else {
        return PeriodClass::PointInTime;
    };

    let days = end.signed_duration_since(start).num_days();
    if (QUARTER_MIN_DAYS..=QUARTER_MAX_DAYS).contains(&days) {
        PeriodClass::Quarterly
    } else if days >= ANNUAL_MIN_DAYS {
        PeriodClass::Annual
    } else {
        PeriodClass::Unclassified
    }
}

/// Classifies a fact by its period.
#[must_use]
pub fn classify_fact(fact: &Fact) -> PeriodClass {
    classify(fact.period_start, fact.period_end)
}
