//! Core data types for XBRL facts and company reference data.
//!
//! This module defines the fundamental data structures:
//!
//! - [`Symbol`] - Trading symbol/ticker
//! - [`Cik`] - SEC Central Index Key
//! - [`Unit`] - Unit of measure of a fact
//! - [`SourceForm`] - Filing form a fact was reported on
//! - [`Fact`] - A single reported XBRL datum
//! - [`CompanyProfile`] / [`FilingRef`] - Company reference information

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A trading symbol/ticker.
///
/// Symbols are automatically uppercased on creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a new symbol from a string, converting to uppercase.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().trim().to_uppercase())
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Symbol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// SEC Central Index Key.
///
/// Stored as the numeric identifier; [`Cik::padded`] yields the zero-padded
/// 10-digit form used in EDGAR URLs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cik(u64);

impl Cik {
    /// Creates a CIK from its numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Returns the zero-padded 10-digit form (e.g. `0000320193`).
    #[must_use]
    pub fn padded(&self) -> String {
        format!("{:010}", self.0)
    }
}

impl fmt::Display for Cik {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.padded())
    }
}

impl FromStr for Cik {
    type Err = crate::error::FilingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches("CIK");
        digits
            .parse::<u64>()
            .map(Self)
            .map_err(|e| crate::error::FilingsError::InvalidParameter(format!("Invalid CIK {s}: {e}")))
    }
}

/// Unit of measure of a reported fact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    /// US dollars.
    #[serde(rename = "USD")]
    Usd,
    /// Share counts.
    #[serde(rename = "shares")]
    Shares,
    /// Per-share dollar amounts (EPS).
    #[serde(rename = "USD/shares")]
    UsdPerShare,
}

impl Unit {
    /// Unit keys in the order they are preferred when a concept reports several.
    pub const PREFERENCE: [Self; 3] = [Self::Usd, Self::Shares, Self::UsdPerShare];

    /// Parses an SEC unit key. Returns `None` for units the engine ignores.
    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "USD" => Some(Self::Usd),
            "shares" => Some(Self::Shares),
            "USD/shares" | "USD-per-shares" | "USD-per-share" => Some(Self::UsdPerShare),
            _ => None,
        }
    }

    /// Returns the canonical SEC unit key.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Shares => "shares",
            Self::UsdPerShare => "USD/shares",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filing form a fact was reported on.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SourceForm {
    /// Annual report.
    TenK,
    /// Quarterly report.
    TenQ,
    /// Any other form (8-K, 10-K/A, 20-F, ...), kept verbatim.
    Other(String),
    /// The form was not reported.
    #[default]
    Missing,
}

impl SourceForm {
    /// Parses a raw SEC form string.
    #[must_use]
    pub fn parse(form: Option<&str>) -> Self {
        match form.map(str::trim) {
            None | Some("") => Self::Missing,
            Some("10-K") => Self::TenK,
            Some("10-Q") => Self::TenQ,
            Some(other) => Self::Other(other.to_string()),
        }
    }

    /// Returns the form label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::TenK => "10-K",
            Self::TenQ => "10-Q",
            Self::Other(form) => form,
            Self::Missing => "",
        }
    }
}

impl From<String> for SourceForm {
    fn from(s: String) -> Self {
        Self::parse(Some(&s))
    }
}

impl From<SourceForm> for String {
    fn from(form: SourceForm) -> Self {
        form.as_str().to_string()
    }
}

impl fmt::Display for SourceForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single reported XBRL datum.
///
/// `period_start == None` signals point-in-time (balance-sheet) semantics;
/// otherwise the fact covers a duration. Facts are immutable once ingested.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    /// XBRL concept name without taxonomy prefix (e.g. `NetIncomeLoss`).
    pub concept: String,
    /// Unit of measure.
    pub unit: Unit,
    /// Reported value.
    pub value: f64,
    /// Start of the reporting period, absent for instants.
    pub period_start: Option<NaiveDate>,
    /// End of the reporting period (or the instant).
    pub period_end: NaiveDate,
    /// Date the filing containing this fact was filed.
    pub filed: Option<NaiveDate>,
    /// Form the fact was reported on.
    pub form: SourceForm,
    /// Fiscal year of the filing.
    pub fiscal_year: Option<i32>,
    /// Fiscal period of the filing (e.g. "Q1", "FY").
    pub fiscal_period: Option<String>,
    /// Accession number of the filing.
    pub accession: Option<String>,
}

impl Fact {
    /// Creates a point-in-time fact with required fields.
    #[must_use]
    pub fn new(concept: impl Into<String>, unit: Unit, value: f64, period_end: NaiveDate) -> Self {
        Self {
            concept: concept.into(),
            unit,
            value,
            period_start: None,
            period_end,
            filed: None,
            form: SourceForm::Missing,
            fiscal_year: None,
            fiscal_period: None,
            accession: None,
        }
    }

    /// Sets the period start, turning this into a duration fact.
    #[must_use]
    pub const fn with_start(mut self, start: NaiveDate) -> Self {
        self.period_start = Some(start);
        self
    }

    /// Sets the filing date.
    #[must_use]
    pub const fn with_filed(mut self, filed: NaiveDate) -> Self {
        self.filed = Some(filed);
        self
    }

    /// Sets the source form.
    #[must_use]
    pub fn with_form(mut self, form: SourceForm) -> Self {
        self.form = form;
        self
    }

    /// Returns true if this is an instant (balance-sheet) fact.
    #[must_use]
    pub const fn is_instant(&self) -> bool {
        self.period_start.is_none()
    }

    /// Returns the duration in days if this is a duration fact.
    #[must_use]
    pub fn duration_days(&self) -> Option<i64> {
        self.period_start
            .map(|start| self.period_end.signed_duration_since(start).num_days())
    }
}

/// Reference to one filing in a company's submission history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingRef {
    /// Filing form.
    pub form: SourceForm,
    /// Date the filing was accepted.
    pub filing_date: NaiveDate,
    /// Accession number (unique filing identifier).
    pub accession_number: String,
    /// Period the filing reports on.
    pub report_date: Option<NaiveDate>,
    /// Primary document file name.
    pub primary_document: Option<String>,
}

/// Company reference information.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    /// SEC CIK number.
    pub cik: Cik,
    /// Company name.
    pub name: String,
    /// SIC industry description.
    pub sic_description: Option<String>,
    /// Fiscal year end as `MMDD`.
    pub fiscal_year_end: Option<String>,
    /// Exchanges the company lists on.
    pub exchanges: Vec<String>,
    /// Most recent annual and quarterly filings, newest first.
    pub recent_filings: Vec<FilingRef>,
}

impl CompanyProfile {
    /// Creates a new profile with required fields.
    #[must_use]
    pub fn new(cik: Cik, name: impl Into<String>) -> Self {
        Self {
            cik,
            name: name.into(),
            sic_description: None,
            fiscal_year_end: None,
            exchanges: Vec::new(),
            recent_filings: Vec::new(),
        }
    }
}
