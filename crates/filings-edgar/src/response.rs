//! SEC API response types and their conversion into core types.

use chrono::NaiveDate;
use filings_core::{Cik, CompanyProfile, FilingRef, SourceForm, Symbol};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

/// Number of recent filings kept on a company profile.
pub(crate) const MAX_RECENT_FILINGS: usize = 5;

/// Company ticker information from SEC JSON.
#[derive(Debug, Deserialize)]
pub(crate) struct CompanyTickerInfo {
    /// CIK as a number (SEC returns this as an integer)
    cik_str: u64,
    ticker: String,
    title: String,
}

/// One entry of the ticker reference database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TickerEntry {
    pub(crate) cik: Cik,
    pub(crate) title: String,
}

/// Ticker to CIK reference database with its fetch time.
#[derive(Debug)]
pub(crate) struct TickerDirectory {
    fetched_at: Instant,
    entries: HashMap<String, TickerEntry>,
}

/// SEC writes share classes with a dash (`BRK-B`), users often with a dot.
fn normalize_ticker(ticker: &str) -> String {
    ticker.trim().to_uppercase().replace('.', "-")
}

impl TickerDirectory {
    pub(crate) fn from_response(data: HashMap<String, CompanyTickerInfo>) -> Self {
        let entries = data
            .into_values()
            .map(|info| {
                (
                    normalize_ticker(&info.ticker),
                    TickerEntry {
                        cik: Cik::new(info.cik_str),
                        title: info.title,
                    },
                )
            })
            .collect();
        Self {
            fetched_at: Instant::now(),
            entries,
        }
    }

    pub(crate) fn get(&self, symbol: &Symbol) -> Option<&TickerEntry> {
        self.entries.get(&normalize_ticker(symbol.as_str()))
    }

    pub(crate) fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Company submissions/filings metadata.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CompanySubmissions {
    #[serde(default)]
    name: String,
    #[serde(default)]
    sic_description: Option<String>,
    #[serde(default)]
    fiscal_year_end: Option<String>,
    #[serde(default)]
    exchanges: Vec<Option<String>>,
    #[serde(default)]
    filings: Option<SubmissionFilings>,
}

#[derive(Debug, Default, Deserialize)]
struct SubmissionFilings {
    #[serde(default)]
    recent: RecentFilings,
}

/// Column-oriented list of recent filings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecentFilings {
    #[serde(default)]
    accession_number: Vec<String>,
    #[serde(default)]
    filing_date: Vec<String>,
    #[serde(default)]
    report_date: Vec<String>,
    #[serde(default)]
    form: Vec<String>,
    #[serde(default)]
    primary_document: Vec<String>,
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

impl RecentFilings {
    /// Annual and quarterly reports, newest first, at most `limit`.
    fn periodic_reports(&self, limit: usize) -> Vec<FilingRef> {
        let mut filings: Vec<FilingRef> = self
            .form
            .iter()
            .enumerate()
            .filter_map(|(i, form)| {
                let form = SourceForm::parse(Some(form));
                if !matches!(form, SourceForm::TenK | SourceForm::TenQ) {
                    return None;
                }
                Some(FilingRef {
                    form,
                    filing_date: self.filing_date.get(i).and_then(|d| parse_date(d))?,
                    accession_number: self.accession_number.get(i)?.clone(),
                    report_date: self.report_date.get(i).and_then(|d| parse_date(d)),
                    primary_document: self
                        .primary_document
                        .get(i)
                        .filter(|d| !d.is_empty())
                        .cloned(),
                })
            })
            .collect();

        filings.sort_by(|a, b| b.filing_date.cmp(&a.filing_date));
        filings.truncate(limit);
        filings
    }
}

impl CompanySubmissions {
    pub(crate) fn into_profile(self, cik: Cik) -> CompanyProfile {
        let recent_filings = self
            .filings
            .map(|f| f.recent.periodic_reports(MAX_RECENT_FILINGS))
            .unwrap_or_default();

        CompanyProfile {
            cik,
            name: self.name,
            sic_description: self.sic_description.filter(|s| !s.is_empty()),
            fiscal_year_end: self.fiscal_year_end.filter(|s| !s.is_empty()),
            exchanges: self.exchanges.into_iter().flatten().collect(),
            recent_filings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_directory_lookup() {
        let data: HashMap<String, CompanyTickerInfo> = serde_json::from_str(
            r#"{
                "0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."},
                "1": {"cik_str": 1067983, "ticker": "BRK-B", "title": "BERKSHIRE HATHAWAY INC"}
            }"#,
        )
        .unwrap();
        let directory = TickerDirectory::from_response(data);

        assert_eq!(directory.len(), 2);
        assert_eq!(
            directory.get(&Symbol::new("aapl")).unwrap().cik,
            Cik::new(320193)
        );
        assert_eq!(
            directory.get(&Symbol::new("BRK.B")).unwrap().title,
            "BERKSHIRE HATHAWAY INC"
        );
        assert!(directory.get(&Symbol::new("ZZZZ")).is_none());
        assert!(directory.is_fresh(Duration::from_secs(60)));
        assert!(!directory.is_fresh(Duration::ZERO));
    }

    #[test]
    fn test_submissions_into_profile() {
        let submissions: CompanySubmissions = serde_json::from_str(
            r#"{
                "cik": "320193",
                "name": "Apple Inc.",
                "sicDescription": "Electronic Computers",
                "fiscalYearEnd": "0928",
                "exchanges": ["Nasdaq", null],
                "filings": {"recent": {
                    "accessionNumber": ["a1", "a2", "a3", "a4", "a5", "a6", "a7", "a8"],
                    "filingDate": ["2024-11-01", "2024-10-31", "2024-08-02", "2024-05-03", "2024-02-02", "2023-11-03", "2023-08-04", "bad"],
                    "reportDate": ["2024-09-28", "", "2024-06-29", "2024-03-30", "2023-12-30", "2023-09-30", "2023-07-01", "2023-04-01"],
                    "form": ["10-K", "8-K", "10-Q", "10-Q", "10-Q", "10-K", "10-Q", "10-Q"],
                    "primaryDocument": ["aapl-20240928.htm", "", "q3.htm", "q2.htm", "q1.htm", "k.htm", "old.htm", "bad.htm"]
                }}
            }"#,
        )
        .unwrap();

        let profile = submissions.into_profile(Cik::new(320193));
        assert_eq!(profile.name, "Apple Inc.");
        assert_eq!(profile.sic_description.as_deref(), Some("Electronic Computers"));
        assert_eq!(profile.exchanges, vec!["Nasdaq".to_string()]);

        let filings = &profile.recent_filings;
        assert_eq!(filings.len(), MAX_RECENT_FILINGS);
        assert_eq!(filings[0].form, SourceForm::TenK);
        assert_eq!(filings[0].accession_number, "a1");
        assert_eq!(filings[0].report_date, NaiveDate::from_ymd_opt(2024, 9, 28));
        assert!(filings.iter().all(|f| f.accession_number != "a2"));
        assert!(
            filings
                .windows(2)
                .all(|w| w[0].filing_date >= w[1].filing_date)
        );
        assert_eq!(filings[4].accession_number, "a6");
        assert!(filings.iter().all(|f| f.accession_number != "a7"));
    }

    #[test]
    fn test_submissions_without_filings() {
        let submissions: CompanySubmissions =
            serde_json::from_str(r#"{"name": "Shell Co"}"#).unwrap();
        let profile = submissions.into_profile(Cik::new(1));
        assert!(profile.recent_filings.is_empty());
        assert!(profile.exchanges.is_empty());
    }
}
