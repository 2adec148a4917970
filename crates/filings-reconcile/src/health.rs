//! Financial health assessment from headline figures.

use chrono::NaiveDate;
use filings_core::KeyFinancials;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cash relative to debt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashPosition {
    /// Cash more than twice debt.
    Strong,
    /// Cash more than debt.
    Adequate,
    /// Cash at least half of debt.
    Moderate,
    /// Debt more than twice cash.
    Concerning,
    /// Cash and no debt.
    ExcellentNoDebt,
    /// Debt and no cash.
    ConcerningNoCash,
    /// Neither cash nor debt reported.
    Unknown,
}

impl fmt::Display for CashPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Strong => "Strong",
            Self::Adequate => "Adequate",
            Self::Moderate => "Moderate",
            Self::Concerning => "Concerning",
            Self::ExcellentNoDebt => "Excellent (No Debt)",
            Self::ConcerningNoCash => "Concerning (No Cash, Has Debt)",
            Self::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

/// Summary of a company's financial health.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HealthAssessment {
    /// Latest revenue is positive.
    pub revenue_generating: bool,
    /// Latest net income is positive.
    pub profitable: bool,
    /// Debt exceeds twice the cash balance.
    pub debt_concerns: bool,
    /// Cash relative to debt.
    pub cash_position: CashPosition,
    /// Latest cash balance, zero if not reported.
    pub cash: f64,
    /// Debt used for the comparison.
    pub effective_debt: f64,
    /// Headline metric the debt figure came from.
    pub debt_source: Option<String>,
    /// Cash divided by debt, when both are positive.
    pub cash_to_debt: Option<f64>,
    /// Date of the cash balance, else of net income.
    pub as_of: Option<NaiveDate>,
}

impl HealthAssessment {
    /// One-line summary.
    #[must_use]
    pub fn summary(&self) -> String {
        let revenue = if self.revenue_generating {
            "generating revenue"
        } else {
            "not generating significant revenue"
        };
        let profit = if self.profitable {
            "profitable"
        } else {
            "unprofitable"
        };
        let as_of = self
            .as_of
            .map_or_else(|| "Unknown".to_string(), |d| d.to_string());
        format!(
            "Company is {revenue} and {profit}. Cash position: {}. Data as of: {as_of}",
            self.cash_position.to_string().to_lowercase()
        )
    }
}

/// Assesses cash position, profitability and debt load.
///
/// Uses the `revenue`, `net_income`, `cash`, `debt` and `total_debt` headline
/// metrics. A positive specific `debt` figure takes precedence over
/// `total_debt`.
#[must_use]
pub fn assess_health(key: &KeyFinancials) -> HealthAssessment {
    let positive = |name: &str| key.value(name).is_some_and(|v| v > 0.0);

    let cash = key.value("cash").unwrap_or(0.0);
    let debt = key.value("debt").unwrap_or(0.0);
    let total_debt = key.value("total_debt").unwrap_or(0.0);

    let (effective_debt, debt_source) = if debt > 0.0 {
        (debt, Some("debt"))
    } else if key.get("total_debt").is_some() {
        (total_debt, Some("total_debt"))
    } else {
        (debt, key.get("debt").map(|_| "debt"))
    };

    let mut debt_concerns = false;
    let mut cash_to_debt = None;
    let cash_position = if cash > 0.0 && effective_debt > 0.0 {
        let ratio = cash / effective_debt;
        cash_to_debt = Some(ratio);
        if ratio > 2.0 {
            CashPosition::Strong
        } else if ratio > 1.0 {
            CashPosition::Adequate
        } else if effective_debt > cash * 2.0 {
            debt_concerns = true;
            CashPosition::Concerning
        } else {
            CashPosition::Moderate
        }
    } else if cash > 0.0 && effective_debt == 0.0 {
        CashPosition::ExcellentNoDebt
    } else if cash == 0.0 && effective_debt > 0.0 {
        CashPosition::ConcerningNoCash
    } else {
        CashPosition::Unknown
    };

    let as_of = key
        .get("cash")
        .or_else(|| key.get("net_income"))
        .map(|m| m.end_date);

    HealthAssessment {
        revenue_generating: positive("revenue"),
        profitable: positive("net_income"),
        debt_concerns,
        cash_position,
        cash,
        effective_debt,
        debt_source: debt_source.map(str::to_string),
        cash_to_debt,
        as_of,
    }
}
