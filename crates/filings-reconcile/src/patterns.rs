//! Trend pattern detection over a reconciled result.

use filings_core::ReconciledResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Net-margin change, in percentage points, that counts as a trend.
const MARGIN_SHIFT_POINTS: f64 = 5.0;
/// Revenue-vs-cost growth gap, in percentage points, for operating leverage.
const LEVERAGE_GAP_POINTS: f64 = 5.0;
/// Runway below which cash burn is critical, in quarters.
const CRITICAL_RUNWAY_QUARTERS: f64 = 4.0;
/// Growth values needed to compare the first and last four quarters.
const GROWTH_WINDOW: usize = 4;
/// Quarters of free cash flow averaged for runway.
const BURN_WINDOW: usize = 4;

/// Kind of detected trend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// Net margin fell over the window.
    MarginCompression,
    /// Net margin rose over the window.
    MarginExpansion,
    /// Recent revenue growth well above earlier growth.
    AcceleratingGrowth,
    /// Recent revenue growth well below earlier growth.
    DeceleratingGrowth,
    /// Negative free cash flow with a short cash runway.
    CashBurn,
    /// Revenue growing faster than cost of revenue.
    OperatingLeverage,
}

/// How much attention a pattern deserves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Favourable trend.
    Positive,
    /// Worth watching.
    Warning,
    /// Materially unfavourable.
    High,
    /// Needs immediate attention.
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Positive => "positive",
            Self::Warning => "warning",
            Self::High => "high",
            Self::Critical => "critical",
        };
        f.write_str(label)
    }
}

/// A detected trend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrendPattern {
    /// Pattern kind.
    pub kind: PatternKind,
    /// Severity.
    pub severity: Severity,
    /// Human-readable description.
    pub description: String,
}

impl TrendPattern {
    fn new(kind: PatternKind, severity: Severity, description: String) -> Self {
        Self {
            kind,
            severity,
            description,
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn percent_change(first: f64, last: f64) -> Option<f64> {
    (first != 0.0).then(|| (last / first - 1.0) * 100.0)
}

fn margin_trend(result: &ReconciledResult) -> Option<TrendPattern> {
    let margins = result.derived("net_margin")?;
    if margins.len() < 2 {
        return None;
    }
    let (first, last) = (margins.first()?, margins.last()?);

    let change = last - first;
    let quarters = margins.len();
    if change < -MARGIN_SHIFT_POINTS {
        Some(TrendPattern::new(
            PatternKind::MarginCompression,
            Severity::High,
            format!("Net margin declined {change:.1} points over {quarters} quarters"),
        ))
    } else if change > MARGIN_SHIFT_POINTS {
        Some(TrendPattern::new(
            PatternKind::MarginExpansion,
            Severity::Positive,
            format!("Net margin expanded {change:.1} points over {quarters} quarters"),
        ))
    } else {
        None
    }
}

fn growth_trend(result: &ReconciledResult) -> Option<TrendPattern> {
    let growth = result.derived("revenue_growth")?;
    if growth.len() < 2 * GROWTH_WINDOW {
        return None;
    }

    let earlier = mean(&growth[..GROWTH_WINDOW]);
    let recent = mean(&growth[growth.len() - GROWTH_WINDOW..]);
    if earlier == 0.0 {
        return None;
    }

    if recent > earlier * 1.5 {
        Some(TrendPattern::new(
            PatternKind::AcceleratingGrowth,
            Severity::Positive,
            format!(
                "Revenue growth accelerating: {recent:.1}% (recent) vs {earlier:.1}% (earlier)"
            ),
        ))
    } else if recent < earlier * 0.5 && recent > 0.0 {
        Some(TrendPattern::new(
            PatternKind::DeceleratingGrowth,
            Severity::Warning,
            format!(
                "Revenue growth decelerating: {recent:.1}% (recent) vs {earlier:.1}% (earlier)"
            ),
        ))
    } else {
        None
    }
}

fn cash_burn(result: &ReconciledResult) -> Option<TrendPattern> {
    let fcf = result.derived("free_cash_flow")?;
    let latest_cash = result.metric("cash")?.last().copied().flatten().unwrap_or(0.0);

    // Divided by the full window even when fewer quarters exist.
    let window = &fcf[fcf.len().saturating_sub(BURN_WINDOW)..];
    let avg_fcf = window.iter().sum::<f64>() / BURN_WINDOW as f64;
    if avg_fcf >= 0.0 || latest_cash <= 0.0 {
        return None;
    }

    let runway = latest_cash / avg_fcf.abs();
    (runway < CRITICAL_RUNWAY_QUARTERS).then(|| {
        TrendPattern::new(
            PatternKind::CashBurn,
            Severity::Critical,
            format!("Cash runway critically low: ~{runway:.1} quarters remaining"),
        )
    })
}

fn operating_leverage(result: &ReconciledResult) -> Option<TrendPattern> {
    let revenue = result.metric_or_zero("revenue")?;
    let cost = result.metric_or_zero("cost_of_revenue")?;
    if revenue.len() < 2 || cost.len() < 2 {
        return None;
    }

    let revenue_growth = percent_change(revenue[0], revenue[revenue.len() - 1]).unwrap_or(0.0);
    let cost_growth = percent_change(cost[0], cost[cost.len() - 1])?;

    (revenue_growth > cost_growth + LEVERAGE_GAP_POINTS).then(|| {
        TrendPattern::new(
            PatternKind::OperatingLeverage,
            Severity::Positive,
            format!(
                "Positive operating leverage: revenue (+{revenue_growth:.1}%) outpacing costs (+{cost_growth:.1}%)"
            ),
        )
    })
}

/// Detects notable trends in a reconciled result.
///
/// Patterns whose inputs are absent are skipped.
#[must_use]
pub fn detect_patterns(result: &ReconciledResult) -> Vec<TrendPattern> {
    [
        margin_trend(result),
        growth_trend(result),
        cash_burn(result),
        operating_leverage(result),
    ]
    .into_iter()
    .flatten()
    .collect()
}
