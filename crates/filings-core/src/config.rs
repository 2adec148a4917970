//! Metric configuration.
//!
//! Canonical metric names and their XBRL alias lists are data, not code.
//! [`MetricsConfig::default`] carries the standard us-gaap alias lists; a
//! custom configuration can be loaded from JSON.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::{
    error::{FilingsError, Result},
    period::MetricKind,
};

/// One canonical metric and the XBRL concepts considered equivalent to it.
///
/// Alias order carries no preference: every alias is searched and the most
/// recent qualifying data wins.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricDefinition {
    /// Canonical metric name (e.g. `revenue`).
    pub name: String,
    /// Duration or point-in-time semantics.
    #[serde(default)]
    pub kind: MetricKind,
    /// Concept names without taxonomy prefix.
    pub aliases: Vec<String>,
}

impl MetricDefinition {
    /// Creates a duration metric.
    pub fn duration(name: impl Into<String>, aliases: &[&str]) -> Self {
        Self::new(name, MetricKind::Duration, aliases)
    }

    /// Creates a point-in-time metric.
    pub fn point_in_time(name: impl Into<String>, aliases: &[&str]) -> Self {
        Self::new(name, MetricKind::PointInTime, aliases)
    }

    fn new(name: impl Into<String>, kind: MetricKind, aliases: &[&str]) -> Self {
        Self {
            name: name.into(),
            kind,
            aliases: aliases.iter().map(|a| (*a).to_string()).collect(),
        }
    }
}

const REVENUE_ALIASES: &[&str] = &[
    "Revenues",
    "RevenueFromContractWithCustomerExcludingAssessedTax",
    "SalesRevenueNet",
    "RevenueFromContractWithCustomerIncludingAssessedTax",
];

/// Configuration of one reconciliation pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Taxonomy to read concepts from.
    pub taxonomy: String,
    /// Number of quarters N in every series.
    pub quarter_count: usize,
    /// Maximum distance in days between a balance-sheet fact and a quarter end.
    pub tolerance_days: i64,
    /// Duration metric whose series establishes the shared period axis.
    pub primary_metric: String,
    /// Income/cash-flow metrics, in processing order.
    pub duration_metrics: Vec<MetricDefinition>,
    /// Balance-sheet metrics aligned onto the period axis.
    pub balance_sheet_metrics: Vec<MetricDefinition>,
    /// Single-point headline figures.
    pub headline_metrics: Vec<MetricDefinition>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            taxonomy: "us-gaap".to_string(),
            quarter_count: 8,
            tolerance_days: 5,
            primary_metric: "revenue".to_string(),
            duration_metrics: vec![
                MetricDefinition::duration("revenue", REVENUE_ALIASES),
                MetricDefinition::duration("gross_profit", &["GrossProfit"]),
                MetricDefinition::duration("operating_income", &["OperatingIncomeLoss"]),
                MetricDefinition::duration(
                    "net_income",
                    &[
                        "NetIncomeLoss",
                        "ProfitLoss",
                        "NetIncomeLossAvailableToCommonStockholdersBasic",
                    ],
                ),
                MetricDefinition::duration(
                    "operating_cash_flow",
                    &["NetCashProvidedByUsedInOperatingActivities"],
                ),
                MetricDefinition::duration(
                    "capex",
                    &[
                        "PaymentsToAcquirePropertyPlantAndEquipment",
                        "CapitalExpendituresIncurred",
                    ],
                ),
                MetricDefinition::duration(
                    "eps",
                    &["EarningsPerShareBasic", "EarningsPerShareDiluted"],
                ),
                MetricDefinition::duration(
                    "cost_of_revenue",
                    &["CostOfRevenue", "CostOfGoodsAndServicesSold"],
                ),
            ],
            balance_sheet_metrics: vec![
                MetricDefinition::point_in_time(
                    "cash",
                    &[
                        "CashAndCashEquivalentsAtCarryingValue",
                        "Cash",
                        "CashCashEquivalentsAndShortTermInvestments",
                    ],
                ),
                MetricDefinition::point_in_time(
                    "total_debt",
                    &[
                        "LongTermDebt",
                        "DebtCurrent",
                        "ShortTermBorrowings",
                        "LongTermDebtAndCapitalLeaseObligations",
                    ],
                ),
                MetricDefinition::point_in_time("current_assets", &["AssetsCurrent"]),
                MetricDefinition::point_in_time("current_liabilities", &["LiabilitiesCurrent"]),
                MetricDefinition::point_in_time("stockholders_equity", &["StockholdersEquity"]),
            ],
            headline_metrics: vec![
                MetricDefinition::duration("revenue", REVENUE_ALIASES),
                MetricDefinition::duration(
                    "net_income",
                    &[
                        "NetIncomeLoss",
                        "ProfitLoss",
                        "NetIncomeLossAvailableToCommonStockholdersBasic",
                        "NetIncomeLossAttributableToParent",
                    ],
                ),
                MetricDefinition::point_in_time(
                    "total_assets",
                    &["Assets", "AssetsCurrent", "AssetsNoncurrent"],
                ),
                MetricDefinition::point_in_time(
                    "total_liabilities",
                    &[
                        "Liabilities",
                        "LiabilitiesAndStockholdersEquity",
                        "LiabilitiesCurrent",
                    ],
                ),
                MetricDefinition::point_in_time(
                    "cash",
                    &[
                        "CashAndCashEquivalentsAtCarryingValue",
                        "Cash",
                        "CashCashEquivalentsAndShortTermInvestments",
                        "CashAndCashEquivalentsFairValueDisclosure",
                    ],
                ),
                MetricDefinition::point_in_time(
                    "debt",
                    &[
                        "LongTermDebt",
                        "LongTermDebtCurrent",
                        "LongTermDebtNoncurrent",
                        "LongTermDebtAndCapitalLeaseObligations",
                        "DebtCurrent",
                        "ShortTermBorrowings",
                    ],
                ),
                MetricDefinition::point_in_time(
                    "total_debt",
                    &[
                        "DebtAndCapitalLeaseObligations",
                        "DebtLongtermAndShorttermCombinedAmount",
                        "LongTermDebt",
                    ],
                ),
            ],
        }
    }
}

impl MetricsConfig {
    /// Parses and validates a configuration from JSON.
    ///
    /// Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| FilingsError::InvalidConfig(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            FilingsError::InvalidConfig(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Sets the number of quarters per series.
    #[must_use]
    pub const fn with_quarter_count(mut self, quarter_count: usize) -> Self {
        self.quarter_count = quarter_count;
        self
    }

    /// Sets the balance-sheet alignment tolerance.
    #[must_use]
    pub const fn with_tolerance_days(mut self, tolerance_days: i64) -> Self {
        self.tolerance_days = tolerance_days;
        self
    }

    /// Checks the configuration for internal consistency.
    pub fn validate(&self) -> Result<()> {
        if self.taxonomy.trim().is_empty() {
            return Err(FilingsError::InvalidConfig("taxonomy is empty".to_string()));
        }
        if self.quarter_count == 0 {
            return Err(FilingsError::InvalidConfig(
                "quarter_count must be at least 1".to_string(),
            ));
        }
        if self.tolerance_days < 0 {
            return Err(FilingsError::InvalidConfig(format!(
                "tolerance_days must not be negative, got {}",
                self.tolerance_days
            )));
        }

        let mut series_names = HashSet::new();
        for metric in self.duration_metrics.iter().chain(&self.balance_sheet_metrics) {
            if !series_names.insert(metric.name.as_str()) {
                return Err(FilingsError::InvalidConfig(format!(
                    "duplicate metric name: {}",
                    metric.name
                )));
            }
        }
        let mut headline_names = HashSet::new();
        for metric in &self.headline_metrics {
            if !headline_names.insert(metric.name.as_str()) {
                return Err(FilingsError::InvalidConfig(format!(
                    "duplicate headline metric name: {}",
                    metric.name
                )));
            }
        }

        let all = self
            .duration_metrics
            .iter()
            .chain(&self.balance_sheet_metrics)
            .chain(&self.headline_metrics);
        for metric in all {
            if metric.name.trim().is_empty() {
                return Err(FilingsError::InvalidConfig("metric name is empty".to_string()));
            }
            if metric.aliases.is_empty() {
                return Err(FilingsError::InvalidConfig(format!(
                    "metric {} has no aliases",
                    metric.name
                )));
            }
        }

        if let Some(metric) = self
            .duration_metrics
            .iter()
            .find(|m| m.kind != MetricKind::Duration)
        {
            return Err(FilingsError::InvalidConfig(format!(
                "{} is listed as a duration metric but declared point_in_time",
                metric.name
            )));
        }
        if let Some(metric) = self
            .balance_sheet_metrics
            .iter()
            .find(|m| m.kind != MetricKind::PointInTime)
        {
            return Err(FilingsError::InvalidConfig(format!(
                "{} is listed as a balance-sheet metric but declared duration",
                metric.name
            )));
        }

        if !self
            .duration_metrics
            .iter()
            .any(|m| m.name == self.primary_metric)
        {
            return Err(FilingsError::InvalidConfig(format!(
                "primary metric {} is not a duration metric",
                self.primary_metric
            )));
        }

        Ok(())
    }

    /// Returns the primary metric definition, if configured.
    #[must_use]
    pub fn primary(&self) -> Option<&MetricDefinition> {
        self.duration_metrics
            .iter()
            .find(|m| m.name == self.primary_metric)
    }

    /// Looks up a duration or balance-sheet metric by name.
    #[must_use]
    pub fn metric(&self, name: &str) -> Option<&MetricDefinition> {
        self.duration_metrics
            .iter()
            .chain(&self.balance_sheet_metrics)
            .find(|m| m.name == name)
    }
}
