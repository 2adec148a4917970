//! Derived metrics computed element-wise from aligned series.
//!
//! Every function here is total: a zero denominator yields `0.0`, never NaN,
//! infinity, or an error. Inputs are expected to share one length; extra
//! trailing elements of a longer input are ignored.

use std::collections::BTreeMap;

use filings_core::ReconciledResult;

/// `num / den`, or zero when the denominator is zero.
fn safe_div(num: f64, den: f64) -> f64 {
    if den == 0.0 { 0.0 } else { num / den }
}

/// Quarter-over-quarter growth in percent. The first element is zero.
#[must_use]
pub fn growth(values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    if values.is_empty() {
        return out;
    }
    out.push(0.0);
    out.extend(
        values
            .windows(2)
            .map(|w| safe_div(w[1] - w[0], w[0]) * 100.0),
    );
    out
}

/// `numerator / denominator * 100`, zero where the denominator is zero.
#[must_use]
pub fn margin(numerator: &[f64], denominator: &[f64]) -> Vec<f64> {
    numerator
        .iter()
        .zip(denominator)
        .map(|(n, d)| safe_div(*n, *d) * 100.0)
        .collect()
}

/// `numerator / denominator`, zero where the denominator is zero.
#[must_use]
pub fn ratio(numerator: &[f64], denominator: &[f64]) -> Vec<f64> {
    numerator
        .iter()
        .zip(denominator)
        .map(|(n, d)| safe_div(*n, *d))
        .collect()
}

/// `a - b` element-wise.
#[must_use]
pub fn difference(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().zip(b).map(|(x, y)| x - y).collect()
}

/// Operating cash flow minus the absolute capital expenditure.
///
/// Capex is reported positive by some filers and negative by others.
#[must_use]
pub fn free_cash_flow(operating_cash_flow: &[f64], capex: &[f64]) -> Vec<f64> {
    operating_cash_flow
        .iter()
        .zip(capex)
        .map(|(ocf, capex)| ocf - capex.abs())
        .collect()
}

/// Computes every derived series whose inputs are present in `result`.
///
/// Absent balance-sheet quarters count as zero.
#[must_use]
pub fn compute_derived(result: &ReconciledResult) -> BTreeMap<String, Vec<f64>> {
    let get = |name: &str| result.metric_or_zero(name);
    let mut derived = BTreeMap::new();

    let revenue = get("revenue");
    if let Some(revenue) = &revenue {
        derived.insert("revenue_growth".to_string(), growth(revenue));

        for (input, output) in [
            ("gross_profit", "gross_margin"),
            ("operating_income", "operating_margin"),
            ("net_income", "net_margin"),
        ] {
            if let Some(values) = get(input) {
                derived.insert(output.to_string(), margin(&values, revenue));
            }
        }
    }

    if let (Some(ocf), Some(capex)) = (get("operating_cash_flow"), get("capex")) {
        let fcf = free_cash_flow(&ocf, &capex);
        if let Some(revenue) = &revenue {
            derived.insert("fcf_margin".to_string(), margin(&fcf, revenue));
        }
        derived.insert("free_cash_flow".to_string(), fcf);
    }

    if let (Some(cash), Some(debt)) = (get("cash"), get("total_debt")) {
        derived.insert("net_cash".to_string(), difference(&cash, &debt));
    }

    if let (Some(assets), Some(liabilities)) = (get("current_assets"), get("current_liabilities")) {
        derived.insert(
            "working_capital".to_string(),
            difference(&assets, &liabilities),
        );
        derived.insert("current_ratio".to_string(), ratio(&assets, &liabilities));
    }

    if let (Some(debt), Some(equity)) = (get("total_debt"), get("stockholders_equity")) {
        derived.insert("debt_to_equity".to_string(), ratio(&debt, &equity));
    }

    derived
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn assert_series_eq(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert_relative_eq!(*a, *e, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_hand_computed_growth_and_margin() {
        let revenue = [100.0, 110.0, 121.0];
        let net_income = [10.0, 11.0, 12.1];

        assert_series_eq(&growth(&revenue), &[0.0, 10.0, 10.0]);
        assert_series_eq(&margin(&net_income, &revenue), &[10.0, 10.0, 10.0]);
    }

    #[test]
    fn test_zero_denominators_yield_zero() {
        assert_eq!(growth(&[0.0, 50.0, 0.0]), vec![0.0, 0.0, -100.0]);
        assert_eq!(margin(&[5.0, 5.0], &[0.0, 10.0]), vec![0.0, 50.0]);
        assert_eq!(ratio(&[5.0], &[0.0]), vec![0.0]);
        assert!(ratio(&[0.0], &[0.0])[0] == 0.0);
    }

    #[test]
    fn test_growth_edge_lengths() {
        assert!(growth(&[]).is_empty());
        assert_eq!(growth(&[42.0]), vec![0.0]);
    }

    #[test]
    fn test_free_cash_flow_uses_absolute_capex() {
        assert_eq!(
            free_cash_flow(&[100.0, 100.0], &[30.0, -30.0]),
            vec![70.0, 70.0]
        );
    }

    #[test]
    fn test_compute_derived_from_result() {
        let mut result = ReconciledResult {
            periods: vec![
                NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
                NaiveDate::from_ymd_opt(2024, 9, 30).unwrap(),
            ],
            ..Default::default()
        };
        let mut put = |name: &str, values: Vec<Option<f64>>| {
            result.metrics.insert(name.to_string(), values);
        };
        put("revenue", vec![Some(200.0), Some(250.0)]);
        put("net_income", vec![Some(20.0), Some(50.0)]);
        put("operating_cash_flow", vec![Some(40.0), Some(60.0)]);
        put("capex", vec![Some(-10.0), Some(10.0)]);
        put("cash", vec![None, Some(80.0)]);
        put("total_debt", vec![Some(30.0), Some(40.0)]);
        put("current_assets", vec![Some(90.0), Some(100.0)]);
        put("current_liabilities", vec![Some(0.0), Some(50.0)]);
        put("stockholders_equity", vec![Some(60.0), None]);

        let derived = compute_derived(&result);
        assert_series_eq(&derived["revenue_growth"], &[0.0, 25.0]);
        assert_series_eq(&derived["net_margin"], &[10.0, 20.0]);
        assert_series_eq(&derived["free_cash_flow"], &[30.0, 50.0]);
        assert_series_eq(&derived["fcf_margin"], &[15.0, 20.0]);
        assert_series_eq(&derived["net_cash"], &[-30.0, 40.0]);
        assert_series_eq(&derived["working_capital"], &[90.0, 50.0]);
        assert_series_eq(&derived["current_ratio"], &[0.0, 2.0]);
        assert_series_eq(&derived["debt_to_equity"], &[0.5, 0.0]);
        assert!(!derived.contains_key("gross_margin"));
        assert!(!derived.contains_key("operating_margin"));
    }
}
