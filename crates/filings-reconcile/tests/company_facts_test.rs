//! Integration tests running a full reconciliation over a companyfacts document

use approx::assert_relative_eq;
use chrono::NaiveDate;
use filings_core::{
    CompanyFacts, FailureKind, MetricsConfig, PeriodType, SourceForm, Unavailable, Unit,
};
use filings_reconcile::{CashPosition, Reconciler, assess_health, detect_patterns};
use serde_json::{Value, json};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn quarter(val: f64, start: &str, end: &str, filed: &str) -> Value {
    json!({"val": val, "start": start, "end": end, "form": "10-Q", "filed": filed, "fp": "Q"})
}

fn instant(val: f64, end: &str, filed: &str) -> Value {
    json!({"val": val, "end": end, "form": "10-Q", "filed": filed})
}

fn usd(facts: Vec<Value>) -> Value {
    json!({"units": {"USD": facts}})
}

fn company_facts() -> CompanyFacts {
    let doc = json!({
        "cik": 1234567,
        "entityName": "Example Corp",
        "facts": {
            "dei": {
                "EntityCommonStockSharesOutstanding": {
                    "units": {"shares": [{"val": 1000.0, "end": "2024-12-31"}]}
                }
            },
            "us-gaap": {
                "Revenues": usd(vec![
                    quarter(90.0, "2024-01-01", "2024-03-31", "2024-05-01"),
                    quarter(100.0, "2024-04-01", "2024-06-30", "2024-08-01"),
                    quarter(110.0, "2024-07-01", "2024-09-30", "2024-11-01"),
                    // Nine-month year-to-date figure
                    json!({"val": 300.0, "start": "2024-01-01", "end": "2024-09-30", "form": "10-Q", "filed": "2024-11-01"}),
                    json!({"val": 431.0, "start": "2024-01-01", "end": "2024-12-31", "form": "10-K", "filed": "2025-02-15", "fp": "FY"}),
                ]),
                "SalesRevenueNet": usd(vec![
                    quarter(100.0, "2024-04-01", "2024-06-30", "2024-08-01"),
                    quarter(110.0, "2024-07-01", "2024-09-30", "2024-11-01"),
                    quarter(121.0, "2024-10-01", "2024-12-31", "2025-02-15"),
                ]),
                "NetIncomeLoss": usd(vec![
                    quarter(10.0, "2024-04-01", "2024-06-30", "2024-08-01"),
                    quarter(11.0, "2024-07-01", "2024-09-30", "2024-11-01"),
                    quarter(12.1, "2024-10-01", "2024-12-31", "2025-02-15"),
                    json!({"val": null, "start": "2024-10-01", "end": "2024-12-31", "form": "10-Q"}),
                ]),
                "GrossProfit": usd(vec![
                    quarter(40.0, "2024-04-01", "2024-06-30", "2024-08-01"),
                    quarter(44.0, "2024-07-01", "2024-09-30", "2024-11-01"),
                    quarter(48.4, "2024-10-01", "2024-12-31", "2025-02-15"),
                ]),
                "NetCashProvidedByUsedInOperatingActivities": usd(vec![
                    quarter(30.0, "2024-04-01", "2024-06-30", "2024-08-01"),
                    quarter(30.0, "2024-07-01", "2024-09-30", "2024-11-01"),
                    quarter(30.0, "2024-10-01", "2024-12-31", "2025-02-15"),
                ]),
                "PaymentsToAcquirePropertyPlantAndEquipment": usd(vec![
                    quarter(10.0, "2024-04-01", "2024-06-30", "2024-08-01"),
                    quarter(-10.0, "2024-07-01", "2024-09-30", "2024-11-01"),
                    quarter(10.0, "2024-10-01", "2024-12-31", "2025-02-15"),
                ]),
                "EarningsPerShareBasic": {
                    "units": {"USD/shares": [
                        quarter(0.10, "2024-04-01", "2024-06-30", "2024-08-01"),
                        quarter(0.11, "2024-07-01", "2024-09-30", "2024-11-01"),
                        quarter(0.12, "2024-10-01", "2024-12-31", "2025-02-15"),
                    ]}
                },
                "CashAndCashEquivalentsAtCarryingValue": usd(vec![
                    instant(500.0, "2024-06-28", "2024-08-01"),
                    instant(600.0, "2024-09-30", "2024-11-01"),
                    instant(700.0, "2024-12-01", "2025-02-15"),
                ]),
                "LongTermDebt": usd(vec![
                    instant(200.0, "2024-06-30", "2024-08-01"),
                    instant(200.0, "2024-09-30", "2024-11-01"),
                    instant(200.0, "2024-12-31", "2025-02-15"),
                ]),
            }
        }
    });
    serde_json::from_value(doc).unwrap()
}

fn reconciler() -> Reconciler {
    Reconciler::new(MetricsConfig::default().with_quarter_count(3)).unwrap()
}

#[test]
fn test_period_axis_and_source_selection() {
    let result = reconciler().reconcile(Some(&company_facts())).unwrap();

    assert_eq!(
        result.periods,
        vec![date(2024, 6, 30), date(2024, 9, 30), date(2024, 12, 31)]
    );
    assert_eq!(
        result.metric("revenue").unwrap(),
        &[Some(100.0), Some(110.0), Some(121.0)]
    );

    let provenance = &result.provenance["revenue"];
    assert_eq!(provenance.concept, "SalesRevenueNet");
    assert_eq!(provenance.form, SourceForm::TenQ);
    assert_eq!(provenance.filed_date, Some(date(2025, 2, 15)));
    assert_eq!(provenance.period_type, PeriodType::Quarterly);

    assert_eq!(result.provenance["eps"].unit, Unit::UsdPerShare);
    assert_eq!(result.unavailable["operating_income"], Unavailable::NotFound);
}

#[test]
fn test_balance_sheet_alignment() {
    let result = reconciler().reconcile(Some(&company_facts())).unwrap();

    // 2024-12-01 is 30 days from the last quarter end
    assert_eq!(
        result.metric("cash").unwrap(),
        &[Some(500.0), Some(600.0), None]
    );
    assert_eq!(
        result.provenance["cash"].concept,
        "CashAndCashEquivalentsAtCarryingValue"
    );
    assert_eq!(result.provenance["cash"].period_type, PeriodType::PointInTime);
    assert_eq!(
        result.metric("total_debt").unwrap(),
        &[Some(200.0), Some(200.0), Some(200.0)]
    );
}

#[test]
fn test_derived_series() {
    let result = reconciler().reconcile(Some(&company_facts())).unwrap();

    let expect = |name: &str, expected: &[f64]| {
        let actual = result.derived(name).unwrap();
        assert_eq!(actual.len(), expected.len(), "{name}");
        for (a, e) in actual.iter().zip(expected) {
            assert_relative_eq!(*a, *e, epsilon = 1e-9);
        }
    };

    expect("revenue_growth", &[0.0, 10.0, 10.0]);
    expect("net_margin", &[10.0, 10.0, 10.0]);
    expect("gross_margin", &[40.0, 40.0, 40.0]);
    expect("free_cash_flow", &[20.0, 20.0, 20.0]);
    expect("net_cash", &[300.0, 400.0, -200.0]);
    assert!(result.derived("operating_margin").is_none());
    assert!(result.derived("current_ratio").is_none());
}

#[test]
fn test_key_financials_and_health() {
    let reconciler = reconciler();
    let facts = reconciler.fact_set(&company_facts());
    let key = reconciler.key_financials(&facts);

    // Annual and quarterly both end 2024-12-31
    let revenue = key.get("revenue").unwrap();
    assert_eq!(revenue.value, 431.0);
    assert_eq!(revenue.period_type, PeriodType::Annual);
    assert_eq!(revenue.source_form, SourceForm::TenK);

    let net_income = key.get("net_income").unwrap();
    assert_eq!(net_income.value, 12.1);
    assert_eq!(net_income.period_type, PeriodType::Quarterly);

    assert_eq!(key.value("cash"), Some(700.0));
    assert_eq!(key.value("debt"), Some(200.0));
    assert!(key.missing.contains("total_assets"));

    let health = assess_health(&key);
    assert!(health.revenue_generating);
    assert!(health.profitable);
    assert_eq!(health.cash_position, CashPosition::Strong);
    assert_eq!(health.as_of, Some(date(2024, 12, 1)));
}

#[test]
fn test_patterns_on_steady_company() {
    let result = reconciler().reconcile(Some(&company_facts())).unwrap();
    assert!(detect_patterns(&result).is_empty());
}

#[test]
fn test_failure_kinds() {
    let reconciler = reconciler();

    let null_facts: CompanyFacts = serde_json::from_value(json!({"cik": 42, "facts": null})).unwrap();
    let err = reconciler.reconcile(Some(&null_facts)).unwrap_err();
    assert_eq!(err.kind(), FailureKind::NoData);
    assert!(err.to_string().contains("0000000042"));

    let short: CompanyFacts = serde_json::from_value(json!({
        "cik": 42,
        "facts": {"us-gaap": {"Revenues": usd(vec![
            quarter(1.0, "2024-04-01", "2024-06-30", "2024-08-01"),
        ])}}
    }))
    .unwrap();
    let err = reconciler.reconcile(Some(&short)).unwrap_err();
    assert_eq!(err.kind(), FailureKind::InsufficientHistory);
}
