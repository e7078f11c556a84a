//! Team revenue CSV exports feeding the rolling-average revenue adjustment.

use rust_decimal::Decimal;

use comp_engine::compensation::{
    parse_team_revenue, rolling_average, DataGap, EngineConfig, IngestError,
};

const EXPORT: &str = "\
fund_id,year,management_fees,performance_fees
UKEF001,2025,2200000,800000
UKEF001,2024,2100000,700000
UKEF001,2023,2000000,600000
UKEF001,2022,1900000,500000
UKEF001,2018,9900000,0
";

#[test]
fn exported_history_produces_a_bounded_raf() {
    let records = parse_team_revenue(EXPORT.as_bytes()).expect("parses export");
    assert_eq!(records.len(), 5);

    let outcome = rolling_average(&records, 2025, &EngineConfig::default());

    assert!(outcome.gap.is_none());
    assert_eq!(outcome.detail.yearly_totals.len(), 4);
    assert_eq!(
        outcome.detail.yearly_totals.get(&2022),
        Some(&Decimal::from(2_400_000))
    );
    assert_eq!(outcome.factor, 1.0154);
}

#[test]
fn export_for_an_untracked_year_is_neutral() {
    let records = parse_team_revenue(EXPORT.as_bytes()).expect("parses export");

    let outcome = rolling_average(&records, 2030, &EngineConfig::default());

    assert_eq!(outcome.factor, 1.0);
    assert_eq!(outcome.gap, Some(DataGap::NoTeamRevenue { period_year: 2030 }));
}

#[test]
fn negative_fee_rows_fail_the_whole_import() {
    let export = "fund_id,year,management_fees,performance_fees\n\
                  UKEF001,2025,2200000,800000\n\
                  UKEF001,2024,2100000,-700000\n";

    let err = parse_team_revenue(export.as_bytes()).expect_err("rejects");

    assert_eq!(
        err.to_string(),
        "row 2: performance_fees must not be negative"
    );
    assert!(matches!(err, IngestError::NegativeFee { row: 2, .. }));
}
