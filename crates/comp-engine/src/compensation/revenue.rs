//! Revenue adjustment strategies.
//!
//! Two independently specified signals adjust the bonus for revenue performance:
//! a direct actual-versus-reference ratio bounded by the yearly rule, and a
//! rolling-average trend (RAF) over four fiscal years of team fee revenue. Both
//! sit behind [`adjust_revenue`]; the variant of [`RevenueInputs`] selects which one
//! runs and where its multiplier enters bonus composition.

use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::domain::{CompensationRule, EmployeeId, EvaluationError, TeamRevenueRecord};
use super::engine::EngineConfig;
use super::observer::{DataGap, EvaluationEvent, EvaluationObserver};

const RAF_NEUTRAL: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevenueMode {
    DirectRatio,
    RollingAverage,
}

/// Point in bonus composition where the revenue multiplier is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionStage {
    /// Folded into the target-bonus product alongside the performance multiplier.
    TargetBonus,
    /// Applied to the already computed initial bonus.
    FinalBonus,
}

/// Revenue signal supplied to the engine; the variant picks the strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RevenueInputs {
    DirectRatio { actual_revenue: Decimal },
    RollingAverage { records: Vec<TeamRevenueRecord> },
}

/// Intermediate figures behind a rolling-average RAF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingAverageDetail {
    pub period_year: i32,
    pub yearly_totals: BTreeMap<i32, Decimal>,
    pub recent_average: f64,
    pub older_average: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pct_change: Option<f64>,
}

/// Outcome of the rolling-average strategy before any event is emitted.
#[derive(Debug, Clone, PartialEq)]
pub struct RollingAverage {
    pub factor: f64,
    pub detail: RollingAverageDetail,
    pub gap: Option<DataGap>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueAdjustment {
    pub mode: RevenueMode,
    pub factor: f64,
    pub stage: CompositionStage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rolling: Option<RollingAverageDetail>,
}

pub fn adjust_revenue(
    employee_id: &EmployeeId,
    inputs: &RevenueInputs,
    rule: &CompensationRule,
    period_year: i32,
    config: &EngineConfig,
    observer: &dyn EvaluationObserver,
) -> Result<RevenueAdjustment, EvaluationError> {
    match inputs {
        RevenueInputs::DirectRatio { actual_revenue } => Ok(RevenueAdjustment {
            mode: RevenueMode::DirectRatio,
            factor: direct_ratio_factor(*actual_revenue, rule)?,
            stage: CompositionStage::TargetBonus,
            rolling: None,
        }),
        RevenueInputs::RollingAverage { records } => {
            let outcome = rolling_average(records, period_year, config);
            if let Some(gap) = outcome.gap {
                observer.observe(EvaluationEvent::DataGap {
                    employee_id: employee_id.clone(),
                    gap,
                });
            }
            Ok(RevenueAdjustment {
                mode: RevenueMode::RollingAverage,
                factor: outcome.factor,
                stage: CompositionStage::FinalBonus,
                rolling: Some(outcome.detail),
            })
        }
    }
}

/// `actual / reference`, clamped to the rule's revenue bounds.
pub fn direct_ratio_factor(
    actual_revenue: Decimal,
    rule: &CompensationRule,
) -> Result<f64, EvaluationError> {
    if actual_revenue.is_sign_negative() && !actual_revenue.is_zero() {
        return Err(EvaluationError::invalid(format!(
            "actual revenue must be non-negative, got {actual_revenue}"
        )));
    }
    if rule.rev_adjust_reference <= 0.0 {
        return Err(EvaluationError::invalid(format!(
            "compensation rule {} needs a positive revenue reference",
            rule.year
        )));
    }

    let actual = actual_revenue
        .to_f64()
        .ok_or_else(|| EvaluationError::invalid("actual revenue is out of range"))?;
    let ratio = actual / rule.rev_adjust_reference;
    Ok(ratio.clamp(rule.rev_adjust_low, rule.rev_adjust_high))
}

/// Three-year-over-three-year team revenue trend for fiscal year `period_year`.
///
/// Yearly totals sum management and performance fees across every record for
/// that year. The recent window covers Y0..Y-2 and the older window Y-1..Y-3;
/// years without data are left out of their window rather than counted as zero.
pub fn rolling_average(
    records: &[TeamRevenueRecord],
    period_year: i32,
    config: &EngineConfig,
) -> RollingAverage {
    let oldest = period_year - 3;
    let mut yearly_totals: BTreeMap<i32, Decimal> = BTreeMap::new();
    for record in records
        .iter()
        .filter(|record| (oldest..=period_year).contains(&record.year))
    {
        *yearly_totals.entry(record.year).or_insert(Decimal::ZERO) += record.total();
    }

    let recent_average = window_average(&yearly_totals, period_year - 2..=period_year);
    let older_average = window_average(&yearly_totals, oldest..=period_year - 1);

    let neutral = |gap: DataGap, yearly_totals: BTreeMap<i32, Decimal>| RollingAverage {
        factor: RAF_NEUTRAL,
        detail: RollingAverageDetail {
            period_year,
            yearly_totals,
            recent_average,
            older_average,
            pct_change: None,
        },
        gap: Some(gap),
    };

    if yearly_totals.is_empty() {
        return neutral(DataGap::NoTeamRevenue { period_year }, yearly_totals);
    }
    if older_average == 0.0 {
        return neutral(DataGap::ZeroOlderRevenue { period_year }, yearly_totals);
    }

    let pct_change = (recent_average - older_average) / older_average;
    let raw = RAF_NEUTRAL + pct_change * config.raf_sensitivity;
    let factor = round_to(raw.clamp(config.raf_floor, config.raf_ceiling), 4);

    RollingAverage {
        factor,
        detail: RollingAverageDetail {
            period_year,
            yearly_totals,
            recent_average,
            older_average,
            pct_change: Some(pct_change),
        },
        gap: None,
    }
}

fn window_average(
    yearly_totals: &BTreeMap<i32, Decimal>,
    years: std::ops::RangeInclusive<i32>,
) -> f64 {
    let values: Vec<f64> = yearly_totals
        .range(years)
        .filter_map(|(_, total)| total.to_f64())
        .collect();
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}
