use serde::{Deserialize, Serialize};

use super::curve::{map_to_multiplier, CurveKind};
use super::domain::{EmployeeId, FundPerformanceRecord, Horizon};
use super::engine::EngineConfig;
use super::observer::{DataGap, EvaluationEvent, EvaluationObserver};

const BASIS_POINTS: f64 = 10_000.0;
const AUM_WEIGHT_TOLERANCE: f64 = 1e-6;

/// Per-fund alpha and information ratio, blended across horizons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundMetrics {
    pub fund_id: String,
    pub alpha_1yr_bps: f64,
    pub alpha_3yr_bps: f64,
    pub information_ratio_1yr: f64,
    pub information_ratio_3yr: f64,
    pub weighted_alpha_bps: f64,
    pub weighted_information_ratio: f64,
    pub aum_weight: f64,
}

/// Investment component handed to bonus composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentScore {
    pub funds: Vec<FundMetrics>,
    pub total_alpha_bps: f64,
    /// Reported only; the payout curve is driven by alpha.
    pub information_ratio: f64,
    /// Alpha-curve multiplier, absent when the employee has no funds.
    pub multiplier: Option<f64>,
    /// Multiplier scaled by the investment weight.
    pub component: f64,
}

pub fn alpha_bps(fund: &FundPerformanceRecord, horizon: Horizon) -> f64 {
    fund.excess_return(horizon) * BASIS_POINTS
}

/// Excess return over tracking error, or `None` when tracking error is zero.
pub fn information_ratio(fund: &FundPerformanceRecord, horizon: Horizon) -> Option<f64> {
    let tracking_error = fund.tracking_error(horizon);
    if tracking_error == 0.0 {
        return None;
    }
    Some(fund.excess_return(horizon) / tracking_error)
}

pub fn score_investment(
    employee_id: &EmployeeId,
    funds: &[FundPerformanceRecord],
    config: &EngineConfig,
    observer: &dyn EvaluationObserver,
) -> InvestmentScore {
    if funds.is_empty() {
        observer.observe(EvaluationEvent::DataGap {
            employee_id: employee_id.clone(),
            gap: DataGap::NoFunds,
        });
        return InvestmentScore {
            funds: Vec::new(),
            total_alpha_bps: 0.0,
            information_ratio: 0.0,
            multiplier: None,
            component: 0.0,
        };
    }

    let metrics: Vec<FundMetrics> = funds
        .iter()
        .map(|fund| fund_metrics(employee_id, fund, config, observer))
        .collect();

    let total_weight: f64 = metrics.iter().map(|metric| metric.aum_weight).sum();
    if (total_weight - 1.0).abs() > AUM_WEIGHT_TOLERANCE {
        observer.observe(EvaluationEvent::DataGap {
            employee_id: employee_id.clone(),
            gap: DataGap::AumWeightDrift { total_weight },
        });
    }

    let total_alpha_bps = metrics
        .iter()
        .map(|metric| metric.weighted_alpha_bps * metric.aum_weight)
        .sum();
    let information_ratio = metrics
        .iter()
        .map(|metric| metric.weighted_information_ratio * metric.aum_weight)
        .sum();

    let multiplier = map_to_multiplier(total_alpha_bps, CurveKind::Alpha);

    InvestmentScore {
        funds: metrics,
        total_alpha_bps,
        information_ratio,
        multiplier: Some(multiplier),
        component: multiplier * config.investment_weight,
    }
}

fn fund_metrics(
    employee_id: &EmployeeId,
    fund: &FundPerformanceRecord,
    config: &EngineConfig,
    observer: &dyn EvaluationObserver,
) -> FundMetrics {
    let ir = |horizon: Horizon| {
        information_ratio(fund, horizon).unwrap_or_else(|| {
            observer.observe(EvaluationEvent::DataGap {
                employee_id: employee_id.clone(),
                gap: DataGap::ZeroTrackingError {
                    fund_id: fund.fund_id.clone(),
                    horizon,
                },
            });
            0.0
        })
    };

    let alpha_1yr_bps = alpha_bps(fund, Horizon::OneYear);
    let alpha_3yr_bps = alpha_bps(fund, Horizon::ThreeYear);
    let information_ratio_1yr = ir(Horizon::OneYear);
    let information_ratio_3yr = ir(Horizon::ThreeYear);

    FundMetrics {
        fund_id: fund.fund_id.clone(),
        alpha_1yr_bps,
        alpha_3yr_bps,
        information_ratio_1yr,
        information_ratio_3yr,
        weighted_alpha_bps: blend(config, alpha_1yr_bps, alpha_3yr_bps),
        weighted_information_ratio: blend(config, information_ratio_1yr, information_ratio_3yr),
        aum_weight: fund.aum_weight,
    }
}

fn blend(config: &EngineConfig, one_year: f64, three_year: f64) -> f64 {
    one_year * config.one_year_horizon_weight + three_year * config.three_year_horizon_weight
}
