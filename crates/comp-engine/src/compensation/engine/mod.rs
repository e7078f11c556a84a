mod breach;
mod composition;
mod config;

pub use config::EngineConfig;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::domain::{
    Breaches, CompensationRule, EmployeeFacts, EmployeeId, EvaluationError,
    FundPerformanceRecord, QualitativeScoreInput, ReviewPeriod, SalaryBand,
};
use super::investment::{score_investment, InvestmentScore};
use super::observer::{EvaluationEvent, EvaluationObserver};
use super::qualitative::{score_qualitative, QualitativeScore};
use super::revenue::{adjust_revenue, RevenueAdjustment, RevenueInputs};
use breach::detect_breaches;
use composition::{compose, round_currency};

/// Everything one evaluation reads. Lookups happen before the engine runs.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationInputs<'a> {
    pub employee: &'a EmployeeFacts,
    pub band: &'a SalaryBand,
    pub rule: &'a CompensationRule,
    pub period: ReviewPeriod,
    pub funds: &'a [FundPerformanceRecord],
    pub qualitative: &'a QualitativeScoreInput,
    pub revenue: &'a RevenueInputs,
}

/// Stateless evaluator applying the engine configuration to one employee.
#[derive(Debug, Clone, Default)]
pub struct EvaluationEngine {
    config: EngineConfig,
}

impl EvaluationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn evaluate(
        &self,
        inputs: EvaluationInputs<'_>,
        observer: &dyn EvaluationObserver,
    ) -> Result<CompensationResult, EvaluationError> {
        let EvaluationInputs {
            employee,
            band,
            rule,
            period,
            funds,
            qualitative,
            revenue,
        } = inputs;

        validate_subjects(employee, band)?;
        rule.validate()?;

        let investment = score_investment(&employee.id, funds, &self.config, observer);
        let qualitative = score_qualitative(qualitative, &self.config)?;
        let revenue = adjust_revenue(
            &employee.id,
            revenue,
            rule,
            period.year,
            &self.config,
            observer,
        )?;

        let composition = compose(
            employee.base_salary,
            rule.target_bonus_percent,
            investment.component,
            qualitative.component,
            &revenue,
        )?;

        let oversized_threshold =
            round_currency(employee.base_salary * self.config.oversized_payout_multiple);
        if composition.raw_bonus > oversized_threshold {
            observer.observe(EvaluationEvent::OversizedPayout {
                employee_id: employee.id.clone(),
                raw_bonus: composition.raw_bonus,
                base_salary: employee.base_salary,
                threshold: oversized_threshold,
            });
        }

        let outcome = detect_breaches(employee, band, rule, composition.raw_bonus)?;

        Ok(CompensationResult {
            employee_id: employee.id.clone(),
            period,
            total_comp: employee.base_salary + outcome.bonus,
            base: employee.base_salary,
            bonus: outcome.bonus,
            revenue_adjustment: revenue.factor,
            qualitative_adjustment: qualitative.average,
            investment_adjustment: investment.multiplier,
            breaches: outcome.breaches,
            breakdown: BonusBreakdown {
                rule_year: rule.year,
                target_bonus: composition.target_bonus,
                investment_component: investment.component,
                qualitative_component: qualitative.component,
                performance_multiplier: composition.performance_multiplier,
                initial_bonus: composition.initial_bonus,
                raw_bonus: composition.raw_bonus,
                mrt_cap: outcome.mrt_cap,
                investment,
                qualitative,
                revenue,
            },
        })
    }
}

/// Evaluate with the default engine configuration.
#[allow(clippy::too_many_arguments)]
pub fn evaluate_compensation(
    employee: &EmployeeFacts,
    band: &SalaryBand,
    rule: &CompensationRule,
    period: ReviewPeriod,
    funds: &[FundPerformanceRecord],
    qualitative: &QualitativeScoreInput,
    revenue: &RevenueInputs,
    observer: &dyn EvaluationObserver,
) -> Result<CompensationResult, EvaluationError> {
    EvaluationEngine::default().evaluate(
        EvaluationInputs {
            employee,
            band,
            rule,
            period,
            funds,
            qualitative,
            revenue,
        },
        observer,
    )
}

fn validate_subjects(employee: &EmployeeFacts, band: &SalaryBand) -> Result<(), EvaluationError> {
    if employee.base_salary.is_sign_negative() && !employee.base_salary.is_zero() {
        return Err(EvaluationError::invalid(format!(
            "employee {} has a negative base salary",
            employee.id
        )));
    }
    if band.role != employee.role {
        return Err(EvaluationError::invalid(format!(
            "salary band for '{}' does not apply to role '{}'",
            band.role, employee.role
        )));
    }
    if band.min_salary > band.max_salary {
        return Err(EvaluationError::invalid(format!(
            "salary band for '{}' has min above max",
            band.role
        )));
    }
    Ok(())
}

/// Output record for one employee and review period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompensationResult {
    pub employee_id: EmployeeId,
    pub period: ReviewPeriod,
    pub total_comp: Decimal,
    pub base: Decimal,
    pub bonus: Decimal,
    pub revenue_adjustment: f64,
    /// Averaged qualitative score, not the weighted component.
    pub qualitative_adjustment: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investment_adjustment: Option<f64>,
    pub breaches: Breaches,
    pub breakdown: BonusBreakdown,
}

/// Itemized factors behind the bonus figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusBreakdown {
    pub rule_year: i32,
    pub target_bonus: Decimal,
    pub investment_component: f64,
    pub qualitative_component: f64,
    pub performance_multiplier: f64,
    pub initial_bonus: Decimal,
    pub raw_bonus: Decimal,
    pub mrt_cap: Decimal,
    pub investment: InvestmentScore,
    pub qualitative: QualitativeScore,
    pub revenue: RevenueAdjustment,
}
