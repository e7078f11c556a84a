use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use super::super::domain::EvaluationError;
use super::super::revenue::{CompositionStage, RevenueAdjustment};

pub(crate) struct Composition {
    pub target_bonus: Decimal,
    pub performance_multiplier: f64,
    pub initial_bonus: Decimal,
    pub raw_bonus: Decimal,
}

/// Target bonus times the performance multiplier times the revenue multiplier.
///
/// A target-bonus stage folds revenue into the multiplier product before it
/// touches money; a final-bonus stage scales the initial bonus. Both produce
/// the same figure up to cent rounding.
pub(crate) fn compose(
    base_salary: Decimal,
    target_bonus_percent: f64,
    investment_component: f64,
    qualitative_component: f64,
    revenue: &RevenueAdjustment,
) -> Result<Composition, EvaluationError> {
    let target_percent = to_decimal(target_bonus_percent, "target bonus percent")?;
    let target_bonus = round_currency(base_salary * target_percent);
    let performance_multiplier = investment_component + qualitative_component;
    let performance = to_decimal(performance_multiplier, "performance multiplier")?;
    let initial_bonus = round_currency(target_bonus * performance);

    let raw_bonus = match revenue.stage {
        CompositionStage::TargetBonus => {
            let combined = performance_multiplier * revenue.factor;
            target_bonus * to_decimal(combined, "combined multiplier")?
        }
        CompositionStage::FinalBonus => {
            initial_bonus * to_decimal(revenue.factor, "revenue multiplier")?
        }
    };

    Ok(Composition {
        target_bonus,
        performance_multiplier,
        initial_bonus,
        raw_bonus: round_currency(raw_bonus),
    })
}

pub(crate) fn to_decimal(value: f64, label: &str) -> Result<Decimal, EvaluationError> {
    Decimal::from_f64(value)
        .ok_or_else(|| EvaluationError::invalid(format!("{label} {value} is not representable")))
}

/// Cents, half away from zero, always carried at scale 2.
pub(crate) fn round_currency(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}
