use rust_decimal::Decimal;

use super::super::domain::{
    Breach, Breaches, CompensationRule, EmployeeFacts, EvaluationError, SalaryBand,
};
use super::composition::{round_currency, to_decimal};

pub(crate) struct BreachOutcome {
    pub bonus: Decimal,
    pub mrt_cap: Decimal,
    pub breaches: Breaches,
}

/// Runs the salary-band and MRT-cap checks in order; neither short-circuits the other.
pub(crate) fn detect_breaches(
    employee: &EmployeeFacts,
    band: &SalaryBand,
    rule: &CompensationRule,
    raw_bonus: Decimal,
) -> Result<BreachOutcome, EvaluationError> {
    let mut breaches = Breaches::default();

    if !band.contains(employee.base_salary) {
        breaches.record(Breach::SalaryBand);
    }

    let mrt_cap = round_currency(
        employee.base_salary * to_decimal(rule.mrt_cap_percent, "MRT cap percent")?,
    );
    let floored = raw_bonus.max(Decimal::ZERO);
    let bonus = if floored > mrt_cap {
        breaches.record(Breach::MrtCap);
        mrt_cap
    } else {
        floored
    };

    Ok(BreachOutcome {
        bonus,
        mrt_cap,
        breaches,
    })
}
