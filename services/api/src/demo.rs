use crate::infra::{parse_amount, parse_period, InMemoryCompensationStore};
use clap::{Args, ValueEnum};
use comp_engine::compensation::{
    parse_team_revenue, rolling_average, CompensationRequest, CompensationResult,
    CompensationService, CompositionStage, DataGap, EmployeeId, EngineConfig, RevenueMode,
    RevenueRequest, ReviewPeriod, RollingAverage, TracingObserver,
};
use comp_engine::config::AppConfig;
use comp_engine::error::AppError;
use comp_engine::telemetry;
use rust_decimal::Decimal;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

const DEFAULT_ACTUAL_REVENUE: Decimal = Decimal::from_parts(1_050_000, 0, 0, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum DemoMode {
    RollingAverage,
    DirectRatio,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Seeded employee to evaluate (EMP001 or EMP002)
    #[arg(long, default_value = "EMP001")]
    pub(crate) employee: String,
    /// Review period (YYYY or YYYY-QN)
    #[arg(long, value_parser = parse_period, default_value = "2025")]
    pub(crate) period: ReviewPeriod,
    /// Revenue adjustment strategy
    #[arg(long, value_enum, default_value_t = DemoMode::RollingAverage)]
    pub(crate) mode: DemoMode,
    /// Actual revenue for the direct-ratio strategy (defaults to 1050000)
    #[arg(long, value_parser = parse_amount)]
    pub(crate) actual_revenue: Option<Decimal>,
}

#[derive(Args, Debug)]
pub(crate) struct RafArgs {
    /// Team revenue CSV with fund_id,year,management_fees,performance_fees columns
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Fiscal year to evaluate (YYYY or YYYY-QN)
    #[arg(long, value_parser = parse_period)]
    pub(crate) period: ReviewPeriod,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        employee,
        period,
        mode,
        actual_revenue,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let service = CompensationService::new(
        Arc::new(InMemoryCompensationStore::demo()),
        Arc::new(TracingObserver),
        EngineConfig::from(&config.compensation),
    );
    let revenue = match mode {
        DemoMode::RollingAverage => RevenueRequest::RollingAverage,
        DemoMode::DirectRatio => RevenueRequest::DirectRatio {
            actual_revenue: actual_revenue.unwrap_or(DEFAULT_ACTUAL_REVENUE),
        },
    };

    let result = service.evaluate(CompensationRequest {
        employee_id: EmployeeId(employee),
        period,
        revenue,
        qualitative_scores: None,
    })?;

    for line in render_breakdown(&result) {
        println!("{line}");
    }
    Ok(())
}

pub(crate) fn run_raf(args: RafArgs) -> Result<(), AppError> {
    let RafArgs { csv, period } = args;

    let file = File::open(&csv)?;
    let records = parse_team_revenue(file)?;
    let outcome = rolling_average(&records, period.year, &EngineConfig::default());

    println!("Revenue adjustment factor from {}", csv.display());
    for line in render_raf(&outcome) {
        println!("{line}");
    }
    Ok(())
}

pub(crate) fn render_breakdown(result: &CompensationResult) -> Vec<String> {
    let breakdown = &result.breakdown;
    let investment = &breakdown.investment;
    let qualitative = &breakdown.qualitative;
    let revenue = &breakdown.revenue;
    let mut lines = Vec::new();

    lines.push(format!(
        "Compensation breakdown for {} ({})",
        result.employee_id, result.period
    ));
    lines.push(format!("- Base salary: {}", result.base));
    lines.push(format!(
        "- Target bonus: {} (rule year {})",
        breakdown.target_bonus, breakdown.rule_year
    ));

    match investment.multiplier {
        Some(multiplier) => lines.push(format!(
            "- Investment: alpha {:.1} bps | IR {:.2} | multiplier {:.4} | component {:.4}",
            investment.total_alpha_bps,
            investment.information_ratio,
            multiplier,
            investment.component
        )),
        None => lines.push("- Investment: no fund data | component 0.0000".to_string()),
    }
    for fund in &investment.funds {
        lines.push(format!(
            "  - {}: alpha 1yr {:.1} bps, 3yr {:.1} bps | IR {:.2} | weight {:.0}%",
            fund.fund_id,
            fund.alpha_1yr_bps,
            fund.alpha_3yr_bps,
            fund.weighted_information_ratio,
            fund.aum_weight * 100.0
        ));
    }

    lines.push(format!(
        "- Qualitative: average {:.2} | multiplier {:.2} | component {:.4}",
        qualitative.average, qualitative.multiplier, qualitative.component
    ));

    let mode = match revenue.mode {
        RevenueMode::DirectRatio => "direct ratio",
        RevenueMode::RollingAverage => "rolling average",
    };
    let stage = match revenue.stage {
        CompositionStage::TargetBonus => "target bonus",
        CompositionStage::FinalBonus => "final bonus",
    };
    lines.push(format!(
        "- Revenue ({mode}): factor {:.4} applied to the {stage}",
        revenue.factor
    ));
    if let Some(detail) = &revenue.rolling {
        lines.push(format!(
            "  - recent average {:.2} | older average {:.2} | change {}",
            detail.recent_average,
            detail.older_average,
            detail
                .pct_change
                .map(|pct| format!("{:+.2}%", pct * 100.0))
                .unwrap_or_else(|| "n/a".to_string())
        ));
    }

    lines.push(format!(
        "- Performance multiplier {:.4} | initial bonus {} | raw bonus {} | MRT cap {}",
        breakdown.performance_multiplier,
        breakdown.initial_bonus,
        breakdown.raw_bonus,
        breakdown.mrt_cap
    ));
    lines.push(format!(
        "- Bonus: {} | total compensation: {}",
        result.bonus, result.total_comp
    ));

    let breaches = if result.breaches.is_empty() {
        "none".to_string()
    } else {
        result.breaches.labels().join(", ")
    };
    lines.push(format!("- Breaches: {breaches}"));

    lines
}

pub(crate) fn render_raf(outcome: &RollingAverage) -> Vec<String> {
    let detail = &outcome.detail;
    let mut lines = vec![format!("Fiscal year {}", detail.period_year)];

    for (year, total) in detail.yearly_totals.iter().rev() {
        lines.push(format!("- {year}: {total}"));
    }
    lines.push(format!(
        "- Recent average {:.2} | older average {:.2}",
        detail.recent_average, detail.older_average
    ));

    match &outcome.gap {
        Some(DataGap::NoTeamRevenue { .. }) => {
            lines.push("- No revenue rows in the window; RAF defaults to neutral".to_string())
        }
        Some(DataGap::ZeroOlderRevenue { .. }) => {
            lines.push("- Older window averages to zero; RAF defaults to neutral".to_string())
        }
        _ => {}
    }
    lines.push(format!("RAF: {:.4}", outcome.factor));

    lines
}
