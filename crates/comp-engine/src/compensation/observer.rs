use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use super::domain::{EmployeeId, Horizon};

/// Missing or degenerate data absorbed with a documented fallback value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataGap {
    /// No fund records; the investment component falls back to 0.0.
    NoFunds,
    /// Information ratio treated as 0.0 for this fund and horizon.
    ZeroTrackingError { fund_id: String, horizon: Horizon },
    /// AUM weights are applied as given even though they do not sum to 1.0.
    AumWeightDrift { total_weight: f64 },
    /// No team revenue rows; RAF falls back to neutral 1.0.
    NoTeamRevenue { period_year: i32 },
    /// Older rolling window averaged to zero; RAF falls back to neutral 1.0.
    ZeroOlderRevenue { period_year: i32 },
}

/// Side-channel signal emitted during an evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EvaluationEvent {
    DataGap {
        employee_id: EmployeeId,
        gap: DataGap,
    },
    /// Raw bonus exceeded the configured multiple of base salary. Advisory only.
    OversizedPayout {
        employee_id: EmployeeId,
        raw_bonus: Decimal,
        base_salary: Decimal,
        threshold: Decimal,
    },
}

/// Capability supplied by the caller to receive evaluation events.
pub trait EvaluationObserver: Send + Sync {
    fn observe(&self, event: EvaluationEvent);
}

/// Default observer that writes each event as a structured `tracing` record.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl EvaluationObserver for TracingObserver {
    fn observe(&self, event: EvaluationEvent) {
        match event {
            EvaluationEvent::DataGap { employee_id, gap } => match gap {
                DataGap::NoFunds => {
                    warn!(%employee_id, "no fund performance data; investment component is 0.0")
                }
                DataGap::ZeroTrackingError { fund_id, horizon } => warn!(
                    %employee_id,
                    %fund_id,
                    horizon = horizon.label(),
                    "zero tracking error; information ratio set to 0.0"
                ),
                DataGap::AumWeightDrift { total_weight } => warn!(
                    %employee_id,
                    total_weight,
                    "fund AUM weights do not sum to 1.0; applying as given"
                ),
                DataGap::NoTeamRevenue { period_year } => warn!(
                    %employee_id,
                    period_year,
                    "no team revenue data; RAF defaults to 1.0"
                ),
                DataGap::ZeroOlderRevenue { period_year } => warn!(
                    %employee_id,
                    period_year,
                    "older rolling revenue average is zero; RAF defaults to 1.0"
                ),
            },
            EvaluationEvent::OversizedPayout {
                employee_id,
                raw_bonus,
                base_salary,
                threshold,
            } => warn!(
                %employee_id,
                %raw_bonus,
                %base_salary,
                %threshold,
                "ALERT: bonus exceeds oversized payout threshold"
            ),
        }
    }
}

