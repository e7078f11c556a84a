use serde::{Deserialize, Serialize};

/// Alpha (bps) at which the investment curve saturates.
pub const ALPHA_CEILING_BPS: f64 = 300.0;
/// Multiplier paid once alpha reaches the ceiling.
pub const ALPHA_MAX_MULTIPLIER: f64 = 1.8;
/// Qualitative averages below this floor pay nothing.
pub const QUALITATIVE_FLOOR: f64 = 0.4;
/// Qualitative averages above this threshold earn the uplift.
pub const QUALITATIVE_UPLIFT_THRESHOLD: f64 = 0.7;
/// Multiplier paid above the uplift threshold.
pub const QUALITATIVE_UPLIFT: f64 = 1.2;

/// Payout curves applied to scalar performance metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveKind {
    /// Piecewise linear over alpha in basis points: 0x below benchmark, 1x at benchmark,
    /// 1.8x from +300bps.
    Alpha,
    /// Step function over the averaged review score: 0x, 1x, 1.2x.
    Qualitative,
}

pub fn map_to_multiplier(value: f64, kind: CurveKind) -> f64 {
    match kind {
        CurveKind::Alpha => alpha_multiplier(value),
        CurveKind::Qualitative => qualitative_multiplier(value),
    }
}

fn alpha_multiplier(alpha_bps: f64) -> f64 {
    if alpha_bps < 0.0 {
        0.0
    } else if alpha_bps > ALPHA_CEILING_BPS {
        ALPHA_MAX_MULTIPLIER
    } else {
        1.0 + (alpha_bps / ALPHA_CEILING_BPS) * (ALPHA_MAX_MULTIPLIER - 1.0)
    }
}

fn qualitative_multiplier(average: f64) -> f64 {
    if average < QUALITATIVE_FLOOR {
        0.0
    } else if average <= QUALITATIVE_UPLIFT_THRESHOLD {
        1.0
    } else {
        QUALITATIVE_UPLIFT
    }
}
