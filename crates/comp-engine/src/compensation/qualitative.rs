use serde::{Deserialize, Serialize};

use super::curve::{map_to_multiplier, CurveKind};
use super::domain::{EvaluationError, QualitativeScoreInput};
use super::engine::EngineConfig;

/// Averaged review score, its step multiplier, and the weighted component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualitativeScore {
    pub average: f64,
    pub multiplier: f64,
    pub component: f64,
}

/// Unweighted mean of the five dimensions; missing dimensions count as 0.0.
pub fn score_qualitative(
    input: &QualitativeScoreInput,
    config: &EngineConfig,
) -> Result<QualitativeScore, EvaluationError> {
    if input.is_empty() {
        return Err(EvaluationError::invalid("no qualitative scores provided"));
    }

    let dimensions = input.dimensions();
    let total: f64 = dimensions
        .iter()
        .map(|(_, score)| score.unwrap_or(0.0))
        .sum();
    let average = settle(total / dimensions.len() as f64);
    let multiplier = map_to_multiplier(average, CurveKind::Qualitative);

    Ok(QualitativeScore {
        average,
        multiplier,
        component: multiplier * config.qualitative_weight,
    })
}

/// Averages are settled to 10 dp so boundary means such as 0.4 and 0.7 hit the step as written.
fn settle(value: f64) -> f64 {
    const SCALE: f64 = 1e10;
    (value * SCALE).round() / SCALE
}
