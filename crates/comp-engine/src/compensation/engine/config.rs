use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::CompensationConfig;

/// Weights and bounds applied by the evaluation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub investment_weight: f64,
    pub qualitative_weight: f64,
    pub one_year_horizon_weight: f64,
    pub three_year_horizon_weight: f64,
    pub raf_sensitivity: f64,
    pub raf_floor: f64,
    pub raf_ceiling: f64,
    pub oversized_payout_multiple: Decimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            investment_weight: 0.6,
            qualitative_weight: 0.4,
            one_year_horizon_weight: 0.4,
            three_year_horizon_weight: 0.6,
            raf_sensitivity: 0.20,
            raf_floor: 0.90,
            raf_ceiling: 1.10,
            oversized_payout_multiple: CompensationConfig::DEFAULT_OVERSIZED_MULTIPLE,
        }
    }
}

impl From<&CompensationConfig> for EngineConfig {
    fn from(value: &CompensationConfig) -> Self {
        Self {
            oversized_payout_multiple: value.oversized_payout_multiple,
            ..Self::default()
        }
    }
}
