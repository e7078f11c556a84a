//! Compensation evaluation: investment, qualitative, and revenue scoring composed into a
//! bonus, policy breach detection, and the service and HTTP surface around the engine.

pub(crate) mod curve;
pub mod domain;
pub mod engine;
pub mod ingest;
pub mod investment;
pub mod observer;
pub mod qualitative;
pub mod repository;
pub mod revenue;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests {
    mod common;
    mod engine;
    mod routing;
    mod service;
}

pub use curve::{map_to_multiplier, CurveKind};
pub use domain::{
    Breach, Breaches, CompensationRule, EmployeeFacts, EmployeeId, EvaluationError,
    FundPerformanceRecord, Horizon, QualitativeScoreInput, ReviewPeriod, SalaryBand,
    TeamRevenueRecord,
};
pub use engine::{
    evaluate_compensation, BonusBreakdown, CompensationResult, EngineConfig, EvaluationEngine,
    EvaluationInputs,
};
pub use ingest::{parse_team_revenue, IngestError, QualitativeSubmission};
pub use investment::{FundMetrics, InvestmentScore};
pub use observer::{DataGap, EvaluationEvent, EvaluationObserver, TracingObserver};
pub use qualitative::QualitativeScore;
pub use repository::{select_rule, CompensationDataSource, CompensationStore, RepositoryError};
pub use revenue::{
    rolling_average, CompositionStage, RevenueAdjustment, RevenueInputs, RevenueMode,
    RollingAverage, RollingAverageDetail,
};
pub use router::compensation_router;
pub use service::{
    CompensationRequest, CompensationService, CompensationServiceError, RevenueRequest,
};
