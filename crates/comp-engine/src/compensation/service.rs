use std::io::Read;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::domain::{EmployeeId, EvaluationError, QualitativeScoreInput, ReviewPeriod};
use super::engine::{CompensationResult, EngineConfig, EvaluationEngine, EvaluationInputs};
use super::ingest::{parse_team_revenue, IngestError, QualitativeSubmission};
use super::observer::EvaluationObserver;
use super::repository::{CompensationDataSource, CompensationStore, RepositoryError};
use super::revenue::RevenueInputs;

/// Calculation request accepted by the service and the HTTP surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompensationRequest {
    pub employee_id: EmployeeId,
    pub period: ReviewPeriod,
    #[serde(default)]
    pub revenue: RevenueRequest,
    /// Overrides the stored scores for this calculation only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualitative_scores: Option<QualitativeScoreInput>,
}

/// Revenue strategy selection; rolling-average history is read from the data source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RevenueRequest {
    DirectRatio {
        actual_revenue: Decimal,
    },
    #[default]
    RollingAverage,
}

/// Service composing the data source, observer, and evaluation engine.
pub struct CompensationService<S, O> {
    source: Arc<S>,
    observer: Arc<O>,
    engine: Arc<EvaluationEngine>,
}

impl<S, O> CompensationService<S, O>
where
    S: CompensationDataSource + 'static,
    O: EvaluationObserver + 'static,
{
    pub fn new(source: Arc<S>, observer: Arc<O>, config: EngineConfig) -> Self {
        Self {
            source,
            observer,
            engine: Arc::new(EvaluationEngine::new(config)),
        }
    }

    /// Look up every input for the request and run one evaluation.
    pub fn evaluate(
        &self,
        request: CompensationRequest,
    ) -> Result<CompensationResult, CompensationServiceError> {
        let CompensationRequest {
            employee_id,
            period,
            revenue,
            qualitative_scores,
        } = request;

        let employee = self
            .source
            .employee(&employee_id)?
            .ok_or_else(|| EvaluationError::not_found("employee", employee_id.to_string()))?;
        let band = self
            .source
            .salary_band(&employee.role)?
            .ok_or_else(|| EvaluationError::not_found("salary band", employee.role.clone()))?;
        let rule = self
            .source
            .compensation_rule(period.year)?
            .ok_or_else(|| EvaluationError::not_found("compensation rule", period.to_string()))?;

        let qualitative = match qualitative_scores {
            Some(scores) => scores,
            None => self
                .source
                .qualitative_scores(&employee_id, period)?
                .ok_or_else(|| {
                    EvaluationError::invalid(format!(
                        "no qualitative scores for employee {employee_id} in {period}"
                    ))
                })?,
        };
        if let Some((dimension, value)) = qualitative.out_of_range() {
            return Err(EvaluationError::invalid(format!(
                "{dimension} score {value} must be between 0 and 1"
            ))
            .into());
        }

        let funds = self.source.fund_performance(&employee_id, period)?;
        let revenue = match revenue {
            RevenueRequest::DirectRatio { actual_revenue } => {
                RevenueInputs::DirectRatio { actual_revenue }
            }
            RevenueRequest::RollingAverage => RevenueInputs::RollingAverage {
                records: self.source.team_revenue(&employee_id, period)?,
            },
        };
        debug!(
            %employee_id,
            %period,
            rule_year = rule.year,
            funds = funds.len(),
            "evaluation inputs resolved"
        );

        let result = self.engine.evaluate(
            EvaluationInputs {
                employee: &employee,
                band: &band,
                rule: &rule,
                period,
                funds: &funds,
                qualitative: &qualitative,
                revenue: &revenue,
            },
            self.observer.as_ref(),
        )?;

        info!(
            %employee_id,
            %period,
            bonus = %result.bonus,
            total_comp = %result.total_comp,
            breaches = ?result.breaches.labels(),
            "compensation calculated"
        );
        Ok(result)
    }

    /// Rolling-average evaluation using stored scores, for the employee breakdown view.
    pub fn breakdown(
        &self,
        employee_id: &EmployeeId,
        period: ReviewPeriod,
    ) -> Result<CompensationResult, CompensationServiceError> {
        self.evaluate(CompensationRequest {
            employee_id: employee_id.clone(),
            period,
            revenue: RevenueRequest::RollingAverage,
            qualitative_scores: None,
        })
    }
}

impl<S, O> CompensationService<S, O>
where
    S: CompensationStore + 'static,
    O: EvaluationObserver + 'static,
{
    /// Parse a team revenue CSV export and upsert every row.
    pub fn import_team_revenue<R: Read>(
        &self,
        reader: R,
    ) -> Result<usize, CompensationServiceError> {
        let rows = parse_team_revenue(reader)?;
        let stored = self.source.record_team_revenue(rows)?;
        info!(rows = stored, "team revenue imported");
        Ok(stored)
    }

    pub fn record_qualitative(
        &self,
        employee_id: &EmployeeId,
        submission: QualitativeSubmission,
    ) -> Result<ReviewPeriod, CompensationServiceError> {
        let (period, scores) = submission.validate()?;
        if self.source.employee(employee_id)?.is_none() {
            return Err(EvaluationError::not_found("employee", employee_id.to_string()).into());
        }

        self.source
            .record_qualitative_scores(employee_id, period, scores)?;
        info!(%employee_id, %period, "qualitative scores recorded");
        Ok(period)
    }
}

/// Error raised by the compensation service.
#[derive(Debug, thiserror::Error)]
pub enum CompensationServiceError {
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Ingest(#[from] IngestError),
}
