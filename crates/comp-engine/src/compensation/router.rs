use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{EmployeeId, EvaluationError, ReviewPeriod};
use super::ingest::QualitativeSubmission;
use super::observer::EvaluationObserver;
use super::repository::{CompensationStore, RepositoryError};
use super::service::{CompensationRequest, CompensationService, CompensationServiceError};

/// Router builder exposing calculation and admin ingestion endpoints.
pub fn compensation_router<S, O>(service: Arc<CompensationService<S, O>>) -> Router
where
    S: CompensationStore + 'static,
    O: EvaluationObserver + 'static,
{
    Router::new()
        .route(
            "/api/v1/compensation/calculate",
            post(calculate_handler::<S, O>),
        )
        .route(
            "/api/v1/employees/:employee_id/compensation",
            get(breakdown_handler::<S, O>),
        )
        .route(
            "/api/v1/admin/team-revenue",
            post(team_revenue_handler::<S, O>),
        )
        .route(
            "/api/v1/admin/qualitative/:employee_id",
            post(qualitative_handler::<S, O>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct BreakdownQuery {
    period: String,
}

pub(crate) async fn calculate_handler<S, O>(
    State(service): State<Arc<CompensationService<S, O>>>,
    axum::Json(request): axum::Json<CompensationRequest>,
) -> Response
where
    S: CompensationStore + 'static,
    O: EvaluationObserver + 'static,
{
    match service.evaluate(request) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn breakdown_handler<S, O>(
    State(service): State<Arc<CompensationService<S, O>>>,
    Path(employee_id): Path<String>,
    Query(query): Query<BreakdownQuery>,
) -> Response
where
    S: CompensationStore + 'static,
    O: EvaluationObserver + 'static,
{
    let period = match ReviewPeriod::from_str(&query.period) {
        Ok(period) => period,
        Err(error) => return error_response(error.into()),
    };

    match service.breakdown(&EmployeeId(employee_id), period) {
        Ok(result) => {
            let payload = json!({
                "employee_id": result.employee_id,
                "period": result.period,
                "bonus": result.bonus,
                "total_comp": result.total_comp,
                "breaches": result.breaches,
                "breakdown": result.breakdown,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn team_revenue_handler<S, O>(
    State(service): State<Arc<CompensationService<S, O>>>,
    body: String,
) -> Response
where
    S: CompensationStore + 'static,
    O: EvaluationObserver + 'static,
{
    match service.import_team_revenue(body.as_bytes()) {
        Ok(rows) => {
            let payload = json!({
                "status": "imported",
                "rows": rows,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn qualitative_handler<S, O>(
    State(service): State<Arc<CompensationService<S, O>>>,
    Path(employee_id): Path<String>,
    axum::Json(submission): axum::Json<QualitativeSubmission>,
) -> Response
where
    S: CompensationStore + 'static,
    O: EvaluationObserver + 'static,
{
    let id = EmployeeId(employee_id);
    match service.record_qualitative(&id, submission) {
        Ok(period) => {
            let payload = json!({
                "status": "recorded",
                "employee_id": id,
                "review_period": period,
            });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: CompensationServiceError) -> Response {
    let status = match &error {
        CompensationServiceError::Evaluation(EvaluationError::NotFound { .. }) => {
            StatusCode::NOT_FOUND
        }
        CompensationServiceError::Evaluation(EvaluationError::InvalidInput(_))
        | CompensationServiceError::Ingest(_) => StatusCode::UNPROCESSABLE_ENTITY,
        CompensationServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
