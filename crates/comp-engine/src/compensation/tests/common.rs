use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::compensation::domain::{
    CompensationRule, EmployeeFacts, EmployeeId, FundPerformanceRecord, QualitativeScoreInput,
    ReviewPeriod, SalaryBand, TeamRevenueRecord,
};
use crate::compensation::observer::{DataGap, EvaluationEvent, EvaluationObserver};
use crate::compensation::repository::{CompensationDataSource, CompensationStore, RepositoryError};
use crate::compensation::{compensation_router, CompensationService, EngineConfig};

pub(super) const ROLE: &str = "Portfolio Manager";

pub(super) fn employee_id() -> EmployeeId {
    EmployeeId("EMP001".to_string())
}

pub(super) fn employee(base_salary: i64) -> EmployeeFacts {
    EmployeeFacts {
        id: employee_id(),
        name: "Alex Morgan".to_string(),
        role: ROLE.to_string(),
        base_salary: Decimal::from(base_salary),
        hire_date: NaiveDate::from_ymd_opt(2019, 4, 1).expect("valid date"),
    }
}

pub(super) fn band() -> SalaryBand {
    SalaryBand {
        role: ROLE.to_string(),
        min_salary: Decimal::from(90_000),
        max_salary: Decimal::from(150_000),
    }
}

pub(super) fn rule(year: i32) -> CompensationRule {
    CompensationRule {
        year,
        target_bonus_percent: 0.30,
        rev_adjust_low: 0.8,
        rev_adjust_high: 1.2,
        rev_adjust_reference: 1_000_000.0,
        mrt_cap_percent: 2.0,
    }
}

pub(super) fn period() -> ReviewPeriod {
    ReviewPeriod::year(2025)
}

/// Single fund beating its benchmark by the given alpha on both horizons.
pub(super) fn fund_with_alpha(
    fund_id: &str,
    alpha_bps: f64,
    aum_weight: f64,
) -> FundPerformanceRecord {
    let excess = alpha_bps / 10_000.0;
    FundPerformanceRecord {
        fund_id: fund_id.to_string(),
        fund_name: None,
        returns_1yr: 0.05 + excess,
        benchmark_1yr: 0.05,
        returns_3yr: 0.12 + excess,
        benchmark_3yr: 0.12,
        tracking_error_1yr: 0.012,
        tracking_error_3yr: 0.015,
        aum_weight,
    }
}

pub(super) fn strong_reviews() -> QualitativeScoreInput {
    QualitativeScoreInput::complete(0.85, 0.90, 0.75, 0.80, 0.85)
}

pub(super) fn middling_reviews() -> QualitativeScoreInput {
    QualitativeScoreInput::complete(0.5, 0.5, 0.5, 0.5, 0.5)
}

pub(super) fn revenue(
    fund_id: &str,
    year: i32,
    management: i64,
    performance: i64,
) -> TeamRevenueRecord {
    TeamRevenueRecord {
        fund_id: fund_id.to_string(),
        year,
        management_fees: Decimal::from(management),
        performance_fees: Decimal::from(performance),
    }
}

/// Y0..Y-3 totals for fund `F1`, newest first.
pub(super) fn revenue_history(totals: [i64; 4]) -> Vec<TeamRevenueRecord> {
    totals
        .iter()
        .enumerate()
        .map(|(offset, total)| revenue("F1", 2025 - offset as i32, *total, 0))
        .collect()
}

#[derive(Default)]
pub(super) struct Collected {
    events: Mutex<Vec<EvaluationEvent>>,
}

impl Collected {
    pub(super) fn events(&self) -> Vec<EvaluationEvent> {
        self.events.lock().expect("observer mutex poisoned").clone()
    }

    pub(super) fn gaps(&self) -> Vec<DataGap> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                EvaluationEvent::DataGap { gap, .. } => Some(gap),
                _ => None,
            })
            .collect()
    }

    pub(super) fn oversized_alerts(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, EvaluationEvent::OversizedPayout { .. }))
            .count()
    }
}

impl EvaluationObserver for Collected {
    fn observe(&self, event: EvaluationEvent) {
        self.events
            .lock()
            .expect("observer mutex poisoned")
            .push(event);
    }
}

#[derive(Default)]
pub(super) struct MemoryStore {
    employees: Mutex<HashMap<EmployeeId, EmployeeFacts>>,
    bands: Mutex<HashMap<String, SalaryBand>>,
    rules: Mutex<Vec<CompensationRule>>,
    funds: Mutex<HashMap<EmployeeId, Vec<FundPerformanceRecord>>>,
    revenue: Mutex<BTreeMap<(String, i32), TeamRevenueRecord>>,
    qualitative: Mutex<HashMap<(EmployeeId, ReviewPeriod), QualitativeScoreInput>>,
}

impl MemoryStore {
    /// EMP001 with one +400bps fund, strong 2025 reviews, and a 2025 rule.
    pub(super) fn seeded() -> Self {
        let store = Self::default();
        store.insert_employee(employee(100_000));
        store.insert_band(band());
        store.insert_rule(rule(2025));
        store.insert_funds(&employee_id(), vec![fund_with_alpha("F1", 400.0, 1.0)]);
        store.insert_qualitative(&employee_id(), period(), strong_reviews());
        store
            .record_team_revenue(revenue_history([3_000, 2_800, 2_600, 2_400]))
            .expect("seed revenue");
        store
    }

    pub(super) fn insert_employee(&self, employee: EmployeeFacts) {
        self.employees
            .lock()
            .expect("store mutex poisoned")
            .insert(employee.id.clone(), employee);
    }

    pub(super) fn insert_band(&self, band: SalaryBand) {
        self.bands
            .lock()
            .expect("store mutex poisoned")
            .insert(band.role.clone(), band);
    }

    pub(super) fn insert_rule(&self, rule: CompensationRule) {
        self.rules.lock().expect("store mutex poisoned").push(rule);
    }

    pub(super) fn clear_rules(&self) {
        self.rules.lock().expect("store mutex poisoned").clear();
    }

    pub(super) fn insert_funds(&self, id: &EmployeeId, funds: Vec<FundPerformanceRecord>) {
        self.funds
            .lock()
            .expect("store mutex poisoned")
            .insert(id.clone(), funds);
    }

    pub(super) fn insert_qualitative(
        &self,
        id: &EmployeeId,
        period: ReviewPeriod,
        scores: QualitativeScoreInput,
    ) {
        self.qualitative
            .lock()
            .expect("store mutex poisoned")
            .insert((id.clone(), period), scores);
    }

    pub(super) fn revenue_rows(&self) -> usize {
        self.revenue.lock().expect("store mutex poisoned").len()
    }
}

impl CompensationDataSource for MemoryStore {
    fn employee(&self, id: &EmployeeId) -> Result<Option<EmployeeFacts>, RepositoryError> {
        Ok(self
            .employees
            .lock()
            .expect("store mutex poisoned")
            .get(id)
            .cloned())
    }

    fn salary_band(&self, role: &str) -> Result<Option<SalaryBand>, RepositoryError> {
        Ok(self
            .bands
            .lock()
            .expect("store mutex poisoned")
            .get(role)
            .cloned())
    }

    fn compensation_rules(&self) -> Result<Vec<CompensationRule>, RepositoryError> {
        Ok(self.rules.lock().expect("store mutex poisoned").clone())
    }

    fn fund_performance(
        &self,
        id: &EmployeeId,
        _period: ReviewPeriod,
    ) -> Result<Vec<FundPerformanceRecord>, RepositoryError> {
        Ok(self
            .funds
            .lock()
            .expect("store mutex poisoned")
            .get(id)
            .cloned()
            .unwrap_or_default())
    }

    fn team_revenue(
        &self,
        id: &EmployeeId,
        period: ReviewPeriod,
    ) -> Result<Vec<TeamRevenueRecord>, RepositoryError> {
        let fund_ids: Vec<String> = self
            .fund_performance(id, period)?
            .into_iter()
            .map(|fund| fund.fund_id)
            .collect();
        Ok(self
            .revenue
            .lock()
            .expect("store mutex poisoned")
            .values()
            .filter(|row| fund_ids.contains(&row.fund_id))
            .cloned()
            .collect())
    }

    fn qualitative_scores(
        &self,
        id: &EmployeeId,
        period: ReviewPeriod,
    ) -> Result<Option<QualitativeScoreInput>, RepositoryError> {
        Ok(self
            .qualitative
            .lock()
            .expect("store mutex poisoned")
            .get(&(id.clone(), period))
            .cloned())
    }
}

impl CompensationStore for MemoryStore {
    fn record_team_revenue(&self, rows: Vec<TeamRevenueRecord>) -> Result<usize, RepositoryError> {
        let mut guard = self.revenue.lock().expect("store mutex poisoned");
        let count = rows.len();
        for row in rows {
            guard.insert((row.fund_id.clone(), row.year), row);
        }
        Ok(count)
    }

    fn record_qualitative_scores(
        &self,
        id: &EmployeeId,
        period: ReviewPeriod,
        scores: QualitativeScoreInput,
    ) -> Result<(), RepositoryError> {
        self.insert_qualitative(id, period, scores);
        Ok(())
    }
}

pub(super) struct UnavailableStore;

impl CompensationDataSource for UnavailableStore {
    fn employee(&self, _id: &EmployeeId) -> Result<Option<EmployeeFacts>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn salary_band(&self, _role: &str) -> Result<Option<SalaryBand>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn compensation_rules(&self) -> Result<Vec<CompensationRule>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fund_performance(
        &self,
        _id: &EmployeeId,
        _period: ReviewPeriod,
    ) -> Result<Vec<FundPerformanceRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn team_revenue(
        &self,
        _id: &EmployeeId,
        _period: ReviewPeriod,
    ) -> Result<Vec<TeamRevenueRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn qualitative_scores(
        &self,
        _id: &EmployeeId,
        _period: ReviewPeriod,
    ) -> Result<Option<QualitativeScoreInput>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

impl CompensationStore for UnavailableStore {
    fn record_team_revenue(&self, _rows: Vec<TeamRevenueRecord>) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn record_qualitative_scores(
        &self,
        _id: &EmployeeId,
        _period: ReviewPeriod,
        _scores: QualitativeScoreInput,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service() -> (
    CompensationService<MemoryStore, Collected>,
    Arc<MemoryStore>,
    Arc<Collected>,
) {
    let store = Arc::new(MemoryStore::seeded());
    let observer = Arc::new(Collected::default());
    let service =
        CompensationService::new(store.clone(), observer.clone(), EngineConfig::default());
    (service, store, observer)
}

pub(super) fn router_with_service(
    service: CompensationService<MemoryStore, Collected>,
) -> axum::Router {
    compensation_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
