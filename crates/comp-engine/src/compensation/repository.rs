use super::domain::{
    CompensationRule, EmployeeFacts, EmployeeId, FundPerformanceRecord, QualitativeScoreInput,
    ReviewPeriod, SalaryBand, TeamRevenueRecord,
};

/// Read side of the compensation data store, so the service can be exercised in isolation.
pub trait CompensationDataSource: Send + Sync {
    fn employee(&self, id: &EmployeeId) -> Result<Option<EmployeeFacts>, RepositoryError>;
    fn salary_band(&self, role: &str) -> Result<Option<SalaryBand>, RepositoryError>;
    fn compensation_rules(&self) -> Result<Vec<CompensationRule>, RepositoryError>;

    fn compensation_rule(&self, year: i32) -> Result<Option<CompensationRule>, RepositoryError> {
        let rules = self.compensation_rules()?;
        Ok(select_rule(&rules, year).cloned())
    }

    fn fund_performance(
        &self,
        id: &EmployeeId,
        period: ReviewPeriod,
    ) -> Result<Vec<FundPerformanceRecord>, RepositoryError>;

    /// Fee rows for every fund the employee's team manages, across all stored years.
    fn team_revenue(
        &self,
        id: &EmployeeId,
        period: ReviewPeriod,
    ) -> Result<Vec<TeamRevenueRecord>, RepositoryError>;

    fn qualitative_scores(
        &self,
        id: &EmployeeId,
        period: ReviewPeriod,
    ) -> Result<Option<QualitativeScoreInput>, RepositoryError>;
}

/// Write side used by the admin ingestion endpoints.
pub trait CompensationStore: CompensationDataSource {
    /// Upserts rows keyed by fund and year; returns how many were stored.
    fn record_team_revenue(&self, rows: Vec<TeamRevenueRecord>) -> Result<usize, RepositoryError>;

    fn record_qualitative_scores(
        &self,
        id: &EmployeeId,
        period: ReviewPeriod,
        scores: QualitativeScoreInput,
    ) -> Result<(), RepositoryError>;
}

/// Exact year if present, else the most recent year before it.
pub fn select_rule(rules: &[CompensationRule], year: i32) -> Option<&CompensationRule> {
    rules
        .iter()
        .filter(|rule| rule.year <= year)
        .max_by_key(|rule| rule.year)
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
