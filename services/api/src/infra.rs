use chrono::NaiveDate;
use comp_engine::compensation::{
    CompensationDataSource, CompensationRule, CompensationStore, EmployeeFacts, EmployeeId,
    FundPerformanceRecord, QualitativeScoreInput, RepositoryError, ReviewPeriod, SalaryBand,
    TeamRevenueRecord,
};
use metrics_exporter_prometheus::PrometheusHandle;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Fiscal year the seeded demo data is anchored on.
pub(crate) const DEMO_YEAR: i32 = 2025;

#[derive(Default, Clone)]
pub(crate) struct InMemoryCompensationStore {
    employees: Arc<Mutex<HashMap<EmployeeId, EmployeeFacts>>>,
    bands: Arc<Mutex<HashMap<String, SalaryBand>>>,
    rules: Arc<Mutex<Vec<CompensationRule>>>,
    funds: Arc<Mutex<HashMap<EmployeeId, Vec<FundPerformanceRecord>>>>,
    revenue: Arc<Mutex<BTreeMap<(String, i32), TeamRevenueRecord>>>,
    qualitative: Arc<Mutex<HashMap<(EmployeeId, ReviewPeriod), QualitativeScoreInput>>>,
}

impl InMemoryCompensationStore {
    /// Store preloaded with two portfolio managers sharing a two-fund book.
    pub(crate) fn demo() -> Self {
        let store = Self::default();
        let role = "Portfolio Manager";
        let funds = demo_funds();

        {
            let mut bands = store.bands.lock().expect("store mutex poisoned");
            bands.insert(
                role.to_string(),
                SalaryBand {
                    role: role.to_string(),
                    min_salary: Decimal::from(90_000),
                    max_salary: Decimal::from(150_000),
                },
            );
        }
        {
            let mut rules = store.rules.lock().expect("store mutex poisoned");
            rules.push(demo_rule(DEMO_YEAR - 1, 0.25));
            rules.push(demo_rule(DEMO_YEAR, 0.30));
        }

        let staff = [
            ("EMP001", "Sample Employee", 100_000, (2019, 4, 1)),
            ("EMP002", "Senior Employee", 160_000, (2014, 1, 6)),
        ];
        for (id, name, base_salary, (year, month, day)) in staff {
            let id = EmployeeId(id.to_string());
            let hire_date = NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN);
            store.employees.lock().expect("store mutex poisoned").insert(
                id.clone(),
                EmployeeFacts {
                    id: id.clone(),
                    name: name.to_string(),
                    role: role.to_string(),
                    base_salary: Decimal::from(base_salary),
                    hire_date,
                },
            );
            store
                .funds
                .lock()
                .expect("store mutex poisoned")
                .insert(id.clone(), funds.clone());
            store.qualitative.lock().expect("store mutex poisoned").insert(
                (id, ReviewPeriod::year(DEMO_YEAR)),
                QualitativeScoreInput::complete(0.85, 0.90, 0.75, 0.80, 0.85),
            );
        }

        {
            let mut revenue = store.revenue.lock().expect("store mutex poisoned");
            for row in demo_team_revenue() {
                revenue.insert((row.fund_id.clone(), row.year), row);
            }
        }

        store
    }
}

fn demo_rule(year: i32, target_bonus_percent: f64) -> CompensationRule {
    CompensationRule {
        year,
        target_bonus_percent,
        rev_adjust_low: 0.8,
        rev_adjust_high: 1.2,
        rev_adjust_reference: 1_000_000.0,
        mrt_cap_percent: 2.0,
    }
}

fn demo_funds() -> Vec<FundPerformanceRecord> {
    vec![
        FundPerformanceRecord {
            fund_id: "UKEF001".to_string(),
            fund_name: Some("UK Equity Fund".to_string()),
            returns_1yr: 0.0725,
            benchmark_1yr: 0.0650,
            returns_3yr: 0.2150,
            benchmark_3yr: 0.1950,
            tracking_error_1yr: 0.012,
            tracking_error_3yr: 0.015,
            aum_weight: 0.65,
        },
        FundPerformanceRecord {
            fund_id: "GFIF002".to_string(),
            fund_name: Some("Global Fixed Income Fund".to_string()),
            returns_1yr: 0.032,
            benchmark_1yr: 0.028,
            returns_3yr: 0.095,
            benchmark_3yr: 0.085,
            tracking_error_1yr: 0.008,
            tracking_error_3yr: 0.009,
            aum_weight: 0.35,
        },
    ]
}

fn demo_team_revenue() -> Vec<TeamRevenueRecord> {
    let fees: [(&str, [(i64, i64); 4]); 2] = [
        (
            "UKEF001",
            [
                (2_200_000, 800_000),
                (2_100_000, 700_000),
                (2_000_000, 600_000),
                (1_900_000, 500_000),
            ],
        ),
        (
            "GFIF002",
            [
                (1_800_000, 200_000),
                (1_700_000, 150_000),
                (1_600_000, 100_000),
                (1_500_000, 50_000),
            ],
        ),
    ];

    fees.iter()
        .flat_map(|(fund_id, years)| {
            years
                .iter()
                .enumerate()
                .map(move |(offset, (management, performance))| TeamRevenueRecord {
                    fund_id: fund_id.to_string(),
                    year: DEMO_YEAR - offset as i32,
                    management_fees: Decimal::from(*management),
                    performance_fees: Decimal::from(*performance),
                })
        })
        .collect()
}

impl CompensationDataSource for InMemoryCompensationStore {
    fn employee(&self, id: &EmployeeId) -> Result<Option<EmployeeFacts>, RepositoryError> {
        let guard = self.employees.lock().expect("store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn salary_band(&self, role: &str) -> Result<Option<SalaryBand>, RepositoryError> {
        let guard = self.bands.lock().expect("store mutex poisoned");
        Ok(guard.get(role).cloned())
    }

    fn compensation_rules(&self) -> Result<Vec<CompensationRule>, RepositoryError> {
        let guard = self.rules.lock().expect("store mutex poisoned");
        Ok(guard.clone())
    }

    fn fund_performance(
        &self,
        id: &EmployeeId,
        _period: ReviewPeriod,
    ) -> Result<Vec<FundPerformanceRecord>, RepositoryError> {
        let guard = self.funds.lock().expect("store mutex poisoned");
        Ok(guard.get(id).cloned().unwrap_or_default())
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
        let guard = self.revenue.lock().expect("store mutex poisoned");
        Ok(guard
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
        let guard = self.qualitative.lock().expect("store mutex poisoned");
        Ok(guard.get(&(id.clone(), period)).cloned())
    }
}

impl CompensationStore for InMemoryCompensationStore {
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
        let mut guard = self.qualitative.lock().expect("store mutex poisoned");
        guard.insert((id.clone(), period), scores);
        Ok(())
    }
}

pub(crate) fn parse_period(raw: &str) -> Result<ReviewPeriod, String> {
    ReviewPeriod::from_str(raw).map_err(|err| err.to_string())
}

pub(crate) fn parse_amount(raw: &str) -> Result<Decimal, String> {
    Decimal::from_str(raw.trim())
        .map_err(|err| format!("failed to parse '{raw}' as a decimal amount ({err})"))
}
