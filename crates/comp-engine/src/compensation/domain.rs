use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Fatal evaluation failures. Data gaps never surface here; they are observer events.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvaluationError {
    #[error("{entity} '{key}' not found")]
    NotFound { entity: &'static str, key: String },
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl EvaluationError {
    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }

    pub fn invalid(detail: impl Into<String>) -> Self {
        Self::InvalidInput(detail.into())
    }
}

/// Identifier wrapper for employees under review.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub String);

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot of the employee as of the calculation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeFacts {
    pub id: EmployeeId,
    pub name: String,
    pub role: String,
    pub base_salary: Decimal,
    pub hire_date: NaiveDate,
}

/// Permissible base-salary range for a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryBand {
    pub role: String,
    pub min_salary: Decimal,
    pub max_salary: Decimal,
}

impl SalaryBand {
    pub fn contains(&self, salary: Decimal) -> bool {
        salary >= self.min_salary && salary <= self.max_salary
    }
}

/// Yearly bonus policy parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompensationRule {
    pub year: i32,
    pub target_bonus_percent: f64,
    pub rev_adjust_low: f64,
    pub rev_adjust_high: f64,
    pub rev_adjust_reference: f64,
    pub mrt_cap_percent: f64,
}

impl CompensationRule {
    pub fn validate(&self) -> Result<(), EvaluationError> {
        let finite = [
            self.target_bonus_percent,
            self.rev_adjust_low,
            self.rev_adjust_high,
            self.rev_adjust_reference,
            self.mrt_cap_percent,
        ]
        .iter()
        .all(|value| value.is_finite());
        if !finite {
            return Err(EvaluationError::invalid(format!(
                "compensation rule {} contains non-finite parameters",
                self.year
            )));
        }
        if self.target_bonus_percent < 0.0 || self.mrt_cap_percent < 0.0 {
            return Err(EvaluationError::invalid(format!(
                "compensation rule {} has a negative bonus or cap percentage",
                self.year
            )));
        }
        if self.rev_adjust_low > self.rev_adjust_high {
            return Err(EvaluationError::invalid(format!(
                "compensation rule {} revenue bounds are inverted ({} > {})",
                self.year, self.rev_adjust_low, self.rev_adjust_high
            )));
        }
        if self.rev_adjust_reference <= 0.0 {
            return Err(EvaluationError::invalid(format!(
                "compensation rule {} needs a positive revenue reference",
                self.year
            )));
        }
        Ok(())
    }
}

/// Performance horizon reported for each fund.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Horizon {
    OneYear,
    ThreeYear,
}

impl Horizon {
    pub fn label(self) -> &'static str {
        match self {
            Horizon::OneYear => "1yr",
            Horizon::ThreeYear => "3yr",
        }
    }
}

/// Fund returns and benchmarks as fractions (0.0725 = 7.25%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundPerformanceRecord {
    pub fund_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fund_name: Option<String>,
    pub returns_1yr: f64,
    pub benchmark_1yr: f64,
    pub returns_3yr: f64,
    pub benchmark_3yr: f64,
    pub tracking_error_1yr: f64,
    pub tracking_error_3yr: f64,
    pub aum_weight: f64,
}

impl FundPerformanceRecord {
    pub fn excess_return(&self, horizon: Horizon) -> f64 {
        match horizon {
            Horizon::OneYear => self.returns_1yr - self.benchmark_1yr,
            Horizon::ThreeYear => self.returns_3yr - self.benchmark_3yr,
        }
    }

    pub fn tracking_error(&self, horizon: Horizon) -> f64 {
        match horizon {
            Horizon::OneYear => self.tracking_error_1yr,
            Horizon::ThreeYear => self.tracking_error_3yr,
        }
    }
}

/// Fee revenue booked by one fund in one fiscal year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRevenueRecord {
    pub fund_id: String,
    pub year: i32,
    pub management_fees: Decimal,
    pub performance_fees: Decimal,
}

impl TeamRevenueRecord {
    pub fn total(&self) -> Decimal {
        self.management_fees + self.performance_fees
    }
}

/// Five review dimensions, each normalized to `[0, 1]`. Absent dimensions count as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualitativeScoreInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teamwork_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub esg_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_score: Option<f64>,
}

impl QualitativeScoreInput {
    pub fn complete(risk: f64, compliance: f64, teamwork: f64, esg: f64, client: f64) -> Self {
        Self {
            risk_score: Some(risk),
            compliance_score: Some(compliance),
            teamwork_score: Some(teamwork),
            esg_score: Some(esg),
            client_score: Some(client),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dimensions().iter().all(|(_, score)| score.is_none())
    }

    /// First supplied dimension outside `[0, 1]`, NaN included.
    pub fn out_of_range(&self) -> Option<(&'static str, f64)> {
        self.dimensions()
            .into_iter()
            .find_map(|(dimension, score)| match score {
                Some(value) if !(0.0..=1.0).contains(&value) => Some((dimension, value)),
                _ => None,
            })
    }

    pub fn dimensions(&self) -> [(&'static str, Option<f64>); 5] {
        [
            ("risk", self.risk_score),
            ("compliance", self.compliance_score),
            ("teamwork", self.teamwork_score),
            ("esg", self.esg_score),
            ("client", self.client_score),
        ]
    }
}

/// Review period expressed as `YYYY` or `YYYY-QN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReviewPeriod {
    pub year: i32,
    pub quarter: Option<u8>,
}

impl ReviewPeriod {
    pub fn year(year: i32) -> Self {
        Self {
            year,
            quarter: None,
        }
    }
}

impl FromStr for ReviewPeriod {
    type Err = EvaluationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let invalid = || {
            EvaluationError::invalid(format!(
                "review period '{raw}' must be formatted as YYYY or YYYY-QN"
            ))
        };

        let (year_part, quarter) = match trimmed.split_once('-') {
            Some((year, quarter)) => {
                let digit = quarter
                    .strip_prefix('Q')
                    .or_else(|| quarter.strip_prefix('q'))
                    .ok_or_else(invalid)?;
                let quarter: u8 = digit.parse().map_err(|_| invalid())?;
                if !(1..=4).contains(&quarter) {
                    return Err(invalid());
                }
                (year, Some(quarter))
            }
            None => (trimmed, None),
        };

        if year_part.len() != 4 || !year_part.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let year = year_part.parse().map_err(|_| invalid())?;

        Ok(Self { year, quarter })
    }
}

impl fmt::Display for ReviewPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.quarter {
            Some(quarter) => write!(f, "{:04}-Q{}", self.year, quarter),
            None => write!(f, "{:04}", self.year),
        }
    }
}

impl Serialize for ReviewPeriod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ReviewPeriod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Policy breach tags reported alongside the bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Breach {
    SalaryBand,
    MrtCap,
}

impl Breach {
    pub fn label(self) -> &'static str {
        match self {
            Breach::SalaryBand => "salary_band",
            Breach::MrtCap => "mrt_cap",
        }
    }
}

/// Ordered, duplicate-free breach list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Breaches(Vec<Breach>);

impl Breaches {
    pub fn record(&mut self, breach: Breach) {
        if !self.0.contains(&breach) {
            self.0.push(breach);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Breach] {
        &self.0
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, breach: Breach) -> bool {
        self.0.contains(&breach)
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.0.iter().map(|breach| breach.label()).collect()
    }
}
