use std::io::Read;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::domain::{QualitativeScoreInput, ReviewPeriod, TeamRevenueRecord};

/// Parse a `fund_id,year,management_fees,performance_fees` export. Rows are 1-based.
pub fn parse_team_revenue<R: Read>(reader: R) -> Result<Vec<TeamRevenueRecord>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for (index, record) in csv_reader.deserialize::<TeamRevenueRow>().enumerate() {
        let row = record?;
        let number = index + 1;
        let management_fees = parse_fee(number, "management_fees", &row.management_fees)?;
        let performance_fees = parse_fee(number, "performance_fees", &row.performance_fees)?;

        records.push(TeamRevenueRecord {
            fund_id: row.fund_id,
            year: row.year,
            management_fees,
            performance_fees,
        });
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct TeamRevenueRow {
    fund_id: String,
    year: i32,
    management_fees: String,
    performance_fees: String,
}

fn parse_fee(row: usize, column: &'static str, raw: &str) -> Result<Decimal, IngestError> {
    let value = Decimal::from_str(raw).map_err(|_| IngestError::InvalidFee {
        row,
        column,
        value: raw.to_string(),
    })?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(IngestError::NegativeFee { row, column });
    }
    Ok(value)
}

/// Reviewer scores for one employee and review period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualitativeSubmission {
    pub review_period: String,
    pub risk_score: f64,
    pub compliance_score: f64,
    pub teamwork_score: f64,
    pub esg_score: f64,
    pub client_score: f64,
}

impl QualitativeSubmission {
    pub fn validate(&self) -> Result<(ReviewPeriod, QualitativeScoreInput), IngestError> {
        let period = ReviewPeriod::from_str(&self.review_period)
            .map_err(|_| IngestError::InvalidPeriod(self.review_period.clone()))?;
        let scores = QualitativeScoreInput::complete(
            self.risk_score,
            self.compliance_score,
            self.teamwork_score,
            self.esg_score,
            self.client_score,
        );

        if let Some((dimension, value)) = scores.out_of_range() {
            return Err(IngestError::ScoreOutOfRange { dimension, value });
        }

        Ok((period, scores))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("malformed team revenue csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: {column} '{value}' is not a decimal amount")]
    InvalidFee {
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("row {row}: {column} must not be negative")]
    NegativeFee { row: usize, column: &'static str },
    #[error("{dimension} {value} must be between 0 and 1")]
    ScoreOutOfRange { dimension: &'static str, value: f64 },
    #[error("review period '{0}' must be formatted as YYYY or YYYY-QN")]
    InvalidPeriod(String),
}
