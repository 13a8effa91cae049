//! The persisted run document.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::decision::Decision;
use super::portfolio::{PortfolioState, SizingPolicy};

/// Simulation parameters echoed into the persisted document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub ticker: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_cash: f64,
    pub transaction_cost_rate: f64,
    pub sizing: SizingPolicy,
}

/// Terminal status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Completed,
    Failed,
    Cancelled,
}

/// One trading day's outcome. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryRecord {
    pub date: NaiveDate,
    pub execution_price: f64,
    pub decision: Decision,
    pub shares_traded: i64,
    pub transaction_cost: f64,
    pub state: PortfolioState,
    pub portfolio_value: f64,
    pub daily_return: f64,
}

/// A whole simulation run: configuration, outcome, and the ordered
/// trajectory. Written once at run close, never mutated afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub ticker: String,
    pub config: RunConfig,
    pub status: RunStatus,
    /// Reason the run stopped early; present only for failed runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    pub test_start: NaiveDate,
    pub test_end: NaiveDate,
    pub trajectory: Vec<TrajectoryRecord>,
}

impl Run {
    pub fn is_completed(&self) -> bool {
        self.status == RunStatus::Completed
    }
}
