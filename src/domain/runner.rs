//! The daily simulation loop.
//!
//! One run walks a ticker's trading days strictly in ascending date order.
//! Each day: fetch the indicator report (with at most one reflection retry
//! for absent values), fetch and validate a decision (downgrading invalid
//! payloads to an annotated HOLD), apply it to the portfolio, and append a
//! trajectory record. The run document is persisted exactly once, at
//! completion, cancellation, or failure.

use log::{info, warn};
use std::sync::atomic::{AtomicBool, Ordering};

use super::decision::{self, Decision};
use super::error::TradesimError;
use super::portfolio::{self, PortfolioState};
use super::run::{Run, RunConfig, RunStatus, TrajectoryRecord};
use crate::ports::decision_port::DecisionPort;
use crate::ports::indicator_port::IndicatorPort;
use crate::ports::price_port::PricePort;
use crate::ports::run_store_port::RunStorePort;

/// Where a finished run landed.
#[derive(Debug)]
pub struct RunOutcome {
    pub run: Run,
    pub path: std::path::PathBuf,
}

/// Drive one full simulation run.
///
/// Collaborator failures while fetching indicators or decisions stop the
/// run; the trajectory recorded so far is persisted with `status = failed`
/// and the reason. An empty trading-day sequence is a [`TradesimError::NoData`]
/// and persists nothing. The cancellation flag is checked before each day;
/// once observed set, the partial run is flushed as `cancelled`.
pub fn run_simulation(
    config: &RunConfig,
    price_port: &dyn PricePort,
    indicator_port: &dyn IndicatorPort,
    decision_port: &dyn DecisionPort,
    run_store: &dyn RunStorePort,
    cancel: &AtomicBool,
) -> Result<RunOutcome, TradesimError> {
    let ticker = &config.ticker;

    let mut days = price_port.get_price_series(ticker, config.start_date, config.end_date)?;
    if days.is_empty() {
        return Err(TradesimError::NoData {
            ticker: ticker.clone(),
            start: config.start_date,
            end: config.end_date,
        });
    }
    days.sort_by_key(|d| d.date);

    info!(
        "{}: {} trading days from {} to {}",
        ticker,
        days.len(),
        days[0].date,
        days[days.len() - 1].date
    );

    let mut portfolio = PortfolioState::new(config.initial_cash);
    let mut prev_value: Option<f64> = None;
    let mut trajectory: Vec<TrajectoryRecord> = Vec::with_capacity(days.len());
    let mut status = RunStatus::Completed;
    let mut failure: Option<String> = None;

    for day in &days {
        if cancel.load(Ordering::Relaxed) {
            warn!("{}: cancelled after {} days", ticker, trajectory.len());
            status = RunStatus::Cancelled;
            break;
        }

        // Indicators, with one reflection pass for absent values.
        let mut report = match indicator_port.get_indicators(ticker, day.date) {
            Ok(r) => r,
            Err(e) => {
                warn!("{} {}: indicator fetch failed: {e}", ticker, day.date);
                status = RunStatus::Failed;
                failure = Some(e.to_string());
                break;
            }
        };
        let missing = report.missing_indicators();
        if !missing.is_empty() {
            match indicator_port.reflect(ticker, day.date, &missing) {
                Ok(filled) => report.merge_filled(&filled),
                Err(e) => {
                    warn!("{} {}: reflection failed: {e}", ticker, day.date);
                }
            }
        }

        // Decision, validated at the boundary.
        let raw = match decision_port.get_decision(&report, &portfolio) {
            Ok(r) => r,
            Err(e) => {
                warn!("{} {}: decision fetch failed: {e}", ticker, day.date);
                status = RunStatus::Failed;
                failure = Some(e.to_string());
                break;
            }
        };
        let decision = match decision::validate(&raw) {
            Ok(d) => d,
            Err(reason) => {
                warn!("{} {}: invalid decision ({reason}), recording HOLD", ticker, day.date);
                Decision::hold(format!("validation failure: {reason}"))
            }
        };

        // Execute and record.
        let outcome = portfolio::apply_decision(
            &portfolio,
            &decision,
            day.execution_price,
            config.transaction_cost_rate,
            config.sizing,
        );
        let new_value = outcome.state.portfolio_value();
        let daily_return = match prev_value {
            Some(prev) if prev > 0.0 => (new_value - prev) / prev,
            _ => 0.0,
        };

        info!(
            "{} {}: {} traded {} @ {:.2}, value {:.2}",
            ticker, day.date, decision.action, outcome.shares_traded, day.execution_price, new_value
        );

        trajectory.push(TrajectoryRecord {
            date: day.date,
            execution_price: day.execution_price,
            decision,
            shares_traded: outcome.shares_traded,
            transaction_cost: outcome.transaction_cost,
            state: outcome.state.clone(),
            portfolio_value: new_value,
            daily_return,
        });

        portfolio = outcome.state;
        prev_value = Some(new_value);
    }

    let run = Run {
        ticker: ticker.clone(),
        config: config.clone(),
        status,
        failure,
        test_start: config.start_date,
        test_end: config.end_date,
        trajectory,
    };

    let path = run_store.save_run(&run)?;
    info!("{}: run saved to {}", ticker, path.display());

    Ok(RunOutcome { run, path })
}
