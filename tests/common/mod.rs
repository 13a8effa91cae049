#![allow(dead_code)]

use chrono::NaiveDate;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use tradesim::domain::decision::RawDecision;
use tradesim::domain::error::TradesimError;
use tradesim::domain::indicators::{self, IndicatorReport};
use tradesim::domain::portfolio::{PortfolioState, SizingPolicy};
use tradesim::domain::run::{Run, RunConfig};
pub use tradesim::domain::trading_day::{PriceBar, TradingDay};
use tradesim::ports::decision_port::DecisionPort;
use tradesim::ports::indicator_port::IndicatorPort;
use tradesim::ports::price_port::PricePort;
use tradesim::ports::run_store_port::RunStorePort;

pub struct MockPricePort {
    pub days: HashMap<String, Vec<TradingDay>>,
    pub errors: HashMap<String, String>,
}

impl MockPricePort {
    pub fn new() -> Self {
        Self {
            days: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_days(mut self, ticker: &str, days: Vec<TradingDay>) -> Self {
        self.days.insert(ticker.to_string(), days);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl PricePort for MockPricePort {
    fn get_price_series(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<TradingDay>, TradesimError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(TradesimError::Store {
                reason: reason.clone(),
            });
        }
        Ok(self
            .days
            .get(ticker)
            .map(|days| {
                days.iter()
                    .filter(|d| d.date >= start_date && d.date <= end_date)
                    .copied()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn fetch_bars(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, TradesimError> {
        let days = self.get_price_series(ticker, start_date, end_date)?;
        Ok(days
            .iter()
            .map(|d| PriceBar {
                ticker: ticker.to_string(),
                date: d.date,
                open: d.execution_price,
                high: d.execution_price,
                low: d.execution_price,
                close: d.execution_price,
                adj_close: d.execution_price,
                volume: 1000,
            })
            .collect())
    }

    fn list_tickers(&self) -> Result<Vec<String>, TradesimError> {
        let mut tickers: Vec<String> = self.days.keys().cloned().collect();
        tickers.sort();
        Ok(tickers)
    }

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TradesimError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(TradesimError::Store {
                reason: reason.clone(),
            });
        }
        match self.days.get(ticker) {
            Some(days) if !days.is_empty() => {
                let min = days.iter().map(|d| d.date).min().unwrap();
                let max = days.iter().map(|d| d.date).max().unwrap();
                Ok(Some((min, max, days.len())))
            }
            _ => Ok(None),
        }
    }
}

pub struct MockIndicatorPort {
    /// Values included in every report.
    pub values: BTreeMap<String, f64>,
    /// Values handed back on reflection, filtered to the requested names.
    pub reflect_values: BTreeMap<String, f64>,
    pub reflect_calls: Cell<usize>,
    pub reflect_fails: bool,
    /// Error instead of a report on this as-of date.
    pub fail_on: Option<NaiveDate>,
}

impl MockIndicatorPort {
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
            reflect_values: BTreeMap::new(),
            reflect_calls: Cell::new(0),
            reflect_fails: false,
            fail_on: None,
        }
    }

    /// All nine expected indicators present, so no reflection is triggered.
    pub fn complete() -> Self {
        let mut port = Self::new();
        for name in indicators::EXPECTED_INDICATORS {
            port.values.insert(name.to_string(), 1.0);
        }
        port
    }

    pub fn with_value(mut self, name: &str, value: f64) -> Self {
        self.values.insert(name.to_string(), value);
        self
    }

    pub fn with_reflect_value(mut self, name: &str, value: f64) -> Self {
        self.reflect_values.insert(name.to_string(), value);
        self
    }

    pub fn with_failing_reflect(mut self) -> Self {
        self.reflect_fails = true;
        self
    }

    pub fn failing_on(mut self, date: NaiveDate) -> Self {
        self.fail_on = Some(date);
        self
    }
}

impl IndicatorPort for MockIndicatorPort {
    fn get_indicators(
        &self,
        ticker: &str,
        as_of: NaiveDate,
    ) -> Result<IndicatorReport, TradesimError> {
        if self.fail_on == Some(as_of) {
            return Err(TradesimError::Provider {
                provider: "indicator".to_string(),
                reason: format!("no indicator data for {}", as_of),
            });
        }
        let mut report = IndicatorReport::new(ticker, as_of);
        for (name, value) in &self.values {
            report.set(name, *value);
        }
        Ok(report)
    }

    fn reflect(
        &self,
        _ticker: &str,
        _as_of: NaiveDate,
        missing: &[String],
    ) -> Result<BTreeMap<String, f64>, TradesimError> {
        self.reflect_calls.set(self.reflect_calls.get() + 1);
        if self.reflect_fails {
            return Err(TradesimError::Provider {
                provider: "indicator".to_string(),
                reason: "reflection unavailable".to_string(),
            });
        }
        Ok(self
            .reflect_values
            .iter()
            .filter(|(name, _)| missing.contains(name))
            .map(|(name, value)| (name.clone(), *value))
            .collect())
    }
}

pub struct MockDecisionPort {
    /// Decision per as-of date; the default applies to unscripted dates.
    pub script: BTreeMap<NaiveDate, RawDecision>,
    pub default: RawDecision,
    /// Error instead of a decision on this as-of date.
    pub fail_on: Option<NaiveDate>,
}

impl MockDecisionPort {
    pub fn holding() -> Self {
        Self {
            script: BTreeMap::new(),
            default: raw_decision("HOLD", 0.0),
            fail_on: None,
        }
    }

    pub fn with_decision(mut self, date: NaiveDate, raw: RawDecision) -> Self {
        self.script.insert(date, raw);
        self
    }

    pub fn failing_on(mut self, date: NaiveDate) -> Self {
        self.fail_on = Some(date);
        self
    }
}

impl DecisionPort for MockDecisionPort {
    fn get_decision(
        &self,
        report: &IndicatorReport,
        _state: &PortfolioState,
    ) -> Result<RawDecision, TradesimError> {
        if self.fail_on == Some(report.as_of) {
            return Err(TradesimError::Provider {
                provider: "decision".to_string(),
                reason: format!("decision service unreachable on {}", report.as_of),
            });
        }
        Ok(self
            .script
            .get(&report.as_of)
            .cloned()
            .unwrap_or_else(|| self.default.clone()))
    }
}

pub struct MemoryRunStore {
    pub saved: RefCell<Vec<Run>>,
    pub fail: bool,
}

impl MemoryRunStore {
    pub fn new() -> Self {
        Self {
            saved: RefCell::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            saved: RefCell::new(Vec::new()),
            fail: true,
        }
    }

    pub fn saved_runs(&self) -> Vec<Run> {
        self.saved.borrow().clone()
    }
}

impl RunStorePort for MemoryRunStore {
    fn save_run(&self, run: &Run) -> Result<PathBuf, TradesimError> {
        if self.fail {
            return Err(TradesimError::Store {
                reason: "store offline".to_string(),
            });
        }
        self.saved.borrow_mut().push(run.clone());
        Ok(PathBuf::from(format!("memory/{}.json", run.ticker)))
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_day(date: NaiveDate, price: f64) -> TradingDay {
    TradingDay {
        date,
        execution_price: price,
    }
}

pub fn generate_days(start: NaiveDate, count: usize, start_price: f64) -> Vec<TradingDay> {
    (0..count)
        .map(|i| TradingDay {
            date: start + chrono::Duration::days(i as i64),
            execution_price: start_price + i as f64,
        })
        .collect()
}

pub fn raw_decision(action: &str, target: f64) -> RawDecision {
    RawDecision {
        action: action.to_string(),
        target_position: target,
        justification: format!("scripted {}", action),
    }
}

pub fn sample_run_config(ticker: &str, start: NaiveDate, end: NaiveDate) -> RunConfig {
    RunConfig {
        ticker: ticker.to_string(),
        start_date: start,
        end_date: end,
        initial_cash: 10_000.0,
        transaction_cost_rate: 0.0,
        sizing: SizingPolicy::OneShare,
    }
}
