//! Price-series indicator adapter.
//!
//! Derives the price-based indicators (last_price, total_return, volatility)
//! from the same price source the simulation executes against, using only
//! data on or before the as-of date. Fundamental indicators have no source
//! here and stay absent, which downstream decision providers must tolerate.

use crate::domain::error::TradesimError;
use crate::domain::indicators::{self, IndicatorReport};
use crate::domain::metrics::TRADING_DAYS_PER_YEAR;
use crate::ports::indicator_port::IndicatorPort;
use crate::ports::price_port::PricePort;
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;
use std::sync::Arc;

pub struct SeriesIndicatorAdapter {
    prices: Arc<dyn PricePort>,
    window: usize,
}

impl SeriesIndicatorAdapter {
    pub fn new(prices: Arc<dyn PricePort>, window: usize) -> Self {
        Self { prices, window }
    }

    /// Last `window` execution prices at or before `as_of`, oldest first.
    /// The calendar lookback is padded because weekends and holidays thin
    /// out the trading days.
    fn window_prices(
        &self,
        ticker: &str,
        as_of: NaiveDate,
    ) -> Result<Vec<f64>, TradesimError> {
        let lookback = Duration::days(self.window as i64 * 3 + 7);
        let start = as_of - lookback;
        let days = self.prices.get_price_series(ticker, start, as_of)?;

        let mut prices: Vec<f64> = days.iter().map(|d| d.execution_price).collect();
        if prices.len() > self.window {
            prices.drain(..prices.len() - self.window);
        }
        Ok(prices)
    }

    fn derive(prices: &[f64]) -> BTreeMap<String, f64> {
        let mut values = BTreeMap::new();

        if let Some(last) = prices.last() {
            values.insert(indicators::LAST_PRICE.to_string(), *last);
        }

        if prices.len() >= 2 {
            let first = prices[0];
            let last = prices[prices.len() - 1];
            if first > 0.0 {
                values.insert(indicators::TOTAL_RETURN.to_string(), last / first - 1.0);
            }

            let returns: Vec<f64> = prices
                .windows(2)
                .map(|w| if w[0] > 0.0 { (w[1] - w[0]) / w[0] } else { 0.0 })
                .collect();
            let n = returns.len() as f64;
            let mean: f64 = returns.iter().sum::<f64>() / n;
            let variance: f64 = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
            values.insert(
                indicators::VOLATILITY.to_string(),
                variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt(),
            );
        }

        values
    }
}

impl IndicatorPort for SeriesIndicatorAdapter {
    fn get_indicators(
        &self,
        ticker: &str,
        as_of: NaiveDate,
    ) -> Result<IndicatorReport, TradesimError> {
        let prices = self.window_prices(ticker, as_of)?;

        let mut report = IndicatorReport::new(ticker, as_of);
        for (name, value) in Self::derive(&prices) {
            report.set(&name, value);
        }
        report.notes = format!(
            "derived from {} trading days ending {}; fundamentals unavailable from price data",
            prices.len(),
            as_of
        );
        Ok(report)
    }

    fn reflect(
        &self,
        ticker: &str,
        as_of: NaiveDate,
        missing: &[String],
    ) -> Result<BTreeMap<String, f64>, TradesimError> {
        let prices = self.window_prices(ticker, as_of)?;
        let mut recovered = Self::derive(&prices);
        recovered.retain(|name, _| missing.iter().any(|m| m == name));
        Ok(recovered)
    }
}
