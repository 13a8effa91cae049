//! Price data access port trait.

use crate::domain::error::TradesimError;
use crate::domain::trading_day::{PriceBar, TradingDay};
use chrono::NaiveDate;

pub trait PricePort {
    /// Returns one [`TradingDay`] per session with data in the inclusive
    /// range, in ascending date order. An empty vector means no data.
    fn get_price_series(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<TradingDay>, TradesimError>;

    /// Full bars for the same range, for callers that need more than the
    /// execution price (indicator lookbacks, imports).
    fn fetch_bars(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, TradesimError>;

    fn list_tickers(&self) -> Result<Vec<String>, TradesimError>;

    /// First date, last date, and row count for a ticker, or `None` when
    /// the source holds nothing for it.
    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TradesimError>;
}
