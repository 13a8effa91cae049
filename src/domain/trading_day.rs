//! Daily price representations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One simulated trading day: the date and the price trades execute at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradingDay {
    pub date: NaiveDate,
    pub execution_price: f64,
}

/// One stored daily row for a ticker, as kept by the price adapters.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub ticker: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: i64,
}

/// Which stored price column becomes the execution price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceField {
    #[default]
    Close,
    AdjClose,
}

impl PriceField {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "close" => Some(PriceField::Close),
            "adj_close" => Some(PriceField::AdjClose),
            _ => None,
        }
    }

    pub fn select(&self, bar: &PriceBar) -> f64 {
        match self {
            PriceField::Close => bar.close,
            PriceField::AdjClose => bar.adj_close,
        }
    }
}

impl PriceBar {
    pub fn to_trading_day(&self, field: PriceField) -> TradingDay {
        TradingDay {
            date: self.date,
            execution_price: field.select(self),
        }
    }
}
