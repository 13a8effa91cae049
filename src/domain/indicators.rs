//! Indicator report model.
//!
//! A report carries every expected indicator name, mapped to a value or to
//! an explicit absence. Absent is not zero: a provider that cannot supply a
//! value marks it missing and the decision layer sees the gap as-is.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const LAST_PRICE: &str = "last_price";
pub const TOTAL_RETURN: &str = "total_return";
pub const VOLATILITY: &str = "volatility";
pub const REVENUES: &str = "Revenues";
pub const NET_INCOME_LOSS: &str = "NetIncomeLoss";
pub const ASSETS: &str = "Assets";
pub const LIABILITIES: &str = "Liabilities";
pub const ROE: &str = "roe";
pub const PROFIT_MARGIN: &str = "profit_margin";

/// Every indicator name a report is expected to carry.
pub const EXPECTED_INDICATORS: [&str; 9] = [
    LAST_PRICE,
    TOTAL_RETURN,
    VOLATILITY,
    REVENUES,
    NET_INCOME_LOSS,
    ASSETS,
    LIABILITIES,
    ROE,
    PROFIT_MARGIN,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorReport {
    pub ticker: String,
    pub as_of: NaiveDate,
    /// Indicator name → value, with `None` marking an absent value. Every
    /// name in [`EXPECTED_INDICATORS`] is present as a key.
    pub values: BTreeMap<String, Option<f64>>,
    /// Free-form methodology notes from the provider.
    pub notes: String,
}

impl IndicatorReport {
    /// An empty report: all expected indicators present and absent.
    pub fn new(ticker: &str, as_of: NaiveDate) -> Self {
        let values = EXPECTED_INDICATORS
            .iter()
            .map(|name| (name.to_string(), None))
            .collect();
        Self {
            ticker: ticker.to_string(),
            as_of,
            values,
            notes: String::new(),
        }
    }

    pub fn set(&mut self, name: &str, value: f64) {
        self.values.insert(name.to_string(), Some(value));
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied().flatten()
    }

    /// Names whose value is absent, in deterministic order.
    pub fn missing_indicators(&self) -> Vec<String> {
        self.values
            .iter()
            .filter(|(_, v)| v.is_none())
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// Fill absent entries from a reflection response. Only names already
    /// tracked by the report are taken; present values are never overwritten.
    pub fn merge_filled(&mut self, filled: &BTreeMap<String, f64>) {
        for (name, value) in filled {
            if let Some(slot) = self.values.get_mut(name) {
                if slot.is_none() {
                    *slot = Some(*value);
                }
            }
        }
    }
}
