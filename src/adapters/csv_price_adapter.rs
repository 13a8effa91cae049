//! CSV file price adapter.
//!
//! Reads one `<TICKER>.csv` file per ticker from a base directory. Columns
//! are `date,open,high,low,close,adj_close,volume` with a header row.

use crate::domain::error::TradesimError;
use crate::domain::trading_day::{PriceBar, PriceField, TradingDay};
use crate::ports::price_port::PricePort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvPriceAdapter {
    base_path: PathBuf,
    price_field: PriceField,
}

impl CsvPriceAdapter {
    pub fn new(base_path: PathBuf, price_field: PriceField) -> Self {
        Self {
            base_path,
            price_field,
        }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }
}

impl PricePort for CsvPriceAdapter {
    fn get_price_series(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<TradingDay>, TradesimError> {
        let bars = self.fetch_bars(ticker, start_date, end_date)?;
        Ok(bars
            .iter()
            .map(|b| b.to_trading_day(self.price_field))
            .collect())
    }

    fn fetch_bars(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, TradesimError> {
        let path = self.csv_path(ticker);
        // A ticker with no file is a ticker with no data, not a broken store.
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path).map_err(|e| TradesimError::Store {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| TradesimError::Store {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(0).ok_or_else(|| TradesimError::Store {
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                TradesimError::Store {
                    reason: format!("invalid date format: {}", e),
                }
            })?;

            if date < start_date || date > end_date {
                continue;
            }

            let open: f64 = record
                .get(1)
                .ok_or_else(|| TradesimError::Store {
                    reason: "missing open column".into(),
                })?
                .parse()
                .map_err(|e| TradesimError::Store {
                    reason: format!("invalid open value: {}", e),
                })?;

            let high: f64 = record
                .get(2)
                .ok_or_else(|| TradesimError::Store {
                    reason: "missing high column".into(),
                })?
                .parse()
                .map_err(|e| TradesimError::Store {
                    reason: format!("invalid high value: {}", e),
                })?;

            let low: f64 = record
                .get(3)
                .ok_or_else(|| TradesimError::Store {
                    reason: "missing low column".into(),
                })?
                .parse()
                .map_err(|e| TradesimError::Store {
                    reason: format!("invalid low value: {}", e),
                })?;

            let close: f64 = record
                .get(4)
                .ok_or_else(|| TradesimError::Store {
                    reason: "missing close column".into(),
                })?
                .parse()
                .map_err(|e| TradesimError::Store {
                    reason: format!("invalid close value: {}", e),
                })?;

            let adj_close: f64 = record
                .get(5)
                .ok_or_else(|| TradesimError::Store {
                    reason: "missing adj_close column".into(),
                })?
                .parse()
                .map_err(|e| TradesimError::Store {
                    reason: format!("invalid adj_close value: {}", e),
                })?;

            let volume: i64 = record
                .get(6)
                .ok_or_else(|| TradesimError::Store {
                    reason: "missing volume column".into(),
                })?
                .parse()
                .map_err(|e| TradesimError::Store {
                    reason: format!("invalid volume value: {}", e),
                })?;

            bars.push(PriceBar {
                ticker: ticker.to_string(),
                date,
                open,
                high,
                low,
                close,
                adj_close,
                volume,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    fn list_tickers(&self) -> Result<Vec<String>, TradesimError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| TradesimError::Store {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut tickers = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| TradesimError::Store {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if name_str.ends_with(".csv") {
                let ticker = &name_str[..name_str.len() - 4];
                tickers.push(ticker.to_string());
            }
        }

        tickers.sort();
        Ok(tickers)
    }

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TradesimError> {
        let bars = self.fetch_bars(ticker, NaiveDate::MIN, NaiveDate::MAX)?;
        match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Ok(Some((first.date, last.date, bars.len()))),
            _ => Ok(None),
        }
    }
}
