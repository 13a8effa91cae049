//! SQLite price adapter.

use crate::domain::error::TradesimError;
use crate::domain::trading_day::{PriceBar, PriceField, TradingDay};
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PricePort;
use chrono::NaiveDate;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

pub struct SqlitePriceAdapter {
    pool: Pool<SqliteConnectionManager>,
    price_field: PriceField,
}

impl SqlitePriceAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, TradesimError> {
        let db_path =
            config
                .get_string("sqlite", "path")
                .ok_or_else(|| TradesimError::ConfigMissing {
                    section: "sqlite".into(),
                    key: "path".into(),
                })?;

        let pool_size = config.get_int("sqlite", "pool_size", 4) as u32;
        let price_field = config
            .get_string("data", "price_field")
            .and_then(|s| PriceField::parse(s.trim()))
            .unwrap_or_default();

        let manager = SqliteConnectionManager::file(&db_path);
        let pool = Pool::builder().max_size(pool_size).build(manager).map_err(
            |e: r2d2::Error| TradesimError::Store {
                reason: e.to_string(),
            },
        )?;

        Ok(Self { pool, price_field })
    }

    pub fn in_memory(price_field: PriceField) -> Result<Self, TradesimError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e: r2d2::Error| TradesimError::Store {
                reason: e.to_string(),
            })?;

        Ok(Self { pool, price_field })
    }

    pub fn initialize_schema(&self) -> Result<(), TradesimError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| TradesimError::Store {
                reason: e.to_string(),
            })?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS prices (
                ticker TEXT NOT NULL,
                date TEXT NOT NULL,
                open REAL NOT NULL,
                high REAL NOT NULL,
                low REAL NOT NULL,
                close REAL NOT NULL,
                adj_close REAL NOT NULL,
                volume INTEGER NOT NULL,
                PRIMARY KEY (ticker, date)
            );
            CREATE INDEX IF NOT EXISTS idx_prices_ticker ON prices(ticker);
            CREATE INDEX IF NOT EXISTS idx_prices_date ON prices(date);",
        )
        .map_err(|e: rusqlite::Error| TradesimError::Store {
            reason: e.to_string(),
        })?;

        Ok(())
    }

    pub fn insert_bars(&self, bars: &[PriceBar]) -> Result<(), TradesimError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| TradesimError::Store {
                reason: e.to_string(),
            })?;

        let tx = conn
            .transaction()
            .map_err(|e: rusqlite::Error| TradesimError::Store {
                reason: e.to_string(),
            })?;

        for bar in bars {
            tx.execute(
                "INSERT OR REPLACE INTO prices (ticker, date, open, high, low, close, adj_close, volume)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    bar.ticker,
                    bar.date.format("%Y-%m-%d").to_string(),
                    bar.open,
                    bar.high,
                    bar.low,
                    bar.close,
                    bar.adj_close,
                    bar.volume
                ],
            )
            .map_err(|e: rusqlite::Error| TradesimError::Store {
                reason: e.to_string(),
            })?;
        }

        tx.commit().map_err(|e: rusqlite::Error| TradesimError::Store {
            reason: e.to_string(),
        })?;

        Ok(())
    }
}

impl PricePort for SqlitePriceAdapter {
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
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| TradesimError::Store {
                reason: e.to_string(),
            })?;

        let start_str = start_date.format("%Y-%m-%d").to_string();
        let end_str = end_date.format("%Y-%m-%d").to_string();

        let query = "SELECT ticker, date, open, high, low, close, adj_close, volume
                     FROM prices
                     WHERE ticker = ?1 AND date >= ?2 AND date <= ?3
                     ORDER BY date ASC";

        let mut stmt = conn
            .prepare(query)
            .map_err(|e: rusqlite::Error| TradesimError::Store {
                reason: e.to_string(),
            })?;

        let rows = stmt
            .query_map(params![ticker, start_str, end_str], |row| {
                let date_str: String = row.get(1)?;
                let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        date_str.len(),
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?;
                Ok(PriceBar {
                    ticker: row.get(0)?,
                    date,
                    open: row.get(2)?,
                    high: row.get(3)?,
                    low: row.get(4)?,
                    close: row.get(5)?,
                    adj_close: row.get(6)?,
                    volume: row.get(7)?,
                })
            })
            .map_err(|e: rusqlite::Error| TradesimError::Store {
                reason: e.to_string(),
            })?;

        let mut bars = Vec::new();
        for row in rows {
            bars.push(row.map_err(|e: rusqlite::Error| TradesimError::Store {
                reason: e.to_string(),
            })?);
        }

        Ok(bars)
    }

    fn list_tickers(&self) -> Result<Vec<String>, TradesimError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| TradesimError::Store {
                reason: e.to_string(),
            })?;

        let query = "SELECT DISTINCT ticker FROM prices ORDER BY ticker";

        let mut stmt = conn
            .prepare(query)
            .map_err(|e: rusqlite::Error| TradesimError::Store {
                reason: e.to_string(),
            })?;

        let rows = stmt
            .query_map([], |row| row.get(0))
            .map_err(|e: rusqlite::Error| TradesimError::Store {
                reason: e.to_string(),
            })?;

        let mut tickers = Vec::new();
        for row in rows {
            tickers.push(row.map_err(|e: rusqlite::Error| TradesimError::Store {
                reason: e.to_string(),
            })?);
        }

        Ok(tickers)
    }

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TradesimError> {
        let conn = self
            .pool
            .get()
            .map_err(|e: r2d2::Error| TradesimError::Store {
                reason: e.to_string(),
            })?;

        let query = "SELECT MIN(date), MAX(date), COUNT(*) FROM prices WHERE ticker = ?1";

        let result: (Option<String>, Option<String>, i64) = conn
            .query_row(query, params![ticker], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })
            .map_err(|e: rusqlite::Error| TradesimError::Store {
                reason: e.to_string(),
            })?;

        match result {
            (Some(min_str), Some(max_str), count) if count > 0 => {
                let min = NaiveDate::parse_from_str(&min_str, "%Y-%m-%d").map_err(
                    |e: chrono::ParseError| TradesimError::Store {
                        reason: e.to_string(),
                    },
                )?;
                let max = NaiveDate::parse_from_str(&max_str, "%Y-%m-%d").map_err(
                    |e: chrono::ParseError| TradesimError::Store {
                        reason: e.to_string(),
                    },
                )?;
                Ok(Some((min, max, count as usize)))
            }
            _ => Ok(None),
        }
    }
}
