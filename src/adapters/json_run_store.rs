//! JSON file run store.
//!
//! Persists each run as a pretty-printed JSON document under
//! `<base_dir>/<TICKER>/`, named by ticker, date range, and a wall-clock
//! run id so successive runs never clobber each other.

use crate::domain::error::TradesimError;
use crate::domain::run::Run;
use crate::ports::run_store_port::RunStorePort;
use chrono::Local;
use std::fs;
use std::path::PathBuf;

pub struct JsonRunStore {
    base_dir: PathBuf,
}

impl JsonRunStore {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }
}

impl RunStorePort for JsonRunStore {
    fn save_run(&self, run: &Run) -> Result<PathBuf, TradesimError> {
        let ticker_dir = self.base_dir.join(&run.ticker);
        fs::create_dir_all(&ticker_dir).map_err(|e| TradesimError::Store {
            reason: format!("failed to create {}: {}", ticker_dir.display(), e),
        })?;

        let run_id = Local::now().format("%Y%m%d_%H%M%S");
        let file_name = format!(
            "{}_{}_{}_{}.json",
            run.ticker,
            run.test_start.format("%Y-%m-%d"),
            run.test_end.format("%Y-%m-%d"),
            run_id
        );
        let path = ticker_dir.join(file_name);

        let body = serde_json::to_string_pretty(run).map_err(|e| TradesimError::Store {
            reason: format!("failed to serialize run: {}", e),
        })?;
        fs::write(&path, body).map_err(|e| TradesimError::Store {
            reason: format!("failed to write {}: {}", path.display(), e),
        })?;

        Ok(path)
    }
}
