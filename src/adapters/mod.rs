//! Concrete adapter implementations for ports.

pub mod csv_price_adapter;
pub mod file_config_adapter;
pub mod json_run_store;
pub mod momentum_decision_adapter;
pub mod series_indicator_adapter;
#[cfg(feature = "sqlite")]
pub mod sqlite_price_adapter;
