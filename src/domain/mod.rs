//! Core domain types and logic.

pub mod config_validation;
pub mod decision;
pub mod error;
pub mod indicators;
pub mod metrics;
pub mod portfolio;
pub mod run;
pub mod runner;
pub mod trading_day;
