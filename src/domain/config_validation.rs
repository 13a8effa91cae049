//! Configuration validation.
//!
//! Checks every config field a run depends on before any data is fetched,
//! so a bad file fails fast instead of three tickers into a session.

use crate::domain::error::TradesimError;
use crate::domain::portfolio::SizingPolicy;
use crate::domain::trading_day::PriceField;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_run_config(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    validate_tickers(config)?;
    validate_dates(config)?;
    validate_initial_cash(config)?;
    validate_transaction_cost_rate(config)?;
    validate_risk_free_rate(config)?;
    validate_sizing(config)?;
    validate_data_source(config)?;
    validate_price_field(config)?;
    Ok(())
}

pub fn validate_decision_config(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    validate_provider(config)?;
    validate_thresholds(config)?;
    validate_window(config)?;
    Ok(())
}

fn validate_tickers(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    let tickers = config.get_string("simulation", "tickers");
    let ticker = config.get_string("simulation", "ticker");

    match (tickers, ticker) {
        (Some(t), _) if !t.trim().is_empty() => Ok(()),
        (None, Some(t)) if !t.trim().is_empty() => Ok(()),
        _ => Err(TradesimError::ConfigMissing {
            section: "simulation".to_string(),
            key: "ticker".to_string(),
        }),
    }
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    let start_str = config.get_string("simulation", "start_date");
    let end_str = config.get_string("simulation", "end_date");

    let start_date = parse_date(start_str.as_deref(), "start_date")?;
    let end_date = parse_date(end_str.as_deref(), "end_date")?;

    if start_date > end_date {
        return Err(TradesimError::ConfigInvalid {
            section: "simulation".to_string(),
            key: "start_date".to_string(),
            reason: "start_date must not be after end_date".to_string(),
        });
    }
    Ok(())
}

fn parse_date(value: Option<&str>, field: &str) -> Result<NaiveDate, TradesimError> {
    match value {
        None => Err(TradesimError::ConfigMissing {
            section: "simulation".to_string(),
            key: field.to_string(),
        }),
        Some(s) => {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| TradesimError::ConfigInvalid {
                section: "simulation".to_string(),
                key: field.to_string(),
                reason: format!("invalid {} format, expected YYYY-MM-DD", field),
            })
        }
    }
}

fn validate_initial_cash(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    let value = config.get_double("simulation", "initial_cash", 10_000.0);
    if value <= 0.0 {
        return Err(TradesimError::ConfigInvalid {
            section: "simulation".to_string(),
            key: "initial_cash".to_string(),
            reason: "initial_cash must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_transaction_cost_rate(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    let value = config.get_double("simulation", "transaction_cost_rate", 0.0);
    if !(0.0..1.0).contains(&value) {
        return Err(TradesimError::ConfigInvalid {
            section: "simulation".to_string(),
            key: "transaction_cost_rate".to_string(),
            reason: "transaction_cost_rate must be between 0 and 1".to_string(),
        });
    }
    Ok(())
}

fn validate_risk_free_rate(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    let value = config.get_double("simulation", "risk_free_rate", 0.05);
    if value < 0.0 || value >= 1.0 {
        return Err(TradesimError::ConfigInvalid {
            section: "simulation".to_string(),
            key: "risk_free_rate".to_string(),
            reason: "risk_free_rate must be between 0 and 1".to_string(),
        });
    }
    Ok(())
}

fn validate_sizing(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    match config.get_string("simulation", "sizing") {
        None => Ok(()),
        Some(s) if SizingPolicy::parse(s.trim()).is_some() => Ok(()),
        Some(_) => Err(TradesimError::ConfigInvalid {
            section: "simulation".to_string(),
            key: "sizing".to_string(),
            reason: "sizing must be one_share or all_in".to_string(),
        }),
    }
}

fn validate_data_source(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    match config.get_string("data", "source") {
        None => Ok(()),
        Some(s) if matches!(s.trim(), "csv" | "sqlite") => Ok(()),
        Some(_) => Err(TradesimError::ConfigInvalid {
            section: "data".to_string(),
            key: "source".to_string(),
            reason: "source must be csv or sqlite".to_string(),
        }),
    }
}

fn validate_price_field(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    match config.get_string("data", "price_field") {
        None => Ok(()),
        Some(s) if PriceField::parse(s.trim()).is_some() => Ok(()),
        Some(_) => Err(TradesimError::ConfigInvalid {
            section: "data".to_string(),
            key: "price_field".to_string(),
            reason: "price_field must be close or adj_close".to_string(),
        }),
    }
}

fn validate_provider(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    match config.get_string("decision", "provider") {
        None => Ok(()),
        Some(s) if s.trim() == "momentum" => Ok(()),
        Some(_) => Err(TradesimError::ConfigInvalid {
            section: "decision".to_string(),
            key: "provider".to_string(),
            reason: "provider must be momentum".to_string(),
        }),
    }
}

fn validate_thresholds(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    let buy = config.get_double("decision", "buy_threshold", 0.25);
    let sell = config.get_double("decision", "sell_threshold", -0.25);
    if buy <= sell {
        return Err(TradesimError::ConfigInvalid {
            section: "decision".to_string(),
            key: "buy_threshold".to_string(),
            reason: "buy_threshold must be greater than sell_threshold".to_string(),
        });
    }
    Ok(())
}

fn validate_window(config: &dyn ConfigPort) -> Result<(), TradesimError> {
    let value = config.get_int("decision", "window", 20);
    if value < 2 {
        return Err(TradesimError::ConfigInvalid {
            section: "decision".to_string(),
            key: "window".to_string(),
            reason: "window must be at least 2".to_string(),
        });
    }
    Ok(())
}
