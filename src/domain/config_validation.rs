//! Configuration validation.
//!
//! Validates all config fields before any data is loaded.

use crate::domain::error::RetrospectError;
use crate::domain::rates::DEFAULT_ANNUAL_CREDIT_RATE;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_SYMBOL: &str = "VOO";
pub const DEFAULT_INITIAL_INVESTMENT: f64 = 1_000.0;
pub const DEFAULT_CSV_PATH: &str = "VOOstock.csv";
pub const DEFAULT_REPORT_PATH: &str = "RetrospectiveStrategiesResults.txt";
pub const DEFAULT_CHART_PATH: &str = "profit_comparison.svg";

/// Validate every field. When the principal comes from the command line,
/// the file's `initial_investment` is not checked.
pub fn validate_config(
    config: &dyn ConfigPort,
    principal_overridden: bool,
) -> Result<(), RetrospectError> {
    if !principal_overridden {
        validate_initial_investment(config)?;
    }
    validate_credit_rate(config)?;
    validate_symbol(config)?;
    validate_csv_path(config)?;
    Ok(())
}

/// Numeric setting, falling back to `default` only when the key is absent.
pub fn read_double(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, RetrospectError> {
    config
        .get_double(section, key)
        .map(|v| v.unwrap_or(default))
        .map_err(|e| RetrospectError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("not a number: {e}"),
        })
}

fn validate_initial_investment(config: &dyn ConfigPort) -> Result<(), RetrospectError> {
    let value = read_double(config, "backtest", "initial_investment", DEFAULT_INITIAL_INVESTMENT)?;
    if !(value > 0.0 && value.is_finite()) {
        return Err(RetrospectError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "initial_investment".to_string(),
            reason: "initial_investment must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_credit_rate(config: &dyn ConfigPort) -> Result<(), RetrospectError> {
    let value = read_double(config, "backtest", "annual_credit_rate", DEFAULT_ANNUAL_CREDIT_RATE)?;
    if !(0.0..1.0).contains(&value) {
        return Err(RetrospectError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "annual_credit_rate".to_string(),
            reason: "annual_credit_rate must be between 0 and 1".to_string(),
        });
    }
    Ok(())
}

fn validate_symbol(config: &dyn ConfigPort) -> Result<(), RetrospectError> {
    match config.get_string("backtest", "symbol") {
        Some(s) if s.trim().is_empty() => Err(RetrospectError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "symbol".to_string(),
            reason: "symbol must not be empty".to_string(),
        }),
        _ => Ok(()),
    }
}

fn validate_csv_path(config: &dyn ConfigPort) -> Result<(), RetrospectError> {
    match config.get_string("data", "csv_path") {
        Some(s) if s.trim().is_empty() => Err(RetrospectError::ConfigInvalid {
            section: "data".to_string(),
            key: "csv_path".to_string(),
            reason: "csv_path must not be empty".to_string(),
        }),
        _ => Ok(()),
    }
}
