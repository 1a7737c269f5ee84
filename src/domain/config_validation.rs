//! Configuration validation.
//!
//! Checks the values present in a config file before anything is loaded.
//! Absent keys are fine here; defaults are applied when the simulation config
//! is built.

use crate::domain::error::DispoError;
use crate::ports::config_port::ConfigPort;

pub const POLICY_KEYS: [&str; 4] = [
    "sell_premium_winner",
    "buy_discount_winner",
    "sell_discount_loser",
    "buy_premium_loser",
];

pub fn validate_simulation_config(config: &dyn ConfigPort) -> Result<(), DispoError> {
    validate_investor_count(config)?;
    validate_base_probability(config)?;
    validate_seed(config)?;
    validate_trade_sizes(config)?;
    validate_preview_rows(config)?;
    validate_policy(config)?;
    Ok(())
}

fn parse_int(config: &dyn ConfigPort, section: &str, key: &str) -> Result<Option<i64>, DispoError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(s) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| DispoError::invalid(section, key, format!("{key} must be an integer"))),
    }
}

fn parse_float(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<f64>, DispoError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(s) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| DispoError::invalid(section, key, format!("{key} must be a number"))),
    }
}

fn validate_investor_count(config: &dyn ConfigPort) -> Result<(), DispoError> {
    if let Some(n) = parse_int(config, "simulation", "investor_count")? {
        if n < 1 {
            return Err(DispoError::invalid(
                "simulation",
                "investor_count",
                "investor_count must be at least 1",
            ));
        }
    }
    Ok(())
}

fn validate_base_probability(config: &dyn ConfigPort) -> Result<(), DispoError> {
    if let Some(p) = parse_float(config, "simulation", "base_trade_probability")? {
        if !(p > 0.0 && p < 1.0) {
            return Err(DispoError::invalid(
                "simulation",
                "base_trade_probability",
                "base_trade_probability must be between 0 and 1 (exclusive)",
            ));
        }
    }
    Ok(())
}

fn validate_seed(config: &dyn ConfigPort) -> Result<(), DispoError> {
    config
        .get_optional_u64("simulation", "seed")
        .map(|_| ())
        .map_err(|raw| {
            DispoError::invalid(
                "simulation",
                "seed",
                format!("seed must be a non-negative integer, got '{raw}'"),
            )
        })
}

fn validate_trade_sizes(config: &dyn ConfigPort) -> Result<(), DispoError> {
    let min = parse_int(config, "simulation", "min_trade_shares")?;
    let max = parse_int(config, "simulation", "max_trade_shares")?;

    for (key, value) in [("min_trade_shares", min), ("max_trade_shares", max)] {
        if let Some(v) = value {
            if v < 1 {
                return Err(DispoError::invalid(
                    "simulation",
                    key,
                    format!("{key} must be at least 1"),
                ));
            }
        }
    }

    let min = min.unwrap_or(crate::domain::execution::DEFAULT_MIN_TRADE_SHARES as i64);
    let max = max.unwrap_or(crate::domain::execution::DEFAULT_MAX_TRADE_SHARES as i64);
    if min > max {
        return Err(DispoError::invalid(
            "simulation",
            "max_trade_shares",
            format!("max_trade_shares ({max}) must not be below min_trade_shares ({min})"),
        ));
    }
    Ok(())
}

fn validate_preview_rows(config: &dyn ConfigPort) -> Result<(), DispoError> {
    if let Some(n) = parse_int(config, "simulation", "preview_rows")? {
        if n < 0 {
            return Err(DispoError::invalid(
                "simulation",
                "preview_rows",
                "preview_rows must be non-negative",
            ));
        }
    }
    Ok(())
}

fn validate_policy(config: &dyn ConfigPort) -> Result<(), DispoError> {
    for key in POLICY_KEYS {
        if let Some(v) = parse_float(config, "policy", key)? {
            if !v.is_finite() || v < 0.0 {
                return Err(DispoError::invalid(
                    "policy",
                    key,
                    format!("{key} must be a non-negative number"),
                ));
            }
        }
    }
    Ok(())
}
