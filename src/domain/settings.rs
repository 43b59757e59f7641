//! Indicator parameters read from configuration.
//!
//! Missing keys fall back to the indicator defaults; values that are present
//! but unparsable are rejected. Domain checks (periods > 0 and so on) are left
//! to the validator so configuration and call-site parameters share one rule set.

use crate::domain::error::StockindError;
use crate::domain::indicator::{KamaParams, ParabolicSarParams, SmaParams};
use crate::ports::config_port::ConfigPort;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_SMA_LOOKBACK: usize = 20;

pub fn kama_params(config: &dyn ConfigPort) -> Result<KamaParams, StockindError> {
    let defaults = KamaParams::default();
    Ok(KamaParams {
        er_period: read(config, "kama", "er_period", defaults.er_period)?,
        fast_period: read(config, "kama", "fast_period", defaults.fast_period)?,
        slow_period: read(config, "kama", "slow_period", defaults.slow_period)?,
    })
}

pub fn parabolic_sar_params(config: &dyn ConfigPort) -> Result<ParabolicSarParams, StockindError> {
    let defaults = ParabolicSarParams::default();
    Ok(ParabolicSarParams {
        acceleration_step: read(
            config,
            "parabolic_sar",
            "acceleration_step",
            defaults.acceleration_step,
        )?,
        max_acceleration_factor: read(
            config,
            "parabolic_sar",
            "max_acceleration_factor",
            defaults.max_acceleration_factor,
        )?,
    })
}

pub fn sma_params(config: &dyn ConfigPort) -> Result<SmaParams, StockindError> {
    Ok(SmaParams {
        lookback_period: read(config, "sma", "lookback_period", DEFAULT_SMA_LOOKBACK)?,
        extended: config.get_bool("sma", "extended", false),
    })
}

pub fn data_directory(config: &dyn ConfigPort) -> Option<PathBuf> {
    config
        .get_string("data", "directory")
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
}

fn read<T>(config: &dyn ConfigPort, section: &str, key: &str, default: T) -> Result<T, StockindError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match config.get_string(section, key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| StockindError::ConfigInvalid {
                section: section.to_string(),
                key: key.to_string(),
                reason: format!("cannot parse {:?}: {}", raw, e),
            }),
    }
}
