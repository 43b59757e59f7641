//! Parameter and history validation, run before any indicator computation.
//!
//! Validation never mutates the series; it only counts it.

use crate::domain::error::IndicatorError;
use crate::domain::indicator::{KamaParams, ParabolicSarParams, SmaParams};
use crate::domain::quote::Quote;
use rust_decimal::Decimal;

const KAMA: &str = "KAMA";
const PARABOLIC_SAR: &str = "Parabolic SAR";
const SMA: &str = "SMA";

/// Parabolic SAR needs one prior period to project from.
pub const PARABOLIC_SAR_MIN_HISTORY: usize = 2;

/// max(2 * er_period, er_period + 100)
pub fn kama_min_history(er_period: usize) -> usize {
    er_period
        .saturating_mul(2)
        .max(er_period.saturating_add(100))
}

pub fn kama_recommended_history(er_period: usize) -> usize {
    er_period.saturating_add(250)
}

pub fn validate_kama(quotes: &[Quote], params: &KamaParams) -> Result<(), IndicatorError> {
    if params.er_period == 0 {
        return Err(parameter(KAMA, "er_period", "must be greater than 0"));
    }
    if params.fast_period == 0 {
        return Err(parameter(KAMA, "fast_period", "must be greater than 0"));
    }
    if params.slow_period <= params.fast_period {
        return Err(parameter(
            KAMA,
            "slow_period",
            "must be greater than fast_period",
        ));
    }

    require_history(
        KAMA,
        quotes.len(),
        kama_min_history(params.er_period),
        Some(kama_recommended_history(params.er_period)),
    )
}

pub fn validate_parabolic_sar(
    quotes: &[Quote],
    params: &ParabolicSarParams,
) -> Result<(), IndicatorError> {
    if params.acceleration_step <= Decimal::ZERO {
        return Err(parameter(
            PARABOLIC_SAR,
            "acceleration_step",
            "must be greater than 0",
        ));
    }
    if params.max_acceleration_factor <= Decimal::ZERO {
        return Err(parameter(
            PARABOLIC_SAR,
            "max_acceleration_factor",
            "must be greater than 0",
        ));
    }
    if params.acceleration_step > params.max_acceleration_factor {
        return Err(parameter(
            PARABOLIC_SAR,
            "acceleration_step",
            "must not exceed max_acceleration_factor",
        ));
    }

    require_history(PARABOLIC_SAR, quotes.len(), PARABOLIC_SAR_MIN_HISTORY, None)
}

pub fn validate_sma(quotes: &[Quote], params: &SmaParams) -> Result<(), IndicatorError> {
    if params.lookback_period == 0 {
        return Err(parameter(SMA, "lookback_period", "must be greater than 0"));
    }

    require_history(SMA, quotes.len(), params.lookback_period, None)
}

fn parameter(indicator: &'static str, parameter: &'static str, reason: &str) -> IndicatorError {
    IndicatorError::Parameter {
        indicator,
        parameter,
        reason: reason.to_string(),
    }
}

fn require_history(
    indicator: &'static str,
    provided: usize,
    required: usize,
    recommended: Option<usize>,
) -> Result<(), IndicatorError> {
    if provided < required {
        return Err(IndicatorError::InsufficientHistory {
            indicator,
            provided,
            required,
            recommended,
        });
    }
    Ok(())
}
