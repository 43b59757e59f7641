//! Technical indicator implementations.
//!
//! This module provides the types shared by every indicator:
//! - `IndicatorType`: indicator identity + parameters
//! - `IndicatorOutput`: aligned per-period results plus warnings raised during the roll
//! - `IndicatorWarning`: non-fatal conditions reported alongside the results
//! - `ResultRow`: tabular view of a result record

pub mod kama;
pub mod parabolic_sar;
pub mod sma;

pub use kama::{calculate_kama, KamaParams, KamaResult};
pub use parabolic_sar::{calculate_parabolic_sar, ParabolicSarParams, ParabolicSarResult};
pub use sma::{calculate_sma, SmaParams, SmaResult};

use crate::domain::alignment::DatedResult;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Kama {
        er_period: usize,
        fast_period: usize,
        slow_period: usize,
    },
    ParabolicSar {
        acceleration_step: Decimal,
        max_acceleration_factor: Decimal,
    },
    Sma {
        lookback_period: usize,
    },
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Kama {
                er_period,
                fast_period,
                slow_period,
            } => write!(f, "KAMA({},{},{})", er_period, fast_period, slow_period),
            IndicatorType::ParabolicSar {
                acceleration_step,
                max_acceleration_factor,
            } => write!(
                f,
                "PSAR({},{})",
                acceleration_step.normalize(),
                max_acceleration_factor.normalize()
            ),
            IndicatorType::Sma { lookback_period } => write!(f, "SMA({})", lookback_period),
        }
    }
}

/// Non-fatal condition detected while rolling an indicator over a series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndicatorWarning {
    /// Fixed-point range was exceeded in `periods` periods; their values are null.
    Overflow {
        indicator: IndicatorType,
        periods: usize,
        first_date: NaiveDateTime,
    },
}

impl fmt::Display for IndicatorWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorWarning::Overflow {
                indicator,
                periods,
                first_date,
            } => write!(
                f,
                "extreme price variation caused an overflow in {} for {} period(s) \
                 starting {}; impacted values were set to null",
                indicator, periods, first_date
            ),
        }
    }
}

impl IndicatorWarning {
    /// One warning covering every overflowed period, or none.
    pub fn overflow(indicator: IndicatorType, overflowed: &[NaiveDateTime]) -> Option<Self> {
        overflowed.first().map(|&first_date| IndicatorWarning::Overflow {
            indicator,
            periods: overflowed.len(),
            first_date,
        })
    }
}

/// One period's arithmetic left the fixed-point range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArithmeticOverflow;

/// Result of one indicator call: one record per input quote, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorOutput<R> {
    pub indicator_type: IndicatorType,
    pub results: Vec<R>,
    pub warnings: Vec<IndicatorWarning>,
}

impl<R> IndicatorOutput<R> {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Named columns of a result record, nulls rendered as `None`.
pub trait ResultRow: DatedResult {
    fn columns() -> &'static [&'static str];
    fn cells(&self) -> Vec<Option<String>>;
}
