//! Kaufman's Adaptive Moving Average.
//!
//! ER = |C[i] - C[i-n]| / sum(|C[p] - C[p-1]|) over the n steps ending at i
//! SC = ER * (fast_sc - slow_sc) + slow_sc, fast_sc = 2/(fast+1), slow_sc = 2/(slow+1)
//! KAMA[i] = KAMA[i-1] + SC^2 * (C[i] - KAMA[i-1])
//!
//! Default parameters: er_period=10, fast_period=2, slow_period=30
//! Warmup: first (er_period - 1) periods are null; period er_period - 1 is seeded
//! with its close.
//!
//! A period whose arithmetic leaves the fixed-point range is null. A null carry
//! keeps later periods null until a flat window re-seeds from the close.

use crate::domain::alignment::{is_aligned, DatedResult};
use crate::domain::error::IndicatorError;
use crate::domain::indicator::{
    ArithmeticOverflow, IndicatorOutput, IndicatorType, IndicatorWarning, ResultRow,
};
use crate::domain::quote::Quote;
use crate::domain::validation::validate_kama;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const DEFAULT_ER_PERIOD: usize = 10;
pub const DEFAULT_FAST_PERIOD: usize = 2;
pub const DEFAULT_SLOW_PERIOD: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KamaParams {
    pub er_period: usize,
    pub fast_period: usize,
    pub slow_period: usize,
}

impl Default for KamaParams {
    fn default() -> Self {
        Self {
            er_period: DEFAULT_ER_PERIOD,
            fast_period: DEFAULT_FAST_PERIOD,
            slow_period: DEFAULT_SLOW_PERIOD,
        }
    }
}

impl KamaParams {
    pub fn indicator_type(&self) -> IndicatorType {
        IndicatorType::Kama {
            er_period: self.er_period,
            fast_period: self.fast_period,
            slow_period: self.slow_period,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KamaResult {
    pub date: NaiveDateTime,
    pub kama: Option<Decimal>,
}

impl DatedResult for KamaResult {
    fn date(&self) -> NaiveDateTime {
        self.date
    }

    fn empty(date: NaiveDateTime) -> Self {
        Self { date, kama: None }
    }
}

impl ResultRow for KamaResult {
    fn columns() -> &'static [&'static str] {
        &["kama"]
    }

    fn cells(&self) -> Vec<Option<String>> {
        vec![self.kama.map(|v| v.to_string())]
    }
}

/// Fast and slow EMA smoothing constants, 2/(n+1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmoothingConstants {
    pub fast: Decimal,
    pub slow: Decimal,
}

impl SmoothingConstants {
    pub fn new(fast_period: usize, slow_period: usize) -> Self {
        Self {
            fast: dec!(2) / (Decimal::from(fast_period) + Decimal::ONE),
            slow: dec!(2) / (Decimal::from(slow_period) + Decimal::ONE),
        }
    }
}

/// Computes one KAMA value from the prior output and the window of
/// `er_period + 1` quotes ending at the current period.
///
/// A flat window (zero volatility) yields the current close regardless of
/// `prior`. Otherwise a null `prior` yields null.
pub fn kama_step(
    prior: Option<Decimal>,
    window: &[Quote],
    constants: &SmoothingConstants,
) -> Result<Option<Decimal>, ArithmeticOverflow> {
    let (Some(first), Some(current)) = (window.first(), window.last()) else {
        return Ok(None);
    };

    let change = current
        .close
        .checked_sub(first.close)
        .ok_or(ArithmeticOverflow)?
        .abs();
    let volatility = volatility(window).ok_or(ArithmeticOverflow)?;

    if volatility.is_zero() {
        return Ok(Some(current.close));
    }

    let sc = smoothing_constant(change, volatility, constants).ok_or(ArithmeticOverflow)?;

    match prior {
        Some(prior) => smooth(prior, current.close, sc)
            .map(Some)
            .ok_or(ArithmeticOverflow),
        None => Ok(None),
    }
}

/// Sum of absolute close-to-close changes across the window.
fn volatility(window: &[Quote]) -> Option<Decimal> {
    window.windows(2).try_fold(Decimal::ZERO, |sum, pair| {
        let step = pair[1].close.checked_sub(pair[0].close)?.abs();
        sum.checked_add(step)
    })
}

fn smoothing_constant(
    change: Decimal,
    volatility: Decimal,
    constants: &SmoothingConstants,
) -> Option<Decimal> {
    let efficiency_ratio = change.checked_div(volatility)?;
    efficiency_ratio
        .checked_mul(constants.fast.checked_sub(constants.slow)?)?
        .checked_add(constants.slow)
}

fn smooth(prior: Decimal, close: Decimal, sc: Decimal) -> Option<Decimal> {
    let delta = close.checked_sub(prior)?;
    prior.checked_add(sc.checked_mul(sc)?.checked_mul(delta)?)
}

pub fn calculate_kama(
    quotes: &[Quote],
    params: &KamaParams,
) -> Result<IndicatorOutput<KamaResult>, IndicatorError> {
    validate_kama(quotes, params)?;

    let er_period = params.er_period;
    let constants = SmoothingConstants::new(params.fast_period, params.slow_period);
    let mut overflowed: Vec<NaiveDateTime> = Vec::new();

    let results: Vec<KamaResult> = quotes
        .iter()
        .enumerate()
        .scan(None, |prior: &mut Option<Decimal>, (i, quote)| {
            let kama = if i + 1 < er_period {
                None
            } else if i + 1 == er_period {
                Some(quote.close)
            } else {
                match kama_step(*prior, &quotes[i - er_period..=i], &constants) {
                    Ok(value) => value,
                    Err(ArithmeticOverflow) => {
                        overflowed.push(quote.date);
                        None
                    }
                }
            };
            *prior = kama;
            Some(KamaResult {
                date: quote.date,
                kama,
            })
        })
        .collect();

    debug_assert!(is_aligned(quotes, &results));

    let warnings = IndicatorWarning::overflow(params.indicator_type(), &overflowed)
        .into_iter()
        .collect();

    Ok(IndicatorOutput {
        indicator_type: params.indicator_type(),
        results,
        warnings,
    })
}
