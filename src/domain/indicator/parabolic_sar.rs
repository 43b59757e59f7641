//! Parabolic Stop And Reverse.
//!
//! Rising:  SAR[i] = SAR[i-1] + AF * (EP - SAR[i-1]), capped at min(L[i-1], L[i-2])
//! Falling: SAR[i] = SAR[i-1] - AF * (SAR[i-1] - EP), floored at max(H[i-1], H[i-2])
//!
//! EP is the extreme price of the current trend; AF grows by the step each
//! time EP advances, up to the maximum. When price crosses the candidate SAR
//! the trend reverses: SAR becomes the old EP, EP resets to the current bar
//! and AF resets to the step.
//!
//! The machine is seeded rising from the first bar, which is a guess. Every
//! period up to and including the first reversal is reported as null.
//!
//! A period whose arithmetic leaves the fixed-point range is null and leaves
//! the state untouched; such periods are reported in one overflow warning.
//!
//! Default parameters: acceleration_step=0.02, max_acceleration_factor=0.2

use crate::domain::alignment::{empty_results, is_aligned, DatedResult};
use crate::domain::error::IndicatorError;
use crate::domain::indicator::{
    ArithmeticOverflow, IndicatorOutput, IndicatorType, IndicatorWarning, ResultRow,
};
use crate::domain::quote::Quote;
use crate::domain::validation::validate_parabolic_sar;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const DEFAULT_ACCELERATION_STEP: Decimal = dec!(0.02);
pub const DEFAULT_MAX_ACCELERATION_FACTOR: Decimal = dec!(0.2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParabolicSarParams {
    pub acceleration_step: Decimal,
    pub max_acceleration_factor: Decimal,
}

impl Default for ParabolicSarParams {
    fn default() -> Self {
        Self {
            acceleration_step: DEFAULT_ACCELERATION_STEP,
            max_acceleration_factor: DEFAULT_MAX_ACCELERATION_FACTOR,
        }
    }
}

impl ParabolicSarParams {
    pub fn indicator_type(&self) -> IndicatorType {
        IndicatorType::ParabolicSar {
            acceleration_step: self.acceleration_step,
            max_acceleration_factor: self.max_acceleration_factor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParabolicSarResult {
    pub date: NaiveDateTime,
    pub sar: Option<Decimal>,
    pub is_reversal: Option<bool>,
}

impl DatedResult for ParabolicSarResult {
    fn date(&self) -> NaiveDateTime {
        self.date
    }

    fn empty(date: NaiveDateTime) -> Self {
        Self {
            date,
            sar: None,
            is_reversal: None,
        }
    }
}

impl ResultRow for ParabolicSarResult {
    fn columns() -> &'static [&'static str] {
        &["sar", "is_reversal"]
    }

    fn cells(&self) -> Vec<Option<String>> {
        vec![
            self.sar.map(|v| v.to_string()),
            self.is_reversal.map(|v| v.to_string()),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Rising,
    Falling,
}

/// State carried from one period to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendState {
    pub trend: Trend,
    pub extreme_point: Decimal,
    pub acceleration_factor: Decimal,
    pub prior_sar: Decimal,
}

/// SAR emitted for one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SarStep {
    pub sar: Decimal,
    pub is_reversal: bool,
}

impl TrendState {
    pub fn seed(first: &Quote, params: &ParabolicSarParams) -> Self {
        Self {
            trend: Trend::Rising,
            extreme_point: first.high,
            acceleration_factor: params.acceleration_step,
            prior_sar: first.low,
        }
    }

    /// Advances the machine by one period. `recent` holds the quotes that
    /// precede `quote`; the clamp applies only when two of them are present.
    ///
    /// On overflow the state is left as it was.
    pub fn advance(
        &mut self,
        quote: &Quote,
        recent: &[Quote],
        params: &ParabolicSarParams,
    ) -> Result<SarStep, ArithmeticOverflow> {
        let step = match self.trend {
            Trend::Rising => {
                let candidate = self
                    .extreme_point
                    .checked_sub(self.prior_sar)
                    .and_then(|gap| self.acceleration_factor.checked_mul(gap))
                    .and_then(|shift| self.prior_sar.checked_add(shift))
                    .ok_or(ArithmeticOverflow)?;

                if quote.low < candidate {
                    let sar = self.extreme_point;
                    self.reverse(Trend::Falling, quote.low, params);
                    SarStep {
                        sar,
                        is_reversal: true,
                    }
                } else {
                    let sar = match recent {
                        [.., a, b] => candidate.min(a.low.min(b.low)),
                        _ => candidate,
                    };
                    if quote.high > self.extreme_point {
                        self.acceleration_factor = self.accelerated(params)?;
                        self.extreme_point = quote.high;
                    }
                    SarStep {
                        sar,
                        is_reversal: false,
                    }
                }
            }
            Trend::Falling => {
                let candidate = self
                    .prior_sar
                    .checked_sub(self.extreme_point)
                    .and_then(|gap| self.acceleration_factor.checked_mul(gap))
                    .and_then(|shift| self.prior_sar.checked_sub(shift))
                    .ok_or(ArithmeticOverflow)?;

                if quote.high > candidate {
                    let sar = self.extreme_point;
                    self.reverse(Trend::Rising, quote.high, params);
                    SarStep {
                        sar,
                        is_reversal: true,
                    }
                } else {
                    let sar = match recent {
                        [.., a, b] => candidate.max(a.high.max(b.high)),
                        _ => candidate,
                    };
                    if quote.low < self.extreme_point {
                        self.acceleration_factor = self.accelerated(params)?;
                        self.extreme_point = quote.low;
                    }
                    SarStep {
                        sar,
                        is_reversal: false,
                    }
                }
            }
        };

        self.prior_sar = step.sar;
        Ok(step)
    }

    fn reverse(&mut self, trend: Trend, extreme_point: Decimal, params: &ParabolicSarParams) {
        self.trend = trend;
        self.extreme_point = extreme_point;
        self.acceleration_factor = params.acceleration_step;
    }

    fn accelerated(&self, params: &ParabolicSarParams) -> Result<Decimal, ArithmeticOverflow> {
        self.acceleration_factor
            .checked_add(params.acceleration_step)
            .map(|af| af.min(params.max_acceleration_factor))
            .ok_or(ArithmeticOverflow)
    }
}

/// Forward pass: runs the state machine over the whole series, including the
/// initial guessed trend. The first record is always null.
///
/// Returns the records and the dates of the periods that overflowed.
pub fn roll_parabolic_sar(
    quotes: &[Quote],
    params: &ParabolicSarParams,
) -> (Vec<ParabolicSarResult>, Vec<NaiveDateTime>) {
    let mut results: Vec<ParabolicSarResult> = empty_results(quotes);
    let mut overflowed = Vec::new();
    let Some(first) = quotes.first() else {
        return (results, overflowed);
    };

    let mut state = TrendState::seed(first, params);
    for (i, result) in results.iter_mut().enumerate().skip(1) {
        match state.advance(&quotes[i], &quotes[i.saturating_sub(2)..i], params) {
            Ok(step) => {
                result.sar = Some(step.sar);
                result.is_reversal = Some(step.is_reversal);
            }
            Err(ArithmeticOverflow) => overflowed.push(quotes[i].date),
        }
    }

    (results, overflowed)
}

/// Correction pass: nulls every record up to and including the first reversal.
/// Without any reversal the records are returned unchanged.
pub fn discard_initial_trend(mut results: Vec<ParabolicSarResult>) -> Vec<ParabolicSarResult> {
    if let Some(first_reversal) = results.iter().position(|r| r.is_reversal == Some(true)) {
        for result in &mut results[..=first_reversal] {
            result.sar = None;
            result.is_reversal = None;
        }
    }
    results
}

pub fn calculate_parabolic_sar(
    quotes: &[Quote],
    params: &ParabolicSarParams,
) -> Result<IndicatorOutput<ParabolicSarResult>, IndicatorError> {
    validate_parabolic_sar(quotes, params)?;

    let (raw, overflowed) = roll_parabolic_sar(quotes, params);
    let results = discard_initial_trend(raw);
    debug_assert!(is_aligned(quotes, &results));

    Ok(IndicatorOutput {
        indicator_type: params.indicator_type(),
        results,
        warnings: IndicatorWarning::overflow(params.indicator_type(), &overflowed)
            .into_iter()
            .collect(),
    })
}
