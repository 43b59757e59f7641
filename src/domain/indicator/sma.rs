//! Simple Moving Average with optional error statistics.
//!
//! SMA = mean of the last n closes.
//! Extended statistics over the same window:
//! - MAD: mean |C - SMA|
//! - MSE: mean (C - SMA)^2
//! - MAPE: mean |C - SMA| / C (null if any close in the window is zero)
//!
//! Warmup: first (n-1) periods are null.

use crate::domain::alignment::{empty_results, is_aligned, DatedResult};
use crate::domain::error::IndicatorError;
use crate::domain::indicator::{IndicatorOutput, IndicatorType, ResultRow};
use crate::domain::quote::Quote;
use crate::domain::validation::validate_sma;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmaParams {
    pub lookback_period: usize,
    pub extended: bool,
}

impl SmaParams {
    pub fn indicator_type(&self) -> IndicatorType {
        IndicatorType::Sma {
            lookback_period: self.lookback_period,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmaResult {
    pub date: NaiveDateTime,
    pub sma: Option<Decimal>,
    pub mad: Option<Decimal>,
    pub mse: Option<Decimal>,
    pub mape: Option<Decimal>,
}

impl DatedResult for SmaResult {
    fn date(&self) -> NaiveDateTime {
        self.date
    }

    fn empty(date: NaiveDateTime) -> Self {
        Self {
            date,
            sma: None,
            mad: None,
            mse: None,
            mape: None,
        }
    }
}

impl ResultRow for SmaResult {
    fn columns() -> &'static [&'static str] {
        &["sma", "mad", "mse", "mape"]
    }

    fn cells(&self) -> Vec<Option<String>> {
        [self.sma, self.mad, self.mse, self.mape]
            .iter()
            .map(|v| v.map(|v| v.to_string()))
            .collect()
    }
}

pub fn calculate_sma(
    quotes: &[Quote],
    params: &SmaParams,
) -> Result<IndicatorOutput<SmaResult>, IndicatorError> {
    validate_sma(quotes, params)?;

    let period = params.lookback_period;
    let n = Decimal::from(period as u64);
    let mut results: Vec<SmaResult> = empty_results(quotes);

    for (i, window) in quotes.windows(period).enumerate() {
        let result = &mut results[i + period - 1];
        let sma = window.iter().map(|q| q.close).sum::<Decimal>() / n;
        result.sma = Some(sma);

        if params.extended {
            let deviations: Vec<Decimal> = window.iter().map(|q| (q.close - sma).abs()).collect();
            result.mad = Some(deviations.iter().sum::<Decimal>() / n);
            result.mse = Some(deviations.iter().map(|d| d * d).sum::<Decimal>() / n);
            result.mape = window
                .iter()
                .zip(&deviations)
                .map(|(q, d)| d.checked_div(q.close))
                .sum::<Option<Decimal>>()
                .map(|total| total / n);
        }
    }

    debug_assert!(is_aligned(quotes, &results));

    Ok(IndicatorOutput {
        indicator_type: params.indicator_type(),
        results,
        warnings: Vec::new(),
    })
}
