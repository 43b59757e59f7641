//! Property-based tests for the indicators using proptest.
//!
//! Prices are generated in whole cents so the fixed-point results are exact.

mod common;

use common::*;
use proptest::prelude::*;
use rust_decimal::Decimal;
use stockind::domain::alignment::is_aligned;
use stockind::domain::error::IndicatorError;
use stockind::domain::indicator::parabolic_sar::{roll_parabolic_sar, Trend, TrendState};
use stockind::domain::indicator::{
    calculate_kama, calculate_parabolic_sar, calculate_sma, KamaParams, ParabolicSarParams,
    SmaParams,
};
use stockind::domain::validation::{kama_min_history, kama_recommended_history};

// ==================== Test Data Generators ====================

/// OHLC series with high >= close >= low, all prices positive.
fn arb_quotes(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<Quote>> {
    prop::collection::vec((100i64..100_000, 0i64..500, 0i64..99), min_len..=max_len).prop_map(
        |bars| {
            bars.into_iter()
                .enumerate()
                .map(|(i, (cents, up, down))| {
                    make_quote(
                        i,
                        Decimal::new(cents + up, 2),
                        Decimal::new(cents - down, 2),
                        Decimal::new(cents, 2),
                    )
                })
                .collect()
        },
    )
}

fn arb_kama_params() -> impl Strategy<Value = KamaParams> {
    (1usize..=12, 1usize..=5, 6usize..=40).prop_map(|(er_period, fast_period, slow_period)| {
        KamaParams {
            er_period,
            fast_period,
            slow_period,
        }
    })
}

fn arb_psar_params() -> impl Strategy<Value = ParabolicSarParams> {
    (1i64..=5, 10i64..=40).prop_map(|(step, max)| ParabolicSarParams {
        acceleration_step: Decimal::new(step, 2),
        max_acceleration_factor: Decimal::new(max, 2),
    })
}

// ==================== KAMA Properties ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// One record per quote, same timestamps, same order
    #[test]
    fn prop_kama_aligned(quotes in arb_quotes(112, 180), params in arb_kama_params()) {
        let output = calculate_kama(&quotes, &params).unwrap();
        prop_assert!(is_aligned(&quotes, &output.results));
    }

    /// Warm-up periods are null and the seed period carries its close
    #[test]
    fn prop_kama_warmup_and_seed(quotes in arb_quotes(112, 180), params in arb_kama_params()) {
        let output = calculate_kama(&quotes, &params).unwrap();
        let seed = params.er_period - 1;

        prop_assert!(output.results[..seed].iter().all(|r| r.kama.is_none()));
        prop_assert_eq!(output.results[seed].kama, Some(quotes[seed].close));
        prop_assert!(output.results[seed..].iter().all(|r| r.kama.is_some()));
        prop_assert!(output.warnings.is_empty());
    }

    /// A flat series smooths to its own price
    #[test]
    fn prop_kama_flatline(cents in 1i64..1_000_000, len in 112usize..150, params in arb_kama_params()) {
        let price = Decimal::new(cents, 2);
        let quotes = flat_quotes(len, price);
        let output = calculate_kama(&quotes, &params).unwrap();

        for r in &output.results[params.er_period - 1..] {
            prop_assert_eq!(r.kama, Some(price));
        }
    }

    /// Each value is a convex step from the prior, so it stays inside the close range
    #[test]
    fn prop_kama_bounded_by_closes(quotes in arb_quotes(112, 180), params in arb_kama_params()) {
        let output = calculate_kama(&quotes, &params).unwrap();
        let min = quotes.iter().map(|q| q.close).min().unwrap();
        let max = quotes.iter().map(|q| q.close).max().unwrap();

        for kama in output.results.iter().filter_map(|r| r.kama) {
            prop_assert!(kama >= min && kama <= max);
        }
    }

    /// Short series fail with the required and recommended counts
    #[test]
    fn prop_kama_short_history_rejected(params in arb_kama_params(), shortfall in 1usize..50) {
        let required = kama_min_history(params.er_period);
        let quotes = random_walk(required - shortfall, 3);

        prop_assert_eq!(
            calculate_kama(&quotes, &params).unwrap_err(),
            IndicatorError::InsufficientHistory {
                indicator: "KAMA",
                provided: required - shortfall,
                required,
                recommended: Some(kama_recommended_history(params.er_period)),
            }
        );
    }

    /// Parameter errors win over history errors
    #[test]
    fn prop_kama_parameter_checked_first(len in 0usize..20, slow_period in 0usize..=2) {
        let quotes = random_walk(len, 5);
        let params = KamaParams { er_period: 10, fast_period: 2, slow_period };

        let is_parameter_error = matches!(
            calculate_kama(&quotes, &params),
            Err(IndicatorError::Parameter { parameter: "slow_period", .. })
        );
        prop_assert!(is_parameter_error);
    }

    #[test]
    fn prop_kama_idempotent(quotes in arb_quotes(112, 140), params in arb_kama_params()) {
        prop_assert_eq!(
            calculate_kama(&quotes, &params).unwrap(),
            calculate_kama(&quotes, &params).unwrap()
        );
    }
}

// ==================== Parabolic SAR Properties ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_psar_aligned(quotes in arb_quotes(2, 200), params in arb_psar_params()) {
        let output = calculate_parabolic_sar(&quotes, &params).unwrap();
        prop_assert!(is_aligned(&quotes, &output.results));
        prop_assert_eq!(output.results[0].sar, None);
    }

    /// Everything through the first reversal is null; everything after is reported
    #[test]
    fn prop_psar_initial_trend_discarded(quotes in arb_quotes(2, 200), params in arb_psar_params()) {
        let (raw, overflowed) = roll_parabolic_sar(&quotes, &params);
        prop_assert!(overflowed.is_empty());
        let output = calculate_parabolic_sar(&quotes, &params).unwrap();

        match raw.iter().position(|r| r.is_reversal == Some(true)) {
            Some(first_reversal) => {
                for r in &output.results[..=first_reversal] {
                    prop_assert!(r.sar.is_none() && r.is_reversal.is_none());
                }
                for r in &output.results[first_reversal + 1..] {
                    prop_assert!(r.sar.is_some() && r.is_reversal.is_some());
                }
            }
            None => prop_assert_eq!(output.results, raw),
        }
    }

    /// Outside a reversal the stop never crosses the prior two periods
    #[test]
    fn prop_psar_clamped_to_prior_range(quotes in arb_quotes(3, 200), params in arb_psar_params()) {
        let mut state = TrendState::seed(&quotes[0], &params);

        for i in 1..quotes.len() {
            let trend = state.trend;
            let step = state
                .advance(&quotes[i], &quotes[i.saturating_sub(2)..i], &params)
                .unwrap();
            if step.is_reversal || i < 2 {
                continue;
            }
            let (a, b) = (&quotes[i - 2], &quotes[i - 1]);
            match trend {
                Trend::Rising => prop_assert!(step.sar <= a.low.min(b.low)),
                Trend::Falling => prop_assert!(step.sar >= a.high.max(b.high)),
            }
        }
    }

    /// Acceleration stays within [step, max] and resets on reversal
    #[test]
    fn prop_psar_acceleration_bounded(quotes in arb_quotes(2, 200), params in arb_psar_params()) {
        let mut state = TrendState::seed(&quotes[0], &params);

        for i in 1..quotes.len() {
            let step = state
                .advance(&quotes[i], &quotes[i.saturating_sub(2)..i], &params)
                .unwrap();
            prop_assert!(state.acceleration_factor >= params.acceleration_step);
            prop_assert!(state.acceleration_factor <= params.max_acceleration_factor);
            if step.is_reversal {
                prop_assert_eq!(state.acceleration_factor, params.acceleration_step);
            }
        }
    }

    #[test]
    fn prop_psar_idempotent(quotes in arb_quotes(2, 120), params in arb_psar_params()) {
        prop_assert_eq!(
            calculate_parabolic_sar(&quotes, &params).unwrap(),
            calculate_parabolic_sar(&quotes, &params).unwrap()
        );
    }
}

// ==================== SMA Properties ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Exactly period-1 leading nulls
    #[test]
    fn prop_sma_null_count(quotes in arb_quotes(10, 100), period in 1usize..=10) {
        let output = calculate_sma(&quotes, &SmaParams { lookback_period: period, extended: false }).unwrap();
        prop_assert!(is_aligned(&quotes, &output.results));
        prop_assert_eq!(output.results.iter().filter(|r| r.sma.is_none()).count(), period - 1);
    }

    /// Constant closes average to the constant with zero error
    #[test]
    fn prop_sma_constant_input(cents in 1i64..1_000_000, len in 10usize..50, period in 1usize..=10) {
        let price = Decimal::new(cents, 2);
        let quotes = flat_quotes(len, price);
        let output = calculate_sma(&quotes, &SmaParams { lookback_period: period, extended: true }).unwrap();

        for r in &output.results[period - 1..] {
            prop_assert_eq!(r.sma, Some(price));
            prop_assert_eq!(r.mad, Some(Decimal::ZERO));
            prop_assert_eq!(r.mse, Some(Decimal::ZERO));
            prop_assert_eq!(r.mape, Some(Decimal::ZERO));
        }
    }
}
