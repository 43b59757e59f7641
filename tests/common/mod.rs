#![allow(dead_code)]

use chrono::{Days, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::collections::HashMap;
use stockind::domain::error::StockindError;
pub use stockind::domain::quote::Quote;
use stockind::ports::data_port::DataPort;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Quote>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_quotes(mut self, symbol: &str, quotes: Vec<Quote>) -> Self {
        self.data.insert(symbol.to_string(), quotes);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_quotes(&self, symbol: &str) -> Result<Vec<Quote>, StockindError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(StockindError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(symbol).cloned().unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, StockindError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn day(offset: usize) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2020, 1, 1)
        .unwrap()
        .checked_add_days(Days::new(offset as u64))
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

pub fn make_quote(offset: usize, high: Decimal, low: Decimal, close: Decimal) -> Quote {
    Quote {
        date: day(offset),
        open: close,
        high,
        low,
        close,
        volume: Decimal::from(1000),
    }
}

pub fn flat_quotes(n: usize, price: Decimal) -> Vec<Quote> {
    (0..n).map(|i| make_quote(i, price, price, price)).collect()
}

/// Deterministic random walk in cents, with highs and lows around the close.
pub fn random_walk(n: usize, seed: u64) -> Vec<Quote> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 33) as i64
    };

    let mut cents: i64 = 10_000;
    (0..n)
        .map(|i| {
            cents = (cents + next() % 301 - 150).max(500);
            let spread_up = next() % 120;
            let spread_down = next() % 120;
            let close = Decimal::new(cents, 2);
            make_quote(
                i,
                Decimal::new(cents + spread_up, 2),
                Decimal::new(cents - spread_down, 2),
                close,
            )
        })
        .collect()
}
