//! Date alignment between an input series and its indicator results.
//!
//! Every indicator emits exactly one record per quote, carrying the quote's
//! date, with null fields until the indicator's warm-up ends.

use crate::domain::quote::Quote;
use chrono::NaiveDateTime;

pub trait DatedResult {
    fn date(&self) -> NaiveDateTime;

    /// A record for `date` with every value null.
    fn empty(date: NaiveDateTime) -> Self;
}

pub fn empty_results<R: DatedResult>(quotes: &[Quote]) -> Vec<R> {
    quotes.iter().map(|q| R::empty(q.date)).collect()
}

pub fn is_aligned<R: DatedResult>(quotes: &[Quote], results: &[R]) -> bool {
    quotes.len() == results.len()
        && quotes
            .iter()
            .zip(results)
            .all(|(quote, result)| quote.date == result.date())
}
