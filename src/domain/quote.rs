//! Price quote representation and history preparation.

use crate::domain::error::StockindError;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;

/// One period of price data. Series of quotes are ordered ascending by `date`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quote {
    pub date: NaiveDateTime,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

/// Sorts quotes chronologically and rejects repeated dates.
pub fn prepare_history(mut quotes: Vec<Quote>) -> Result<Vec<Quote>, StockindError> {
    quotes.sort_by_key(|q| q.date);

    if let Some(pair) = quotes.windows(2).find(|w| w[0].date == w[1].date) {
        return Err(StockindError::DuplicateQuote { date: pair[1].date });
    }

    Ok(quotes)
}
