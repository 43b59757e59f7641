//! Quote source port trait.

use crate::domain::error::StockindError;
use crate::domain::quote::Quote;

pub trait DataPort {
    /// Quotes for `symbol` in source order; callers prepare (sort, dedupe) them.
    fn fetch_quotes(&self, symbol: &str) -> Result<Vec<Quote>, StockindError>;

    fn list_symbols(&self) -> Result<Vec<String>, StockindError>;
}
