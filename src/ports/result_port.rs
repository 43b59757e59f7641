//! Indicator result output port trait.

use crate::domain::error::StockindError;
use crate::domain::indicator::{IndicatorOutput, ResultRow};

/// Destination for computed indicator rows.
pub trait ResultSink {
    fn write<R: ResultRow>(&mut self, output: &IndicatorOutput<R>) -> Result<(), StockindError>;
}
