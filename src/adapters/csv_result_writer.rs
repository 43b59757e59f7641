//! CSV output for indicator results.
//!
//! Every aligned record becomes one row, warm-up rows included. Null values
//! are written as empty cells. Dates at midnight are written without a time.

use crate::domain::error::StockindError;
use crate::domain::indicator::{IndicatorOutput, ResultRow};
use crate::ports::result_port::ResultSink;
use chrono::{NaiveDateTime, Timelike};
use std::io::Write;

pub struct CsvResultWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvResultWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(inner),
        }
    }

    pub fn into_inner(self) -> Result<W, StockindError> {
        self.writer.into_inner().map_err(|e| StockindError::Io(e.into_error()))
    }
}

fn format_date(date: NaiveDateTime) -> String {
    if date.num_seconds_from_midnight() == 0 {
        date.format("%Y-%m-%d").to_string()
    } else {
        date.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

fn csv_error(e: csv::Error) -> StockindError {
    StockindError::Data {
        reason: format!("CSV write error: {}", e),
    }
}

impl<W: Write> ResultSink for CsvResultWriter<W> {
    fn write<R: ResultRow>(&mut self, output: &IndicatorOutput<R>) -> Result<(), StockindError> {
        let header = std::iter::once("date").chain(R::columns().iter().copied());
        self.writer.write_record(header).map_err(csv_error)?;

        for result in &output.results {
            let mut row = vec![format_date(result.date())];
            row.extend(result.cells().into_iter().map(Option::unwrap_or_default));
            self.writer.write_record(&row).map_err(csv_error)?;
        }

        self.writer.flush()?;
        Ok(())
    }
}
