//! CSV file quote adapter.
//!
//! One file per symbol, `<base>/<SYMBOL>.csv`, with header
//! `date,open,high,low,close,volume`.

use crate::domain::error::StockindError;
use crate::domain::quote::Quote;
use crate::ports::data_port::DataPort;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn parse_date(value: &str) -> Result<NaiveDateTime, StockindError> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT)
        .or_else(|_| {
            NaiveDate::parse_from_str(value, DATE_FORMAT).map(|d| d.and_time(Default::default()))
        })
        .map_err(|e| StockindError::Data {
            reason: format!("invalid date {:?}: {}", value, e),
        })
}

fn parse_column(record: &csv::StringRecord, index: usize, name: &str) -> Result<Decimal, StockindError> {
    let raw = record.get(index).ok_or_else(|| StockindError::Data {
        reason: format!("missing {} column", name),
    })?;
    Decimal::from_str(raw.trim()).map_err(|e| StockindError::Data {
        reason: format!("invalid {} value {:?}: {}", name, raw, e),
    })
}

impl DataPort for CsvAdapter {
    fn fetch_quotes(&self, symbol: &str) -> Result<Vec<Quote>, StockindError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| StockindError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut quotes = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| StockindError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(0).ok_or_else(|| StockindError::Data {
                reason: "missing date column".into(),
            })?;

            quotes.push(Quote {
                date: parse_date(date_str)?,
                open: parse_column(&record, 1, "open")?,
                high: parse_column(&record, 2, "high")?,
                low: parse_column(&record, 3, "low")?,
                close: parse_column(&record, 4, "close")?,
                volume: parse_column(&record, 5, "volume")?,
            });
        }

        Ok(quotes)
    }

    fn list_symbols(&self) -> Result<Vec<String>, StockindError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| StockindError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| StockindError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
