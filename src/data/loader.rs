//! Data loader for daily price-bar parquet files.
//!
//! Loads historical bars from parquet files into the type system for
//! simulation. Bars for one symbol live in `{data_dir}/bars/{SYMBOL}.parquet`
//! with one row per trading day and the following schema:
//! - date, open, high, low, close, volume
//!
//! Gaps in the calendar (weekends, holidays, unlisted ranges) are simply
//! absent rows; nothing is interpolated.

use std::path::Path;

use chrono::NaiveDate;
use polars::prelude::*;
use rust_decimal::Decimal;
use thiserror::Error;

use super::types::{PriceBar, PriceSeries};

/// Expected columns in the parquet files.
pub const EXPECTED_COLUMNS: &[&str] = &["date", "open", "high", "low", "close", "volume"];

#[derive(Error, Debug)]
pub enum DataError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Parquet data loader for daily price bars.
pub struct BarLoader {
    data_dir: String,
}

impl BarLoader {
    /// Create a new loader pointing to the bar data directory.
    pub fn new(data_dir: &str) -> Self {
        Self {
            data_dir: data_dir.to_string(),
        }
    }

    /// Get the path to a symbol's parquet file.
    fn parquet_path(&self, symbol: &str) -> String {
        format!("{}/bars/{}.parquet", self.data_dir, symbol)
    }

    /// List symbols with a bars file on disk.
    pub fn available_symbols(&self) -> Result<Vec<String>, DataError> {
        let dir_path = format!("{}/bars", self.data_dir);
        let path = Path::new(&dir_path);

        if !path.exists() {
            return Ok(vec![]);
        }

        let mut symbols = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();
            if let Some(symbol) = name.strip_suffix(".parquet") {
                symbols.push(symbol.to_string());
            }
        }
        symbols.sort();
        Ok(symbols)
    }

    /// Load raw bar data for a symbol as a LazyFrame.
    pub fn load_lazy(&self, symbol: &str) -> Result<LazyFrame, DataError> {
        let path = self.parquet_path(symbol);
        if !Path::new(&path).exists() {
            return Err(DataError::FileNotFound(path));
        }
        let lf = LazyFrame::scan_parquet(&path, ScanArgsParquet::default())?;
        Ok(lf)
    }

    /// Load the full history for a symbol.
    pub fn load_all(&self, symbol: &str) -> Result<PriceSeries, DataError> {
        let df = self.load_lazy(symbol)?.collect()?;
        dataframe_to_series(df, symbol, None)
    }

    /// Load bars within an inclusive date range.
    pub fn load_series(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        let df = self.load_lazy(symbol)?.collect()?;
        dataframe_to_series(df, symbol, Some((start_date, end_date)))
    }

    /// Date range covered by a symbol's bars file.
    pub fn date_range(&self, symbol: &str) -> Result<(NaiveDate, NaiveDate), DataError> {
        let series = self.load_all(symbol)?;
        match (series.first_date(), series.last_date()) {
            (Some(first), Some(last)) => Ok((first, last)),
            _ => Err(DataError::InvalidData(format!("No rows for {}", symbol))),
        }
    }
}

/// Convert days since Unix epoch to NaiveDate.
fn date_from_days(days: i32) -> NaiveDate {
    NaiveDate::from_num_days_from_ce_opt(days + 719_163).unwrap_or_default()
}

/// Convert a bars DataFrame to a PriceSeries, optionally keeping only an
/// inclusive date range.
///
/// Rows with unparseable dates are skipped. NaN prices come through as
/// zero, which downstream code treats as missing.
fn dataframe_to_series(
    df: DataFrame,
    symbol: &str,
    range: Option<(NaiveDate, NaiveDate)>,
) -> Result<PriceSeries, DataError> {
    let date_col = df.column("date")?;
    let open_col = df.column("open")?;
    let high_col = df.column("high")?;
    let low_col = df.column("low")?;
    let close_col = df.column("close")?;
    let volume_col = df.column("volume").ok();

    let mut bars = Vec::with_capacity(df.height());

    for idx in 0..df.height() {
        // Handle both string and date column types
        let date = if let Ok(str_col) = date_col.str() {
            str_col
                .get(idx)
                .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        } else if let Ok(d_col) = date_col.date() {
            d_col.get(idx).map(date_from_days)
        } else {
            return Err(DataError::InvalidData(
                "date column has unexpected type".to_string(),
            ));
        };

        let Some(date) = date else { continue };

        if let Some((start, end)) = range {
            if date < start || date > end {
                continue;
            }
        }

        let open = open_col.f64().ok().and_then(|c| c.get(idx)).unwrap_or(0.0);
        let high = high_col.f64().ok().and_then(|c| c.get(idx)).unwrap_or(0.0);
        let low = low_col.f64().ok().and_then(|c| c.get(idx)).unwrap_or(0.0);
        let close = close_col.f64().ok().and_then(|c| c.get(idx)).unwrap_or(0.0);
        let volume = volume_col
            .and_then(|c| c.i64().ok())
            .and_then(|c| c.get(idx))
            .unwrap_or(0);

        bars.push(PriceBar {
            date,
            open: Decimal::from_f64_retain(open).unwrap_or_default(),
            high: Decimal::from_f64_retain(high).unwrap_or_default(),
            low: Decimal::from_f64_retain(low).unwrap_or_default(),
            close: Decimal::from_f64_retain(close).unwrap_or_default(),
            volume,
        });
    }

    Ok(PriceSeries::new(symbol, bars))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_from_days() {
        let date = date_from_days(18262);
        assert_eq!(date, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
    }

    #[test]
    fn test_loader_creation() {
        let loader = BarLoader::new("data/history");
        assert_eq!(loader.data_dir, "data/history");
    }

    #[test]
    fn test_parquet_path() {
        let loader = BarLoader::new("data/history");
        let path = loader.parquet_path("SPY");
        assert_eq!(path, "data/history/bars/SPY.parquet");
    }

    #[test]
    fn test_missing_file_errors() {
        let loader = BarLoader::new("data/does-not-exist");
        let err = loader.load_lazy("SPY").err().unwrap();
        assert!(matches!(err, DataError::FileNotFound(_)));
    }

    #[test]
    fn test_missing_dir_lists_nothing() {
        let loader = BarLoader::new("data/does-not-exist");
        assert!(loader.available_symbols().unwrap().is_empty());
    }

    #[test]
    fn test_expected_columns() {
        assert_eq!(EXPECTED_COLUMNS.len(), 6);
        assert!(EXPECTED_COLUMNS.contains(&"date"));
        assert!(EXPECTED_COLUMNS.contains(&"close"));
    }
}
