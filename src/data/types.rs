//! Core data types for price-history backtesting.
//!
//! A price series is the sole input to every simulation: an ordered run of
//! daily OHLCV bars for one symbol. Construction normalizes ordering so the
//! rest of the crate can rely on strictly increasing dates.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single daily price bar.
///
/// Prices are usable only when strictly positive; a missing quote is stored
/// as zero and skipped by consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: i64,
}

/// Ordered daily price history for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Build a series from bars in any order.
    ///
    /// Bars are sorted by date and duplicate dates dropped (first wins), so
    /// the stored sequence is strictly increasing.
    pub fn new(symbol: impl Into<String>, mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|b| b.date);
        bars.dedup_by_key(|b| b.date);
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    /// Close of the last bar carrying a usable close price.
    pub fn last_close(&self) -> Option<Decimal> {
        self.bars
            .iter()
            .rev()
            .map(|b| b.close)
            .find(|c| *c > Decimal::ZERO)
    }

    /// Owned copy of the bars in `[start, end)`.
    pub fn slice(&self, start: NaiveDate, end: NaiveDate) -> PriceSeries {
        let from = self.bars.partition_point(|b| b.date < start);
        let to = self.bars.partition_point(|b| b.date < end);
        PriceSeries {
            symbol: self.symbol.clone(),
            bars: self.bars[from..to].to_vec(),
        }
    }

    /// Calendar years spanned by the series (fractional).
    pub fn span_years(&self) -> f64 {
        match (self.first_date(), self.last_date()) {
            (Some(first), Some(last)) => (last - first).num_days() as f64 / 365.25,
            _ => 0.0,
        }
    }
}
