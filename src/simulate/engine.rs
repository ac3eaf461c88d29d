//! Strategy simulation engine.
//!
//! Runs the simulation loop:
//! 1. Partition the series into calendar buckets
//! 2. Pick the strategy's reference price per bucket
//! 3. Convert the bucket's contribution into shares
//! 4. Value the accumulated position at the last available close

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::data::{PriceBar, PriceSeries};

use super::strategy::{Bucketing, StrategyKind};

/// One simulated purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyEvent {
    pub date: NaiveDate,
    pub price: Decimal,
    pub shares: Decimal,
}

/// Outcome of replaying one strategy over one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub strategy: StrategyKind,

    /// Accumulated shares valued at the last available close.
    pub final_value: Decimal,

    /// Cash actually spent. Skipped buckets contributed nothing, so this is
    /// the per-bucket contribution times the number of buys.
    pub total_invested: Decimal,

    /// One entry per bucket that produced a buy, in chronological order.
    pub buy_events: Vec<BuyEvent>,
}

impl SimulationResult {
    pub fn shares_owned(&self) -> Decimal {
        self.buy_events.iter().map(|e| e.shares).sum()
    }

    /// Generate a summary string.
    pub fn summary(&self) -> String {
        format!(
            "{} Strategy\n\
             Final portfolio value: ${:.2}\n\
             Total invested: ${:.2}\n\
             Buys: {}",
            self.strategy.label(),
            self.final_value,
            self.total_invested,
            self.buy_events.len()
        )
    }
}

/// Replay `strategy` over `series`, contributing `annual_amount` per year.
///
/// Pure function of its inputs: no shared state, identical inputs give
/// identical results. Buckets without a usable reference price are skipped
/// silently. An empty series yields a zero-valued result rather than an
/// error.
pub fn simulate(
    series: &PriceSeries,
    strategy: StrategyKind,
    annual_amount: Decimal,
) -> SimulationResult {
    let schedule = strategy.schedule(annual_amount);

    let mut shares_owned = Decimal::ZERO;
    let mut buy_events = Vec::new();

    for bucket in bucket_slices(series.bars(), schedule.bucketing) {
        let Some((date, price)) = strategy.reference_price(bucket) else {
            continue;
        };
        let shares = schedule.amount / price;
        shares_owned += shares;
        buy_events.push(BuyEvent { date, price, shares });
    }

    let final_value = series
        .last_close()
        .map(|close| shares_owned * close)
        .unwrap_or(Decimal::ZERO);
    let total_invested = schedule.amount * Decimal::from(buy_events.len() as i64);

    SimulationResult {
        strategy,
        final_value,
        total_invested,
        buy_events,
    }
}

/// Split sorted bars into contiguous runs sharing a bucket key.
fn bucket_slices(
    bars: &[PriceBar],
    bucketing: Bucketing,
) -> impl Iterator<Item = &[PriceBar]> + '_ {
    bars.chunk_by(move |a, b| bucketing.key(a.date) == bucketing.key(b.date))
}
