//! Strategy variants and their per-bucket policies.
//!
//! Each variant fixes two choices: how the series is partitioned into
//! buckets, and which price inside a bucket the contribution is spent at.
//! The mapping is resolved at compile time; there is no runtime registry.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::data::PriceBar;

/// Bucket granularity for partitioning a price series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucketing {
    Yearly,
    Monthly,
}

impl Bucketing {
    /// Bucket key for a date. Bars sharing a key fall in the same bucket.
    pub fn key(&self, date: NaiveDate) -> (i32, u32) {
        match self {
            Self::Yearly => (date.year(), 0),
            Self::Monthly => (date.year(), date.month()),
        }
    }
}

/// How cash flows into the series: one fixed amount per bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContributionSchedule {
    pub bucketing: Bucketing,
    pub amount: Decimal,
}

/// A recurring-investment strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Buy at the lowest low of each calendar year.
    PerfectTiming,
    /// Buy at the open of the first trading day of each year.
    ImmediateInvesting,
    /// Buy at the open of the first trading day of each month.
    DollarCostAveraging,
    /// Buy at the highest high of each calendar year.
    InvestAtPeaks,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        Self::PerfectTiming,
        Self::ImmediateInvesting,
        Self::DollarCostAveraging,
        Self::InvestAtPeaks,
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "perfect_timing" | "perfect_market_timing" => Some(Self::PerfectTiming),
            "immediate_investing" => Some(Self::ImmediateInvesting),
            "dollar_cost_averaging" | "dca" => Some(Self::DollarCostAveraging),
            "invest_at_peaks" => Some(Self::InvestAtPeaks),
            _ => None,
        }
    }

    /// Display label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::PerfectTiming => "Perfect Market Timing",
            Self::ImmediateInvesting => "Immediate Investing",
            Self::DollarCostAveraging => "Dollar-Cost Averaging",
            Self::InvestAtPeaks => "Invest at Peaks",
        }
    }

    pub fn bucketing(&self) -> Bucketing {
        match self {
            Self::DollarCostAveraging => Bucketing::Monthly,
            _ => Bucketing::Yearly,
        }
    }

    /// Contribution schedule for a given annual amount.
    pub fn schedule(&self, annual_amount: Decimal) -> ContributionSchedule {
        let bucketing = self.bucketing();
        let amount = match bucketing {
            Bucketing::Yearly => annual_amount,
            Bucketing::Monthly => annual_amount / Decimal::from(12),
        };
        ContributionSchedule { bucketing, amount }
    }

    /// Reference buy price for one bucket, with the date it occurred.
    ///
    /// Returns `None` when no bar in the bucket carries a usable price,
    /// which excludes the bucket from the simulation.
    pub(crate) fn reference_price(&self, bars: &[PriceBar]) -> Option<(NaiveDate, Decimal)> {
        match self {
            Self::PerfectTiming => lowest_low(bars),
            Self::ImmediateInvesting | Self::DollarCostAveraging => first_open(bars),
            Self::InvestAtPeaks => highest_high(bars),
        }
    }
}

/// Lowest usable low in the bucket; ties resolve to the earliest bar.
fn lowest_low(bars: &[PriceBar]) -> Option<(NaiveDate, Decimal)> {
    let mut best: Option<(NaiveDate, Decimal)> = None;
    for bar in bars {
        if bar.low <= Decimal::ZERO {
            continue;
        }
        match best {
            Some((_, low)) if bar.low >= low => {}
            _ => best = Some((bar.date, bar.low)),
        }
    }
    best
}

/// Highest usable high in the bucket; ties resolve to the earliest bar.
fn highest_high(bars: &[PriceBar]) -> Option<(NaiveDate, Decimal)> {
    let mut best: Option<(NaiveDate, Decimal)> = None;
    for bar in bars {
        if bar.high <= Decimal::ZERO {
            continue;
        }
        match best {
            Some((_, high)) if bar.high <= high => {}
            _ => best = Some((bar.date, bar.high)),
        }
    }
    best
}

/// Open of the first bar in the bucket with a usable open.
fn first_open(bars: &[PriceBar]) -> Option<(NaiveDate, Decimal)> {
    bars.iter()
        .find(|b| b.open > Decimal::ZERO)
        .map(|b| (b.date, b.open))
}
