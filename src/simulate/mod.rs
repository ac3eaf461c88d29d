//! Strategy simulation module.
//!
//! Replays recurring-investment strategies against a price series:
//! - Bucketing of the series into calendar years or months
//! - Per-variant reference-price selection (low, first open, high)
//! - Share accumulation and last-close valuation

pub mod engine;
pub mod strategy;

pub use engine::{simulate, BuyEvent, SimulationResult};
pub use strategy::{Bucketing, ContributionSchedule, StrategyKind};
