//! Rolling-window analysis module.
//!
//! Re-runs every strategy over fixed-length windows whose start date
//! advances by one calendar month:
//! - Window: 20 years (configurable)
//! - Roll: monthly
//! - One result row per (start date, strategy) pair

pub mod analyzer;
pub mod windows;

pub use analyzer::{RollingAnalyzer, RollingConfig, RollingRow, RollingSummary};
pub use windows::{add_months, RollingWindow, RollingWindows, RollingWindowsConfig};
