pub mod loader;
pub mod types;

pub use loader::{BarLoader, DataError};
pub use types::{PriceBar, PriceSeries};
