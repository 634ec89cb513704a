//! Market data supplied by the host for display.
//!
//! The planning engine never reads prices; these types only feed the chart
//! overlay:
//! - Close-price series loaded from local CSV exports
//! - EMA trend line over the series

mod indicators;
mod series;

pub use indicators::ema;
pub use series::{CsvPriceLoader, PriceBar, PriceSeries, PriceSource};
