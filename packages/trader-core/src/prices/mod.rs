//! Historical closing prices by trading day.
//!
//! Each supported stock has one series of `(day, close)` rows. Series are read
//! once, from the tables embedded in the crate or from a directory of CSV files,
//! and never change afterwards.

mod provider;
mod series;

pub use provider::PriceProvider;
pub use series::PriceSeries;
