//! Price lookups across every supported stock.

use super::series::PriceSeries;
use crate::types::Stock;
use crate::{Error, Result};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

const AAPL_CSV: &str = include_str!("../../data/AAPL.csv");
const FB_CSV: &str = include_str!("../../data/FB.csv");
const GOOG_CSV: &str = include_str!("../../data/GOOG.csv");
const TSLA_CSV: &str = include_str!("../../data/TSLA.csv");

fn embedded_csv(stock: Stock) -> &'static str {
    match stock {
        Stock::Aapl => AAPL_CSV,
        Stock::Fb => FB_CSV,
        Stock::Goog => GOOG_CSV,
        Stock::Tsla => TSLA_CSV,
    }
}

/// Read-only closing price tables for every [`Stock`].
#[derive(Debug, Clone)]
pub struct PriceProvider {
    series: BTreeMap<Stock, PriceSeries>,
}

impl PriceProvider {
    /// Build a provider from one series per stock.
    ///
    /// Every supported stock must be present.
    pub fn from_series(series: impl IntoIterator<Item = (Stock, PriceSeries)>) -> Result<Self> {
        let series: BTreeMap<Stock, PriceSeries> = series.into_iter().collect();

        if let Some(missing) = Stock::ALL.iter().find(|s| !series.contains_key(s)) {
            return Err(Error::InvalidData(format!(
                "No price series for {}",
                missing
            )));
        }

        Ok(Self { series })
    }

    /// Load the price tables compiled into the crate.
    pub fn embedded() -> Result<Self> {
        let mut series = Vec::with_capacity(Stock::ALL.len());
        for stock in Stock::ALL {
            let parsed = PriceSeries::from_csv(embedded_csv(stock).as_bytes())?;
            debug!(%stock, days = parsed.len(), "loaded embedded price series");
            series.push((stock, parsed));
        }
        Self::from_series(series)
    }

    /// Load `<dir>/<TICKER>.csv` for every supported stock.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let mut series = Vec::with_capacity(Stock::ALL.len());
        for stock in Stock::ALL {
            let path = dir.join(format!("{}.csv", stock.ticker()));
            let file = File::open(&path)?;
            let parsed = PriceSeries::from_csv(BufReader::new(file))?;
            debug!(%stock, path = %path.display(), days = parsed.len(), "loaded price series");
            series.push((stock, parsed));
        }
        Self::from_series(series)
    }

    /// The series backing `stock`.
    pub fn series(&self, stock: Stock) -> Option<&PriceSeries> {
        self.series.get(&stock)
    }

    /// Closing price of `stock` on exactly `day`.
    pub fn price_of(&self, stock: Stock, day: u32) -> Result<Decimal> {
        self.series
            .get(&stock)
            .and_then(|s| s.price_on(day))
            .ok_or(Error::PriceNotFound { stock, day })
    }

    /// Change in closing price since the previous day.
    ///
    /// `None` on day 1, where there is no prior day to compare against.
    /// Day 0 is never a trading day and fails like any other missing day.
    pub fn day_over_day_change(&self, stock: Stock, day: u32) -> Result<Option<Decimal>> {
        if day == 1 {
            return Ok(None);
        }

        let today = self.price_of(stock, day)?;
        let yesterday = self.price_of(stock, day - 1)?;
        Ok(Some(today - yesterday))
    }

    /// Largest day on which every stock has a price.
    ///
    /// Returns 0 when no day is shared by all series.
    pub fn last_common_day(&self) -> u32 {
        let mut all = self.series.values();
        let Some(first) = all.next() else {
            return 0;
        };
        let rest: Vec<&PriceSeries> = all.collect();

        first
            .iter()
            .rev()
            .map(|(day, _)| day)
            .find(|&day| rest.iter().all(|s| s.price_on(day).is_some()))
            .unwrap_or(0)
    }
}
