//! A single stock's closing prices, keyed by trading day.

use crate::{Error, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

/// One row of a price CSV (`day,close`).
#[derive(Debug, Deserialize)]
struct PriceRow {
    day: u32,
    #[serde(with = "rust_decimal::serde::str")]
    close: Decimal,
}

/// Closing prices for one stock, sorted by day with no duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceSeries {
    points: Vec<(u32, Decimal)>,
}

impl PriceSeries {
    /// Build a series from `(day, close)` points.
    ///
    /// Days must start at 1 or later and be strictly increasing. Every price must
    /// be positive. Gaps between days are allowed.
    pub fn new(points: Vec<(u32, Decimal)>) -> Result<Self> {
        let mut previous: Option<u32> = None;
        for &(day, price) in &points {
            if day == 0 {
                return Err(Error::InvalidData("Trading days start at 1".to_string()));
            }
            if let Some(prev) = previous {
                if day <= prev {
                    return Err(Error::InvalidData(format!(
                        "Day {} follows day {}; days must be strictly increasing",
                        day, prev
                    )));
                }
            }
            if price <= Decimal::ZERO {
                return Err(Error::InvalidData(format!(
                    "Non-positive price {} on day {}",
                    price, day
                )));
            }
            previous = Some(day);
        }

        Ok(Self { points })
    }

    /// Parse a series from CSV with a `day,close` header row.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut points = Vec::new();
        for result in rdr.deserialize() {
            let row: PriceRow = result?;
            points.push((row.day, row.close));
        }

        Self::new(points)
    }

    /// Closing price recorded for exactly `day`, if any.
    pub fn price_on(&self, day: u32) -> Option<Decimal> {
        self.points
            .binary_search_by_key(&day, |&(d, _)| d)
            .ok()
            .map(|idx| self.points[idx].1)
    }

    pub fn first_day(&self) -> Option<u32> {
        self.points.first().map(|&(day, _)| day)
    }

    pub fn last_day(&self) -> Option<u32> {
        self.points.last().map(|&(day, _)| day)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate over `(day, close)` points in day order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (u32, Decimal)> + '_ {
        self.points.iter().copied()
    }
}
