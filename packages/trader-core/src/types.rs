//! Core data types for the trading simulator.

use crate::Error;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of stocks the simulator trades.
///
/// Declaration order is display order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stock {
    #[serde(rename = "AAPL")]
    Aapl,
    #[serde(rename = "FB")]
    Fb,
    #[serde(rename = "GOOG")]
    Goog,
    #[serde(rename = "TSLA")]
    Tsla,
}

impl Stock {
    /// Every supported stock, in display order.
    pub const ALL: [Stock; 4] = [Stock::Aapl, Stock::Fb, Stock::Goog, Stock::Tsla];

    /// Exchange ticker symbol.
    pub fn ticker(self) -> &'static str {
        match self {
            Stock::Aapl => "AAPL",
            Stock::Fb => "FB",
            Stock::Goog => "GOOG",
            Stock::Tsla => "TSLA",
        }
    }
}

impl fmt::Display for Stock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ticker())
    }
}

impl FromStr for Stock {
    type Err = Error;

    /// Tickers match exactly, upper-case only.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stock::ALL
            .into_iter()
            .find(|stock| stock.ticker() == s)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown stock: {}", s)))
    }
}

/// Trade direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeSide::Buy => f.write_str("buy"),
            TradeSide::Sell => f.write_str("sell"),
        }
    }
}

impl FromStr for TradeSide {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(TradeSide::Buy),
            "sell" => Ok(TradeSide::Sell),
            other => Err(Error::InvalidInput(format!(
                "Expected 'buy' or 'sell', got '{}'",
                other
            ))),
        }
    }
}

/// A single market order at a fixed unit price.
///
/// Immutable once built. Price and quantity are checked at the input boundary;
/// the account only enforces its cash and holdings invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    symbol: Stock,
    side: TradeSide,
    unit_price: Decimal,
    quantity: u32,
}

impl Trade {
    /// Create a new trade.
    pub fn new(symbol: Stock, side: TradeSide, unit_price: Decimal, quantity: u32) -> Self {
        Self {
            symbol,
            side,
            unit_price,
            quantity,
        }
    }

    pub fn symbol(&self) -> Stock {
        self.symbol
    }

    pub fn side(&self) -> TradeSide {
        self.side
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Value of the trade before fees (unit price x quantity).
    ///
    /// `None` if the product does not fit in a `Decimal`.
    pub fn notional(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} @ ${}",
            self.side.to_string().to_uppercase(),
            self.quantity,
            self.symbol,
            self.unit_price
        )
    }
}

/// Shares of one stock held by an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    pub stock: Stock,
    pub shares: u32,
}

/// API response wrapper for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response.
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }
}
