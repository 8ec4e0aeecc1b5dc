//! Day-by-day trading session.
//!
//! A session owns the account and the price tables for the whole run. Orders are
//! always filled at the current day's closing price.

use crate::account::{Account, Execution};
use crate::prices::PriceProvider;
use crate::types::{Stock, Trade, TradeSide};
use crate::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// One stock's price on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub stock: Stock,
    pub price: Decimal,
    /// Change since the previous day; `None` on day 1
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<Decimal>,
}

/// Quotes for every stock on `day`, in display order.
pub fn quote_board(provider: &PriceProvider, day: u32) -> Result<Vec<Quote>> {
    Stock::ALL
        .into_iter()
        .map(|stock| {
            Ok(Quote {
                stock,
                price: provider.price_of(stock, day)?,
                change: provider.day_over_day_change(stock, day)?,
            })
        })
        .collect()
}

/// A single-user simulation over a fixed number of trading days.
#[derive(Debug)]
pub struct Session {
    account: Account,
    provider: PriceProvider,
    day: u32,
    horizon: u32,
    finished: bool,
}

impl Session {
    /// Start a session on day 1.
    ///
    /// The horizon must be at least one day and covered by every price series.
    pub fn new(account: Account, provider: PriceProvider, horizon: u32) -> Result<Self> {
        if horizon == 0 {
            return Err(Error::InvalidData(
                "Simulation needs at least one day".to_string(),
            ));
        }
        let last_day = provider.last_common_day();
        if horizon > last_day {
            return Err(Error::InvalidData(format!(
                "Horizon of {} days exceeds price data, which ends on day {}",
                horizon, last_day
            )));
        }

        info!(
            kind = %account.kind(),
            cash = %account.current_funds(),
            horizon,
            "session started"
        );

        Ok(Self {
            account,
            provider,
            day: 1,
            horizon,
            finished: false,
        })
    }

    /// Current trading day (1-based).
    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn horizon(&self) -> u32 {
        self.horizon
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn provider(&self) -> &PriceProvider {
        &self.provider
    }

    /// Move to the next day.
    ///
    /// Returns `false` and marks the session finished once the horizon is passed.
    pub fn advance_day(&mut self) -> bool {
        if self.finished {
            return false;
        }
        if self.day >= self.horizon {
            self.finished = true;
            info!(
                day = self.day,
                cash = %self.account.current_funds(),
                trades = self.account.executions().len(),
                "session finished"
            );
            return false;
        }

        self.day += 1;
        info!(day = self.day, "advanced to next trading day");
        true
    }

    /// Quotes for every stock on the current day.
    pub fn quote_board(&self) -> Result<Vec<Quote>> {
        quote_board(&self.provider, self.day).inspect_err(|e| {
            warn!(day = self.day, error = %e, "price board unavailable");
        })
    }

    /// Fill a market order at today's closing price.
    pub fn place_order(&mut self, side: TradeSide, stock: Stock, quantity: u32) -> Result<Execution> {
        if self.finished {
            return Err(Error::InvalidInput("Simulation has finished".to_string()));
        }
        if quantity == 0 {
            return Err(Error::InvalidInput(
                "Share count must be positive".to_string(),
            ));
        }

        let price = self.provider.price_of(stock, self.day).inspect_err(|e| {
            warn!(day = self.day, error = %e, "cannot price order");
        })?;
        let trade = Trade::new(stock, side, price, quantity);

        self.account.execute_trade(&trade).map_err(|e| {
            warn!(trade = %trade, reason = %e, "trade rejected");
            Error::from(e)
        })
    }

    /// End the session and hand back the account.
    pub fn into_account(self) -> Account {
        self.account
    }
}
