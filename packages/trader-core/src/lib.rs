//! Trader Core - Account, fee and price-series library for the stock trading simulator.
//!
//! This crate provides the pieces behind the `stock-trader` console game:
//!
//! - **Price series**: Per-stock closing prices by trading day, embedded or loaded from CSV
//! - **Accounts**: Personal and tax-free savings ledgers with per-variant fee policy
//! - **Simulation**: Day-by-day session that prices and executes market orders
//! - **Console**: Prompt-driven front end over any reader/writer pair
//!
//! # Example
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use trader_core::{Account, AccountKind, PriceProvider, Session, Stock, TradeSide};
//!
//! let provider = PriceProvider::embedded().unwrap();
//! let kind = AccountKind::Personal;
//! let account = Account::new(kind, kind.default_fee_rate(), Decimal::new(4000, 0)).unwrap();
//!
//! let mut session = Session::new(account, provider, 5).unwrap();
//! let execution = session.place_order(TradeSide::Buy, Stock::Aapl, 3).unwrap();
//! println!("Filled: {}", execution.trade());
//! println!("{}", session.account().portfolio_summary());
//! ```

pub mod account;
pub mod config;
pub mod console;
pub mod prices;
pub mod simulation;
pub mod types;

// Re-export commonly used types
pub use types::{ApiResponse, Holding, Stock, Trade, TradeSide};

// Re-export main functionality
pub use account::{Account, AccountError, AccountKind, Execution, FeeSchedule, PortfolioSummary};
pub use config::SimulationConfig;
pub use console::Console;
pub use prices::{PriceProvider, PriceSeries};
pub use simulation::{Quote, Session};

/// Error types for trader-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("No price recorded for {stock} on day {day}")]
    PriceNotFound { stock: Stock, day: u32 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Account(#[from] AccountError),
}

/// Result type for trader-core operations.
pub type Result<T> = std::result::Result<T, Error>;
