//! Trading accounts.
//!
//! One ledger type serves both account variants; the variant only decides the
//! fee policy applied to each trade.

mod kind;
mod ledger;

pub use kind::{AccountKind, FeeSchedule};
pub use ledger::{Account, AccountError, Execution, PortfolioSummary};
