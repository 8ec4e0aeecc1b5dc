//! Account ledger: cash, holdings and trade execution.

use super::kind::AccountKind;
use crate::types::{Holding, Stock, Trade, TradeSide};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Reasons a trade is rejected. The account is left unchanged in every case.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountError {
    #[error("Insufficient funds. Need ${required:.2}, have ${available:.2}")]
    InsufficientFunds {
        required: Decimal,
        available: Decimal,
    },

    #[error("Cannot sell {requested} shares of {stock}, only have {held}")]
    InsufficientShares {
        stock: Stock,
        requested: u32,
        held: u32,
    },

    #[error("Trade amounts for {trade} are too large to represent")]
    AmountOverflow { trade: Trade },

    #[error("Holding {held} shares of {stock} cannot grow by {quantity}")]
    HoldingOverflow {
        stock: Stock,
        held: u32,
        quantity: u32,
    },
}

/// An accepted trade and its effect on the account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Execution {
    trade: Trade,
    /// Fee charged on this trade
    fee: Decimal,
    /// Signed change to cash (negative for buys)
    cash_delta: Decimal,
    /// Cash balance right after the trade
    cash_after: Decimal,
    /// When the trade was executed
    executed_at: DateTime<Utc>,
}

impl Execution {
    pub fn trade(&self) -> &Trade {
        &self.trade
    }

    pub fn fee(&self) -> Decimal {
        self.fee
    }

    pub fn cash_delta(&self) -> Decimal {
        self.cash_delta
    }

    pub fn cash_after(&self) -> Decimal {
        self.cash_after
    }

    pub fn executed_at(&self) -> DateTime<Utc> {
        self.executed_at
    }
}

/// Cash and non-zero holdings of an account, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub kind: AccountKind,
    pub cash: Decimal,
    /// Ordered by stock
    pub holdings: Vec<Holding>,
}

impl fmt::Display for PortfolioSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Account:  {}", self.kind)?;
        writeln!(f, "  Cash:     ${:.2}", self.cash)?;
        if self.holdings.is_empty() {
            write!(f, "  Holdings: none")
        } else {
            write!(f, "  Holdings:")?;
            for holding in &self.holdings {
                write!(f, "\n    {:<6} {:>6} shares", holding.stock, holding.shares)?;
            }
            Ok(())
        }
    }
}

/// A single user's trading account.
///
/// Cash and every holding stay non-negative: a trade that would break either is
/// rejected before anything is changed.
#[derive(Debug, Clone)]
pub struct Account {
    kind: AccountKind,
    fee_rate: Decimal,
    cash: Decimal,
    holdings: BTreeMap<Stock, u32>,
    executions: Vec<Execution>,
}

impl Account {
    /// Open an account with an initial cash deposit.
    pub fn new(kind: AccountKind, fee_rate: Decimal, initial_deposit: Decimal) -> Result<Self> {
        if fee_rate < Decimal::ZERO || fee_rate >= Decimal::ONE {
            return Err(Error::InvalidData(format!(
                "Fee rate {} must be in [0, 1)",
                fee_rate
            )));
        }
        if initial_deposit < Decimal::ZERO {
            return Err(Error::InvalidData(format!(
                "Initial deposit {} cannot be negative",
                initial_deposit
            )));
        }

        Ok(Self {
            kind,
            fee_rate,
            cash: initial_deposit,
            holdings: BTreeMap::new(),
            executions: Vec::new(),
        })
    }

    pub fn kind(&self) -> AccountKind {
        self.kind
    }

    pub fn fee_rate(&self) -> Decimal {
        self.fee_rate
    }

    /// Current cash balance.
    pub fn current_funds(&self) -> Decimal {
        self.cash
    }

    /// Shares held of `stock` (0 when none).
    pub fn holding(&self, stock: Stock) -> u32 {
        self.holdings.get(&stock).copied().unwrap_or(0)
    }

    /// Accepted trades this session, oldest first.
    pub fn executions(&self) -> &[Execution] {
        &self.executions
    }

    /// Execute a market order against this account.
    ///
    /// Buys cost `notional * (1 + fee)` where the fee applies only if the
    /// variant charges on buys. Sells return `notional * (1 - fee)` for every
    /// variant. All checks run before any state changes.
    pub fn execute_trade(&mut self, trade: &Trade) -> std::result::Result<Execution, AccountError> {
        let stock = trade.symbol();
        let quantity = trade.quantity();
        let held = self.holding(stock);
        let overflow = || AccountError::AmountOverflow {
            trade: trade.clone(),
        };
        let notional = trade.notional().ok_or_else(overflow)?;

        let (fee, cash_delta, shares_after) = match trade.side() {
            TradeSide::Buy => {
                let fee = if self.kind.charges_fee_on_buy() {
                    notional.checked_mul(self.fee_rate).ok_or_else(overflow)?
                } else {
                    Decimal::ZERO
                };
                let required = notional.checked_add(fee).ok_or_else(overflow)?;
                if self.cash < required {
                    return Err(AccountError::InsufficientFunds {
                        required,
                        available: self.cash,
                    });
                }
                let shares_after = held.checked_add(quantity).ok_or(
                    AccountError::HoldingOverflow {
                        stock,
                        held,
                        quantity,
                    },
                )?;
                (fee, -required, shares_after)
            }
            TradeSide::Sell => {
                if held < quantity {
                    return Err(AccountError::InsufficientShares {
                        stock,
                        requested: quantity,
                        held,
                    });
                }
                let fee = if self.kind.charges_fee_on_sell() {
                    notional.checked_mul(self.fee_rate).ok_or_else(overflow)?
                } else {
                    Decimal::ZERO
                };
                (fee, notional - fee, held - quantity)
            }
        };

        let cash_after = self.cash.checked_add(cash_delta).ok_or_else(overflow)?;

        self.cash = cash_after;
        if shares_after == 0 {
            self.holdings.remove(&stock);
        } else {
            self.holdings.insert(stock, shares_after);
        }

        let execution = Execution {
            trade: trade.clone(),
            fee,
            cash_delta,
            cash_after: self.cash,
            executed_at: Utc::now(),
        };
        self.executions.push(execution.clone());

        debug!(
            trade = %trade,
            %fee,
            cash = %self.cash,
            shares = shares_after,
            "trade executed"
        );

        Ok(execution)
    }

    /// Cash balance and non-zero holdings, ordered by stock.
    pub fn portfolio_summary(&self) -> PortfolioSummary {
        PortfolioSummary {
            kind: self.kind,
            cash: self.cash,
            holdings: self
                .holdings
                .iter()
                .filter(|&(_, &shares)| shares > 0)
                .map(|(&stock, &shares)| Holding { stock, shares })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn personal(cash: Decimal) -> Account {
        Account::new(AccountKind::Personal, dec!(0.05), cash).unwrap()
    }

    fn tfsa(cash: Decimal) -> Account {
        Account::new(AccountKind::TaxFreeSavings, dec!(0.01), cash).unwrap()
    }

    fn buy(stock: Stock, price: Decimal, quantity: u32) -> Trade {
        Trade::new(stock, TradeSide::Buy, price, quantity)
    }

    fn sell(stock: Stock, price: Decimal, quantity: u32) -> Trade {
        Trade::new(stock, TradeSide::Sell, price, quantity)
    }

    #[test]
    fn test_new_account() {
        let account = personal(dec!(4000));
        assert_eq!(account.current_funds(), dec!(4000));
        assert_eq!(account.holding(Stock::Aapl), 0);
        assert!(account.executions().is_empty());
    }

    #[test]
    fn test_new_account_rejects_bad_fee_rate() {
        let result = Account::new(AccountKind::Personal, dec!(1), dec!(100));
        assert!(matches!(result, Err(Error::InvalidData(_))));

        let result = Account::new(AccountKind::Personal, dec!(-0.01), dec!(100));
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_new_account_rejects_negative_deposit() {
        let result = Account::new(AccountKind::Personal, dec!(0.05), dec!(-1));
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_personal_round_trip() {
        let mut account = personal(dec!(4000));

        // Buying is free for personal accounts
        let execution = account.execute_trade(&buy(Stock::Aapl, dec!(100), 10)).unwrap();
        assert_eq!(execution.fee(), dec!(0));
        assert_eq!(execution.cash_delta(), dec!(-1000));
        assert_eq!(account.current_funds(), dec!(3000));
        assert_eq!(account.holding(Stock::Aapl), 10);

        // 1100 * 0.95 = 1045
        let execution = account.execute_trade(&sell(Stock::Aapl, dec!(110), 10)).unwrap();
        assert_eq!(execution.fee(), dec!(55));
        assert_eq!(execution.cash_delta(), dec!(1045));
        assert_eq!(account.current_funds(), dec!(4045));
        assert_eq!(account.holding(Stock::Aapl), 0);
    }

    #[test]
    fn test_tfsa_round_trip() {
        let mut account = tfsa(dec!(4000));

        // 1000 * 1.01 = 1010
        let execution = account.execute_trade(&buy(Stock::Goog, dec!(200), 5)).unwrap();
        assert_eq!(execution.fee(), dec!(10));
        assert_eq!(account.current_funds(), dec!(2990));
        assert_eq!(account.holding(Stock::Goog), 5);

        // 900 * 0.99 = 891
        let execution = account.execute_trade(&sell(Stock::Goog, dec!(180), 5)).unwrap();
        assert_eq!(execution.fee(), dec!(9));
        assert_eq!(account.current_funds(), dec!(3881));
        assert_eq!(account.holding(Stock::Goog), 0);
    }

    #[test]
    fn test_buy_insufficient_funds() {
        let mut account = personal(dec!(1000));
        account.execute_trade(&buy(Stock::Fb, dec!(100), 2)).unwrap();
        let before = account.portfolio_summary();

        let result = account.execute_trade(&buy(Stock::Aapl, dec!(150), 100));
        assert_eq!(
            result.unwrap_err(),
            AccountError::InsufficientFunds {
                required: dec!(15000),
                available: dec!(800),
            }
        );
        assert_eq!(account.portfolio_summary(), before);
        assert_eq!(account.executions().len(), 1);
    }

    #[test]
    fn test_tfsa_buy_fee_counts_toward_funds() {
        // Notional fits exactly, but the 1% fee does not
        let mut account = tfsa(dec!(1000));
        let result = account.execute_trade(&buy(Stock::Aapl, dec!(100), 10));
        assert!(matches!(
            result,
            Err(AccountError::InsufficientFunds { required, .. }) if required == dec!(1010)
        ));
        assert_eq!(account.current_funds(), dec!(1000));
        assert_eq!(account.holding(Stock::Aapl), 0);
    }

    #[test]
    fn test_buy_spends_entire_balance() {
        let mut account = personal(dec!(1000));
        account.execute_trade(&buy(Stock::Aapl, dec!(100), 10)).unwrap();
        assert_eq!(account.current_funds(), dec!(0));
    }

    #[test]
    fn test_sell_without_shares() {
        let mut account = personal(dec!(4000));
        let result = account.execute_trade(&sell(Stock::Tsla, dec!(400), 1));

        assert_eq!(
            result.unwrap_err(),
            AccountError::InsufficientShares {
                stock: Stock::Tsla,
                requested: 1,
                held: 0,
            }
        );
        assert_eq!(account.current_funds(), dec!(4000));
        assert_eq!(account.holding(Stock::Tsla), 0);
        assert!(account.executions().is_empty());
    }

    #[test]
    fn test_sell_more_than_held() {
        let mut account = tfsa(dec!(4000));
        account.execute_trade(&buy(Stock::Aapl, dec!(100), 5)).unwrap();
        let before = account.portfolio_summary();

        let result = account.execute_trade(&sell(Stock::Aapl, dec!(100), 6));
        assert!(matches!(
            result,
            Err(AccountError::InsufficientShares {
                requested: 6,
                held: 5,
                ..
            })
        ));
        assert_eq!(account.portfolio_summary(), before);
    }

    #[test]
    fn test_partial_sell() {
        let mut account = personal(dec!(4000));
        account.execute_trade(&buy(Stock::Aapl, dec!(100), 10)).unwrap();
        account.execute_trade(&sell(Stock::Aapl, dec!(100), 4)).unwrap();

        assert_eq!(account.holding(Stock::Aapl), 6);
        // 3000 + 400 * 0.95
        assert_eq!(account.current_funds(), dec!(3380));
    }

    #[test]
    fn test_holding_overflow() {
        let mut account = personal(dec!(10));
        account
            .execute_trade(&buy(Stock::Aapl, dec!(0.000000001), u32::MAX))
            .unwrap();
        let before = account.portfolio_summary();

        let result = account.execute_trade(&buy(Stock::Aapl, dec!(0.000000001), 1));
        assert!(matches!(result, Err(AccountError::HoldingOverflow { .. })));
        assert_eq!(account.portfolio_summary(), before);
    }

    #[test]
    fn test_oversized_buy_rejected_without_panic() {
        let mut account = personal(dec!(4000));
        let before = account.portfolio_summary();

        let result = account.execute_trade(&buy(Stock::Aapl, Decimal::MAX, 1_000_000_000));
        assert!(matches!(result, Err(AccountError::AmountOverflow { .. })));
        assert_eq!(account.portfolio_summary(), before);
        assert!(account.executions().is_empty());
    }

    #[test]
    fn test_oversized_sell_proceeds_rejected() {
        // Proceeds fit in a Decimal but adding them to cash does not
        let mut account = personal(Decimal::MAX - dec!(1));
        account.execute_trade(&buy(Stock::Fb, dec!(1), 1)).unwrap();
        let before = account.portfolio_summary();

        let result = account.execute_trade(&sell(Stock::Fb, Decimal::MAX, 1));
        assert!(matches!(result, Err(AccountError::AmountOverflow { .. })));
        assert_eq!(account.portfolio_summary(), before);
        assert_eq!(account.holding(Stock::Fb), 1);
    }

    #[test]
    fn test_executions_recorded_in_order() {
        let mut account = personal(dec!(4000));
        account.execute_trade(&buy(Stock::Aapl, dec!(100), 1)).unwrap();
        account.execute_trade(&buy(Stock::Fb, dec!(200), 1)).unwrap();
        let _ = account.execute_trade(&sell(Stock::Goog, dec!(1), 1));

        let stocks: Vec<Stock> = account
            .executions()
            .iter()
            .map(|e| e.trade().symbol())
            .collect();
        assert_eq!(stocks, vec![Stock::Aapl, Stock::Fb]);
        assert_eq!(account.executions()[1].cash_after(), dec!(3700));
    }

    #[test]
    fn test_portfolio_summary_ordering() {
        let mut account = personal(dec!(4000));
        account.execute_trade(&buy(Stock::Tsla, dec!(10), 1)).unwrap();
        account.execute_trade(&buy(Stock::Aapl, dec!(10), 2)).unwrap();
        account.execute_trade(&buy(Stock::Fb, dec!(10), 3)).unwrap();
        account.execute_trade(&sell(Stock::Fb, dec!(10), 3)).unwrap();

        let summary = account.portfolio_summary();
        assert_eq!(summary.kind, AccountKind::Personal);
        assert_eq!(
            summary.holdings,
            vec![
                Holding {
                    stock: Stock::Aapl,
                    shares: 2
                },
                Holding {
                    stock: Stock::Tsla,
                    shares: 1
                },
            ]
        );
    }

    #[test]
    fn test_portfolio_summary_display() {
        let mut account = personal(dec!(4000));
        let empty = account.portfolio_summary().to_string();
        assert!(empty.contains("Cash:     $4000.00"));
        assert!(empty.contains("Holdings: none"));

        account.execute_trade(&buy(Stock::Goog, dec!(150.5), 2)).unwrap();
        let text = account.portfolio_summary().to_string();
        assert!(text.contains("Account:  Personal"));
        assert!(text.contains("Cash:     $3699.00"));
        assert!(text.contains("GOOG"));
        assert!(text.contains("2 shares"));
    }
}
