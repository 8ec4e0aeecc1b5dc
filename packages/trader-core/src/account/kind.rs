//! Account variants and their fee policy.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Account variant.
///
/// Personal accounts pay the fee on sells only. Tax-free savings accounts pay
/// it on both buys and sells.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Personal,
    TaxFreeSavings,
}

impl AccountKind {
    /// Both variants, in menu order.
    pub const ALL: [AccountKind; 2] = [AccountKind::Personal, AccountKind::TaxFreeSavings];

    /// Whether buys are charged the fee rate on top of their notional.
    pub fn charges_fee_on_buy(self) -> bool {
        match self {
            AccountKind::Personal => false,
            AccountKind::TaxFreeSavings => true,
        }
    }

    /// Sells are charged for every variant.
    pub fn charges_fee_on_sell(self) -> bool {
        true
    }

    /// Standard fee rate: 5% for personal accounts, 1% for tax-free savings.
    pub fn default_fee_rate(self) -> Decimal {
        match self {
            AccountKind::Personal => Decimal::new(5, 2),
            AccountKind::TaxFreeSavings => Decimal::new(1, 2),
        }
    }

    /// Short label used in menus and summaries.
    pub fn label(self) -> &'static str {
        match self {
            AccountKind::Personal => "Personal",
            AccountKind::TaxFreeSavings => "TFSA",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fee rate per account variant, as fractions in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub personal: Decimal,
    pub tax_free_savings: Decimal,
}

impl FeeSchedule {
    pub fn rate(&self, kind: AccountKind) -> Decimal {
        match kind {
            AccountKind::Personal => self.personal,
            AccountKind::TaxFreeSavings => self.tax_free_savings,
        }
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            personal: AccountKind::Personal.default_fee_rate(),
            tax_free_savings: AccountKind::TaxFreeSavings.default_fee_rate(),
        }
    }
}
