//! Prompt-driven console front end.
//!
//! The console works over any `BufRead`/`Write` pair so a whole game can be
//! scripted. Malformed answers never reach the account: every prompt repeats
//! until it gets a usable value. End of input ends the game early with the
//! closing summary.

use crate::account::{Account, AccountKind};
use crate::config::SimulationConfig;
use crate::prices::PriceProvider;
use crate::simulation::{Quote, Session};
use crate::types::{Stock, TradeSide};
use crate::{Error, Result};
use rust_decimal::Decimal;
use std::io::{BufRead, Write};
use std::thread;
use std::time::Duration;
use tracing::debug;

/// Parse the account menu answer: `a` for Personal, `b` for TFSA.
pub fn parse_account_choice(input: &str) -> Result<AccountKind> {
    match input {
        "a" => Ok(AccountKind::Personal),
        "b" => Ok(AccountKind::TaxFreeSavings),
        other => Err(Error::InvalidInput(format!(
            "Expected 'a' or 'b', got '{}'",
            other
        ))),
    }
}

/// Parse a share count. Must be a positive whole number.
pub fn parse_shares(input: &str) -> Result<u32> {
    let shares: u32 = input
        .parse()
        .map_err(|_| Error::InvalidInput(format!("'{}' is not a whole number of shares", input)))?;
    if shares == 0 {
        return Err(Error::InvalidInput(
            "Share count must be positive".to_string(),
        ));
    }
    Ok(shares)
}

/// Parse a `yes`/`no` answer (case-insensitive).
pub fn parse_yes_no(input: &str) -> Result<bool> {
    if input.eq_ignore_ascii_case("yes") {
        Ok(true)
    } else if input.eq_ignore_ascii_case("no") {
        Ok(false)
    } else {
        Err(Error::InvalidInput(format!(
            "Expected 'yes' or 'no', got '{}'",
            input
        )))
    }
}

fn percent(rate: Decimal) -> Decimal {
    (rate * Decimal::ONE_HUNDRED).normalize()
}

fn format_quote(quote: &Quote) -> String {
    let change = match quote.change {
        Some(change) if change > Decimal::ZERO => format!("+{:.2}", change),
        Some(change) => format!("{:.2}", change),
        None => String::new(),
    };
    format!("  {:<6}  {:>10.2}  {:>9}", quote.stock, quote.price, change)
}

/// Interactive game loop over an input and an output stream.
pub struct Console<R, W> {
    input: R,
    output: W,
    pause: Duration,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            pause: Duration::ZERO,
        }
    }

    /// Pause between board lines, for pacing only.
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Play a full game.
    ///
    /// Returns the final account, or `None` if input ended before an account was
    /// chosen.
    pub fn run(
        &mut self,
        config: &SimulationConfig,
        provider: PriceProvider,
    ) -> Result<Option<Account>> {
        self.explain(config)?;

        let Some(kind) = self.ask(
            "\n  Respectively, type 'a' or 'b' to create a Personal account or TFSA: ",
            parse_account_choice,
        )?
        else {
            return Ok(None);
        };

        let account = Account::new(kind, config.fee_rate(kind), config.initial_deposit)?;
        let horizon = config.horizon(&provider);
        let mut session = Session::new(account, provider, horizon)?;

        writeln!(
            self.output,
            "\n\n  You created a {} account. Your account balance is ${:.2}",
            kind,
            session.account().current_funds()
        )?;
        write!(self.output, "\n  Enter anything to start trading: ")?;
        self.output.flush()?;

        if self.read_line()?.is_some() {
            loop {
                if !self.trading_day(&mut session)? {
                    break;
                }
                if !session.advance_day() {
                    break;
                }
            }
        }

        self.closing_summary(&session)?;
        Ok(Some(session.into_account()))
    }

    fn explain(&mut self, config: &SimulationConfig) -> Result<()> {
        let fees = config.fee_schedule();
        writeln!(self.output, "\n    Welcome to the Stock Trader Simulator!")?;
        writeln!(
            self.output,
            "\n    First, let's decide what type of account you would like to create."
        )?;
        writeln!(
            self.output,
            "\n    There are two types of accounts you can use to trade stocks:"
        )?;
        writeln!(
            self.output,
            "\n - PERSONAL: Every sale made in a personal account is charged a {}% fee.",
            percent(fees.personal)
        )?;
        writeln!(
            self.output,
            "\n - TFSA: Every trade (buy/sell) made from a TFSA is charged a {}% fee.",
            percent(fees.tax_free_savings)
        )?;
        writeln!(
            self.output,
            "\n - Neither account has a limit on the amount of trades that can be made."
        )?;
        Ok(())
    }

    /// Show the day's board and take orders until the user stops.
    ///
    /// Returns `false` when input has ended.
    fn trading_day(&mut self, session: &mut Session) -> Result<bool> {
        writeln!(self.output, "\n\n\t  DAY {} PRICES\n", session.day())?;

        let board = match session.quote_board() {
            Ok(board) => board,
            Err(e @ Error::PriceNotFound { .. }) => {
                writeln!(
                    self.output,
                    "  Prices are unavailable today ({}). Trading resumes tomorrow.",
                    e
                )?;
                return Ok(true);
            }
            Err(e) => return Err(e),
        };

        for quote in &board {
            writeln!(self.output, "{}", format_quote(quote))?;
            self.pause();
        }

        loop {
            let Some(side) = self.ask("\n\n  Would you like to 'buy' or 'sell': ", |s| {
                s.parse::<TradeSide>()
            })?
            else {
                return Ok(false);
            };
            let Some(stock) = self.ask("  Choose a stock (AAPL, FB, GOOG, TSLA): ", |s| {
                s.parse::<Stock>()
            })?
            else {
                return Ok(false);
            };
            let prompt = format!("  Enter the number of shares you'd like to {}: ", side);
            let Some(shares) = self.ask(&prompt, parse_shares)? else {
                return Ok(false);
            };

            match session.place_order(side, stock, shares) {
                Ok(execution) => {
                    writeln!(
                        self.output,
                        "\n  The trade was successful: {} (fee ${:.2}).",
                        execution.trade(),
                        execution.fee()
                    )?;
                }
                Err(e @ (Error::Account(_) | Error::PriceNotFound { .. })) => {
                    writeln!(self.output, "\n  The trade was unsuccessful: {}.", e)?;
                }
                Err(e) => return Err(e),
            }

            writeln!(self.output, "  Here is your portfolio:")?;
            writeln!(self.output, "{}", session.account().portfolio_summary())?;
            write!(self.output, "\n  Press enter to continue")?;
            self.output.flush()?;
            if self.read_line()?.is_none() {
                return Ok(false);
            }

            let Some(keep_trading) = self.ask(
                "\n  Would you like to keep trading today? Enter 'yes' or 'no': ",
                parse_yes_no,
            )?
            else {
                return Ok(false);
            };
            if !keep_trading {
                return Ok(true);
            }
        }
    }

    fn closing_summary(&mut self, session: &Session) -> Result<()> {
        let account = session.account();
        writeln!(
            self.output,
            "\n\n  Trading ended on day {} of {}. {} trade(s) executed.",
            session.day(),
            session.horizon(),
            account.executions().len()
        )?;
        writeln!(self.output, "{}", account.portfolio_summary())?;
        self.output.flush()?;
        Ok(())
    }

    /// Prompt until `parse` accepts the answer. `None` means input ended.
    fn ask<T>(&mut self, prompt: &str, parse: impl Fn(&str) -> Result<T>) -> Result<Option<T>> {
        loop {
            write!(self.output, "{}", prompt)?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            match parse(&line) {
                Ok(value) => return Ok(Some(value)),
                Err(e) => {
                    debug!(error = %e, "re-prompting");
                    writeln!(self.output, "  {}", e)?;
                }
            }
        }
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn pause(&self) {
        if !self.pause.is_zero() {
            thread::sleep(self.pause);
        }
    }
}
