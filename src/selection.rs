//! Currency pair selection rules

use crate::bank::{BASE_CURRENCY, Bank};
use std::mem;
use tracing::debug;

const DEFAULT_RECEIVE: &str = "USD";

/// The selected pair and bank. Selection keeps at most one side off the base
/// currency, mirroring an exchange counter where the local currency is always
/// one leg; the engine itself can still price a cross pair if handed one.
#[derive(Debug, Clone, PartialEq)]
pub struct PairSelection {
    sell_currency: String,
    receive_currency: String,
    bank: Bank,
}

impl Default for PairSelection {
    fn default() -> Self {
        Self {
            sell_currency: BASE_CURRENCY.to_string(),
            receive_currency: DEFAULT_RECEIVE.to_string(),
            bank: Bank::default(),
        }
    }
}

impl PairSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sell_currency(&self) -> &str {
        &self.sell_currency
    }

    pub fn receive_currency(&self) -> &str {
        &self.receive_currency
    }

    pub fn bank(&self) -> Bank {
        self.bank
    }

    pub fn select_sell(&mut self, ticker: &str) {
        let (sell, receive) = Self::apply(ticker, &self.sell_currency, &self.receive_currency);
        self.sell_currency = sell;
        self.receive_currency = receive;
    }

    pub fn select_receive(&mut self, ticker: &str) {
        let (receive, sell) = Self::apply(ticker, &self.receive_currency, &self.sell_currency);
        self.sell_currency = sell;
        self.receive_currency = receive;
    }

    // Selecting base while the other side is base is a no-op; selecting a
    // foreign ticker while the other side is foreign forces that side back
    // to base.
    fn apply(ticker: &str, side: &str, other: &str) -> (String, String) {
        if ticker == BASE_CURRENCY && other == BASE_CURRENCY {
            return (side.to_string(), other.to_string());
        }
        if ticker != BASE_CURRENCY && other != BASE_CURRENCY {
            return (ticker.to_string(), BASE_CURRENCY.to_string());
        }
        (ticker.to_string(), other.to_string())
    }

    pub fn swap(&mut self) {
        let sell_is_base = self.sell_currency == BASE_CURRENCY;
        let receive_is_base = self.receive_currency == BASE_CURRENCY;
        match (sell_is_base, receive_is_base) {
            // Degenerate tie; give the receive side something to quote.
            (true, true) => self.receive_currency = DEFAULT_RECEIVE.to_string(),
            (true, false) | (false, true) | (false, false) => {
                mem::swap(&mut self.sell_currency, &mut self.receive_currency);
            }
        }
    }

    /// Tickers the current bank's selector offers.
    pub fn available_tickers(&self) -> &'static [&'static str] {
        self.bank.catalog()
    }

    /// Changing banks never touches the pair. If the new bank's catalog no
    /// longer lists a selected ticker, conversion surfaces that as an
    /// unknown-ticker diagnostic rather than the selection self-correcting.
    pub fn select_bank(&mut self, bank: Bank) {
        debug!(%bank, "Bank selected");
        self.bank = bank;
    }
}
