//! Rate snapshot types shared by the repository and the conversion engine

use serde::Deserialize;
use tracing::warn;

/// Buy/sell quote for one ticker, in units of the base currency per one unit
/// of the ticker currency.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Rate {
    pub ticker: String,
    pub buy: f64,
    pub sell: f64,
}

impl Rate {
    fn is_valid(&self) -> bool {
        self.ticker.len() == 3
            && self.ticker.bytes().all(|b| b.is_ascii_alphabetic())
            && self.buy.is_finite()
            && self.buy > 0.0
            && self.sell.is_finite()
            && self.sell > 0.0
    }
}

/// One bank's published rates, taken as a whole from a single feed response.
/// Always non-empty; a bank with nothing usable to quote has no table at all.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    rates: Vec<Rate>,
}

impl RateTable {
    /// Builds a table from raw feed entries. Entries with a malformed ticker
    /// or a non-positive/non-finite rate leg are dropped with a warning, as
    /// are duplicate tickers (first entry wins). Returns `None` when nothing
    /// usable remains, so an all-bad response reads the same as no data.
    pub fn from_rates(raw: Vec<Rate>) -> Option<Self> {
        let mut rates: Vec<Rate> = Vec::with_capacity(raw.len());
        for mut rate in raw {
            if !rate.is_valid() {
                warn!(ticker = %rate.ticker, buy = rate.buy, sell = rate.sell, "Dropping unusable rate entry");
                continue;
            }
            rate.ticker.make_ascii_uppercase();
            if rates.iter().any(|r: &Rate| r.ticker == rate.ticker) {
                warn!(ticker = %rate.ticker, "Dropping duplicate rate entry");
                continue;
            }
            rates.push(rate);
        }

        if rates.is_empty() {
            None
        } else {
            Some(RateTable { rates })
        }
    }

    pub fn rate(&self, ticker: &str) -> Option<&Rate> {
        self.rates.iter().find(|r| r.ticker == ticker)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rate> {
        self.rates.iter()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn rate(ticker: &str, buy: f64, sell: f64) -> Rate {
    Rate {
        ticker: ticker.to_string(),
        buy,
        sell,
    }
}
