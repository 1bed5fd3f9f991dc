//! Conversion arithmetic over a bank's rate table

use crate::bank::{BASE_CURRENCY, Bank};
use crate::rates::{Rate, RateTable};
use crate::repository::RateRepository;
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    #[error("No rates loaded for bank {0}")]
    RatesUnavailable(Bank),
    #[error("No usable rate for ticker {0}")]
    UnknownTicker(String),
}

/// One conversion to perform. Pair validity is the selector's business; the
/// engine answers any pair it has rates for, including cross-currency pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub bank: Bank,
    pub sell_currency: String,
    pub receive_currency: String,
    pub sell_amount: f64,
}

pub struct ConversionEngine {
    repository: Arc<RateRepository>,
}

impl ConversionEngine {
    pub fn new(repository: Arc<RateRepository>) -> Self {
        Self { repository }
    }

    /// Converts against the bank's current snapshot. Failures are typed;
    /// the result is always finite and non-negative.
    pub fn try_convert(&self, request: &ConversionRequest) -> Result<f64, ConvertError> {
        // A zero (or malformed, treated as zero) amount converts to zero no
        // matter what rates are or aren't loaded.
        let amount = normalize_amount(request.sell_amount);
        if amount == 0.0 {
            return Ok(0.0);
        }

        let table = self
            .repository
            .get(request.bank)
            .ok_or(ConvertError::RatesUnavailable(request.bank))?;

        convert_with_table(
            &table,
            &request.sell_currency,
            &request.receive_currency,
            amount,
        )
    }

    /// Non-failing variant for display paths: logs the diagnostic and falls
    /// back to zero so a missing table or ticker never takes the caller down.
    pub fn convert(&self, request: &ConversionRequest) -> f64 {
        match self.try_convert(request) {
            Ok(amount) => amount,
            Err(e) => {
                error!(bank = %request.bank, sell = %request.sell_currency, receive = %request.receive_currency, "{e}");
                0.0
            }
        }
    }
}

/// Three mutually exclusive cases, checked in order:
/// base → foreign buys at the bank's buy price, foreign → base sells at the
/// sell price, and a cross-currency pair legs through base with both.
pub fn convert_with_table(
    table: &RateTable,
    sell_currency: &str,
    receive_currency: &str,
    sell_amount: f64,
) -> Result<f64, ConvertError> {
    if sell_currency == BASE_CURRENCY {
        let receive_rate = lookup(table, receive_currency)?;
        return Ok(sell_amount / receive_rate.buy);
    }

    if receive_currency == BASE_CURRENCY {
        let sell_rate = lookup(table, sell_currency)?;
        return Ok(sell_amount * sell_rate.sell);
    }

    let sell_rate = lookup(table, sell_currency)?;
    let receive_rate = lookup(table, receive_currency)?;
    Ok((sell_amount * sell_rate.sell) / receive_rate.buy)
}

fn lookup<'a>(table: &'a RateTable, ticker: &str) -> Result<&'a Rate, ConvertError> {
    table
        .rate(ticker)
        .ok_or_else(|| ConvertError::UnknownTicker(ticker.to_string()))
}

/// Negative or non-finite input counts as nothing to sell.
fn normalize_amount(amount: f64) -> f64 {
    if amount.is_finite() && amount > 0.0 {
        amount
    } else {
        0.0
    }
}
