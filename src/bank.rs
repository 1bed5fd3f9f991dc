//! Bank identifiers and the per-bank currency catalogs

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Local currency ticker. Bank tables quote every other currency against it,
/// so it never carries a buy/sell rate of its own.
pub const BASE_CURRENCY: &str = "RUP";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Bank {
    #[default]
    Prb,
    Sber,
    Agro,
}

impl Bank {
    pub const ALL: [Bank; 3] = [Bank::Prb, Bank::Sber, Bank::Agro];

    /// Tickers the bank's selector offers. PRB and AGRO publish the full
    /// foreign-currency list; the remaining variant carries the base
    /// currency plus the five majors.
    pub fn catalog(&self) -> &'static [&'static str] {
        match self {
            Bank::Prb | Bank::Agro => &[
                "USD", "EUR", "RUB", "MDL", "UAH", "GBP", "PLN", "CHF", "BGN", "RON", "AED",
                "CNY", "JPY", "TRY", "BYN",
            ],
            Bank::Sber => &["RUP", "USD", "EUR", "RUB", "MDL", "UAH"],
        }
    }
}

impl Display for Bank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Bank::Prb => "PRB",
                Bank::Sber => "SBER",
                Bank::Agro => "AGRO",
            }
        )
    }
}

impl FromStr for Bank {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PRB" => Ok(Bank::Prb),
            "SBER" => Ok(Bank::Sber),
            "AGRO" => Ok(Bank::Agro),
            _ => Err(anyhow::anyhow!("Unknown bank: {}", s)),
        }
    }
}
