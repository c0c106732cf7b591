use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const EUR_CENTS_PER_UNIT: i64 = 100;
pub const NANOTON_PER_TON: i64 = 1_000_000_000;

//--------------------------------------      Currency       ---------------------------------------------------------

/// The currencies Ton.Place settles purchases in. Amounts are always carried in the smallest unit of the currency,
/// i.e. euro cents or nanoTON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    Eur,
    Ton,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Ton => "TON",
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Unknown currency code: {0}")]
pub struct UnknownCurrencyError(String);

impl FromStr for Currency {
    type Err = UnknownCurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eur" => Ok(Currency::Eur),
            "ton" => Ok(Currency::Ton),
            other => Err(UnknownCurrencyError(other.to_string())),
        }
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

//--------------------------------------       Money         ---------------------------------------------------------

/// A monetary amount in the smallest unit of its currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Money {
    amount: i64,
    currency: Currency,
}

impl Money {
    pub fn new(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let scale = match self.currency {
            Currency::Eur => EUR_CENTS_PER_UNIT,
            Currency::Ton => NANOTON_PER_TON,
        };
        let units = self.amount as f64 / scale as f64;
        write!(f, "{units:.2} {}", self.currency.code())
    }
}
