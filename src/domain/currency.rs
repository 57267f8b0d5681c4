use crate::error::{GatewayError, Result};
use serde::Serialize;
use std::fmt;

/// Currencies accepted by the gateway.
///
/// Requests name a currency by its ISO 4217 alpha code, while the wire format
/// and the callback payload carry the numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Eur,
    Usd,
    Chf,
    Gbp,
    Cad,
    Jpy,
    Aud,
    Nok,
    Sek,
    Dkk,
}

impl Currency {
    pub const ALL: [Currency; 10] = [
        Currency::Eur,
        Currency::Usd,
        Currency::Chf,
        Currency::Gbp,
        Currency::Cad,
        Currency::Jpy,
        Currency::Aud,
        Currency::Nok,
        Currency::Sek,
        Currency::Dkk,
    ];

    pub fn alpha(self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
            Currency::Chf => "CHF",
            Currency::Gbp => "GBP",
            Currency::Cad => "CAD",
            Currency::Jpy => "JPY",
            Currency::Aud => "AUD",
            Currency::Nok => "NOK",
            Currency::Sek => "SEK",
            Currency::Dkk => "DKK",
        }
    }

    pub fn numeric(self) -> &'static str {
        match self {
            Currency::Eur => "978",
            Currency::Usd => "840",
            Currency::Chf => "756",
            Currency::Gbp => "826",
            Currency::Cad => "124",
            Currency::Jpy => "392",
            Currency::Aud => "036",
            Currency::Nok => "578",
            Currency::Sek => "752",
            Currency::Dkk => "208",
        }
    }

    /// Currencies whose minor unit is the major unit.
    pub fn is_zero_decimal(self) -> bool {
        matches!(self, Currency::Jpy)
    }

    /// Looks up an ISO 4217 alpha code such as `EUR`.
    pub fn from_alpha(code: &str) -> Result<Self> {
        if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(GatewayError::Format(
                "The given currency does not comply with the ISO 4217 standard".to_string(),
            ));
        }
        Self::ALL
            .into_iter()
            .find(|c| c.alpha() == code)
            .ok_or_else(|| {
                GatewayError::UnsupportedValue(format!(
                    "The requested currency \"{code}\" is not available"
                ))
            })
    }

    /// Looks up an ISO 4217 numeric code such as `978`.
    pub fn from_numeric(code: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.numeric() == code)
            .ok_or_else(|| {
                GatewayError::UnsupportedValue(format!(
                    "The requested currency code \"{code}\" is not available"
                ))
            })
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.alpha())
    }
}
