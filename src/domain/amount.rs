//! Conversions between the merchant-facing decimal amount and the gateway's
//! minor-unit representation.
//!
//! Requests carry amounts as an integer count of minor units (`24.99` EUR is
//! sent as `2499`). Callbacks carry the same integer and are presented back as
//! a decimal string. Zero-decimal currencies keep their value in both
//! directions. Every currency is written without leading zeros.

use crate::domain::currency::Currency;
use crate::error::{GatewayError, Result};
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::sync::LazyLock;

/// Largest amount the gateway accepts, in minor units.
pub const MAX_MINOR_UNITS: u64 = 999_999_999_999;

static DECIMAL_AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+(\.[0-9]{1,2})?$").expect("amount pattern compiles"));

static MINOR_AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]*$").expect("minor amount pattern compiles"));

fn over_limit() -> GatewayError {
    GatewayError::Range("The amount cannot be over 9.999.999.999,99".to_string())
}

/// Converts a decimal amount such as `"24.99"` into the request encoding.
pub fn to_minor_units(raw: &str, currency: Currency) -> Result<String> {
    if !DECIMAL_AMOUNT.is_match(raw) {
        return Err(GatewayError::Format(
            "The amount can only contain numerics and one dot".to_string(),
        ));
    }

    if currency.is_zero_decimal() {
        if raw.contains('.') {
            return Err(GatewayError::Format(format!(
                "The amount for {currency} cannot contain decimals"
            )));
        }
        let units = raw.parse::<u64>().map_err(|_| over_limit())?;
        if units > MAX_MINOR_UNITS {
            return Err(over_limit());
        }
        return Ok(units.to_string());
    }

    let minor = Decimal::from_str_exact(raw)
        .ok()
        .and_then(|value| value.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|value| value.to_u64())
        .ok_or_else(over_limit)?;
    if minor > MAX_MINOR_UNITS {
        return Err(over_limit());
    }
    Ok(minor.to_string())
}

/// Converts a callback amount such as `"2499"` into its decimal presentation.
///
/// An empty value is read as zero.
pub fn from_minor_units(raw: &str, currency: Currency) -> Result<String> {
    if !MINOR_AMOUNT.is_match(raw) {
        return Err(GatewayError::Format(
            "The amount can only contain numerics".to_string(),
        ));
    }
    let minor = if raw.is_empty() {
        0
    } else {
        raw.parse::<u64>().map_err(|_| over_limit())?
    };
    if minor > MAX_MINOR_UNITS {
        return Err(over_limit());
    }

    if currency.is_zero_decimal() {
        return Ok(minor.to_string());
    }
    // Bounded by MAX_MINOR_UNITS, so the cast cannot wrap.
    Ok(Decimal::new(minor as i64, 2).to_string())
}

/// Reads an amount held in either representation back as major units.
pub fn major_units(amount: &str, currency: Currency, minor: bool) -> Option<Decimal> {
    if amount.is_empty() {
        return Some(Decimal::ZERO);
    }
    let value = Decimal::from_str_exact(amount).ok()?;
    if minor && !currency.is_zero_decimal() {
        value.checked_div(Decimal::ONE_HUNDRED)
    } else {
        Some(value)
    }
}
