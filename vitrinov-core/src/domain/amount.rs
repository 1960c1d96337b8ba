//! Money amounts as typed by the user and sent to the API

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;

use super::result::{Error, Result};

const INVALID_AMOUNT: &str = "Ingresa una cantidad válida.";

fn amount_input_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d*(\.\d{0,2})?$").expect("valid amount pattern"))
}

/// A strictly positive amount with at most two decimal places
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount(Decimal);

impl Amount {
    /// Parse an amount typed by the user.
    ///
    /// A decimal comma is accepted (`"12,5"`), at most two decimals, no
    /// sign, and the value must be greater than zero.
    pub fn parse(input: &str) -> Result<Self> {
        let normalized = input.trim().replacen(',', ".", 1);
        if !amount_input_re().is_match(&normalized) {
            return Err(Error::validation(INVALID_AMOUNT));
        }
        let mut digits = normalized;
        if digits.ends_with('.') {
            digits.pop();
        }
        if digits.starts_with('.') {
            digits.insert(0, '0');
        }
        // "" and "." pass the pattern but are not numbers
        let value = Decimal::from_str(&digits).map_err(|_| Error::validation(INVALID_AMOUNT))?;
        Self::from_decimal(value)
    }

    pub fn from_decimal(value: Decimal) -> Result<Self> {
        if value <= Decimal::ZERO {
            return Err(Error::validation(INVALID_AMOUNT));
        }
        Ok(Self(value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Exactly two decimal places: `"12.50"`
    pub fn to_wire(&self) -> String {
        format_money(self.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

impl FromStr for Amount {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Format any decimal with exactly two places
pub fn format_money(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

/// Lenient decimal read from a JSON value: number, numeric string, or 0
pub fn decimal_from_json(value: &JsonValue) -> Decimal {
    match value {
        JsonValue::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .unwrap_or_default(),
        JsonValue::String(s) => Decimal::from_str(s.trim()).unwrap_or_default(),
        _ => Decimal::ZERO,
    }
}

/// Serde helper: amounts arrive as numbers or strings; anything else is 0
pub fn deserialize_lenient_decimal<'de, D>(deserializer: D) -> std::result::Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(value.as_ref().map(decimal_from_json).unwrap_or_default())
}
