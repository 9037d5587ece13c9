//! Money type for representing monetary values.
//!
//! Uses cents-based integer representation so that a line total is always
//! exactly `rate * quantity`, whatever the operator typed.

use crate::error::BillingError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    INR,
    JPY,
}

impl Currency {
    /// Get the currency code (e.g., "USD").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::INR => "INR",
            Currency::JPY => "JPY",
        }
    }

    /// Get the currency symbol (e.g., "$").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::INR => "\u{20b9}",
            Currency::JPY => "\u{00a5}",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "INR" => Some(Currency::INR),
            "JPY" => Some(Currency::JPY),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::from_code(s).ok_or_else(|| BillingError::UnknownCurrency(s.to_string()))
    }
}

/// A monetary value with currency.
///
/// Amounts are stored in the smallest unit of the currency (e.g., cents for USD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in smallest currency unit (e.g., cents).
    pub amount_cents: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from cents.
    pub fn new(amount_cents: i64, currency: Currency) -> Self {
        Self {
            amount_cents,
            currency,
        }
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Parse decimal text such as `"2.50"`, `"2.5"` or `"3"`.
    ///
    /// The text never passes through floating point. More fractional digits
    /// than the currency allows, exponents, and anything non-numeric are
    /// rejected.
    ///
    /// ```
    /// use billdesk_core::money::{Currency, Money};
    /// let rate = Money::parse("2.5", Currency::USD).unwrap();
    /// assert_eq!(rate.amount_cents, 250);
    /// ```
    pub fn parse(input: &str, currency: Currency) -> Result<Self, BillingError> {
        let invalid = || BillingError::InvalidAmount(input.to_string());
        let text = input.trim();

        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };

        let (whole, fraction) = match digits.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (digits, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let places = currency.decimal_places();
        if fraction.len() > places as usize {
            return Err(invalid());
        }

        let scale = 10_i64.pow(places);
        let whole_units: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| BillingError::Overflow)?
        };

        // Right-pad the fraction to the currency's precision: "5" -> 50 cents.
        let mut fraction_units: i64 = 0;
        for i in 0..places as usize {
            let digit = fraction.as_bytes().get(i).map(|b| (b - b'0') as i64).unwrap_or(0);
            fraction_units = fraction_units * 10 + digit;
        }

        let cents = whole_units
            .checked_mul(scale)
            .and_then(|c| c.checked_add(fraction_units))
            .ok_or(BillingError::Overflow)?;

        Ok(Self::new(if negative { -cents } else { cents }, currency))
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_cents == 0
    }

    /// Check if this is positive.
    pub fn is_positive(&self) -> bool {
        self.amount_cents > 0
    }

    /// Convert to a decimal value (for display and JSON export only).
    pub fn to_decimal(&self) -> f64 {
        let divisor = 10_i64.pow(self.currency.decimal_places());
        self.amount_cents as f64 / divisor as f64
    }

    /// Format as a display string (e.g., "$49.99").
    pub fn display(&self) -> String {
        format!("{}{}", self.currency.symbol(), self.display_amount())
    }

    /// Format as a display string without symbol (e.g., "49.99").
    pub fn display_amount(&self) -> String {
        let places = self.currency.decimal_places();
        if places == 0 {
            return self.amount_cents.to_string();
        }
        let scale = 10_i64.pow(places);
        let sign = if self.amount_cents < 0 { "-" } else { "" };
        let abs = self.amount_cents.unsigned_abs();
        format!(
            "{}{}.{:0width$}",
            sign,
            abs / scale as u64,
            abs % scale as u64,
            width = places as usize
        )
    }

    /// Try to add another Money value, returning None on currency mismatch or overflow.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount_cents
            .checked_add(other.amount_cents)
            .map(|cents| Money::new(cents, self.currency))
    }

    /// Multiply by a quantity, returning None on overflow.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        self.amount_cents
            .checked_mul(factor)
            .map(|cents| Money::new(cents, self.currency))
    }

    /// Sum an iterator of Money values, returning None on mismatch or overflow.
    pub fn try_sum(values: impl IntoIterator<Item = Money>, currency: Currency) -> Option<Money> {
        values
            .into_iter()
            .try_fold(Money::zero(currency), |acc, m| acc.try_add(&m))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_places() {
        let m = Money::parse("2.50", Currency::USD).unwrap();
        assert_eq!(m.amount_cents, 250);
    }

    #[test]
    fn test_parse_pads_short_fraction() {
        assert_eq!(Money::parse("2.5", Currency::USD).unwrap().amount_cents, 250);
        assert_eq!(Money::parse("3", Currency::USD).unwrap().amount_cents, 300);
        assert_eq!(Money::parse(".5", Currency::USD).unwrap().amount_cents, 50);
        assert_eq!(Money::parse(" 4. ", Currency::USD).unwrap().amount_cents, 400);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for input in ["", ".", "abc", "1.2.3", "1e3", "2.505", "--1", "1,50"] {
            assert!(
                Money::parse(input, Currency::USD).is_err(),
                "expected {:?} to be rejected",
                input
            );
        }
    }

    #[test]
    fn test_parse_negative() {
        assert_eq!(Money::parse("-1.25", Currency::USD).unwrap().amount_cents, -125);
    }

    #[test]
    fn test_parse_zero_decimal_currency() {
        assert_eq!(Money::parse("100", Currency::JPY).unwrap().amount_cents, 100);
        assert!(Money::parse("100.5", Currency::JPY).is_err());
    }

    #[test]
    fn test_parse_overflow() {
        let err = Money::parse("99999999999999999999", Currency::USD).unwrap_err();
        assert!(matches!(err, BillingError::Overflow));
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::new(750, Currency::USD).display(), "$7.50");
        assert_eq!(Money::new(5, Currency::USD).display_amount(), "0.05");
        assert_eq!(Money::new(-5, Currency::USD).display_amount(), "-0.05");
        assert_eq!(Money::new(100, Currency::JPY).display(), "\u{00a5}100");
    }

    #[test]
    fn test_try_multiply_overflow() {
        let m = Money::new(i64::MAX / 2, Currency::USD);
        assert!(m.try_multiply(3).is_none());
        assert_eq!(Money::new(250, Currency::USD).try_multiply(3).unwrap().amount_cents, 750);
    }

    #[test]
    fn test_try_sum() {
        let values = [Money::new(250, Currency::USD), Money::new(100, Currency::USD)];
        let sum = Money::try_sum(values, Currency::USD).unwrap();
        assert_eq!(sum.amount_cents, 350);

        let mixed = [Money::new(250, Currency::USD), Money::new(100, Currency::EUR)];
        assert!(Money::try_sum(mixed, Currency::USD).is_none());
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("usd"), Some(Currency::USD));
        assert!("XYZ".parse::<Currency>().is_err());
    }
}
