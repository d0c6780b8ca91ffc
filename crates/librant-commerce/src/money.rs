//! Money type for representing monetary values.
//!
//! Uses cents-based integer representation to avoid floating-point
//! precision issues that plague monetary calculations. Rates (tax,
//! discounts) stay `f64` and are applied with [`Money::multiply_rate`],
//! which rounds once to the nearest minor unit.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    /// Bangladeshi taka, the storefront's home currency.
    #[default]
    BDT,
    USD,
    EUR,
    GBP,
    INR,
    JPY,
}

impl Currency {
    /// Get the currency code (e.g., "BDT").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::BDT => "BDT",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::INR => "INR",
            Currency::JPY => "JPY",
        }
    }

    /// Get the currency symbol (e.g., "৳").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::BDT => "\u{09f3}",
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
        match code.trim().to_uppercase().as_str() {
            "BDT" => Some(Currency::BDT),
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "INR" => Some(Currency::INR),
            "JPY" => Some(Currency::JPY),
            _ => None,
        }
    }

    fn minor_per_major(&self) -> i64 {
        10_i64.pow(self.decimal_places())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
///
/// Amounts are stored in the smallest unit of the currency (e.g., paisa for BDT).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in smallest currency unit.
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

    /// Create a Money value from a decimal amount.
    ///
    /// ```
    /// use librant_commerce::money::{Currency, Money};
    /// let price = Money::from_decimal(12.99, Currency::BDT);
    /// assert_eq!(price.amount_cents, 1299);
    /// ```
    pub fn from_decimal(amount: f64, currency: Currency) -> Self {
        let amount_cents = (amount * currency.minor_per_major() as f64).round() as i64;
        Self::new(amount_cents, currency)
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_cents == 0
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.amount_cents < 0
    }

    /// Convert to a decimal value.
    pub fn to_decimal(&self) -> f64 {
        self.amount_cents as f64 / self.currency.minor_per_major() as f64
    }

    /// Format as a display string (e.g., "৳49.99").
    pub fn display(&self) -> String {
        format!("{}{}", self.currency.symbol(), self.display_amount())
    }

    /// Format as a display string without symbol (e.g., "49.99").
    pub fn display_amount(&self) -> String {
        let places = self.currency.decimal_places() as usize;
        format!("{:.places$}", self.to_decimal())
    }

    /// Try to add another Money value. `None` on currency mismatch or overflow.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        let amount = self.amount_cents.checked_add(other.amount_cents)?;
        Some(Money::new(amount, self.currency))
    }

    /// Try to subtract another Money value. `None` on currency mismatch or overflow.
    pub fn try_subtract(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        let amount = self.amount_cents.checked_sub(other.amount_cents)?;
        Some(Money::new(amount, self.currency))
    }

    /// Multiply by an integer factor (e.g., a quantity). `None` on overflow.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        let amount = self.amount_cents.checked_mul(factor)?;
        Some(Money::new(amount, self.currency))
    }

    /// Multiply by a fractional rate, rounding half away from zero.
    ///
    /// ```
    /// use librant_commerce::money::{Currency, Money};
    /// let subtotal = Money::new(10000, Currency::BDT);
    /// assert_eq!(subtotal.multiply_rate(0.08).amount_cents, 800);
    /// ```
    pub fn multiply_rate(&self, rate: f64) -> Money {
        let amount = (self.amount_cents as f64 * rate).round() as i64;
        Money::new(amount, self.currency)
    }

    /// Floor the amount at zero.
    pub fn clamp_non_negative(&self) -> Money {
        Money::new(self.amount_cents.max(0), self.currency)
    }

    /// Sum values that must all be in `currency`. `None` on mismatch or overflow.
    pub fn try_sum<'a>(mut iter: impl Iterator<Item = &'a Money>, currency: Currency) -> Option<Money> {
        iter.try_fold(Money::zero(currency), |acc, m| acc.try_add(m))
    }
}

/// Serialize a [`Money`] as a bare decimal number (e.g. `12.5`), the shape
/// the backend expects for amounts in request bodies.
pub fn serialize_decimal<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(money.to_decimal())
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
    fn test_money_from_decimal() {
        assert_eq!(Money::from_decimal(14.99, Currency::BDT).amount_cents, 1499);
        assert_eq!(Money::from_decimal(100.0, Currency::JPY).amount_cents, 100);
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::new(4999, Currency::USD).display(), "$49.99");
        assert_eq!(Money::new(9800, Currency::BDT).display(), "\u{09f3}98.00");
        assert_eq!(Money::new(100, Currency::JPY).display(), "\u{00a5}100");
    }

    #[test]
    fn test_checked_arithmetic() {
        let a = Money::new(1000, Currency::BDT);
        let b = Money::new(300, Currency::BDT);
        assert_eq!(a.try_add(&b).unwrap().amount_cents, 1300);
        assert_eq!(a.try_subtract(&b).unwrap().amount_cents, 700);
        assert_eq!(a.try_multiply(3).unwrap().amount_cents, 3000);

        let eur = Money::new(1000, Currency::EUR);
        assert!(a.try_add(&eur).is_none());
        assert!(Money::new(i64::MAX, Currency::BDT).try_multiply(2).is_none());
    }

    #[test]
    fn test_multiply_rate_rounds() {
        // 12.99 * 0.08 = 1.0392 -> 1.04
        assert_eq!(Money::new(1299, Currency::BDT).multiply_rate(0.08).amount_cents, 104);
        // 0.05 * 0.30 = 0.015 -> 0.02 (half away from zero)
        assert_eq!(Money::new(5, Currency::BDT).multiply_rate(0.3).amount_cents, 2);
    }

    #[test]
    fn test_clamp_non_negative() {
        assert_eq!(Money::new(-50, Currency::BDT).clamp_non_negative().amount_cents, 0);
        assert_eq!(Money::new(50, Currency::BDT).clamp_non_negative().amount_cents, 50);
    }

    #[test]
    fn test_try_sum() {
        let values = [Money::new(100, Currency::BDT), Money::new(250, Currency::BDT)];
        assert_eq!(
            Money::try_sum(values.iter(), Currency::BDT).unwrap().amount_cents,
            350
        );
        assert_eq!(
            Money::try_sum(std::iter::empty(), Currency::USD).unwrap(),
            Money::zero(Currency::USD)
        );
        assert!(Money::try_sum(values.iter(), Currency::USD).is_none());
    }

    #[test]
    fn test_serialize_decimal() {
        #[derive(Serialize)]
        struct Wire {
            #[serde(serialize_with = "serialize_decimal")]
            discount: Money,
        }
        let json = serde_json::to_value(Wire {
            discount: Money::new(1050, Currency::BDT),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "discount": 10.5 }));
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("bdt"), Some(Currency::BDT));
        assert_eq!(Currency::from_code(" USD "), Some(Currency::USD));
        assert_eq!(Currency::from_code("XYZ"), None);
    }
}
