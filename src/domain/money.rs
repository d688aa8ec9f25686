//! Fixed-rate currency conversion
//!
//! Checkout totals arrive in the source currency (CLP, which has no minor
//! unit, so amounts are whole numbers) and are charged in the target currency
//! (USD) with two decimal places.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::shared::errors::{CheckoutError, CheckoutResult};

/// Scale of every target-currency amount.
pub const TARGET_SCALE: u32 = 2;

/// Convert a source-currency amount with a fixed `rate`.
///
/// Rounds half-up to two decimals. Zero or negative input yields `0.00`;
/// rejecting such amounts is the caller's job.
pub fn convert(source_amount: i64, rate: Decimal) -> Decimal {
    if source_amount <= 0 {
        return Decimal::new(0, TARGET_SCALE);
    }

    let mut value = (Decimal::from(source_amount) * rate)
        .round_dp_with_strategy(TARGET_SCALE, RoundingStrategy::MidpointAwayFromZero);
    value.rescale(TARGET_SCALE);
    value
}

/// Target amount to integer cents, as stored in the database.
pub fn to_cents(amount: Decimal) -> CheckoutResult<i64> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|cents| cents.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|cents| cents.to_i64())
        .ok_or_else(|| CheckoutError::Validation(format!("amount {} out of range", amount)))
}

/// Integer cents back to a two-decimal amount.
pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, TARGET_SCALE)
}

/// Positive fixed conversion rate (source → target).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeRate(Decimal);

impl ExchangeRate {
    pub fn new(rate: Decimal) -> CheckoutResult<Self> {
        if rate <= Decimal::ZERO {
            return Err(CheckoutError::Validation(format!(
                "exchange rate must be positive, got {}",
                rate
            )));
        }
        Ok(Self(rate))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn convert(&self, source_amount: i64) -> Decimal {
        convert(source_amount, self.0)
    }
}

impl Default for ExchangeRate {
    /// 0.0011 USD per CLP
    fn default() -> Self {
        Self(Decimal::new(11, 4))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).expect("decimal literal")
    }

    #[test]
    fn converts_cart_total_with_default_rate() {
        let usd = ExchangeRate::default().convert(7000);
        assert_eq!(usd.to_string(), "7.70");
    }

    #[test]
    fn zero_converts_to_zero_for_any_rate() {
        for rate in ["0.0011", "1", "950.5"] {
            assert_eq!(convert(0, dec(rate)).to_string(), "0.00");
        }
    }

    #[test]
    fn rounds_half_up() {
        // 5 * 0.001 = 0.005, 25 * 0.001 = 0.025: banker's rounding would give 0.00 / 0.02
        assert_eq!(convert(5, dec("0.001")).to_string(), "0.01");
        assert_eq!(convert(25, dec("0.001")).to_string(), "0.03");
        assert_eq!(convert(24, dec("0.001")).to_string(), "0.02");
    }

    #[test]
    fn integer_rate_keeps_two_decimals() {
        assert_eq!(convert(12, dec("2")).to_string(), "24.00");
    }

    #[test]
    fn conversion_is_deterministic() {
        let rate = dec("0.00107");
        for amount in [1_i64, 999, 15_990, 1_000_000] {
            assert_eq!(convert(amount, rate), convert(amount, rate));
            assert_eq!(convert(amount, rate).scale(), TARGET_SCALE);
        }
    }

    #[test]
    fn rejects_non_positive_rate() {
        assert!(ExchangeRate::new(Decimal::ZERO).is_err());
        assert!(ExchangeRate::new(dec("-0.5")).is_err());
        assert!(ExchangeRate::new(dec("0.0011")).is_ok());
    }

    #[test]
    fn cents_roundtrip() {
        assert_eq!(to_cents(dec("7.70")).expect("cents"), 770);
        assert_eq!(from_cents(770), dec("7.70"));
        assert_eq!(from_cents(5).to_string(), "0.05");
    }

    #[test]
    fn cents_out_of_range_is_an_error() {
        assert!(matches!(
            to_cents(dec("100000000000000000000")),
            Err(CheckoutError::Validation(_))
        ));
        assert!(matches!(to_cents(Decimal::MAX), Err(CheckoutError::Validation(_))));
    }
}
