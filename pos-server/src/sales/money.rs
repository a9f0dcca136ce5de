//! Monetary arithmetic
//!
//! Amounts are stored as `f64` but every sum and product goes through
//! `Decimal`, rounded half-away-from-zero to two places on the way out.

use rust_decimal::prelude::*;
use shared::models::SENIOR_PWD_DISCOUNT_RATE;

/// Display precision for all amounts
pub const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal; non-finite values become zero
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64, rounded to [`DECIMAL_PLACES`]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Senior citizen / PWD discount: 20% of `total_amount` when eligible, else 0
pub fn senior_discount(total_amount: f64, eligible: bool) -> f64 {
    if !eligible {
        return 0.0;
    }
    let rate = to_decimal(SENIOR_PWD_DISCOUNT_RATE);
    to_f64(to_decimal(total_amount) * rate)
}

/// `qty * price` as a Decimal
pub fn line_total(qty: i32, price: f64) -> Decimal {
    Decimal::from(qty) * to_decimal(price)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_senior_discount() {
        assert_eq!(senior_discount(1000.0, true), 200.0);
        assert_eq!(senior_discount(1000.0, false), 0.0);
        assert_eq!(senior_discount(0.0, true), 0.0);
        // 20% of 99.99 = 19.998
        assert_eq!(senior_discount(99.99, true), 20.0);
    }

    #[test]
    fn test_to_decimal_avoids_float_drift() {
        let sum = to_decimal(0.1) + to_decimal(0.2);
        assert_eq!(to_f64(sum), 0.3);
    }

    #[test]
    fn test_to_f64_rounds_half_away_from_zero() {
        assert_eq!(to_f64(Decimal::new(5, 3)), 0.01);
        assert_eq!(to_f64(Decimal::new(4, 3)), 0.0);
        assert_eq!(to_f64(Decimal::new(-5, 3)), -0.01);
    }

    #[test]
    fn test_non_finite_becomes_zero() {
        assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
        assert_eq!(to_decimal(f64::INFINITY), Decimal::ZERO);
    }

    #[test]
    fn test_line_total() {
        assert_eq!(to_f64(line_total(3, 12.5)), 37.5);
    }
}
