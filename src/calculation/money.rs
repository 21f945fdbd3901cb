//! Money rounding and formatting helpers.
//!
//! All monetary figures are rounded to cents with round-half-away-from-zero,
//! the same rule the payroll backend applies with `ROUND_HALF_UP`.
//! Intermediate values keep full `Decimal` precision; only reported figures
//! pass through [`round_money`].

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};

/// Number of decimal places in a monetary amount.
pub const MONEY_SCALE: u32 = 2;

/// The currency symbol used by [`format_peso`].
pub const PESO_SIGN: &str = "\u{20B1}";

/// Rounds a value to cents, half away from zero.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::round_money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_money(Decimal::from_str("2.345").unwrap()), Decimal::from_str("2.35").unwrap());
/// assert_eq!(round_money(Decimal::from_str("-2.345").unwrap()), Decimal::from_str("-2.35").unwrap());
/// ```
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// Formats a value as a plain monetary string with exactly two decimals.
///
/// ```
/// use payroll_engine::calculation::to_money;
/// use rust_decimal::Decimal;
///
/// assert_eq!(to_money(Decimal::new(50000, 0)), "50000.00");
/// ```
pub fn to_money(value: Decimal) -> String {
    round_money(value).to_string()
}

/// Converts a float into a cent-rounded decimal. Non-finite input yields zero.
pub fn money_from_f64(value: f64) -> Decimal {
    if !value.is_finite() {
        return round_money(Decimal::ZERO);
    }
    // Go through the shortest decimal representation so 0.1 stays 0.1.
    Decimal::from_str_exact(&value.to_string())
        .or_else(|_| Decimal::try_from(value))
        .map(round_money)
        .unwrap_or_else(|_| round_money(Decimal::ZERO))
}

/// Formats a float as a two-decimal monetary string; non-finite yields `"0.00"`.
pub fn to_money_f64(value: f64) -> String {
    money_from_f64(value).to_string()
}

/// Formats an amount in pesos with thousands separators.
///
/// ```
/// use payroll_engine::calculation::format_peso;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(format_peso(Decimal::from_str("1234.5").unwrap()), "₱1,234.50");
/// assert_eq!(format_peso(Decimal::from_str("-980").unwrap()), "-₱980.00");
/// ```
pub fn format_peso(value: Decimal) -> String {
    let rounded = round_money(value);
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}{}.{}", sign, PESO_SIGN, grouped, frac_part)
}

/// Returns true if the integer part of `value` has at most `max` digits.
///
/// ```
/// use payroll_engine::calculation::max_digits_before;
/// use rust_decimal::Decimal;
///
/// assert!(max_digits_before(Decimal::new(99999, 0), 5));
/// assert!(!max_digits_before(Decimal::new(100000, 0), 5));
/// ```
pub fn max_digits_before(value: Decimal, max: usize) -> bool {
    value.trunc().abs().normalize().to_string().len() <= max
}

/// Returns true if `value` carries no significant digits beyond the cents.
///
/// Trailing zeros don't count: `500.100` passes, `500.123` does not.
pub fn has_at_most_two_decimals(value: Decimal) -> bool {
    value.normalize().scale() <= MONEY_SCALE
}

fn overflow(lhs: Decimal, op: &str, rhs: Decimal) -> EngineError {
    EngineError::CalculationError {
        message: format!("{} {} {} is out of range", lhs, op, rhs),
    }
}

/// Multiplies two values, failing instead of overflowing.
pub fn checked_product(lhs: Decimal, rhs: Decimal) -> EngineResult<Decimal> {
    lhs.checked_mul(rhs).ok_or_else(|| overflow(lhs, "×", rhs))
}

/// Divides two values, failing on overflow or a zero divisor.
pub fn checked_quotient(lhs: Decimal, rhs: Decimal) -> EngineResult<Decimal> {
    lhs.checked_div(rhs).ok_or_else(|| overflow(lhs, "/", rhs))
}

/// Adds two values, failing instead of overflowing.
pub fn checked_total(lhs: Decimal, rhs: Decimal) -> EngineResult<Decimal> {
    lhs.checked_add(rhs).ok_or_else(|| overflow(lhs, "+", rhs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_round_money_half_away_from_zero() {
        assert_eq!(round_money(dec("0.005")), dec("0.01"));
        assert_eq!(round_money(dec("0.004")), dec("0.00"));
        assert_eq!(round_money(dec("1.125")), dec("1.13"));
        assert_eq!(round_money(dec("-1.125")), dec("-1.13"));
    }

    #[test]
    fn test_round_money_keeps_two_decimal_scale() {
        assert_eq!(round_money(dec("5")).to_string(), "5.00");
        assert_eq!(round_money(dec("2272.727272")).to_string(), "2272.73");
    }

    #[test]
    fn test_to_money_pads_decimals() {
        assert_eq!(to_money(dec("12.3")), "12.30");
        assert_eq!(to_money(Decimal::ZERO), "0.00");
    }

    #[test]
    fn test_non_finite_floats_become_zero() {
        assert_eq!(to_money_f64(f64::NAN), "0.00");
        assert_eq!(to_money_f64(f64::INFINITY), "0.00");
        assert_eq!(to_money_f64(f64::NEG_INFINITY), "0.00");
    }

    #[test]
    fn test_float_conversion_avoids_binary_artifacts() {
        // 1.005 is 1.00499999... in binary; the decimal path rounds it up.
        assert_eq!(to_money_f64(1.005), "1.01");
        assert_eq!(money_from_f64(0.1 + 0.2), dec("0.30"));
    }

    #[test]
    fn test_format_peso_groups_thousands() {
        assert_eq!(format_peso(dec("0")), "₱0.00");
        assert_eq!(format_peso(dec("999.999")), "₱1,000.00");
        assert_eq!(format_peso(dec("49275.57")), "₱49,275.57");
        assert_eq!(format_peso(dec("1234567.8")), "₱1,234,567.80");
    }

    #[test]
    fn test_format_peso_negative_and_negative_zero() {
        assert_eq!(format_peso(dec("-1500")), "-₱1,500.00");
        assert_eq!(format_peso(dec("-0.001")), "₱0.00");
    }

    #[test]
    fn test_max_digits_before_ignores_sign_and_fraction() {
        assert!(max_digits_before(dec("999.99"), 3));
        assert!(!max_digits_before(dec("1000"), 3));
        assert!(max_digits_before(dec("-99.5"), 2));
        assert!(max_digits_before(dec("0.75"), 1));
    }

    #[test]
    fn test_two_decimal_check() {
        assert!(has_at_most_two_decimals(dec("500.00")));
        assert!(has_at_most_two_decimals(dec("500.100")));
        assert!(has_at_most_two_decimals(dec("1.25")));
        assert!(!has_at_most_two_decimals(dec("500.123")));
    }

    #[test]
    fn test_checked_arithmetic_reports_overflow() {
        assert_eq!(checked_product(dec("2.5"), dec("4")).unwrap(), dec("10"));
        assert_eq!(checked_quotient(dec("10"), dec("4")).unwrap(), dec("2.5"));

        let error = checked_product(Decimal::MAX, dec("100")).unwrap_err();
        assert!(matches!(error, EngineError::CalculationError { .. }));
        assert!(checked_quotient(dec("1"), Decimal::ZERO).is_err());
        assert!(checked_total(Decimal::MAX, Decimal::ONE).is_err());
    }
}
