//! Decimal arithmetic utilities for price and money calculations.

use rust_decimal::Decimal;

/// Multiplier from major currency units to minor units (USD -> USC).
pub const CENT_MULTIPLIER: Decimal = Decimal::ONE_HUNDRED;

/// Largest scale a `Decimal` can carry.
const MAX_DIGITS: u32 = 28;

/// Round a decimal to a specific number of decimal places.
///
/// Uses banker's rounding (half to even).
pub fn round_to_precision(value: Decimal, decimals: u32) -> Decimal {
    value.round_dp(decimals)
}

/// Smallest price increment for an asset quoted with `digits` decimals.
///
/// `price_step(2)` is `0.01`, `price_step(0)` is `1`.
pub fn price_step(digits: u32) -> Decimal {
    Decimal::new(1, digits.min(MAX_DIGITS))
}

/// Convert an amount in major currency units to minor units.
pub fn to_minor_units(major: Decimal) -> Decimal {
    major * CENT_MULTIPLIER
}

/// Convert an amount in minor currency units back to major units.
pub fn to_major_units(minor: Decimal) -> Decimal {
    minor / CENT_MULTIPLIER
}

/// Safe division that returns zero if divisor is zero.
pub fn safe_div(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator == Decimal::ZERO {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_to_precision_half_even() {
        assert_eq!(round_to_precision(dec!(83.3333), 2), dec!(83.33));
        assert_eq!(round_to_precision(dec!(91.6667), 2), dec!(91.67));
        // Midpoints go to the even neighbour
        assert_eq!(round_to_precision(dec!(12.5), 0), dec!(12));
        assert_eq!(round_to_precision(dec!(13.5), 0), dec!(14));
    }

    #[test]
    fn test_price_step() {
        assert_eq!(price_step(0), dec!(1));
        assert_eq!(price_step(2), dec!(0.01));
        assert_eq!(price_step(5), dec!(0.00001));
    }

    #[test]
    fn test_minor_unit_conversion() {
        assert_eq!(to_minor_units(dec!(200)), dec!(20000));
        assert_eq!(to_minor_units(dec!(0.5)), dec!(50));
        assert_eq!(to_major_units(dec!(12970)), dec!(129.70));
    }

    #[test]
    fn test_safe_div() {
        assert_eq!(safe_div(dec!(10), dec!(4)), dec!(2.5));
        assert_eq!(safe_div(dec!(10), Decimal::ZERO), Decimal::ZERO);
    }
}
