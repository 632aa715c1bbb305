//! Fixed-point math utilities for deterministic geometry.
//!
//! Retreat directions are derived by dividing a cube vector by its length
//! and rounding back onto the grid. That division goes through fixed-point
//! arithmetic so the rounding is identical on every platform.

use fixed::types::I32F32;

/// Fixed-point number type for all fractional rules math.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
pub type Fixed = I32F32;

/// Divide two integers into a fixed-point fraction.
///
/// # Panics
///
/// Panics if `denominator` is zero.
#[must_use]
pub fn ratio(numerator: i32, denominator: i32) -> Fixed {
    assert!(denominator != 0, "ratio denominator must be non-zero");
    Fixed::from_num(numerator) / Fixed::from_num(denominator)
}

/// Round to the nearest integer, ties away from zero.
#[must_use]
pub fn round_to_int(value: Fixed) -> i32 {
    value.round().to_num::<i32>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio() {
        assert_eq!(ratio(1, 2), Fixed::from_num(0.5));
        assert_eq!(ratio(-3, 3), Fixed::from_num(-1));
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_to_int(ratio(1, 2)), 1);
        assert_eq!(round_to_int(ratio(-1, 2)), -1);
        assert_eq!(round_to_int(ratio(1, 3)), 0);
        assert_eq!(round_to_int(ratio(2, 3)), 1);
    }
}
