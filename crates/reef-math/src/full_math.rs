//! # Full-Precision Math
//!
//! 256-bit intermediate arithmetic for Q64.64 calculations. Every helper is
//! checked: overflow beyond the 128-bit result width and division by zero
//! surface as errors instead of panics, and rounding direction is always
//! explicit at the call site.

use ethnum::U256;
use reef_types::{ReefError, ReefResult};

/// Rounding mode for division operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Round down (towards negative infinity)
    Down,
    /// Round up (away from zero)
    Up,
}

/// Multiply two u128 values into a full 256-bit product
pub fn full_mul(a: u128, b: u128) -> U256 {
    U256::from(a) * U256::from(b)
}

/// Compute `a * b / denominator` with the requested rounding
pub fn mul_div(a: u128, b: u128, denominator: u128, rounding: Rounding) -> ReefResult<u128> {
    if denominator == 0 {
        return Err(ReefError::DivisionByZero);
    }

    let denominator = U256::from(denominator);
    let product = full_mul(a, b);
    let mut quotient = product / denominator;

    if rounding == Rounding::Up && product % denominator != U256::from(0u8) {
        quotient = quotient
            .checked_add(U256::from(1u8))
            .ok_or(ReefError::MathOverflow)?;
    }

    quotient.try_into().map_err(|_| ReefError::MathOverflow)
}

/// Compute `a * b / denominator` rounded down
pub fn mul_div_floor(a: u128, b: u128, denominator: u128) -> ReefResult<u128> {
    mul_div(a, b, denominator, Rounding::Down)
}

/// Compute `a * b / denominator` rounded up
pub fn mul_div_ceil(a: u128, b: u128, denominator: u128) -> ReefResult<u128> {
    mul_div(a, b, denominator, Rounding::Up)
}

/// Compute `a * b / denominator` rounded to nearest (half away from zero)
pub fn mul_div_round(a: u128, b: u128, denominator: u128) -> ReefResult<u128> {
    if denominator == 0 {
        return Err(ReefError::DivisionByZero);
    }

    let denominator = U256::from(denominator);
    let product = full_mul(a, b) + (denominator >> 1u32);
    let quotient = product / denominator;

    quotient.try_into().map_err(|_| ReefError::MathOverflow)
}

/// Compute `(a * b) >> shift`, truncating
pub fn mul_shr(a: u128, b: u128, shift: u32) -> ReefResult<u128> {
    let product = full_mul(a, b) >> shift;
    product.try_into().map_err(|_| ReefError::MathOverflow)
}

/// Divide two 256-bit values with an optional round-up
pub fn div_round(numerator: U256, denominator: U256, round_up: bool) -> ReefResult<U256> {
    if denominator == U256::from(0u8) {
        return Err(ReefError::DivisionByZero);
    }

    let quotient = numerator / denominator;
    if round_up && numerator % denominator != U256::from(0u8) {
        quotient
            .checked_add(U256::from(1u8))
            .ok_or(ReefError::MathOverflow)
    } else {
        Ok(quotient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mul_div_rounding() {
        // 10 * 3 / 4 = 7.5
        assert_eq!(mul_div_floor(10, 3, 4).unwrap(), 7);
        assert_eq!(mul_div_ceil(10, 3, 4).unwrap(), 8);
        assert_eq!(mul_div_round(10, 3, 4).unwrap(), 8);

        // Exact division needs no rounding
        assert_eq!(mul_div_floor(10, 4, 5).unwrap(), 8);
        assert_eq!(mul_div_ceil(10, 4, 5).unwrap(), 8);
    }

    #[test]
    fn test_mul_div_large_values() {
        let a = u128::MAX / 2;
        assert_eq!(mul_div_floor(a, 2, 2).unwrap(), a);

        // Full 128x128 product divided back down
        assert_eq!(mul_div_floor(u128::MAX, u128::MAX, u128::MAX).unwrap(), u128::MAX);
    }

    #[test]
    fn test_mul_div_errors() {
        assert_eq!(mul_div_floor(1, 1, 0), Err(ReefError::DivisionByZero));
        // Quotient exceeds u128
        assert_eq!(mul_div_floor(u128::MAX, 4, 2), Err(ReefError::MathOverflow));
    }

    #[test]
    fn test_mul_shr() {
        assert_eq!(mul_shr(1 << 64, 1 << 64, 64).unwrap(), 1 << 64);
        assert_eq!(mul_shr(3, 5, 2).unwrap(), 3); // 15 >> 2
        assert_eq!(mul_shr(u128::MAX, u128::MAX, 0), Err(ReefError::MathOverflow));
    }

    #[test]
    fn test_div_round() {
        let n = U256::from(7u8);
        let d = U256::from(2u8);
        assert_eq!(div_round(n, d, false).unwrap(), U256::from(3u8));
        assert_eq!(div_round(n, d, true).unwrap(), U256::from(4u8));
        assert!(div_round(n, U256::from(0u8), true).is_err());
    }
}
