//! # Fixed-Point Conversion
//!
//! Conversion between Q64.64 fixed-point values and arbitrary-precision
//! decimals, plus scale-consistent multiply/divide. Decimal arithmetic is
//! exact end to end; native floats never carry a price-bearing value.
//!
//! Every operation floors unless the caller explicitly requests ceiling
//! rounding, matching the on-chain convention of rounding amounts owed to
//! the protocol in the protocol's favor.

use bigdecimal::rounding::RoundingMode;
use bigdecimal::BigDecimal;
use ethnum::U256;
use num_bigint::{BigInt, Sign};
use num_traits::{One, ToPrimitive};
use reef_types::{ReefError, ReefResult, Q64, Q64_RESOLUTION};

use crate::full_math::{div_round, mul_div, Rounding};

/// Exact decimal power of ten, for token-decimal rescaling
pub(crate) fn pow10(exp: i32) -> BigDecimal {
    BigDecimal::new(BigInt::one(), -(exp as i64))
}

/// Floor a decimal to an integer
pub(crate) fn floor_to_bigint(value: &BigDecimal) -> BigInt {
    value
        .with_scale_round(0, RoundingMode::Floor)
        .as_bigint_and_exponent()
        .0
}

/// Convert a non-negative decimal to Q64.64, flooring the fractional tail
pub fn to_x64(value: &BigDecimal) -> ReefResult<u128> {
    if value.sign() == Sign::Minus {
        return Err(ReefError::InvalidPrice);
    }

    let scaled = value * BigDecimal::from(BigInt::from(Q64));
    floor_to_bigint(&scaled)
        .to_u128()
        .ok_or(ReefError::MathOverflow)
}

/// Convert a Q64.64 value to an exact decimal
pub fn from_x64(value: u128) -> BigDecimal {
    BigDecimal::from(BigInt::from(value)) / BigDecimal::from(BigInt::from(Q64))
}

/// Multiply two Q64.64 values, keeping the 2^64 scale
pub fn mul_x64(a: u128, b: u128, rounding: Rounding) -> ReefResult<u128> {
    mul_div(a, b, Q64, rounding)
}

/// Divide two Q64.64 values, keeping the 2^64 scale
pub fn div_x64(a: u128, b: u128, rounding: Rounding) -> ReefResult<u128> {
    if b == 0 {
        return Err(ReefError::DivisionByZero);
    }

    let numerator = U256::from(a) << Q64_RESOLUTION;
    div_round(numerator, U256::from(b), rounding == Rounding::Up)?
        .try_into()
        .map_err(|_| ReefError::MathOverflow)
}

/// Convert an integer token amount to Q64.64
pub fn u64_to_x64(value: u64) -> u128 {
    (value as u128) << Q64_RESOLUTION
}

/// Truncate a Q64.64 value to its integer part
pub fn x64_to_u64(value: u128) -> u64 {
    (value >> Q64_RESOLUTION) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_decimal_to_x64() {
        let one = BigDecimal::from(1u8);
        assert_eq!(to_x64(&one).unwrap(), Q64);

        let half = BigDecimal::from_str("0.5").unwrap();
        assert_eq!(to_x64(&half).unwrap(), Q64 / 2);

        // Fractional tail below 2^-64 floors away
        let tiny = BigDecimal::from_str("1.00000000000000000000001").unwrap();
        assert_eq!(to_x64(&tiny).unwrap(), Q64);
    }

    #[test]
    fn test_x64_to_decimal() {
        assert_eq!(from_x64(Q64), BigDecimal::from(1u8));
        assert_eq!(from_x64(Q64 / 4), BigDecimal::from_str("0.25").unwrap());

        // Round trip is exact for representable values
        let value = Q64 + Q64 / 2 + 12345;
        assert_eq!(to_x64(&from_x64(value)).unwrap(), value);
    }

    #[test]
    fn test_to_x64_rejects_bad_input() {
        let negative = BigDecimal::from_str("-1").unwrap();
        assert_eq!(to_x64(&negative), Err(ReefError::InvalidPrice));

        // 2^64 * 2^64 exceeds the 128-bit field width
        let too_big = BigDecimal::from(num_bigint::BigInt::from(Q64));
        assert_eq!(to_x64(&too_big), Err(ReefError::MathOverflow));
    }

    #[test]
    fn test_mul_div_x64() {
        let two = 2 * Q64;
        let three = 3 * Q64;
        assert_eq!(mul_x64(two, three, Rounding::Down).unwrap(), 6 * Q64);
        assert_eq!(div_x64(three, two, Rounding::Down).unwrap(), Q64 + Q64 / 2);

        // 1/3 in Q64.64: floor and ceil differ by exactly one unit
        let third_down = div_x64(Q64, three, Rounding::Down).unwrap();
        let third_up = div_x64(Q64, three, Rounding::Up).unwrap();
        assert_eq!(third_up, third_down + 1);

        assert_eq!(div_x64(Q64, 0, Rounding::Down), Err(ReefError::DivisionByZero));
    }

    #[test]
    fn test_integer_conversions() {
        assert_eq!(u64_to_x64(5), 5 * Q64);
        assert_eq!(x64_to_u64(5 * Q64), 5);
        assert_eq!(x64_to_u64(5 * Q64 + Q64 - 1), 5);
    }
}
