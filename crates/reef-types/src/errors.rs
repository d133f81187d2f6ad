//! # Core Error Types
//!
//! Every fallible operation in the core returns one of these values.
//! Input-domain and arithmetic errors are fatal to the call that produced
//! them and are never retried internally; the core performs no I/O, so
//! retry policy belongs entirely to the caller.

use thiserror::Error;

/// Errors produced by the Reef numeric core
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReefError {
    // ========================================================================
    // Input-Domain Errors
    // ========================================================================
    #[error("Tick index out of range")]
    InvalidTickIndex,

    #[error("Sqrt price out of range")]
    InvalidSqrtPrice,

    #[error("Invalid price")]
    InvalidPrice,

    #[error("Invalid tick spacing")]
    InvalidTickSpacing,

    #[error("Invalid price range")]
    InvalidPriceRange,

    #[error("Price range collapses to an empty tick range")]
    EmptyTickRange,

    #[error("Fixed side holds no balance at the current price")]
    WrongFixedSide,

    // ========================================================================
    // Arithmetic Errors
    // ========================================================================
    #[error("Math overflow")]
    MathOverflow,

    #[error("Math underflow")]
    MathUnderflow,

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Conversion error")]
    ConversionError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(format!("{}", ReefError::MathOverflow), "Math overflow");
        assert_eq!(
            format!("{}", ReefError::WrongFixedSide),
            "Fixed side holds no balance at the current price"
        );
    }
}
