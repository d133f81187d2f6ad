//! # Position Types
//!
//! Value types describing a liquidity position's tick range, the token
//! amounts it holds, and the result of a single-sided liquidity estimate.
//! These are created fresh per call from caller-supplied on-chain state and
//! discarded after the computation.

use serde::{Deserialize, Serialize};

/// An ordered pair of tick indexes bounding a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickRange {
    pub tick_lower_index: i32,
    pub tick_upper_index: i32,
}

impl TickRange {
    /// Build a range from two tick indexes, swapping them if needed so that
    /// the lower bound is always below the upper bound.
    pub fn ordered(tick_index_1: i32, tick_index_2: i32) -> Self {
        if tick_index_1 < tick_index_2 {
            Self {
                tick_lower_index: tick_index_1,
                tick_upper_index: tick_index_2,
            }
        } else {
            Self {
                tick_lower_index: tick_index_2,
                tick_upper_index: tick_index_1,
            }
        }
    }
}

/// Where the current pool price sits relative to a position's range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionStatus {
    /// Current price is below the range: the position is entirely token A
    BelowRange,
    /// Current price is inside the range: the position holds both tokens
    InRange,
    /// Current price is above the range: the position is entirely token B
    AboveRange,
}

/// Token amounts on each side of a position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinAmounts {
    pub amount_a: u64,
    pub amount_b: u64,
}

/// Which token amount the caller fixed when deriving liquidity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixedSide {
    CoinA,
    CoinB,
}

/// Result of estimating liquidity from a single fixed token amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityInput {
    /// Liquidity implied by the fixed amount over the requested range
    pub liquidity_amount: u128,
    /// Token A amount re-derived from `liquidity_amount`
    pub coin_amount_a: u64,
    /// Token B amount re-derived from `liquidity_amount`
    pub coin_amount_b: u64,
    /// Slippage-adjusted bound on token A
    pub token_max_a: u64,
    /// Slippage-adjusted bound on token B
    pub token_max_b: u64,
    /// The side the caller fixed
    pub fixed_side: FixedSide,
}
