//! # Yield Estimation Types
//!
//! Parameter and result types for the APR estimators. APR figures are
//! advisory display values recomputed per query from pool snapshots plus
//! externally supplied price and volume data; they are never stored.
//!
//! Price-bearing fields use arbitrary-precision decimals. A missing token
//! price is a recoverable condition: estimators zero the affected component
//! instead of failing.

use bigdecimal::BigDecimal;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

/// Snapshot of a single rewarder's emission state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewarderFlow {
    /// Reward tokens emitted per second, in Q64.64 raw token units
    pub emissions_per_second_x64: u128,
    /// Decimal places of the reward token
    pub decimals: u8,
    /// USD price of the reward token, if known
    pub price: Option<BigDecimal>,
}

/// Inputs for the position-level APR estimate (delta method)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstPositionAprParams {
    pub current_tick_index: i32,
    pub lower_tick_index: i32,
    pub upper_tick_index: i32,
    /// Current pool sqrt price in Q64.64
    pub current_sqrt_price_x64: u128,
    /// Active pool liquidity
    pub pool_liquidity: u128,
    pub decimals_a: u8,
    pub decimals_b: u8,
    /// Fee charged per trade, as a decimal fraction (0.0025 = 25 bps)
    pub fee_rate: BigDecimal,
    /// Token A held by the position, in human units
    pub amount_a: BigDecimal,
    /// Token B held by the position, in human units
    pub amount_b: BigDecimal,
    /// Trailing 24h swap volume through the pool, in USD
    pub swap_volume_24h: BigDecimal,
    /// USD price of token A, if known
    pub price_a: Option<BigDecimal>,
    /// USD price of token B, if known
    pub price_b: Option<BigDecimal>,
    pub rewarders: Vec<RewarderFlow>,
}

/// Position-level APR estimate, in percent per year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionAprResult {
    pub fee_apr: BigDecimal,
    /// One entry per rewarder, in the order supplied
    pub rewarder_apr: Vec<BigDecimal>,
}

impl PositionAprResult {
    /// All-zero result for the given rewarder count
    pub fn zeroed(rewarder_count: usize) -> Self {
        Self {
            fee_apr: BigDecimal::zero(),
            rewarder_apr: vec![BigDecimal::zero(); rewarder_count],
        }
    }
}

/// Inputs for the stable-pool APR estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstPoolAprParams {
    /// Fee charged per trade, as a decimal fraction
    pub fee_rate: BigDecimal,
    /// Trailing 24h swap volume through the pool, in USD
    pub swap_volume_24h: BigDecimal,
    /// Total pool TVL, in USD
    pub pool_tvl: BigDecimal,
    pub rewarders: Vec<RewarderFlow>,
}

/// Pool-level APR estimate, in percent per year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolAprResult {
    pub fee_apr: BigDecimal,
    pub rewarder_apr: Vec<BigDecimal>,
}

impl PoolAprResult {
    /// All-zero result for the given rewarder count
    pub fn zeroed(rewarder_count: usize) -> Self {
        Self {
            fee_apr: BigDecimal::zero(),
            rewarder_apr: vec![BigDecimal::zero(); rewarder_count],
        }
    }
}
