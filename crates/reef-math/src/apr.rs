//! # Yield Estimation
//!
//! Position- and pool-level APR estimates from instantaneous on-chain
//! state plus externally supplied price and volume data. These are
//! advisory display values: the precision bar is looser than the
//! liquidity accounting, but the method is deterministic and every
//! degenerate input (zero liquidity, zero TVL, missing prices) produces a
//! zeroed result rather than an error or a division by zero.
//!
//! Both estimators return annual percentages (x365x100) so fee and reward
//! components are directly comparable and summable.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};
use reef_types::{
    EstPoolAprParams, EstPositionAprParams, PoolAprResult, PositionAprResult, ReefError,
    ReefResult, RewarderFlow, DAYS_PER_YEAR, SECONDS_PER_DAY,
};

use crate::fixed_point::{floor_to_bigint, from_x64, pow10};
use crate::liquidity_math::{
    coin_amounts_from_liquidity, liquidity_from_coin_a, liquidity_from_coin_b,
};
use crate::tick_math::sqrt_price_from_tick;

fn decimal_from_u128(value: u128) -> BigDecimal {
    BigDecimal::from(BigInt::from(value))
}

fn annualized_percent() -> BigDecimal {
    BigDecimal::from(DAYS_PER_YEAR * 100)
}

/// Human-unit amount to raw integer units at the token's decimals
fn to_raw_amount(amount: &BigDecimal, decimals: u8) -> ReefResult<u64> {
    floor_to_bigint(&(amount * pow10(decimals as i32)))
        .to_u64()
        .ok_or(ReefError::ConversionError)
}

/// USD value emitted by a rewarder per day
fn daily_emission_value(rewarder: &RewarderFlow, price: &BigDecimal) -> BigDecimal {
    from_x64(rewarder.emissions_per_second_x64)
        * BigDecimal::from(SECONDS_PER_DAY)
        * pow10(-(rewarder.decimals as i32))
        * price
}

/// Estimate a position's fee and reward APR with the liquidity-delta
/// method.
///
/// The position's token amounts are converted to the liquidity they would
/// represent at each extreme of the range; whichever derivation is binding
/// for the current tick (token A below the range, token B above, the
/// minimum of the two inside) becomes the position's liquidity delta. The
/// delta's share of pool liquidity prices the position's claim on trailing
/// fee volume and on each rewarder's emission stream, normalized by the
/// position's USD value.
pub fn est_position_apr(params: &EstPositionAprParams) -> ReefResult<PositionAprResult> {
    let rewarder_count = params.rewarders.len();

    if params.lower_tick_index >= params.upper_tick_index {
        return Err(ReefError::InvalidPriceRange);
    }
    let lower_sqrt_price = sqrt_price_from_tick(params.lower_tick_index)?;
    let upper_sqrt_price = sqrt_price_from_tick(params.upper_tick_index)?;

    let amount_a_raw = to_raw_amount(&params.amount_a, params.decimals_a)?;
    let amount_b_raw = to_raw_amount(&params.amount_b, params.decimals_b)?;

    let delta_liquidity = if params.current_tick_index < params.lower_tick_index {
        liquidity_from_coin_a(amount_a_raw, lower_sqrt_price, upper_sqrt_price)?
    } else if params.current_tick_index >= params.upper_tick_index {
        liquidity_from_coin_b(amount_b_raw, lower_sqrt_price, upper_sqrt_price)?
    } else {
        liquidity_from_coin_a(amount_a_raw, params.current_sqrt_price_x64, upper_sqrt_price)?.min(
            liquidity_from_coin_b(amount_b_raw, lower_sqrt_price, params.current_sqrt_price_x64)?,
        )
    };
    if delta_liquidity == 0 {
        return Ok(PositionAprResult::zeroed(rewarder_count));
    }

    let (price_a, price_b) = match (&params.price_a, &params.price_b) {
        (Some(price_a), Some(price_b)) => (price_a, price_b),
        _ => return Ok(PositionAprResult::zeroed(rewarder_count)),
    };

    // USD value of the delta-derived token split at the current price
    let amounts = coin_amounts_from_liquidity(
        delta_liquidity,
        params.current_sqrt_price_x64,
        lower_sqrt_price,
        upper_sqrt_price,
        false,
    )?;
    let position_tvl = BigDecimal::from(amounts.amount_a)
        * pow10(-(params.decimals_a as i32))
        * price_a
        + BigDecimal::from(amounts.amount_b) * pow10(-(params.decimals_b as i32)) * price_b;
    if position_tvl <= BigDecimal::zero() {
        return Ok(PositionAprResult::zeroed(rewarder_count));
    }

    let combined_liquidity = params
        .pool_liquidity
        .checked_add(delta_liquidity)
        .ok_or(ReefError::MathOverflow)?;
    let liquidity_share = decimal_from_u128(delta_liquidity) / decimal_from_u128(combined_liquidity);

    let fee_apr = &params.fee_rate * &params.swap_volume_24h * &liquidity_share / &position_tvl
        * annualized_percent();

    let rewarder_apr = params
        .rewarders
        .iter()
        .map(|rewarder| match &rewarder.price {
            None => BigDecimal::zero(),
            Some(price) => {
                daily_emission_value(rewarder, price) * &liquidity_share / &position_tvl
                    * annualized_percent()
            }
        })
        .collect();

    Ok(PositionAprResult {
        fee_apr,
        rewarder_apr,
    })
}

/// Estimate a stable pool's APR: trailing daily fee revenue and daily
/// reward-emission value over total pool TVL, annualized as a percentage
pub fn est_pool_apr(params: &EstPoolAprParams) -> PoolAprResult {
    let rewarder_count = params.rewarders.len();

    if params.pool_tvl <= BigDecimal::zero() {
        return PoolAprResult::zeroed(rewarder_count);
    }

    let fee_apr =
        &params.fee_rate * &params.swap_volume_24h / &params.pool_tvl * annualized_percent();

    let rewarder_apr = params
        .rewarders
        .iter()
        .map(|rewarder| match &rewarder.price {
            None => BigDecimal::zero(),
            Some(price) => {
                daily_emission_value(rewarder, price) / &params.pool_tvl * annualized_percent()
            }
        })
        .collect();

    PoolAprResult {
        fee_apr,
        rewarder_apr,
    }
}
