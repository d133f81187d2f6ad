//! # Liquidity Math
//!
//! Conversion between a position's liquidity and the token amounts it
//! represents, in both directions. These results feed user-facing
//! "how many tokens do I need / will I receive" calculations, so the
//! rounding direction is part of the contract: ceil when computing a
//! maximum the caller must supply, floor when computing a minimum the
//! caller will receive.

use ethnum::U256;
use reef_types::{
    CoinAmounts, FixedSide, LiquidityInput, PositionStatus, ReefError, ReefResult,
    BPS_DENOMINATOR, Q64_RESOLUTION,
};

use crate::full_math::{div_round, full_mul};
use crate::tick_math::sqrt_price_from_tick;

/// Classify where the current price sits relative to a position's range
pub fn position_status(
    current_sqrt_price_x64: u128,
    tick_lower_index: i32,
    tick_upper_index: i32,
) -> ReefResult<PositionStatus> {
    if tick_lower_index >= tick_upper_index {
        return Err(ReefError::InvalidPriceRange);
    }

    let lower_sqrt_price = sqrt_price_from_tick(tick_lower_index)?;
    let upper_sqrt_price = sqrt_price_from_tick(tick_upper_index)?;

    Ok(if current_sqrt_price_x64 < lower_sqrt_price {
        PositionStatus::BelowRange
    } else if current_sqrt_price_x64 < upper_sqrt_price {
        PositionStatus::InRange
    } else {
        PositionStatus::AboveRange
    })
}

/// Token A owed for `liquidity` between two sqrt prices:
/// `L * (upper - lower) / (lower * upper)`, in Q64.64
pub fn coin_a_from_liquidity(
    liquidity: u128,
    lower_sqrt_price: u128,
    upper_sqrt_price: u128,
    round_up: bool,
) -> ReefResult<u64> {
    let sqrt_price_diff = upper_sqrt_price
        .checked_sub(lower_sqrt_price)
        .ok_or(ReefError::InvalidPriceRange)?;

    let product = full_mul(liquidity, sqrt_price_diff);
    if product >> (256 - Q64_RESOLUTION) != U256::from(0u8) {
        return Err(ReefError::MathOverflow);
    }

    let numerator = product << Q64_RESOLUTION;
    let denominator = full_mul(lower_sqrt_price, upper_sqrt_price);
    let quotient = div_round(numerator, denominator, round_up)?;

    quotient.try_into().map_err(|_| ReefError::MathOverflow)
}

/// Token B owed for `liquidity` between two sqrt prices:
/// `L * (upper - lower)`, in Q64.64
pub fn coin_b_from_liquidity(
    liquidity: u128,
    lower_sqrt_price: u128,
    upper_sqrt_price: u128,
    round_up: bool,
) -> ReefResult<u64> {
    let sqrt_price_diff = upper_sqrt_price
        .checked_sub(lower_sqrt_price)
        .ok_or(ReefError::InvalidPriceRange)?;

    let product = full_mul(liquidity, sqrt_price_diff);
    let mut quotient = product >> Q64_RESOLUTION;
    if round_up && product & U256::from(u64::MAX) != U256::from(0u8) {
        quotient += U256::from(1u8);
    }

    quotient.try_into().map_err(|_| ReefError::MathOverflow)
}

/// Liquidity implied by a token A amount over a sqrt-price range
pub fn liquidity_from_coin_a(
    amount_a: u64,
    lower_sqrt_price: u128,
    upper_sqrt_price: u128,
) -> ReefResult<u128> {
    if lower_sqrt_price >= upper_sqrt_price {
        return Err(ReefError::InvalidPriceRange);
    }

    let sqrt_price_diff = upper_sqrt_price - lower_sqrt_price;
    let numerator = U256::from(amount_a)
        .checked_mul(U256::from(lower_sqrt_price))
        .ok_or(ReefError::MathOverflow)?
        .checked_mul(U256::from(upper_sqrt_price))
        .ok_or(ReefError::MathOverflow)?;
    let result = (numerator / U256::from(sqrt_price_diff)) >> Q64_RESOLUTION;

    result.try_into().map_err(|_| ReefError::MathOverflow)
}

/// Liquidity implied by a token B amount over a sqrt-price range
pub fn liquidity_from_coin_b(
    amount_b: u64,
    lower_sqrt_price: u128,
    upper_sqrt_price: u128,
) -> ReefResult<u128> {
    if lower_sqrt_price >= upper_sqrt_price {
        return Err(ReefError::InvalidPriceRange);
    }

    let sqrt_price_diff = upper_sqrt_price - lower_sqrt_price;
    let numerator = U256::from(amount_b) << Q64_RESOLUTION;
    let result = numerator / U256::from(sqrt_price_diff);

    result.try_into().map_err(|_| ReefError::MathOverflow)
}

/// Compute both token amounts for a liquidity value over a price range.
///
/// Three cases by where the current price sits: below the range the
/// position is entirely token A, above it entirely token B, inside it a
/// mix split at the current price. A current price exactly on a bound
/// takes the inside path, which degenerates continuously to the one-sided
/// formulas.
pub fn coin_amounts_from_liquidity(
    liquidity: u128,
    current_sqrt_price_x64: u128,
    lower_sqrt_price: u128,
    upper_sqrt_price: u128,
    round_up: bool,
) -> ReefResult<CoinAmounts> {
    if lower_sqrt_price >= upper_sqrt_price {
        return Err(ReefError::InvalidPriceRange);
    }

    if current_sqrt_price_x64 < lower_sqrt_price {
        Ok(CoinAmounts {
            amount_a: coin_a_from_liquidity(liquidity, lower_sqrt_price, upper_sqrt_price, round_up)?,
            amount_b: 0,
        })
    } else if current_sqrt_price_x64 < upper_sqrt_price {
        Ok(CoinAmounts {
            amount_a: coin_a_from_liquidity(
                liquidity,
                current_sqrt_price_x64,
                upper_sqrt_price,
                round_up,
            )?,
            amount_b: coin_b_from_liquidity(
                liquidity,
                lower_sqrt_price,
                current_sqrt_price_x64,
                round_up,
            )?,
        })
    } else {
        Ok(CoinAmounts {
            amount_a: 0,
            amount_b: coin_b_from_liquidity(liquidity, lower_sqrt_price, upper_sqrt_price, round_up)?,
        })
    }
}

/// Largest amount the caller should supply after slippage, rounded up
pub fn max_amount_with_slippage(amount: u64, slippage_bps: u16) -> ReefResult<u64> {
    let numerator = (amount as u128) * (BPS_DENOMINATOR as u128 + slippage_bps as u128);
    let result = numerator.div_ceil(BPS_DENOMINATOR as u128);

    result.try_into().map_err(|_| ReefError::MathOverflow)
}

/// Smallest amount the caller should accept after slippage, rounded down
pub fn min_amount_with_slippage(amount: u64, slippage_bps: u16) -> ReefResult<u64> {
    let factor = (BPS_DENOMINATOR as u128)
        .checked_sub(slippage_bps as u128)
        .ok_or(ReefError::MathUnderflow)?;
    let result = (amount as u128) * factor / BPS_DENOMINATOR as u128;

    result.try_into().map_err(|_| ReefError::MathOverflow)
}

/// Estimate the liquidity implied by a single fixed token amount over a
/// tick range, then re-derive both sides' amounts and slippage bounds.
///
/// Fixing token A while the current price is above the range (or token B
/// below it) is rejected: that side's balance is zero at that price, so
/// no finite liquidity reproduces the requested amount.
pub fn est_liquidity_for_coin_amount(
    tick_lower_index: i32,
    tick_upper_index: i32,
    amount: u64,
    fixed_side: FixedSide,
    round_up: bool,
    slippage_bps: u16,
    current_sqrt_price_x64: u128,
) -> ReefResult<LiquidityInput> {
    if tick_lower_index >= tick_upper_index {
        return Err(ReefError::InvalidPriceRange);
    }

    let lower_sqrt_price = sqrt_price_from_tick(tick_lower_index)?;
    let upper_sqrt_price = sqrt_price_from_tick(tick_upper_index)?;
    let status = if current_sqrt_price_x64 < lower_sqrt_price {
        PositionStatus::BelowRange
    } else if current_sqrt_price_x64 < upper_sqrt_price {
        PositionStatus::InRange
    } else {
        PositionStatus::AboveRange
    };

    let liquidity_amount = match (status, fixed_side) {
        (PositionStatus::BelowRange, FixedSide::CoinA) => {
            liquidity_from_coin_a(amount, lower_sqrt_price, upper_sqrt_price)?
        }
        (PositionStatus::InRange, FixedSide::CoinA) => {
            liquidity_from_coin_a(amount, current_sqrt_price_x64, upper_sqrt_price)?
        }
        (PositionStatus::AboveRange, FixedSide::CoinB) => {
            liquidity_from_coin_b(amount, lower_sqrt_price, upper_sqrt_price)?
        }
        (PositionStatus::InRange, FixedSide::CoinB) => {
            liquidity_from_coin_b(amount, lower_sqrt_price, current_sqrt_price_x64)?
        }
        (PositionStatus::AboveRange, FixedSide::CoinA)
        | (PositionStatus::BelowRange, FixedSide::CoinB) => {
            return Err(ReefError::WrongFixedSide)
        }
    };

    let amounts = coin_amounts_from_liquidity(
        liquidity_amount,
        current_sqrt_price_x64,
        lower_sqrt_price,
        upper_sqrt_price,
        round_up,
    )?;

    let (token_max_a, token_max_b) = if round_up {
        (
            max_amount_with_slippage(amounts.amount_a, slippage_bps)?,
            max_amount_with_slippage(amounts.amount_b, slippage_bps)?,
        )
    } else {
        (
            min_amount_with_slippage(amounts.amount_a, slippage_bps)?,
            min_amount_with_slippage(amounts.amount_b, slippage_bps)?,
        )
    };

    Ok(LiquidityInput {
        liquidity_amount,
        coin_amount_a: amounts.amount_a,
        coin_amount_b: amounts.amount_b,
        token_max_a,
        token_max_b,
        fixed_side,
    })
}
