//! # Tick Math
//!
//! The bidirectional mapping between tick indexes and Q64.64 sqrt prices,
//! and between sqrt prices and human decimal prices.
//!
//! `sqrt_price_from_tick` reproduces the on-chain lookup-table algorithm
//! bit for bit: sqrt(1.0001^tick) is assembled by binary decomposition of
//! |tick| over precomputed powers of sqrt(1.0001), with the same constants
//! and multiplication order as the on-chain library. Later instructions
//! consume the result as an opaque chain-verifiable number, so any
//! divergence here is a consensus bug, not a precision bug.

use bigdecimal::BigDecimal;
use num_bigint::{BigInt, Sign};
use num_traits::ToPrimitive;
use reef_types::{
    ReefError, ReefResult, TickRange, MAX_SQRT_PRICE_X64, MAX_TICK_INDEX, MAX_TICK_SPACING,
    MIN_SQRT_PRICE_X64, MIN_TICK_INDEX,
};

use crate::fixed_point::{floor_to_bigint, from_x64, pow10};
use crate::full_math::mul_shr;

const BIT_PRECISION: u32 = 14;
const LOG_B_2_X32: i128 = 59543866431248;
const LOG_B_P_ERR_MARGIN_LOWER_X64: i128 = 184467440737095516;
const LOG_B_P_ERR_MARGIN_UPPER_X64: i128 = 15793534762490258745;

/// Check that a tick index lies within the protocol bounds
pub fn is_tick_index_in_bounds(tick_index: i32) -> bool {
    (MIN_TICK_INDEX..=MAX_TICK_INDEX).contains(&tick_index)
}

/// Check that a Q64.64 sqrt price lies within the protocol bounds
pub fn is_sqrt_price_in_bounds(sqrt_price_x64: u128) -> bool {
    (MIN_SQRT_PRICE_X64..=MAX_SQRT_PRICE_X64).contains(&sqrt_price_x64)
}

/// Derive the Q64.64 sqrt price for a tick index
pub fn sqrt_price_from_tick(tick_index: i32) -> ReefResult<u128> {
    if !is_tick_index_in_bounds(tick_index) {
        return Err(ReefError::InvalidTickIndex);
    }

    if tick_index >= 0 {
        sqrt_price_from_positive_tick(tick_index)
    } else {
        sqrt_price_from_negative_tick(tick_index)
    }
}

fn sqrt_price_from_positive_tick(tick: i32) -> ReefResult<u128> {
    let mut ratio: u128 = if tick & 1 != 0 {
        79232123823359799118286999567
    } else {
        79228162514264337593543950336
    };

    if tick & 2 != 0 {
        ratio = mul_shr(ratio, 79236085330515764027303304731, 96)?;
    }
    if tick & 4 != 0 {
        ratio = mul_shr(ratio, 79244008939048815603706035061, 96)?;
    }
    if tick & 8 != 0 {
        ratio = mul_shr(ratio, 79259858533276714757314932305, 96)?;
    }
    if tick & 16 != 0 {
        ratio = mul_shr(ratio, 79291567232598584799939703904, 96)?;
    }
    if tick & 32 != 0 {
        ratio = mul_shr(ratio, 79355022692464371645785046466, 96)?;
    }
    if tick & 64 != 0 {
        ratio = mul_shr(ratio, 79482085999252804386437311141, 96)?;
    }
    if tick & 128 != 0 {
        ratio = mul_shr(ratio, 79736823300114093921829183326, 96)?;
    }
    if tick & 256 != 0 {
        ratio = mul_shr(ratio, 80248749790819932309965073892, 96)?;
    }
    if tick & 512 != 0 {
        ratio = mul_shr(ratio, 81282483887344747381513967011, 96)?;
    }
    if tick & 1024 != 0 {
        ratio = mul_shr(ratio, 83390072131320151908154831281, 96)?;
    }
    if tick & 2048 != 0 {
        ratio = mul_shr(ratio, 87770609709833776024991924138, 96)?;
    }
    if tick & 4096 != 0 {
        ratio = mul_shr(ratio, 97234110755111693312479820773, 96)?;
    }
    if tick & 8192 != 0 {
        ratio = mul_shr(ratio, 119332217159966728226237229890, 96)?;
    }
    if tick & 16384 != 0 {
        ratio = mul_shr(ratio, 179736315981702064433883588727, 96)?;
    }
    if tick & 32768 != 0 {
        ratio = mul_shr(ratio, 407748233172238350107850275304, 96)?;
    }
    if tick & 65536 != 0 {
        ratio = mul_shr(ratio, 2098478828474011932436660412517, 96)?;
    }
    if tick & 131072 != 0 {
        ratio = mul_shr(ratio, 55581415166113811149459800483533, 96)?;
    }
    if tick & 262144 != 0 {
        ratio = mul_shr(ratio, 38992368544603139932233054999993551, 96)?;
    }

    Ok(ratio >> 32)
}

fn sqrt_price_from_negative_tick(tick: i32) -> ReefResult<u128> {
    let abs_tick = tick.unsigned_abs() as i32;

    let mut ratio: u128 = if abs_tick & 1 != 0 {
        18445821805675392311
    } else {
        18446744073709551616
    };

    if abs_tick & 2 != 0 {
        ratio = mul_shr(ratio, 18444899583751176498, 64)?;
    }
    if abs_tick & 4 != 0 {
        ratio = mul_shr(ratio, 18443055278223354162, 64)?;
    }
    if abs_tick & 8 != 0 {
        ratio = mul_shr(ratio, 18439367220385604838, 64)?;
    }
    if abs_tick & 16 != 0 {
        ratio = mul_shr(ratio, 18431993317065449817, 64)?;
    }
    if abs_tick & 32 != 0 {
        ratio = mul_shr(ratio, 18417254355718160513, 64)?;
    }
    if abs_tick & 64 != 0 {
        ratio = mul_shr(ratio, 18387811781193591352, 64)?;
    }
    if abs_tick & 128 != 0 {
        ratio = mul_shr(ratio, 18329067761203520168, 64)?;
    }
    if abs_tick & 256 != 0 {
        ratio = mul_shr(ratio, 18212142134806087854, 64)?;
    }
    if abs_tick & 512 != 0 {
        ratio = mul_shr(ratio, 17980523815641551639, 64)?;
    }
    if abs_tick & 1024 != 0 {
        ratio = mul_shr(ratio, 17526086738831147013, 64)?;
    }
    if abs_tick & 2048 != 0 {
        ratio = mul_shr(ratio, 16651378430235024244, 64)?;
    }
    if abs_tick & 4096 != 0 {
        ratio = mul_shr(ratio, 15030750278693429944, 64)?;
    }
    if abs_tick & 8192 != 0 {
        ratio = mul_shr(ratio, 12247334978882834399, 64)?;
    }
    if abs_tick & 16384 != 0 {
        ratio = mul_shr(ratio, 8131365268884726200, 64)?;
    }
    if abs_tick & 32768 != 0 {
        ratio = mul_shr(ratio, 3584323654723342297, 64)?;
    }
    if abs_tick & 65536 != 0 {
        ratio = mul_shr(ratio, 696457651847595233, 64)?;
    }
    if abs_tick & 131072 != 0 {
        ratio = mul_shr(ratio, 26294789957452057, 64)?;
    }
    if abs_tick & 262144 != 0 {
        ratio = mul_shr(ratio, 37481735321082, 64)?;
    }

    Ok(ratio)
}

/// Derive the greatest tick index whose sqrt price does not exceed the input
pub fn tick_from_sqrt_price(sqrt_price_x64: u128) -> ReefResult<i32> {
    if !is_sqrt_price_in_bounds(sqrt_price_x64) {
        return Err(ReefError::InvalidSqrtPrice);
    }

    // Integer part of log2(p) from the most significant bit
    let msb: u32 = 128 - sqrt_price_x64.leading_zeros() - 1;
    let log2p_integer_x32 = (msb as i128 - 64) << 32;

    // Fractional part by iterated squaring over the normalized mantissa
    let mut bit: i128 = 0x8000_0000_0000_0000;
    let mut precision = 0;
    let mut log2p_fraction_x64: i128 = 0;

    let mut r = if msb >= 64 {
        sqrt_price_x64 >> (msb - 63)
    } else {
        sqrt_price_x64 << (63 - msb)
    };

    while bit > 0 && precision < BIT_PRECISION {
        r *= r;
        let is_r_more_than_two = (r >> 127) as u32;
        r >>= 63 + is_r_more_than_two;
        log2p_fraction_x64 += bit * is_r_more_than_two as i128;
        bit >>= 1;
        precision += 1;
    }

    let log2p_fraction_x32 = log2p_fraction_x64 >> 32;
    let log2p_x32 = log2p_integer_x32 + log2p_fraction_x32;

    // Change of base from 2 to 1.0001, with the approximation error margins
    let logbp_x64 = log2p_x32 * LOG_B_2_X32;
    let tick_low = ((logbp_x64 - LOG_B_P_ERR_MARGIN_LOWER_X64) >> 64) as i32;
    let tick_high = ((logbp_x64 + LOG_B_P_ERR_MARGIN_UPPER_X64) >> 64) as i32;

    if tick_low == tick_high {
        Ok(tick_low)
    } else {
        let tick_high_sqrt_price = sqrt_price_from_tick(tick_high)?;
        if tick_high_sqrt_price <= sqrt_price_x64 {
            Ok(tick_high)
        } else {
            Ok(tick_low)
        }
    }
}

/// Convert a Q64.64 sqrt price to a decimal price of token B per token A,
/// adjusted for each token's decimal places
pub fn sqrt_price_to_price(
    sqrt_price_x64: u128,
    decimals_a: u8,
    decimals_b: u8,
) -> ReefResult<BigDecimal> {
    if !is_sqrt_price_in_bounds(sqrt_price_x64) {
        return Err(ReefError::InvalidSqrtPrice);
    }

    let sqrt_price = from_x64(sqrt_price_x64);
    Ok(&sqrt_price * &sqrt_price * pow10(decimals_a as i32 - decimals_b as i32))
}

/// Convert a decimal price to a Q64.64 sqrt price (floor-rounded)
pub fn price_to_sqrt_price(price: &BigDecimal, decimals_a: u8, decimals_b: u8) -> ReefResult<u128> {
    if price.sign() != Sign::Plus {
        return Err(ReefError::InvalidPrice);
    }

    // sqrt(price_adj) * 2^64 == floor integer sqrt of price_adj * 2^128
    let adjusted = price * pow10(decimals_b as i32 - decimals_a as i32);
    let radicand = floor_to_bigint(&(adjusted * BigDecimal::from(BigInt::from(1u8) << 128)));
    let root = radicand
        .to_biguint()
        .ok_or(ReefError::InvalidPrice)?
        .sqrt();

    match root.to_u128() {
        Some(sqrt_price_x64) if is_sqrt_price_in_bounds(sqrt_price_x64) => Ok(sqrt_price_x64),
        _ => Err(ReefError::InvalidSqrtPrice),
    }
}

/// Round a tick index down to the nearest lower multiple of the spacing
fn floor_to_spacing(tick_index: i32, tick_spacing: i32) -> i32 {
    let mut floored = tick_index / tick_spacing * tick_spacing;
    if tick_index < 0 && tick_index % tick_spacing != 0 {
        floored -= tick_spacing;
    }
    floored
}

fn validate_tick_spacing(tick_spacing: u32) -> ReefResult<()> {
    if tick_spacing == 0 || tick_spacing > MAX_TICK_SPACING {
        return Err(ReefError::InvalidTickSpacing);
    }
    Ok(())
}

/// Check whether a tick index is a multiple of the pool's tick spacing
pub fn is_tick_initializable(tick_index: i32, tick_spacing: u32) -> bool {
    tick_spacing != 0 && tick_index % tick_spacing as i32 == 0
}

/// Snap a tick index onto the spacing grid: down to the nearest lower
/// multiple, or up to the nearest higher one when `round_up` is set.
/// An aligned index is returned unchanged either way.
pub fn initializable_tick_index(tick_index: i32, tick_spacing: u32, round_up: bool) -> i32 {
    let spacing = tick_spacing as i32;
    let floored = floor_to_spacing(tick_index, spacing);
    if round_up && floored != tick_index {
        floored + spacing
    } else {
        floored
    }
}

/// Convert a price to the nearest lower initializable tick index.
/// Fails if the floored index falls outside the protocol bounds.
pub fn price_to_initializable_tick(
    price: &BigDecimal,
    decimals_a: u8,
    decimals_b: u8,
    tick_spacing: u32,
) -> ReefResult<i32> {
    validate_tick_spacing(tick_spacing)?;

    let tick_index = tick_from_sqrt_price(price_to_sqrt_price(price, decimals_a, decimals_b)?)?;
    let floored = floor_to_spacing(tick_index, tick_spacing as i32);
    if !is_tick_index_in_bounds(floored) {
        return Err(ReefError::InvalidTickIndex);
    }

    Ok(floored)
}

/// Estimation variant of [`price_to_initializable_tick`]: clamps to the
/// spacing-aligned protocol bounds instead of failing near the edges
pub fn price_to_initializable_tick_unchecked(
    price: &BigDecimal,
    decimals_a: u8,
    decimals_b: u8,
    tick_spacing: u32,
) -> ReefResult<i32> {
    validate_tick_spacing(tick_spacing)?;

    let tick_index = tick_from_sqrt_price(price_to_sqrt_price(price, decimals_a, decimals_b)?)?;
    let floored = floor_to_spacing(tick_index, tick_spacing as i32);

    Ok(floored.clamp(
        min_tick_for_spacing(tick_spacing)?,
        max_tick_for_spacing(tick_spacing)?,
    ))
}

/// Convert a price range to an initializable tick range, failing when both
/// prices collapse onto the same tick
pub fn price_range_to_tick_range(
    lower_price: &BigDecimal,
    upper_price: &BigDecimal,
    decimals_a: u8,
    decimals_b: u8,
    tick_spacing: u32,
) -> ReefResult<TickRange> {
    if lower_price >= upper_price {
        return Err(ReefError::InvalidPriceRange);
    }

    let tick_lower_index =
        price_to_initializable_tick(lower_price, decimals_a, decimals_b, tick_spacing)?;
    let tick_upper_index =
        price_to_initializable_tick(upper_price, decimals_a, decimals_b, tick_spacing)?;
    if tick_lower_index == tick_upper_index {
        return Err(ReefError::EmptyTickRange);
    }

    Ok(TickRange {
        tick_lower_index,
        tick_upper_index,
    })
}

/// Lowest initializable tick for a spacing
pub fn min_tick_for_spacing(tick_spacing: u32) -> ReefResult<i32> {
    validate_tick_spacing(tick_spacing)?;
    Ok(MIN_TICK_INDEX / tick_spacing as i32 * tick_spacing as i32)
}

/// Highest initializable tick for a spacing
pub fn max_tick_for_spacing(tick_spacing: u32) -> ReefResult<i32> {
    validate_tick_spacing(tick_spacing)?;
    Ok(MAX_TICK_INDEX / tick_spacing as i32 * tick_spacing as i32)
}

/// The widest position range a pool with this spacing supports
pub fn full_range_tick_range(tick_spacing: u32) -> ReefResult<TickRange> {
    Ok(TickRange {
        tick_lower_index: min_tick_for_spacing(tick_spacing)?,
        tick_upper_index: max_tick_for_spacing(tick_spacing)?,
    })
}

/// Upper bound on liquidity a single initializable tick may carry
pub fn max_liquidity_per_tick(tick_spacing: u32) -> ReefResult<u128> {
    let min_tick_index = min_tick_for_spacing(tick_spacing)?;
    let max_tick_index = max_tick_for_spacing(tick_spacing)?;
    let num_ticks = ((max_tick_index - min_tick_index) / tick_spacing as i32) as u128 + 1;

    Ok(u128::MAX / num_ticks)
}

/// Tick index of the inverted price (token A per token B)
pub fn invert_tick_index(tick_index: i32) -> i32 {
    -tick_index
}

/// Sqrt price of the inverted price, derived through the tick mapping so the
/// result is itself a valid on-chain sqrt price
pub fn invert_sqrt_price(sqrt_price_x64: u128) -> ReefResult<u128> {
    let tick_index = tick_from_sqrt_price(sqrt_price_x64)?;
    sqrt_price_from_tick(invert_tick_index(tick_index))
}
