//! # Math Parity Tests
//!
//! Cross-module consistency checks: round trips between the tick, price,
//! codec, and liquidity domains must hold over the whole supported range,
//! not just the hand-picked vectors in the unit tests.

use bigdecimal::BigDecimal;
use proptest::prelude::*;
use reef_math::*;
use reef_types::*;

#[test]
fn test_tick_round_trip_across_range() {
    // Every sampled tick survives the sqrt-price round trip
    let mut tick = MIN_TICK_INDEX;
    while tick <= MAX_TICK_INDEX {
        let sqrt_price = sqrt_price_from_tick(tick).unwrap();
        assert!(is_sqrt_price_in_bounds(sqrt_price));
        assert_eq!(tick_from_sqrt_price(sqrt_price).unwrap(), tick, "tick {}", tick);
        tick += 3331;
    }

    for tick in [MIN_TICK_INDEX, -1, 0, 1, MAX_TICK_INDEX] {
        let sqrt_price = sqrt_price_from_tick(tick).unwrap();
        assert_eq!(tick_from_sqrt_price(sqrt_price).unwrap(), tick);
    }
}

#[test]
fn test_codec_documented_vectors() {
    assert_eq!(
        i128_from_bits(340282366920938463463374607431768211356),
        -100
    );
    assert_eq!(
        bits_from_i128(-100),
        340282366920938463463374607431768211356
    );
}

#[test]
fn test_price_domain_round_trip() {
    // Decimal price -> sqrt price -> tick -> sqrt price -> decimal price
    let price = BigDecimal::from(4u8);
    let sqrt_price = price_to_sqrt_price(&price, 9, 9).unwrap();
    let tick = tick_from_sqrt_price(sqrt_price).unwrap();
    let recovered = sqrt_price_to_price(sqrt_price_from_tick(tick).unwrap(), 9, 9).unwrap();

    // The tick floor loses at most one tick of precision (~0.01%)
    let ratio = recovered / &price;
    assert!(ratio > BigDecimal::from(0u8));
    let drift = (ratio - BigDecimal::from(1u8)).abs();
    assert!(drift < BigDecimal::new(2u8.into(), 4)); // < 0.0002
}

proptest! {
    #[test]
    fn prop_tick_sqrt_price_round_trip(tick in MIN_TICK_INDEX..=MAX_TICK_INDEX) {
        let sqrt_price = sqrt_price_from_tick(tick).unwrap();
        prop_assert_eq!(tick_from_sqrt_price(sqrt_price).unwrap(), tick);

        // Floor semantics: one unit above a tick's sqrt price still maps to it
        if tick < MAX_TICK_INDEX {
            prop_assert_eq!(tick_from_sqrt_price(sqrt_price + 1).unwrap(), tick);
        }
    }

    #[test]
    fn prop_sqrt_price_strictly_increasing(tick in MIN_TICK_INDEX..MAX_TICK_INDEX) {
        prop_assert!(
            sqrt_price_from_tick(tick).unwrap() < sqrt_price_from_tick(tick + 1).unwrap()
        );
    }

    #[test]
    fn prop_sqrt_price_survives_decimal_domain(tick in MIN_TICK_INDEX..=MAX_TICK_INDEX) {
        // Q64.64 -> decimal price -> Q64.64 is exact: the decimal leg only
        // multiplies by powers of ten, which lose nothing
        let sqrt_price = sqrt_price_from_tick(tick).unwrap();
        let price = sqrt_price_to_price(sqrt_price, 6, 9).unwrap();
        prop_assert_eq!(price_to_sqrt_price(&price, 6, 9).unwrap(), sqrt_price);
    }

    #[test]
    fn prop_i32_codec_round_trip(bits in any::<u32>()) {
        prop_assert_eq!(bits_from_i32(i32_from_bits(bits)), bits);
    }

    #[test]
    fn prop_i32_codec_tick_range(value in MIN_TICK_INDEX..=MAX_TICK_INDEX) {
        prop_assert_eq!(i32_from_bits(bits_from_i32(value)), value);
    }

    #[test]
    fn prop_i128_codec_round_trip(value in any::<i128>()) {
        prop_assert_eq!(i128_from_bits(bits_from_i128(value)), value);
    }

    #[test]
    fn prop_below_range_liquidity_is_all_token_a(
        liquidity in 1u128..u64::MAX as u128,
        lower in -1000i32..1000i32,
    ) {
        let upper = lower + 100;
        let below = sqrt_price_from_tick(lower - 1).unwrap();
        let amounts = coin_amounts_from_liquidity(
            liquidity,
            below,
            sqrt_price_from_tick(lower).unwrap(),
            sqrt_price_from_tick(upper).unwrap(),
            true,
        ).unwrap();

        prop_assert_eq!(amounts.amount_b, 0);
        prop_assert!(amounts.amount_a > 0);
    }

    #[test]
    fn prop_round_up_dominates_round_down(
        liquidity in 1u128..u64::MAX as u128,
        current in -200i32..200i32,
    ) {
        let current_sqrt_price = sqrt_price_from_tick(current).unwrap();
        let lower = sqrt_price_from_tick(-150).unwrap();
        let upper = sqrt_price_from_tick(150).unwrap();

        let down =
            coin_amounts_from_liquidity(liquidity, current_sqrt_price, lower, upper, false).unwrap();
        let up =
            coin_amounts_from_liquidity(liquidity, current_sqrt_price, lower, upper, true).unwrap();

        prop_assert!(up.amount_a >= down.amount_a);
        prop_assert!(up.amount_b >= down.amount_b);
        prop_assert!(up.amount_a - down.amount_a <= 1);
        prop_assert!(up.amount_b - down.amount_b <= 1);
    }

    #[test]
    fn prop_est_liquidity_recovers_fixed_amount(
        amount in 1_000u64..1_000_000_000u64,
        lower in -40_000i32..-10i32,
        upper in 10i32..40_000i32,
    ) {
        // Fixing a side, deriving liquidity, and recomputing both sides must
        // return the fixed amount within one unit of rounding
        let result = est_liquidity_for_coin_amount(
            lower, upper, amount, FixedSide::CoinA, true, 0, Q64,
        ).unwrap();
        prop_assert!(result.coin_amount_a.abs_diff(amount) <= 1);

        let result = est_liquidity_for_coin_amount(
            lower, upper, amount, FixedSide::CoinB, true, 0, Q64,
        ).unwrap();
        prop_assert!(result.coin_amount_b.abs_diff(amount) <= 1);
    }
}
