//! Bank rating and interest rate rules.
//!
//! A new bank gets a random rating, a random amount of money and a random
//! base interest rate. Better rated banks lend cheaper: the base rate is
//! discounted by a tier multiplier and rounded to two decimal places.

use rand::Rng;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Upper bound of a bank rating (inclusive). The lower bound is 0.
pub const MAX_RATING: i32 = 100;

/// Upper bound of a bank's `total_money` (inclusive).
pub const MAX_TOTAL_MONEY: i64 = 1_000_000;

/// Upper bound of a bank's yearly interest rate in percent (inclusive).
pub const MAX_INTEREST_RATE: i64 = 20;

/// Multiplier applied to the base interest rate of a bank with `rating`.
///
/// | rating    | multiplier |
/// |-----------|------------|
/// | > 80      | 0.5        |
/// | 61 ..= 80 | 0.7        |
/// | 41 ..= 60 | 0.9        |
/// | <= 40     | 1.0        |
pub fn rating_multiplier(rating: i32) -> Decimal {
    if rating > 80 {
        Decimal::new(5, 1)
    } else if rating > 60 {
        Decimal::new(7, 1)
    } else if rating > 40 {
        Decimal::new(9, 1)
    } else {
        Decimal::ONE
    }
}

/// Applies the rating tier to `base_rate` and rounds to 2 decimal places.
///
/// Rounding is half-to-even, so `x.xx5` ties go to the even neighbour.
pub fn tiered_interest_rate(rating: i32, base_rate: Decimal) -> Decimal {
    (base_rate * rating_multiplier(rating)).round_dp(2)
}

/// The randomly generated attributes of a newly founded bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankProfile {
    pub rating: i32,
    pub total_money: i64,
    pub interest_rate: Decimal,
}

impl BankProfile {
    /// Samples rating, money and base rate uniformly from their ranges and
    /// applies the rating tier to the rate.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let rating = rng.gen_range(0..=MAX_RATING);
        let total_money = rng.gen_range(0..=MAX_TOTAL_MONEY);
        let base_rate = sample_base_rate(rng);

        trace!(rating, total_money, %base_rate, "sampled bank profile");

        Self::from_base_rate(rating, total_money, base_rate)
    }

    /// Builds the profile of a bank whose undiscounted rate is `base_rate`.
    pub fn from_base_rate(rating: i32, total_money: i64, base_rate: Decimal) -> Self {
        Self {
            rating,
            total_money,
            interest_rate: tiered_interest_rate(rating, base_rate),
        }
    }
}

/// Draws a base interest rate from `[0, MAX_INTEREST_RATE]` in whole cents.
///
/// The tiered rate of a cent-precise base never rounds above the base.
pub fn sample_base_rate<R: Rng + ?Sized>(rng: &mut R) -> Decimal {
    let base: f64 = rng.gen_range(0.0..=MAX_INTEREST_RATE as f64);
    Decimal::from_f64(base).unwrap_or(Decimal::ZERO).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::str::FromStr;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[test]
    fn test_rating_multiplier_tiers() {
        assert_eq!(rating_multiplier(100), dec("0.5"));
        assert_eq!(rating_multiplier(81), dec("0.5"));
        assert_eq!(rating_multiplier(80), dec("0.7"));
        assert_eq!(rating_multiplier(61), dec("0.7"));
        assert_eq!(rating_multiplier(60), dec("0.9"));
        assert_eq!(rating_multiplier(41), dec("0.9"));
        assert_eq!(rating_multiplier(40), Decimal::ONE);
        assert_eq!(rating_multiplier(0), Decimal::ONE);
    }

    #[test]
    fn test_tiered_interest_rate_rounds_to_two_places() {
        assert_eq!(tiered_interest_rate(90, dec("12.345")), dec("6.17"));
        assert_eq!(tiered_interest_rate(70, dec("10")), dec("7.00"));
        assert_eq!(tiered_interest_rate(50, dec("19.99")), dec("17.99"));
        assert_eq!(tiered_interest_rate(10, dec("3.14159")), dec("3.14"));
    }

    #[test]
    fn test_generated_profiles_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let profile = BankProfile::generate(&mut rng);
            assert!((0..=MAX_RATING).contains(&profile.rating));
            assert!((0..=MAX_TOTAL_MONEY).contains(&profile.total_money));
            assert!(profile.interest_rate >= Decimal::ZERO);
            assert!(profile.interest_rate <= Decimal::from(MAX_INTEREST_RATE));
            assert!(profile.interest_rate.scale() <= 2);
        }
    }

    #[test]
    fn test_high_rating_never_exceeds_half_the_cap() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let profile = BankProfile::generate(&mut rng);
            if profile.rating > 80 {
                assert!(profile.interest_rate <= Decimal::from(10));
            }
        }
    }

    #[test]
    fn test_generated_rate_is_tiered_sampled_base() {
        for seed in 0..200 {
            let profile = BankProfile::generate(&mut StdRng::seed_from_u64(seed));

            let mut replay = StdRng::seed_from_u64(seed);
            let rating = replay.gen_range(0..=MAX_RATING);
            let total_money = replay.gen_range(0..=MAX_TOTAL_MONEY);
            let base = sample_base_rate(&mut replay);

            assert_eq!(profile, BankProfile::from_base_rate(rating, total_money, base));
            assert_eq!(
                profile.interest_rate,
                (base * rating_multiplier(rating)).round_dp(2),
                "seed {seed}"
            );
            assert!(profile.interest_rate <= base, "seed {seed}: {profile:?} from {base}");
        }
    }

    #[test]
    fn test_tiered_rate_never_exceeds_cent_precise_base() {
        for cents in 0..=2000 {
            let base = Decimal::new(cents, 2);
            for rating in [0, 40, 41, 60, 61, 80, 81, 100] {
                assert!(tiered_interest_rate(rating, base) <= base, "{rating} {base}");
            }
        }
    }

    #[test]
    fn test_sampled_base_rate_is_in_cents() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let base = sample_base_rate(&mut rng);
            assert!(base.scale() <= 2);
            assert!(base >= Decimal::ZERO && base <= Decimal::from(MAX_INTEREST_RATE));
        }
    }

    #[test]
    fn test_profile_serializes_rate_as_string() {
        let profile = BankProfile {
            rating: 55,
            total_money: 1000,
            interest_rate: dec("4.50"),
        };
        let json = serde_json::to_value(profile).unwrap();
        assert_eq!(json["interest_rate"], "4.50");
    }
}
