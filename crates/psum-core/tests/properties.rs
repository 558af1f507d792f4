//! Property-based tests for the reduction core.

use num_bigint::{BigInt, BigUint, Sign};
use num_rational::BigRational;
use num_traits::Zero;
use proptest::prelude::*;

use psum_core::arith::{range_product, range_sum};
use psum_core::codec::{decode, encode};
use psum_core::constants::DEFAULT_MAX_MESSAGE_BYTES;
use psum_core::mode::{Accumulator, ReductionMode};
use psum_core::planner::{ChunkPlan, ChunkSize, Range};
use psum_core::verify::{closed_form_sum, product_tree};

/// Arbitrary rational with numerator and denominator of up to 40 32-bit limbs.
fn arb_rational() -> impl Strategy<Value = BigRational> {
    (
        any::<bool>(),
        prop::collection::vec(any::<u32>(), 0..40),
        prop::collection::vec(any::<u32>(), 1..40),
    )
        .prop_map(|(negative, numer, denom)| {
            let sign = if negative { Sign::Minus } else { Sign::Plus };
            let numer = BigInt::from_biguint(sign, BigUint::new(numer));
            let mut denom = BigUint::new(denom);
            if denom.is_zero() {
                denom = BigUint::from(1u32);
            }
            BigRational::new(numer, BigInt::from(denom))
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(40))]

    /// Left-to-right summation agrees with n(n+1)/2.
    #[test]
    fn sum_matches_closed_form(n in 1u64..20_000) {
        prop_assert_eq!(range_sum(1, n), closed_form_sum(n), "n={}", n);
    }

    /// Left-to-right product agrees with the product tree.
    #[test]
    fn product_matches_factorial(n in 0u64..600) {
        prop_assert_eq!(range_product(1, n), product_tree(1, n), "n={}", n);
    }

    /// Splitting a range anywhere and recombining gives the whole range.
    #[test]
    fn reductions_split_at_any_point(m in 1u64..500, len in 0u64..500, cut in 0u64..500) {
        let n = m + len;
        let k = m + cut % (len + 1);
        prop_assert_eq!(range_sum(m, k) + range_sum(k + 1, n), range_sum(m, n));
        prop_assert_eq!(range_product(m, k) * range_product(k + 1, n), range_product(m, n));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Every plan covers [1..n] exactly once, in order, with from <= to.
    #[test]
    fn plan_covers_range_exactly(n in 1u64..5_000, w in 0usize..17, z in 0u64..300) {
        let plan = ChunkPlan::new(n, w, ChunkSize::from(z)).unwrap();
        let mut next = 1u64;
        for r in plan.ranges() {
            prop_assert!(r.from <= r.to, "inverted {}", r);
            prop_assert_eq!(r.from, next, "gap or overlap at {}", r);
            next = r.to + 1;
        }
        prop_assert_eq!(next, n + 1);
    }

    /// Waves never address a rank outside 1..=w and never send the sentinel as work.
    #[test]
    fn waves_address_valid_ranks(n in 1u64..2_000, w in 1usize..9, z in 0u64..50) {
        let plan = ChunkPlan::new(n, w, ChunkSize::from(z)).unwrap();
        for wave in plan.waves() {
            prop_assert!(wave.dispatch.len() <= w);
            for a in &wave.dispatch {
                prop_assert!(a.rank >= 1 && a.rank <= w);
                prop_assert!(!a.range.is_sentinel());
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(60))]

    /// Absorbing the same partials in any order gives the same value.
    #[test]
    fn accumulation_is_order_independent(
        parts in prop::collection::vec(1u64..10_000, 1..24).prop_shuffle(),
        product in any::<bool>(),
    ) {
        let mode = if product { ReductionMode::Product } else { ReductionMode::Sum };
        let as_rational = |v: u64| BigRational::from_integer(BigInt::from(v));

        let mut sorted = parts.clone();
        sorted.sort_unstable();

        let mut shuffled_acc = Accumulator::new(mode);
        for &p in &parts {
            shuffled_acc.absorb(as_rational(p));
        }
        let mut sorted_acc = Accumulator::new(mode);
        for &p in &sorted {
            sorted_acc.absorb(as_rational(p));
        }
        prop_assert_eq!(shuffled_acc.into_value(), sorted_acc.into_value());
    }

    /// Chunked reduction of a plan equals the sequential reduction.
    #[test]
    fn chunked_reduction_equals_sequential(n in 1u64..800, w in 0usize..6, z in 0u64..40) {
        let plan = ChunkPlan::new(n, w, ChunkSize::from(z)).unwrap();
        for mode in [ReductionMode::Sum, ReductionMode::Product] {
            let mut acc = Accumulator::new(mode);
            for r in plan.ranges() {
                acc.absorb(mode.reduce(r));
            }
            prop_assert_eq!(acc.into_value(), mode.reduce(Range { from: 1, to: n }));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// decode(encode(v)) == v for rationals of varying magnitude.
    #[test]
    fn codec_round_trip(value in arb_rational()) {
        let bytes = encode(&value, DEFAULT_MAX_MESSAGE_BYTES).unwrap();
        let decoded = decode(&bytes, DEFAULT_MAX_MESSAGE_BYTES).unwrap();
        prop_assert_eq!(decoded, value);
    }

    /// The decoder never panics on arbitrary bytes.
    #[test]
    fn decode_arbitrary_bytes_does_not_panic(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let _ = decode(&bytes, DEFAULT_MAX_MESSAGE_BYTES);
    }
}
