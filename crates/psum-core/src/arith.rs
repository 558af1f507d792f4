//! Exact range reductions over unsigned integer intervals.
//!
//! Every value is a `BigUint`; nothing here can lose precision. Reductions
//! accumulate left to right, one integer at a time, which is the workload
//! the parallel runs are meant to measure.

use num_bigint::BigUint;
use num_traits::{One, Zero};

/// Sum m + (m+1) + ... + n.
///
/// An empty interval (m > n) sums to 0.
///
/// # Example
/// ```
/// use psum_core::arith::range_sum;
///
/// assert_eq!(range_sum(1, 10).to_string(), "55");
/// assert_eq!(range_sum(7, 7).to_string(), "7");
/// ```
#[must_use]
pub fn range_sum(m: u64, n: u64) -> BigUint {
    let mut acc = BigUint::zero();
    if m > n {
        return acc;
    }
    for i in m..=n {
        acc += i;
    }
    acc
}

/// Product m * (m+1) * ... * n.
///
/// An empty interval (m > n) multiplies to 1, so `range_product(1, 0)` is 0!.
///
/// # Example
/// ```
/// use psum_core::arith::range_product;
///
/// assert_eq!(range_product(1, 5).to_string(), "120");
/// assert_eq!(range_product(1, 0).to_string(), "1");
/// ```
#[must_use]
pub fn range_product(m: u64, n: u64) -> BigUint {
    let mut acc = BigUint::one();
    if m > n {
        return acc;
    }
    for i in m..=n {
        acc *= i;
    }
    acc
}

/// n! as a left-to-right product.
#[must_use]
pub fn factorial(n: u64) -> BigUint {
    range_product(1, n)
}

/// base^exponent.
#[must_use]
pub fn power(base: u64, exponent: u32) -> BigUint {
    BigUint::from(base).pow(exponent)
}

/// Upper bound on the number of decimal digits of `value`.
///
/// Derived from the bit length with a rational bound above log10(2), so it
/// never undercounts.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn decimal_digits_upper_bound(value: &BigUint) -> usize {
    use crate::constants::{LOG10_2_DEN, LOG10_2_NUM};

    let bits = value.bits();
    if bits == 0 {
        return 1;
    }
    let digits = u128::from(bits) * u128::from(LOG10_2_NUM) / u128::from(LOG10_2_DEN) + 1;
    digits as usize
}
