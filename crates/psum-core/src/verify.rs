//! Independent recomputation of the expected result.
//!
//! Sums are checked against the closed form n(n+1)/2. Factorials are checked
//! against a table for tiny n, a sequential product for small n, and an
//! independent product tree (or GMP, with the `gmp` feature) beyond that.
//! Verification never fails the run: it only yields a [`Verdict`].

use std::fmt;
use std::time::{Duration, Instant};

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_rational::BigRational;
use serde::Serialize;

use crate::arith::range_product;
use crate::constants::{
    FACTORIAL_TABLE, MAX_FACTORIAL_U64, PRODUCT_TREE_LEAF, SEQUENTIAL_CHECK_LIMIT,
};
use crate::mode::ReductionMode;

/// Outcome of comparing the accumulated value with the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    /// Exact match.
    Ok,
    /// Values differ.
    Wrong,
    /// Verification was not requested.
    Skipped,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Wrong => write!(f, "WRONG"),
            Self::Skipped => write!(f, "SKIPPED"),
        }
    }
}

/// How the expected value was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reference {
    /// n(n+1)/2.
    ClosedForm,
    /// Precomputed `u64` factorial table.
    Table,
    /// Sequential left-to-right product.
    Sequential,
    /// Parallel binary-splitting product tree.
    ProductTree,
    /// GMP's factorial routine.
    Gmp,
    /// No reference computed.
    None,
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ClosedForm => "closed form",
            Self::Table => "factorial table",
            Self::Sequential => "sequential product",
            Self::ProductTree => "product tree",
            Self::Gmp => "GMP factorial",
            Self::None => "none",
        };
        f.write_str(s)
    }
}

/// Result of a verification pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Verification {
    /// Comparison outcome.
    pub verdict: Verdict,
    /// Method used for the expected value.
    pub reference: Reference,
    /// Time spent computing the expected value.
    #[serde(serialize_with = "serialize_secs")]
    pub elapsed: Duration,
}

impl Verification {
    /// A verification that was not run.
    #[must_use]
    pub fn skipped() -> Self {
        Self {
            verdict: Verdict::Skipped,
            reference: Reference::None,
            elapsed: Duration::ZERO,
        }
    }

    /// Whether the check ran and matched.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Ok
    }
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

/// Expected result of reducing [1..n] in `mode`, with the method used.
#[must_use]
pub fn expected(mode: ReductionMode, n: u64) -> (BigUint, Reference) {
    match mode {
        ReductionMode::Sum => (closed_form_sum(n), Reference::ClosedForm),
        ReductionMode::Product => expected_factorial(n),
    }
}

/// Compare `value` against an independently computed reference.
#[must_use]
pub fn verify(mode: ReductionMode, n: u64, value: &BigRational) -> Verification {
    let start = Instant::now();
    let (reference_value, reference) = expected(mode, n);
    let elapsed = start.elapsed();

    let expected = BigRational::from_integer(BigInt::from(reference_value));
    let verdict = if *value == expected {
        Verdict::Ok
    } else {
        Verdict::Wrong
    };

    tracing::info!(%mode, n, %verdict, %reference, ?elapsed, "Verification finished");

    Verification {
        verdict,
        reference,
        elapsed,
    }
}

/// n(n+1)/2, halving the even factor first.
#[must_use]
pub fn closed_form_sum(n: u64) -> BigUint {
    let n_big = BigUint::from(n);
    let next = BigUint::from(n) + 1u32;
    if n.is_even() {
        (n_big / 2u32) * next
    } else {
        (next / 2u32) * n_big
    }
}

fn expected_factorial(n: u64) -> (BigUint, Reference) {
    if n <= MAX_FACTORIAL_U64 {
        #[allow(clippy::cast_possible_truncation)]
        let value = FACTORIAL_TABLE[n as usize];
        return (BigUint::from(value), Reference::Table);
    }
    if n <= SEQUENTIAL_CHECK_LIMIT {
        return (range_product(1, n), Reference::Sequential);
    }
    large_factorial(n)
}

#[cfg(feature = "gmp")]
fn large_factorial(n: u64) -> (BigUint, Reference) {
    match u32::try_from(n) {
        Ok(n32) => {
            let value = rug::Integer::from(rug::Integer::factorial(n32));
            let digits = value.to_string_radix(10);
            match BigUint::parse_bytes(digits.as_bytes(), 10) {
                Some(v) => (v, Reference::Gmp),
                None => (product_tree(1, n), Reference::ProductTree),
            }
        }
        Err(_) => (product_tree(1, n), Reference::ProductTree),
    }
}

#[cfg(not(feature = "gmp"))]
fn large_factorial(n: u64) -> (BigUint, Reference) {
    (product_tree(1, n), Reference::ProductTree)
}

/// Product of [lo..hi] by recursive halving, halves multiplied in parallel.
///
/// Shares no code path with the left-to-right reduction it checks.
#[must_use]
pub fn product_tree(lo: u64, hi: u64) -> BigUint {
    if lo > hi {
        return BigUint::from(1u32);
    }
    if hi - lo < PRODUCT_TREE_LEAF {
        return (lo..=hi).fold(BigUint::from(1u32), |acc, i| acc * i);
    }
    let mid = lo + (hi - lo) / 2;
    let (left, right) = rayon::join(|| product_tree(lo, mid), || product_tree(mid + 1, hi));
    left * right
}
