//! Reduction modes and the commutative accumulator.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};
use serde::Serialize;

use crate::arith::{range_product, range_sum};
use crate::error::ReduceError;
use crate::planner::Range;

/// Associative, commutative reduction applied over [1..n].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReductionMode {
    /// Identity 0, operator +.
    #[default]
    Sum,
    /// Identity 1, operator ×. Over [1..n] this is n!.
    Product,
}

impl ReductionMode {
    /// Identity element of the mode's operator.
    #[must_use]
    pub fn identity(self) -> BigRational {
        match self {
            Self::Sum => BigRational::zero(),
            Self::Product => BigRational::one(),
        }
    }

    /// Fold `part` into `acc` with the mode's operator.
    pub fn combine(self, acc: &mut BigRational, part: &BigRational) {
        match self {
            Self::Sum => *acc += part,
            Self::Product => *acc *= part,
        }
    }

    /// Exact reduction of one range.
    #[must_use]
    pub fn reduce(self, range: Range) -> BigRational {
        let value = match self {
            Self::Sum => range_sum(range.from, range.to),
            Self::Product => range_product(range.from, range.to),
        };
        BigRational::from_integer(BigInt::from(value))
    }
}

impl fmt::Display for ReductionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sum => write!(f, "sum"),
            Self::Product => write!(f, "product"),
        }
    }
}

impl FromStr for ReductionMode {
    type Err = ReduceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sum" => Ok(Self::Sum),
            "product" | "prod" | "fact" | "factorial" => Ok(Self::Product),
            other => Err(ReduceError::Config(format!(
                "unknown reduction mode: {other} (expected sum or product)"
            ))),
        }
    }
}

/// Running global reduction.
///
/// Starts at the mode's identity and absorbs each partial result exactly
/// once; since the operator is commutative the arrival order does not matter.
#[derive(Debug, Clone)]
pub struct Accumulator {
    mode: ReductionMode,
    value: BigRational,
    absorbed: u64,
}

impl Accumulator {
    /// Create an accumulator holding the mode's identity.
    #[must_use]
    pub fn new(mode: ReductionMode) -> Self {
        Self {
            mode,
            value: mode.identity(),
            absorbed: 0,
        }
    }

    /// Fold one partial result in. The partial is consumed and released here.
    pub fn absorb(&mut self, part: BigRational) {
        self.mode.combine(&mut self.value, &part);
        self.absorbed += 1;
    }

    /// Number of partial results absorbed so far.
    #[must_use]
    pub fn absorbed(&self) -> u64 {
        self.absorbed
    }

    /// Current value.
    #[must_use]
    pub fn value(&self) -> &BigRational {
        &self.value
    }

    /// Final value.
    #[must_use]
    pub fn into_value(self) -> BigRational {
        self.value
    }
}
