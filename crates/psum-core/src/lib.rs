//! # psum-core
//!
//! Core library for psum, a parallel exact reducer over [1..n].
//! Implements the exact range reductions, the canonical result codec, chunk
//! planning into waves, the commutative accumulator and result verification.

pub mod arith;
pub mod codec;
pub mod constants;
pub mod error;
pub mod mode;
pub mod observer;
pub mod options;
pub mod planner;
pub mod timing;
pub mod verify;

// Re-exports
pub use constants::{exit_codes, DEFAULT_MAX_MESSAGE_BYTES, FACTORIAL_TABLE, MAX_FACTORIAL_U64};
pub use error::ReduceError;
pub use mode::{Accumulator, ReductionMode};
pub use observer::{WaveObserver, WaveUpdate};
pub use options::RunOptions;
pub use planner::{Assignment, ChunkPlan, ChunkSize, Range, Wave};
pub use timing::TimingTable;
pub use verify::{Verdict, Verification};

use num_rational::BigRational;

/// Reduce [1..n] sequentially in one call.
///
/// This is a convenience for simple use cases and tests; the parallel path
/// lives in `psum-orchestration`.
///
/// # Example
/// ```
/// use psum_core::{reduce_sequential, ReductionMode};
///
/// assert_eq!(reduce_sequential(ReductionMode::Sum, 10).to_string(), "55");
/// assert_eq!(reduce_sequential(ReductionMode::Product, 5).to_string(), "120");
/// ```
#[must_use]
pub fn reduce_sequential(mode: ReductionMode, n: u64) -> BigRational {
    if n == 0 {
        return mode.identity();
    }
    mode.reduce(Range { from: 1, to: n })
}
