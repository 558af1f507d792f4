//! Orchestration interfaces.

use std::time::Duration;

use num_rational::BigRational;

use psum_core::mode::ReductionMode;
use psum_core::planner::ChunkSize;
use psum_core::timing::TimingTable;
use psum_core::verify::Verification;

/// Outcome of a complete reduction run, as seen by the coordinator.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Sum or product.
    pub mode: ReductionMode,
    /// The run reduced [1..n].
    pub n: u64,
    /// Requested chunk size.
    pub chunk_size: ChunkSize,
    /// Number of worker ranks.
    pub workers: usize,
    /// Waves executed.
    pub waves: u64,
    /// Partial results absorbed, the coordinator's own included.
    pub chunks: u64,
    /// Accumulated value.
    pub value: BigRational,
    /// Wall-clock time from the start barrier to the last sentinel.
    pub elapsed: Duration,
    /// Cumulative compute time per rank.
    pub timings: TimingTable,
    /// Verification outcome.
    pub verification: Verification,
}

impl RunReport {
    /// Number of ranks in the group.
    #[must_use]
    pub fn group_size(&self) -> usize {
        self.workers + 1
    }
}

/// Trait for presenting results to the user.
pub trait ResultPresenter: Send + Sync {
    /// Present the outcome of a run.
    fn present_report(&self, report: &RunReport);

    /// Present an error.
    fn present_error(&self, error: &str);
}
