//! Run options.

use crate::constants::DEFAULT_MAX_MESSAGE_BYTES;
use crate::error::ReduceError;
use crate::mode::ReductionMode;
use crate::planner::{ChunkPlan, ChunkSize};

/// Options for one reduction run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Reduce over [1..n].
    pub n: u64,
    /// Requested chunk size.
    pub chunk_size: ChunkSize,
    /// Number of worker ranks; the group has `workers + 1` ranks.
    pub workers: usize,
    /// Sum or product.
    pub mode: ReductionMode,
    /// Transport ceiling for one encoded result, in bytes (0 = default).
    pub max_message_bytes: usize,
    /// Whether to verify the result.
    pub check: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            n: 1,
            chunk_size: ChunkSize::Auto,
            workers: 1,
            mode: ReductionMode::Sum,
            max_message_bytes: DEFAULT_MAX_MESSAGE_BYTES,
            check: true,
        }
    }
}

impl RunOptions {
    /// Options for reducing [1..n] over `workers` workers.
    #[must_use]
    pub fn new(n: u64, chunk_size: impl Into<ChunkSize>, workers: usize, mode: ReductionMode) -> Self {
        Self {
            n,
            chunk_size: chunk_size.into(),
            workers,
            mode,
            ..Self::default()
        }
    }

    /// Normalize options, applying defaults where values are zero.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        if self.max_message_bytes == 0 {
            self.max_message_bytes = DEFAULT_MAX_MESSAGE_BYTES;
        }
        self
    }

    /// Derive the chunk plan for these options.
    ///
    /// # Errors
    ///
    /// Returns [`ReduceError::Config`] if `n` is 0 or `workers` exceeds
    /// [`MAX_WORKERS`](crate::constants::MAX_WORKERS).
    pub fn plan(&self) -> Result<ChunkPlan, ReduceError> {
        ChunkPlan::new(self.n, self.workers, self.chunk_size)
    }

    /// Number of ranks in the process group.
    #[must_use]
    pub fn group_size(&self) -> usize {
        self.workers.saturating_add(1)
    }
}
