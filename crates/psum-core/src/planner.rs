//! Chunk planning: splitting [1..n] into ranges and grouping them into waves.
//!
//! A wave hands one range to each worker rank 1..=w in rank order, then one
//! more range to the coordinator (rank 0), which computes it locally. Waves
//! are produced lazily, so a plan with millions of chunks costs nothing until
//! it is walked.

use std::fmt;
use std::num::NonZeroU64;

use serde::Serialize;

use crate::constants::MAX_WORKERS;
use crate::error::ReduceError;

/// Closed interval [from, to] of integers reduced as one unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Range {
    /// First integer of the interval.
    pub from: u64,
    /// Last integer of the interval.
    pub to: u64,
}

impl Range {
    /// The "no more work" signal. Never a valid work unit, as ranges start at 1.
    pub const SENTINEL: Range = Range { from: 0, to: 0 };

    /// Create a work range.
    ///
    /// # Errors
    ///
    /// Returns [`ReduceError::Config`] if `from` is 0 or `from > to`.
    pub fn new(from: u64, to: u64) -> Result<Self, ReduceError> {
        if from == 0 || from > to {
            return Err(ReduceError::Config(format!(
                "invalid range [{from}..{to}]"
            )));
        }
        Ok(Self { from, to })
    }

    /// Whether this is the termination signal.
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        *self == Self::SENTINEL
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{}]", self.from, self.to)
    }
}

/// Requested chunk size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkSize {
    /// Derive from the worker count: n / w, remainder spread over the first chunks.
    Auto,
    /// Every chunk has this size, except a truncated last one.
    Fixed(NonZeroU64),
}

impl ChunkSize {
    /// Requested size as given on the command line; 0 for [`ChunkSize::Auto`].
    #[must_use]
    pub fn get(self) -> u64 {
        match self {
            Self::Auto => 0,
            Self::Fixed(z) => z.get(),
        }
    }
}

impl From<u64> for ChunkSize {
    /// 0 selects [`ChunkSize::Auto`].
    fn from(z: u64) -> Self {
        NonZeroU64::new(z).map_or(Self::Auto, Self::Fixed)
    }
}

impl fmt::Display for ChunkSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Fixed(z) => write!(f, "{z}"),
        }
    }
}

/// A range sent to one worker rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    /// Destination worker rank (1..=w).
    pub rank: usize,
    /// Range to reduce.
    pub range: Range,
}

/// One synchronous round of dispatch, local work and collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wave {
    /// Zero-based wave number.
    pub index: usize,
    /// Ranges sent to workers, in rank order.
    pub dispatch: Vec<Assignment>,
    /// Range the coordinator computes itself, if any is left after dispatch.
    pub local: Option<Range>,
}

impl Wave {
    /// Ranges of this wave in dispatch order, the coordinator's last.
    pub fn ranges(&self) -> impl Iterator<Item = Range> + '_ {
        self.dispatch
            .iter()
            .map(|a| a.range)
            .chain(self.local)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sizing {
    Auto { base: u64, remainder: u64 },
    Fixed(u64),
}

impl Sizing {
    fn chunk_len(self, index: u64) -> u64 {
        match self {
            Self::Auto { base, remainder } => {
                if index < remainder {
                    base + 1
                } else {
                    base
                }
            }
            Self::Fixed(z) => z,
        }
    }
}

/// Chunk plan for reducing [1..n] over `workers` worker ranks plus the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    n: u64,
    workers: usize,
    chunk_size: ChunkSize,
    sizing: Sizing,
}

impl ChunkPlan {
    /// Derive a plan.
    ///
    /// With `workers == 0` the coordinator computes every chunk itself; an
    /// automatic chunk size then covers the whole range in one chunk.
    ///
    /// # Errors
    ///
    /// Returns [`ReduceError::Config`] if `n` is 0 or `workers` exceeds
    /// [`MAX_WORKERS`].
    ///
    /// # Example
    /// ```
    /// use psum_core::planner::{ChunkPlan, ChunkSize};
    ///
    /// let plan = ChunkPlan::new(10, 3, ChunkSize::Auto).unwrap();
    /// let widths: Vec<u64> = plan.ranges().map(|r| r.to - r.from + 1).collect();
    /// assert_eq!(widths, vec![4, 3, 3]);
    /// ```
    pub fn new(n: u64, workers: usize, chunk_size: ChunkSize) -> Result<Self, ReduceError> {
        if n == 0 {
            return Err(ReduceError::Config("n must be positive".into()));
        }
        if workers > MAX_WORKERS {
            return Err(ReduceError::Config(format!(
                "{workers} workers requested, at most {MAX_WORKERS} are supported"
            )));
        }
        let sizing = match chunk_size {
            ChunkSize::Fixed(z) => Sizing::Fixed(z.get()),
            ChunkSize::Auto if workers == 0 => Sizing::Auto {
                base: n,
                remainder: 0,
            },
            ChunkSize::Auto => {
                let w = workers as u64;
                Sizing::Auto {
                    base: n / w,
                    remainder: n % w,
                }
            }
        };
        Ok(Self {
            n,
            workers,
            chunk_size,
            sizing,
        })
    }

    /// Upper end of the reduced range.
    #[must_use]
    pub fn n(&self) -> u64 {
        self.n
    }

    /// Number of worker ranks.
    #[must_use]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Requested chunk size.
    #[must_use]
    pub fn chunk_size(&self) -> ChunkSize {
        self.chunk_size
    }

    /// Total number of chunks, worker and coordinator ones together.
    #[must_use]
    pub fn chunk_count(&self) -> u64 {
        match self.sizing {
            Sizing::Fixed(z) => self.n.div_ceil(z),
            Sizing::Auto { .. } if self.workers == 0 => 1,
            Sizing::Auto { .. } => self.n.min(self.workers as u64),
        }
    }

    /// Total number of waves.
    #[must_use]
    pub fn wave_count(&self) -> u64 {
        let per_wave = self.workers as u64 + 1;
        self.chunk_count().div_ceil(per_wave)
    }

    /// Walk the plan wave by wave.
    #[must_use]
    pub fn waves(&self) -> Waves {
        Waves {
            plan: *self,
            cursor: 0,
            chunk_index: 0,
            wave_index: 0,
        }
    }

    /// Every range of the plan in dispatch order.
    pub fn ranges(&self) -> impl Iterator<Item = Range> {
        self.waves().flat_map(|wave| {
            let ranges: Vec<Range> = wave.ranges().collect();
            ranges.into_iter()
        })
    }
}

/// Lazy iterator over the waves of a [`ChunkPlan`].
#[derive(Debug, Clone)]
pub struct Waves {
    plan: ChunkPlan,
    cursor: u64,
    chunk_index: u64,
    wave_index: usize,
}

impl Waves {
    fn next_range(&mut self) -> Option<Range> {
        let n = self.plan.n;
        if self.cursor >= n {
            return None;
        }
        let len = self
            .plan
            .sizing
            .chunk_len(self.chunk_index)
            .clamp(1, n - self.cursor);
        let range = Range {
            from: self.cursor + 1,
            to: self.cursor + len,
        };
        self.cursor += len;
        self.chunk_index += 1;
        Some(range)
    }
}

impl Iterator for Waves {
    type Item = Wave;

    fn next(&mut self) -> Option<Wave> {
        if self.cursor >= self.plan.n {
            return None;
        }

        let mut dispatch = Vec::with_capacity(self.plan.workers);
        for rank in 1..=self.plan.workers {
            match self.next_range() {
                Some(range) => dispatch.push(Assignment { rank, range }),
                None => break,
            }
        }
        let local = self.next_range();

        let wave = Wave {
            index: self.wave_index,
            dispatch,
            local,
        };
        self.wave_index += 1;
        Some(wave)
    }
}
