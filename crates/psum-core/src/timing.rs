//! Per-rank cumulative compute time.

use std::collections::BTreeMap;
use std::time::Duration;

/// Cumulative compute time keyed by rank (rank 0 is the coordinator).
///
/// Entries appear on a rank's first report and only ever grow.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimingTable {
    entries: BTreeMap<usize, Duration>,
}

impl TimingTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `elapsed` to `rank`'s total.
    pub fn record(&mut self, rank: usize, elapsed: Duration) {
        *self.entries.entry(rank).or_default() += elapsed;
    }

    /// Add a report given in seconds, as carried on the wire.
    ///
    /// Negative or non-finite values count as zero.
    pub fn record_secs(&mut self, rank: usize, secs: f64) {
        let elapsed = Duration::try_from_secs_f64(secs).unwrap_or_default();
        self.record(rank, elapsed);
    }

    /// Total for `rank`, if it ever reported.
    #[must_use]
    pub fn get(&self, rank: usize) -> Option<Duration> {
        self.entries.get(&rank).copied()
    }

    /// Totals for every rank of a group of `group_size`, zero for silent ranks.
    #[must_use]
    pub fn per_rank(&self, group_size: usize) -> Vec<(usize, Duration)> {
        (0..group_size)
            .map(|rank| (rank, self.get(rank).unwrap_or_default()))
            .collect()
    }

    /// Number of ranks that reported.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no rank has reported yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
