//! Worker loop: receive a range, reduce it, report it, until the sentinel.

use std::time::{Duration, Instant};

use tracing::debug;

use psum_core::codec::encode;
use psum_core::error::ReduceError;
use psum_core::mode::ReductionMode;

use crate::transport::{PartialReport, Transport};

/// Rank of the coordinator.
pub const COORDINATOR: usize = 0;

/// State of a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Waiting for the next range from the coordinator.
    AwaitingRange,
    /// Received the sentinel; absorbing, nothing is sent or received.
    Terminated,
}

/// What a worker did over its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorkerSummary {
    /// Ranges reduced and reported.
    pub chunks: u64,
    /// Total compute and encode time.
    pub busy: Duration,
}

/// Worker side of the protocol, bound to one transport endpoint.
pub struct WorkerLoop<'a, T: Transport> {
    transport: &'a T,
    mode: ReductionMode,
    state: WorkerState,
    summary: WorkerSummary,
}

impl<'a, T: Transport> WorkerLoop<'a, T> {
    /// Create a worker in [`WorkerState::AwaitingRange`].
    pub fn new(transport: &'a T, mode: ReductionMode) -> Self {
        Self {
            transport,
            mode,
            state: WorkerState::AwaitingRange,
            summary: WorkerSummary::default(),
        }
    }

    /// Current state.
    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Join the start barrier, then serve ranges until the sentinel arrives.
    ///
    /// # Errors
    ///
    /// Any error is fatal for the group: a result that cannot be encoded under
    /// the transport ceiling, or a vanished coordinator.
    pub fn run(mut self) -> Result<WorkerSummary, ReduceError> {
        self.transport.barrier()?;
        debug!(rank = self.transport.rank(), "Worker passed barrier");

        while self.step()? == WorkerState::AwaitingRange {}
        Ok(self.summary)
    }

    /// Handle one message from the coordinator.
    ///
    /// In [`WorkerState::Terminated`] this does nothing.
    pub fn step(&mut self) -> Result<WorkerState, ReduceError> {
        if self.state == WorkerState::Terminated {
            return Ok(self.state);
        }

        let rank = self.transport.rank();
        let range = self.transport.recv_range(COORDINATOR)?;
        if range.is_sentinel() {
            debug!(rank, chunks = self.summary.chunks, "Worker received sentinel");
            self.state = WorkerState::Terminated;
            return Ok(self.state);
        }

        let start = Instant::now();
        let value = self.mode.reduce(range);
        let bytes = encode(&value, self.transport.max_message_bytes())?;
        let elapsed = start.elapsed();

        debug!(
            rank,
            from = range.from,
            to = range.to,
            bytes = bytes.len(),
            ?elapsed,
            "Worker reduced range"
        );

        self.transport
            .send_partial(COORDINATOR, PartialReport::new(bytes, elapsed.as_secs_f64()))?;
        self.summary.chunks += 1;
        self.summary.busy += elapsed;
        Ok(self.state)
    }
}
