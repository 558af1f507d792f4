//! Coordinator: dispatch waves, compute the trailing chunk, absorb results.
//!
//! A wave is a synchronous round. Every worker range of the wave is sent
//! before the coordinator reduces its own range, and every worker result is
//! collected before the next wave is dispatched. Once the plan is exhausted
//! each worker receives the sentinel exactly once.

use std::time::Instant;

use tracing::{debug, info};

use psum_core::codec::decode;
use psum_core::error::ReduceError;
use psum_core::mode::{Accumulator, ReductionMode};
use psum_core::observer::{WaveObserver, WaveUpdate};
use psum_core::options::RunOptions;
use psum_core::planner::{ChunkPlan, Range, Wave};
use psum_core::timing::TimingTable;
use psum_core::verify::{verify, Verification};

use crate::interfaces::RunReport;
use crate::transport::Transport;
use crate::worker::COORDINATOR;

/// Coordinator context: owns the plan, the accumulator and the timing table.
pub struct Coordinator<'a, T: Transport> {
    transport: &'a T,
    plan: ChunkPlan,
    mode: ReductionMode,
    check: bool,
    accumulator: Accumulator,
    timings: TimingTable,
    observer: &'a dyn WaveObserver,
}

impl<'a, T: Transport> Coordinator<'a, T> {
    /// Bind a coordinator to rank 0 of a group.
    ///
    /// # Errors
    ///
    /// Returns [`ReduceError::Config`] if the plan cannot be derived or does not
    /// match the group size, and [`ReduceError::Protocol`] if `transport` is
    /// not rank 0.
    pub fn new(
        transport: &'a T,
        opts: &RunOptions,
        observer: &'a dyn WaveObserver,
    ) -> Result<Self, ReduceError> {
        if transport.rank() != COORDINATOR {
            return Err(ReduceError::Protocol(format!(
                "coordinator must run on rank {COORDINATOR}, not {}",
                transport.rank()
            )));
        }
        let plan = opts.plan()?;
        if plan.workers() + 1 != transport.group_size() {
            return Err(ReduceError::Config(format!(
                "plan for {} workers does not fit a group of {} ranks",
                plan.workers(),
                transport.group_size()
            )));
        }
        Ok(Self {
            transport,
            plan,
            mode: opts.mode,
            check: opts.check,
            accumulator: Accumulator::new(opts.mode),
            timings: TimingTable::new(),
            observer,
        })
    }

    /// Run every wave, terminate the workers and verify the result.
    ///
    /// # Errors
    ///
    /// Any transport or decode failure; all are fatal for the group.
    pub fn run(mut self) -> Result<RunReport, ReduceError> {
        let total_waves = self.plan.wave_count();
        let total_chunks = self.plan.chunk_count();
        info!(
            mode = %self.mode,
            n = self.plan.n(),
            chunk_size = %self.plan.chunk_size(),
            workers = self.plan.workers(),
            waves = total_waves,
            chunks = total_chunks,
            "Chunk plan derived"
        );

        self.transport.barrier()?;
        let start = Instant::now();

        let mut waves = 0u64;
        for wave in self.plan.waves() {
            self.run_wave(&wave)?;
            self.observer.on_wave(&WaveUpdate {
                wave: waves,
                total_waves,
                chunks_absorbed: self.accumulator.absorbed(),
                total_chunks,
                done: false,
            });
            waves += 1;
        }

        self.terminate_workers()?;
        let elapsed = start.elapsed();

        self.observer.on_wave(&WaveUpdate {
            wave: waves.saturating_sub(1),
            total_waves,
            chunks_absorbed: self.accumulator.absorbed(),
            total_chunks,
            done: true,
        });

        let chunks = self.accumulator.absorbed();
        let value = self.accumulator.into_value();
        let verification = if self.check {
            verify(self.mode, self.plan.n(), &value)
        } else {
            Verification::skipped()
        };

        Ok(RunReport {
            mode: self.mode,
            n: self.plan.n(),
            chunk_size: self.plan.chunk_size(),
            workers: self.plan.workers(),
            waves,
            chunks,
            value,
            elapsed,
            timings: self.timings,
            verification,
        })
    }

    fn run_wave(&mut self, wave: &Wave) -> Result<(), ReduceError> {
        for a in &wave.dispatch {
            debug!(
                wave = wave.index,
                rank = a.rank,
                from = a.range.from,
                to = a.range.to,
                "Dispatch"
            );
            self.transport.send_range(a.rank, a.range)?;
        }

        if let Some(range) = wave.local {
            self.reduce_locally(wave.index, range);
        }

        let limit = self.transport.max_message_bytes();
        for a in &wave.dispatch {
            let report = self.transport.recv_partial(a.rank)?;
            let value = decode(&report.bytes, limit)?;
            self.timings.record_secs(a.rank, report.elapsed_secs);
            self.accumulator.absorb(value);
            debug!(wave = wave.index, rank = a.rank, bytes = report.bytes.len(), "Absorbed");
        }
        Ok(())
    }

    fn reduce_locally(&mut self, wave: usize, range: Range) {
        let start = Instant::now();
        let value = self.mode.reduce(range);
        let elapsed = start.elapsed();
        self.timings.record(COORDINATOR, elapsed);
        self.accumulator.absorb(value);
        debug!(wave, from = range.from, to = range.to, ?elapsed, "Coordinator reduced range");
    }

    fn terminate_workers(&self) -> Result<(), ReduceError> {
        for rank in 1..self.transport.group_size() {
            self.transport.send_range(rank, Range::SENTINEL)?;
        }
        debug!(workers = self.transport.group_size() - 1, "Sentinels sent");
        Ok(())
    }
}
