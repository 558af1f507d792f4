//! Process-group bootstrap and teardown.
//!
//! A group of `workers + 1` ranks runs inside the current process: every
//! worker rank gets a dedicated OS thread, the coordinator runs on the calling
//! thread. A failing rank drops its transport endpoint on the way out, which
//! turns every blocked peer's pending send or receive into
//! [`ReduceError::PeerLost`]. The group therefore always drains, and the error
//! reported to the caller is the root cause rather than one of its echoes.

use std::thread;

use tracing::{debug, info, warn};

use psum_core::error::ReduceError;
use psum_core::observer::WaveObserver;
use psum_core::options::RunOptions;

use crate::coordinator::Coordinator;
use crate::interfaces::RunReport;
use crate::transport::{ChannelTransport, Transport};
use crate::worker::{WorkerLoop, WorkerSummary};

/// Run one reduction over an in-process group and tear the group down.
///
/// # Errors
///
/// Returns the first error of the group that is not a [`ReduceError::PeerLost`]
/// echo, or the first error at all when every rank only saw lost peers.
///
/// # Example
/// ```
/// use psum_core::observer::NoOpObserver;
/// use psum_core::{ReductionMode, RunOptions};
/// use psum_orchestration::group::run_group;
///
/// let opts = RunOptions::new(10, 0u64, 3, ReductionMode::Sum);
/// let report = run_group(&opts, &NoOpObserver::new()).unwrap();
/// assert_eq!(report.value.to_string(), "55");
/// ```
pub fn run_group(
    opts: &RunOptions,
    observer: &dyn WaveObserver,
) -> Result<RunReport, ReduceError> {
    let opts = opts.clone().normalize();
    // Fail before any thread exists.
    opts.plan()?;

    let mut endpoints = ChannelTransport::group(opts.group_size(), opts.max_message_bytes);
    let workers = endpoints.split_off(1);
    let root = endpoints
        .pop()
        .ok_or_else(|| ReduceError::Group("empty process group".into()))?;
    info!(
        ranks = opts.group_size(),
        max_message_bytes = opts.max_message_bytes,
        "Process group started"
    );

    thread::scope(|s| {
        let mut handles = Vec::with_capacity(workers.len());
        for endpoint in workers {
            let rank = endpoint.rank();
            let mode = opts.mode;
            let spawned = thread::Builder::new()
                .name(format!("psum-rank-{rank}"))
                .spawn_scoped(s, move || WorkerLoop::new(&endpoint, mode).run());
            match spawned {
                Ok(handle) => handles.push((rank, handle)),
                Err(e) => {
                    // Releases the workers already waiting on the barrier.
                    drop(root);
                    let spawn_error =
                        ReduceError::Group(format!("failed to spawn rank {rank}: {e}"));
                    let mut errors = vec![spawn_error];
                    errors.extend(join_workers(handles));
                    return Err(root_cause(errors));
                }
            }
        }

        let outcome = coordinate(root, &opts, observer);
        let mut errors: Vec<ReduceError> = outcome.as_ref().err().cloned().into_iter().collect();
        errors.extend(join_workers(handles));

        match outcome {
            Ok(report) if errors.is_empty() => {
                info!(
                    waves = report.waves,
                    chunks = report.chunks,
                    elapsed = ?report.elapsed,
                    "Process group finished"
                );
                Ok(report)
            }
            _ => {
                let cause = root_cause(errors);
                warn!(error = %cause, "Process group aborted");
                Err(cause)
            }
        }
    })
}

/// Run the coordinator on `root`, dropping the endpoint when done.
fn coordinate(
    root: ChannelTransport,
    opts: &RunOptions,
    observer: &dyn WaveObserver,
) -> Result<RunReport, ReduceError> {
    Coordinator::new(&root, opts, observer)?.run()
}

fn join_workers(
    handles: Vec<(usize, thread::ScopedJoinHandle<'_, Result<WorkerSummary, ReduceError>>)>,
) -> Vec<ReduceError> {
    let mut errors = Vec::new();
    for (rank, handle) in handles {
        match handle.join() {
            Ok(Ok(summary)) => {
                debug!(rank, chunks = summary.chunks, busy = ?summary.busy, "Worker finished");
            }
            Ok(Err(e)) => {
                debug!(rank, error = %e, "Worker failed");
                errors.push(e);
            }
            Err(_) => errors.push(ReduceError::Group(format!("rank {rank} panicked"))),
        }
    }
    errors
}

/// Pick the error that started an abort.
///
/// `errors` must not be empty.
fn root_cause(errors: Vec<ReduceError>) -> ReduceError {
    let mut first = None;
    for e in errors {
        if !matches!(e, ReduceError::PeerLost { .. }) {
            return e;
        }
        first.get_or_insert(e);
    }
    first.unwrap_or_else(|| ReduceError::Group("group aborted without an error".into()))
}
