//! # psum-orchestration
//!
//! Coordinator/worker distribution protocol over a process-group transport.

pub mod coordinator;
pub mod group;
pub mod interfaces;
pub mod transport;
pub mod worker;

pub use coordinator::Coordinator;
pub use group::run_group;
pub use interfaces::{ResultPresenter, RunReport};
pub use transport::{ChannelTransport, Message, PartialReport, Transport};
pub use worker::{WorkerLoop, WorkerState, WorkerSummary, COORDINATOR};
