//! Error type shared by every stage of a reduction run.

/// Error type for reduction runs.
///
/// Every variant is fatal to the whole process group. A result that fails
/// verification is not an error; see [`crate::verify::Verdict`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReduceError {
    /// Bad or overflowing configuration, detected before any dispatch.
    #[error("configuration error: {0}")]
    Config(String),

    /// A message buffer could not be sized within the transport ceiling or
    /// could not be reserved.
    #[error("cannot allocate a {requested}-byte message buffer (limit {limit} bytes)")]
    TransportAllocation {
        /// Bytes the buffer would need.
        requested: usize,
        /// Transport ceiling in effect.
        limit: usize,
    },

    /// A message larger than the transport ceiling was sent or received.
    #[error("message of {len} bytes overflows the transport limit of {limit} bytes")]
    TransportOverflow {
        /// Declared or actual message length.
        len: usize,
        /// Transport ceiling in effect.
        limit: usize,
    },

    /// A peer's encoded value is not a complete rational literal.
    #[error("malformed result: {0}")]
    MalformedResult(String),

    /// A peer left the group before the run finished.
    #[error("rank {rank} left the process group")]
    PeerLost {
        /// Rank of the vanished peer.
        rank: usize,
    },

    /// A peer sent a message that is not valid at this point of the protocol.
    #[error("protocol violation: {0}")]
    Protocol(String),

    /// The process group could not be started.
    #[error("process group error: {0}")]
    Group(String),
}
