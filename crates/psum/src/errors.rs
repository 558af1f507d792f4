//! Error handling and exit codes.

use psum_core::constants::exit_codes;
use psum_core::error::ReduceError;

/// Exit code for a reduction error.
pub fn exit_code(err: &ReduceError) -> i32 {
    match err {
        ReduceError::Config(_) => exit_codes::ERROR_CONFIG,
        ReduceError::MalformedResult(_) => exit_codes::ERROR_MALFORMED,
        ReduceError::TransportOverflow { .. } => exit_codes::ERROR_TRANSPORT_OVERFLOW,
        ReduceError::TransportAllocation { .. } => exit_codes::ERROR_TRANSPORT_ALLOCATION,
        ReduceError::PeerLost { .. } | ReduceError::Protocol(_) | ReduceError::Group(_) => {
            exit_codes::ERROR_PEER
        }
    }
}

/// Exit code for any application error.
pub fn handle_error(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<ReduceError>()
        .map_or(exit_codes::ERROR_GENERIC, exit_code)
}
