//! Constants for the reduction protocol, the result codec and the CLI.

/// Default transport ceiling for one encoded partial result, in bytes.
///
/// Classic message-passing calls take the element count as a C `int`, so
/// anything beyond `i32::MAX` cannot travel as one message.
#[allow(clippy::cast_sign_loss)]
pub const DEFAULT_MAX_MESSAGE_BYTES: usize = i32::MAX as usize;

/// Largest accepted worker count.
///
/// The in-process group opens one channel per ordered pair of ranks and one
/// OS thread per worker.
pub const MAX_WORKERS: usize = 1024;

/// Bytes added on top of the digit counts of an encoded rational:
/// sign, `/` separator and one spare byte.
pub const CODEC_OVERHEAD: usize = 3;

/// Numerator of a rational upper bound for log10(2) (0.30103 > 0.301029995...).
pub const LOG10_2_NUM: u64 = 30_103;

/// Denominator of [`LOG10_2_NUM`].
pub const LOG10_2_DEN: u64 = 100_000;

/// Largest n whose factorial fits in a `u64`.
/// 20! = 2432902008176640000
pub const MAX_FACTORIAL_U64: u64 = 20;

/// Largest n for which the verifier recomputes n! sequentially.
pub const SEQUENTIAL_CHECK_LIMIT: u64 = 49;

/// Below this range length the verifier's product tree multiplies serially.
pub const PRODUCT_TREE_LEAF: u64 = 64;

/// Minimum interval between two progress log lines of the logging observer.
pub const WAVE_LOG_INTERVAL_MS: u64 = 500;

/// Precomputed factorials for n = 0..=20.
///
/// Built iteratively with an explicit overflow check; a table that cannot be
/// represented fails compilation instead of wrapping.
pub const FACTORIAL_TABLE: [u64; 21] = {
    let mut table = [1u64; 21];
    let mut i = 1;
    while i < 21 {
        table[i] = match table[i - 1].checked_mul(i as u64) {
            Some(v) => v,
            None => panic!("factorial table overflow"),
        };
        i += 1;
    }
    table
};

/// Process exit codes.
pub mod exit_codes {
    /// Successful execution (a `WRONG` verification still exits 0).
    pub const SUCCESS: i32 = 0;
    /// Required arguments are missing.
    pub const ERROR_MISSING_ARGS: i32 = 1;
    /// Any other failure, such as an unwritable output file.
    pub const ERROR_GENERIC: i32 = 1;
    /// Invalid or overflowing configuration.
    pub const ERROR_CONFIG: i32 = 2;
    /// A peer's encoded result could not be decoded.
    pub const ERROR_MALFORMED: i32 = 2;
    /// A message exceeded the transport ceiling.
    pub const ERROR_TRANSPORT_OVERFLOW: i32 = 6;
    /// A message buffer could not be sized or allocated.
    pub const ERROR_TRANSPORT_ALLOCATION: i32 = 7;
    /// A peer vanished or broke the protocol.
    pub const ERROR_PEER: i32 = 9;
}
