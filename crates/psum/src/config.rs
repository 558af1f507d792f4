//! Application configuration from CLI arguments and environment.

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;

use psum_core::constants::{exit_codes, DEFAULT_MAX_MESSAGE_BYTES};
use psum_core::error::ReduceError;
use psum_core::mode::ReductionMode;
use psum_core::options::RunOptions;

/// psum: parallel exact sum or factorial over [1..n].
///
/// Splits [1..N] into chunks, reduces them on worker ranks and the
/// coordinator, and reports per-rank times for speedup measurements.
#[derive(Parser, Debug)]
#[command(name = "psum", version, about, arg_required_else_help = true)]
#[allow(clippy::struct_excessive_bools)]
pub struct AppConfig {
    /// Upper end of the range; accepts k/m/g suffixes (e.g. 100k).
    #[arg(value_parser = parse_size, required_unless_present = "completion")]
    pub n: Option<u64>,

    /// Chunk size; 0 derives it from the worker count.
    #[arg(value_parser = parse_size, required_unless_present = "completion")]
    pub chunk_size: Option<u64>,

    /// Reduction: sum, or product (alias fact, factorial).
    #[arg(long, default_value = "sum", env = "PSUM_MODE")]
    pub mode: ReductionMode,

    /// Number of worker ranks; 0 lets the coordinator do all the work.
    #[arg(short, long, default_value_t = default_workers(), env = "PSUM_WORKERS")]
    pub workers: usize,

    /// Print the final value.
    #[arg(short, long)]
    pub print: bool,

    /// Skip verification of the result.
    #[arg(long)]
    pub no_check: bool,

    /// Largest encoded result one message may carry, in bytes.
    #[arg(long, value_parser = parse_size, default_value_t = DEFAULT_MAX_MESSAGE_BYTES as u64)]
    pub max_message_size: u64,

    /// Emit the run report as JSON.
    #[arg(long, conflicts_with = "quiet")]
    pub json: bool,

    /// Write the final value to this file.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Quiet mode (only output the value).
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose output and debug logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Show a wave progress bar.
    #[arg(long)]
    pub progress: bool,

    /// Generate shell completion.
    #[arg(long, value_enum)]
    pub completion: Option<clap_complete::Shell>,
}

impl AppConfig {
    /// Build the run options.
    ///
    /// # Errors
    ///
    /// Returns [`ReduceError::Config`] if N or CHUNKSIZE is missing or N is 0.
    pub fn run_options(&self) -> Result<RunOptions, ReduceError> {
        let n = self
            .n
            .ok_or_else(|| ReduceError::Config("missing argument N".into()))?;
        let chunk_size = self
            .chunk_size
            .ok_or_else(|| ReduceError::Config("missing argument CHUNKSIZE".into()))?;
        if n == 0 {
            return Err(ReduceError::Config("N must be at least 1".into()));
        }

        let mut opts = RunOptions::new(n, chunk_size, self.workers, self.mode);
        opts.max_message_bytes = usize::try_from(self.max_message_size).unwrap_or(usize::MAX);
        opts.check = !self.no_check;
        opts.plan()?;
        Ok(opts.normalize())
    }
}

/// Available parallelism minus the coordinator, at least 1.
#[must_use]
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map_or(1, |p| p.get().saturating_sub(1))
        .max(1)
}

/// Parse a size with an optional decimal suffix: k/K (10^3), m/M (10^6), g/G (10^9).
///
/// # Errors
///
/// Returns a message if anything but ASCII digits precedes the suffix, or the
/// value overflows `u64`.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    let (digits, multiplier) = match s.chars().last() {
        Some('k' | 'K') => (&s[..s.len() - 1], 1_000u64),
        Some('m' | 'M') => (&s[..s.len() - 1], 1_000_000),
        Some('g' | 'G') => (&s[..s.len() - 1], 1_000_000_000),
        _ => (s, 1),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("invalid size '{s}': expected digits with an optional k/m/g suffix"));
    }
    let base: u64 = digits
        .parse()
        .map_err(|e| format!("invalid size '{s}': {e}"))?;
    base.checked_mul(multiplier)
        .ok_or_else(|| format!("size '{s}' exceeds the maximum of {}", u64::MAX))
}

/// Exit code for an argument error reported by clap.
#[must_use]
pub fn clap_exit_code(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => exit_codes::SUCCESS,
        ErrorKind::MissingRequiredArgument
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => exit_codes::ERROR_MISSING_ARGS,
        _ => exit_codes::ERROR_CONFIG,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use psum_core::planner::ChunkSize;

    fn parse(args: &[&str]) -> Result<AppConfig, clap::Error> {
        AppConfig::try_parse_from(std::iter::once("psum").chain(args.iter().copied()))
    }

    #[test]
    fn command_is_well_formed() {
        AppConfig::command().debug_assert();
    }

    #[test]
    fn parse_size_suffixes() {
        assert_eq!(parse_size("100"), Ok(100));
        assert_eq!(parse_size("100k"), Ok(100_000));
        assert_eq!(parse_size("3K"), Ok(3_000));
        assert_eq!(parse_size("2m"), Ok(2_000_000));
        assert_eq!(parse_size("1G"), Ok(1_000_000_000));
        assert_eq!(parse_size(" 7 "), Ok(7));
    }

    #[test]
    fn parse_size_rejects_garbage_and_overflow() {
        assert!(parse_size("").is_err());
        assert!(parse_size("k").is_err());
        assert!(parse_size("12x").is_err());
        assert!(parse_size("-5").is_err());
        assert!(parse_size("+5").is_err());
        assert!(parse_size("+5k").is_err());
        assert!(parse_size("1 000").is_err());
        assert!(parse_size("18446744073709551615").is_ok());
        assert!(parse_size("18446744073709551615k").is_err());
        assert!(parse_size("20000000000g").is_err());
    }

    #[test]
    fn oversized_worker_count_is_rejected() {
        let config = parse(&["10", "0", "-w", "18446744073709551615"]).unwrap();
        assert!(matches!(config.run_options(), Err(ReduceError::Config(_))));
    }

    #[test]
    fn positional_arguments() {
        let config = parse(&["100k", "0", "-w", "3"]).unwrap();
        let opts = config.run_options().unwrap();
        assert_eq!(opts.n, 100_000);
        assert_eq!(opts.chunk_size, ChunkSize::Auto);
        assert_eq!(opts.workers, 3);
        assert_eq!(opts.mode, ReductionMode::Sum);
        assert!(opts.check);
        assert_eq!(opts.max_message_bytes, DEFAULT_MAX_MESSAGE_BYTES);
    }

    #[test]
    fn mode_aliases() {
        for alias in ["product", "fact", "factorial"] {
            let config = parse(&["10", "2", "--mode", alias]).unwrap();
            assert_eq!(config.mode, ReductionMode::Product);
        }
        assert!(parse(&["10", "2", "--mode", "median"]).is_err());
    }

    #[test]
    fn zero_n_is_a_config_error() {
        let config = parse(&["0", "0"]).unwrap();
        assert!(matches!(config.run_options(), Err(ReduceError::Config(_))));
    }

    #[test]
    fn zero_message_size_means_default() {
        let config = parse(&["10", "0", "--max-message-size", "0"]).unwrap();
        assert_eq!(
            config.run_options().unwrap().max_message_bytes,
            DEFAULT_MAX_MESSAGE_BYTES
        );
    }

    #[test]
    fn no_check_disables_verification() {
        let config = parse(&["10", "0", "--no-check"]).unwrap();
        assert!(!config.run_options().unwrap().check);
    }

    #[test]
    fn missing_chunk_size_is_exit_one() {
        let err = parse(&["10"]).unwrap_err();
        assert_eq!(clap_exit_code(&err), exit_codes::ERROR_MISSING_ARGS);
    }

    #[test]
    fn no_arguments_is_exit_one() {
        let err = parse(&[]).unwrap_err();
        assert_eq!(clap_exit_code(&err), exit_codes::ERROR_MISSING_ARGS);
    }

    #[test]
    fn overflowing_size_is_exit_two() {
        let err = parse(&["99999999999999999999", "0"]).unwrap_err();
        assert_eq!(clap_exit_code(&err), exit_codes::ERROR_CONFIG);
    }

    #[test]
    fn completion_needs_no_positionals() {
        let config = parse(&["--completion", "bash"]).unwrap();
        assert!(config.completion.is_some());
        assert!(config.n.is_none());
    }

    #[test]
    fn quiet_conflicts_with_json() {
        assert!(parse(&["10", "0", "-q", "--json"]).is_err());
    }

    #[test]
    fn default_workers_is_positive() {
        assert!(default_workers() >= 1);
    }
}
