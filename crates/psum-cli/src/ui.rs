//! UI helpers for CLI display.

use console::style;

use psum_core::mode::ReductionMode;
use psum_core::planner::ChunkSize;
use psum_core::verify::Verdict;

/// Check if color output is disabled via `NO_COLOR` env var.
#[must_use]
pub fn is_color_disabled() -> bool {
    std::env::var("NO_COLOR").is_ok()
}

/// The verdict line of the report, styled unless color is disabled.
#[must_use]
pub fn verdict_line(verdict: Verdict) -> Option<String> {
    let (marker, text) = match verdict {
        Verdict::Ok => ("++", "Result OK"),
        Verdict::Wrong => ("**", "Result WRONG"),
        Verdict::Skipped => return None,
    };
    let line = format!("{marker} {text}");
    if is_color_disabled() {
        return Some(line);
    }
    let styled = match verdict {
        Verdict::Ok => style(line).green().bold(),
        _ => style(line).red().bold(),
    };
    Some(styled.to_string())
}

/// Startup lines describing the run, as printed on stderr.
#[must_use]
pub fn banner_lines(mode: ReductionMode, n: u64, chunk_size: ChunkSize, workers: usize) -> [String; 2] {
    let what = match mode {
        ReductionMode::Sum => format!("Computing sum [1..{n}] with chunksize {chunk_size}..."),
        ReductionMode::Product => {
            format!("Computing factorial of {n} with chunksize {chunk_size}...")
        }
    };
    [
        what,
        format!("Using 1 master (also acting as worker) and {workers} workers ..."),
    ]
}

/// Print the startup banner on stderr.
pub fn print_banner(mode: ReductionMode, n: u64, chunk_size: ChunkSize, workers: usize) {
    for line in banner_lines(mode, n, chunk_size, workers) {
        eprintln!("{line}");
    }
}

/// Print an error message.
pub fn print_error(text: &str) {
    if is_color_disabled() {
        eprintln!("[ERROR] {text}");
    } else {
        eprintln!("{} {text}", style("[ERROR]").red().bold());
    }
}
