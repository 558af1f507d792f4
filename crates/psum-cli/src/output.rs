//! CLI output formatting.

use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use num_rational::BigRational;
use serde::Serialize;

use psum_core::mode::ReductionMode;
use psum_core::verify::Verification;
use psum_orchestration::interfaces::RunReport;

/// Digits shown on each side of a truncated value.
const PREVIEW_DIGITS: usize = 50;

/// Format a value for display, potentially truncating.
#[must_use]
pub fn format_value(value: &BigRational, verbose: bool) -> String {
    let s = value.to_string();
    if !verbose && s.len() > 2 * PREVIEW_DIGITS {
        format!(
            "{}...{} ({} digits)",
            &s[..PREVIEW_DIGITS],
            &s[s.len() - PREVIEW_DIGITS..],
            s.len()
        )
    } else {
        s
    }
}

/// Format seconds the way the timing report does: fixed, six decimals.
#[must_use]
pub fn format_secs(d: Duration) -> String {
    format!("{:.6}", d.as_secs_f64())
}

/// Format a number with thousand separators.
#[must_use]
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Write the final value to a file, followed by a newline.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be created or written.
pub fn write_to_file(path: &Path, value: &BigRational) -> io::Result<()> {
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    writeln!(file, "{value}")?;
    file.flush()
}

/// Compute time of one rank.
#[derive(Debug, Serialize)]
pub struct RankTimeJson {
    pub rank: usize,
    pub secs: f64,
}

/// Machine-readable run report.
#[derive(Debug, Serialize)]
pub struct ReportJson {
    pub mode: ReductionMode,
    pub n: u64,
    /// 0 means automatic sizing.
    pub chunk_size: u64,
    pub workers: usize,
    pub waves: u64,
    pub chunks: u64,
    pub elapsed_secs: f64,
    pub ranks: Vec<RankTimeJson>,
    pub verification: Verification,
    pub digits: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl ReportJson {
    /// Build the JSON view of `report`; the value itself is included on request.
    #[must_use]
    pub fn from_report(report: &RunReport, include_value: bool) -> Self {
        let value = report.value.to_string();
        Self {
            mode: report.mode,
            n: report.n,
            chunk_size: report.chunk_size.get(),
            workers: report.workers,
            waves: report.waves,
            chunks: report.chunks,
            elapsed_secs: report.elapsed.as_secs_f64(),
            ranks: report
                .timings
                .per_rank(report.group_size())
                .into_iter()
                .map(|(rank, d)| RankTimeJson {
                    rank,
                    secs: d.as_secs_f64(),
                })
                .collect(),
            verification: report.verification,
            digits: value.trim_start_matches('-').len(),
            value: include_value.then_some(value),
        }
    }
}

/// Serialize a run report as pretty JSON.
///
/// # Errors
///
/// Returns a serialization error; none is expected for well-formed reports.
pub fn to_json(report: &RunReport, include_value: bool) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&ReportJson::from_report(report, include_value))
}
