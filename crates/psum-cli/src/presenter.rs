//! CLI result presenter.

use std::io::{self, Write};

use psum_core::verify::Verdict;
use psum_orchestration::interfaces::{ResultPresenter, RunReport};

use crate::output::{format_number, format_secs, format_value, to_json};
use crate::ui;

/// CLI result presenter.
#[derive(Debug, Clone, Copy, Default)]
pub struct CLIResultPresenter {
    verbose: bool,
    quiet: bool,
    print: bool,
    json: bool,
}

impl CLIResultPresenter {
    #[must_use]
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            ..Self::default()
        }
    }

    /// Also print the final value.
    #[must_use]
    pub fn with_print(mut self, print: bool) -> Self {
        self.print = print;
        self
    }

    /// Emit a JSON report instead of the human one.
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Write the report for `report` to `out`.
    pub fn render(&self, report: &RunReport, out: &mut dyn Write) -> io::Result<()> {
        if self.json {
            let json = to_json(report, self.print).map_err(io::Error::other)?;
            return writeln!(out, "{json}");
        }

        if self.quiet {
            return writeln!(out, "{}", report.value);
        }

        writeln!(out, "Elapsed time: {} secs ", format_secs(report.elapsed))?;
        write!(out, " by PEs: ")?;
        for (rank, d) in report.timings.per_rank(report.group_size()) {
            write!(out, ", PE {rank}: {} secs", format_secs(d))?;
        }
        writeln!(out)?;

        if let Some(line) = ui::verdict_line(report.verification.verdict) {
            writeln!(out, "{line}")?;
            if self.verbose || report.verification.verdict == Verdict::Wrong {
                writeln!(
                    out,
                    "Reference: {} in {} secs",
                    report.verification.reference,
                    format_secs(report.verification.elapsed)
                )?;
            }
        }

        if self.verbose {
            writeln!(
                out,
                "Waves: {}, chunks: {}, n: {}",
                format_number(report.waves),
                format_number(report.chunks),
                format_number(report.n)
            )?;
        }

        if self.print {
            writeln!(out, "Result = {}", report.value)?;
        } else if self.verbose {
            writeln!(out, "Result = {}", format_value(&report.value, false))?;
        }
        Ok(())
    }
}

impl ResultPresenter for CLIResultPresenter {
    fn present_report(&self, report: &RunReport) {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        if let Err(e) = self.render(report, &mut out) {
            tracing::error!(error = %e, "Failed to write report");
        }
    }

    fn present_error(&self, error: &str) {
        ui::print_error(error);
    }
}
