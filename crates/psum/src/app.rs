//! Application entry point and dispatch.

use anyhow::{Context, Result};
use tracing::info;

use psum_cli::output::write_to_file;
use psum_cli::presenter::CLIResultPresenter;
use psum_cli::progress::ProgressBarObserver;
use psum_cli::ui;
use psum_core::observer::LoggingObserver;
use psum_core::options::RunOptions;
use psum_orchestration::group::run_group;
use psum_orchestration::interfaces::{ResultPresenter, RunReport};

use crate::config::AppConfig;

/// Run the application.
pub fn run(config: &AppConfig) -> Result<()> {
    if let Some(shell) = config.completion {
        let mut cmd = <AppConfig as clap::CommandFactory>::command();
        psum_cli::completion::generate_completion(&mut cmd, shell, &mut std::io::stdout());
        return Ok(());
    }

    let presenter = CLIResultPresenter::new(config.verbose, config.quiet)
        .with_print(config.print)
        .with_json(config.json);
    run_cli(config, &presenter).inspect_err(|e| presenter.present_error(&format!("{e:#}")))
}

fn run_cli(config: &AppConfig, presenter: &dyn ResultPresenter) -> Result<()> {
    let opts = config.run_options()?;

    if !config.quiet && !config.json {
        ui::print_banner(opts.mode, opts.n, opts.chunk_size, opts.workers);
    }

    let report = reduce(config, &opts)?;
    presenter.present_report(&report);

    if let Some(ref path) = config.output {
        write_to_file(path, &report.value)
            .with_context(|| format!("cannot write result to {}", path.display()))?;
        info!(path = %path.display(), "Result written");
    }

    Ok(())
}

fn reduce(config: &AppConfig, opts: &RunOptions) -> Result<RunReport> {
    let report = if config.progress {
        let observer = ProgressBarObserver::new(opts.plan()?.chunk_count());
        run_group(opts, &observer)?
    } else {
        run_group(opts, &LoggingObserver::default())?
    };
    Ok(report)
}
