//! psum: parallel exact sum and factorial over [1..n].

use std::process::ExitCode;

use clap::Parser;
use psum_lib::{app, config, errors};

fn main() -> ExitCode {
    let config = match config::AppConfig::try_parse() {
        Ok(config) => config,
        Err(e) => {
            let code = config::clap_exit_code(&e);
            let _ = e.print();
            return exit_code(code);
        }
    };

    // Initialize tracing
    let level = if config.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    match app::run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "Run failed");
            exit_code(errors::handle_error(&e))
        }
    }
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
