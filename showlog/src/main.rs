mod application;

mod presentation {
    pub mod cli;
}

use std::process::ExitCode;

use clap::Parser;
use presentation::cli::Cli;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    // stdout is reserved for records; diagnostics go to stderr.
    let filter = EnvFilter::try_from_env("SHOWLOG_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let mut out = std::io::stdout().lock();
    match application::run(&cli, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
