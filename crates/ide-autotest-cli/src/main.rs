//! ide-autotest CLI
//!
//! Usage:
//!   ide-autotest init [scenario.yaml]          # Write a scenario template
//!   ide-autotest run scenario.yaml             # Run it, human-readable report
//!   ide-autotest run scenario.yaml --output json --results-dir results/

use clap::Parser;
use colored::*;
use std::path::Path;
use std::process::ExitCode;
use tracing::error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Cli, Commands};

mod cli;
mod commands;
mod scenario;

fn init_tracing(log_file: Option<&Path>, verbose: bool) -> Option<WorkerGuard> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into());

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_else(|| "ide-autotest.log".into());
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(file_layer)
        .try_init();
    guard
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let _guard = init_tracing(cli.log_file.as_deref(), cli.verbose);

    let result = match cli.command {
        Commands::Run(cmd) => cmd.execute().await,
        Commands::Init(cmd) => cmd.execute().map(|()| true),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error!("ide-autotest failed: {:#}", e);
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
