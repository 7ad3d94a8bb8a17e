use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::commands::{InitCommand, RunCommand};

#[derive(Parser)]
#[command(name = "ide-autotest")]
#[command(about = "Debugger system tests for the IDE")]
#[command(
    long_about = "Sets breakpoints, runs a debug session and checks every stop against the expected order. \
Scenarios run against the built-in simulated IDE."
)]
pub struct Cli {
    /// Also write logs to this file
    #[arg(long, global = true, env = "IDE_AUTOTEST_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Log driver activity (debug level) to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a scenario file
    Run(RunCommand),
    /// Write a scenario template
    Init(InitCommand),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[clap(rename_all = "lower")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}
