//! CLI argument parsing and settings for drover.

pub mod settings;

pub use settings::{SETTINGS_FILE, Settings, SettingsError};

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(name = "drover")]
#[command(about = "Submit, track and cancel jobs on batch systems")]
pub struct Args {
    /// Log level (overrides DROVER_LOG)
    #[arg(long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Settings file (defaults to ./settings.json if present)
    #[arg(long, global = true)]
    pub settings: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Submit a job and poll it until it finishes
    Run(RunArgs),
    /// Print the status of a previously submitted job
    Status(HandleArgs),
    /// Cancel a previously submitted job
    Kill(HandleArgs),
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Batch system to submit to
    #[arg(long, value_enum)]
    pub backend: Option<BackendKind>,

    /// Queue (LSF) or partition (SLURM)
    #[arg(long)]
    pub queue: Option<String>,

    /// Job name, also used for default log file names
    #[arg(long)]
    pub job_name: Option<String>,

    /// Standard output log file
    #[arg(long)]
    pub stdout: Option<Utf8PathBuf>,

    /// Standard error log file
    #[arg(long)]
    pub stderr: Option<Utf8PathBuf>,

    /// Working directory for the job
    #[arg(long)]
    pub workdir: Option<Utf8PathBuf>,

    /// Status poll interval in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_interval: Option<u64>,

    /// Kill the job after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Command to run, after `--`
    #[arg(required = true, trailing_var_arg = true, num_args = 1..)]
    pub command: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct HandleArgs {
    /// Batch system the job was submitted to
    #[arg(long, value_enum)]
    pub backend: Option<BackendKind>,

    /// Job id assigned by the batch system
    pub handle: String,
}

/// Supported batch systems.
#[derive(ValueEnum, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Lsf,
    Slurm,
    Local,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}
