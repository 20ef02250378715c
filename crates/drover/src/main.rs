//! Drover - submit, track and cancel jobs on batch systems.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use drover::{Backend, PollingConfig, logging, run_job};
use drover_cli::{Args, BackendKind, Command, HandleArgs, RunArgs, SETTINGS_FILE, Settings};
use drover_core::{BatchJobHandle, BatchProcess, JobDescriptor, default_log_paths};
use miette::{IntoDiagnostic, Result, miette};
use std::time::Duration;
use tokio::sync::watch;

const DEFAULT_JOB_NAME: &str = "job";

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_logging(args.log_level);

    let settings = load_settings(args.settings.as_deref())?;

    match args.command {
        Command::Run(run) => run_command(run, &settings).await,
        Command::Status(handle) => status_command(handle, &settings).await,
        Command::Kill(handle) => kill_command(handle, &settings).await,
    }
}

/// An explicitly named settings file must exist, the default one may not.
fn load_settings(path: Option<&Utf8Path>) -> Result<Settings> {
    match path {
        Some(path) if !path.exists() => Err(miette!("settings file {} not found", path)),
        Some(path) => Settings::load(path).into_diagnostic(),
        None => Settings::load(Utf8Path::new(SETTINGS_FILE)).into_diagnostic(),
    }
}

fn polling_config(run: &RunArgs, settings: &Settings) -> PollingConfig {
    let defaults = PollingConfig::default();
    PollingConfig {
        poll_interval: run
            .poll_interval
            .or(settings.poll_interval_secs)
            .map(Duration::from_secs)
            .unwrap_or(defaults.poll_interval),
        timeout: run
            .timeout
            .or(settings.timeout_secs)
            .map(Duration::from_secs),
        ..defaults
    }
}

fn build_descriptor(run: &RunArgs, settings: &Settings) -> Result<JobDescriptor> {
    let name = run.job_name.as_deref().unwrap_or(DEFAULT_JOB_NAME);
    let base = run
        .workdir
        .clone()
        .unwrap_or_else(|| Utf8PathBuf::from("."));
    let (default_stdout, default_stderr) = default_log_paths(&base, name);

    let mut descriptor = JobDescriptor::new(
        run.command.iter().cloned(),
        run.stdout.clone().unwrap_or(default_stdout),
        run.stderr.clone().unwrap_or(default_stderr),
    )
    .into_diagnostic()?;

    if let Some(queue) = run.queue.as_ref().or(settings.queue.as_ref()) {
        descriptor = descriptor.with_queue(queue.clone());
    }
    if let Some(job_name) = &run.job_name {
        descriptor = descriptor.with_job_name(job_name.clone());
    }
    if let Some(workdir) = &run.workdir {
        descriptor = descriptor.with_workdir(workdir.clone());
    }
    Ok(descriptor)
}

fn backend_kind(requested: Option<BackendKind>, settings: &Settings) -> BackendKind {
    requested.or(settings.backend).unwrap_or_default()
}

async fn run_command(run: RunArgs, settings: &Settings) -> Result<()> {
    let kind = backend_kind(run.backend, settings);
    let descriptor = build_descriptor(&run, settings)?;
    let config = polling_config(&run, settings);
    let mut process = Backend::new(kind, settings);

    let interrupted = listen_for_interrupts();
    let second_interrupt = interrupted.clone();

    // First ctrl-c kills the job, a second one stops waiting for it
    let outcome = tokio::select! {
        outcome = run_job(&mut process, &descriptor, &config, interrupts(interrupted, 1)) => {
            outcome.into_diagnostic()?
        }
        _ = interrupts(second_interrupt, 2) => {
            return Err(miette!("interrupted again, stopped waiting for the killed job"));
        }
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&outcome).into_diagnostic()?
    );

    if outcome.status.is_success() {
        Ok(())
    } else {
        Err(miette!(
            "job {} on {} finished as {}",
            outcome
                .handle
                .as_ref()
                .map(|h| h.as_str())
                .unwrap_or("<none>"),
            outcome.backend,
            outcome.status
        ))
    }
}

/// Count ctrl-c presses for the rest of the process lifetime.
fn listen_for_interrupts() -> watch::Receiver<u32> {
    let (tx, rx) = watch::channel(0u32);
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            tx.send_modify(|count| *count += 1);
        }
        tracing::warn!("could not listen for ctrl-c");
    });
    rx
}

/// Resolve once `count` interrupts were seen. Never resolves if the
/// listener went away first.
async fn interrupts(mut interrupted: watch::Receiver<u32>, count: u32) {
    if interrupted.wait_for(|seen| *seen >= count).await.is_err() {
        std::future::pending::<()>().await;
    }
}

fn attach(args: HandleArgs, settings: &Settings) -> Result<Backend> {
    let kind = backend_kind(args.backend, settings);
    Backend::attach(kind, settings, BatchJobHandle::new(args.handle))
        .ok_or_else(|| miette!("{:?} jobs cannot be re-attached", kind))
}

async fn status_command(args: HandleArgs, settings: &Settings) -> Result<()> {
    let mut process = attach(args, settings)?;
    let status = process.get_job_status().await.into_diagnostic()?;

    let report = serde_json::json!({
        "backend": process.name(),
        "handle": process.handle(),
        "status": status,
    });
    println!("{}", report);
    Ok(())
}

async fn kill_command(args: HandleArgs, settings: &Settings) -> Result<()> {
    let mut process = attach(args, settings)?;
    process.kill_job().await.into_diagnostic()?;
    tracing::info!(backend = process.name(), handle = ?process.handle(), "kill requested");
    Ok(())
}
