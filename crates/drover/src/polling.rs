//! Drive batch jobs from submission to a terminal status.

use chrono::{DateTime, Utc};
use drover_core::{BatchJobHandle, BatchProcess, BatchResult, JobDescriptor, JobStatus};
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time::{Instant, MissedTickBehavior, interval};

/// Shortest interval between status queries.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Configuration for the polling driver.
#[derive(Debug, Clone)]
pub struct PollingConfig {
    /// Interval between status queries, never shorter than [`MIN_POLL_INTERVAL`].
    pub poll_interval: Duration,
    /// Kill the job once it has been running this long.
    pub timeout: Option<Duration>,
    /// How long to keep polling after a kill before giving up on the job.
    pub kill_grace: Duration,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            timeout: None,
            kill_grace: Duration::from_secs(60),
        }
    }
}

/// Why the driver asked the backend to kill a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KillReason {
    Timeout,
    Cancelled,
}

/// Result of driving one job to a terminal status.
#[derive(Debug, Clone, Serialize)]
pub struct JobOutcome {
    pub backend: &'static str,
    pub handle: Option<BatchJobHandle>,
    pub status: JobStatus,
    pub submitted_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub polls: u32,
    pub killed: Option<KillReason>,
}

/// Submit `descriptor` through `process` and poll until the job is terminal.
///
/// When `cancel` resolves or the timeout passes, the job is killed and
/// polling continues for `kill_grace`. A job that still has not reached a
/// terminal status by then is reported as aborted.
pub async fn run_job<P, C>(
    process: &mut P,
    descriptor: &JobDescriptor,
    config: &PollingConfig,
    cancel: C,
) -> BatchResult<JobOutcome>
where
    P: BatchProcess,
    C: Future<Output = ()>,
{
    process.start_job(descriptor).await?;
    let submitted_at = Utc::now();
    let started = Instant::now();

    let mut ticker = interval(config.poll_interval.max(MIN_POLL_INTERVAL));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // Skip the first tick (fires immediately)
    ticker.tick().await;

    tokio::pin!(cancel);

    let mut status = JobStatus::Running;
    let mut polls = 0u32;
    let mut killed: Option<KillReason> = None;
    let mut give_up_at: Option<Instant> = None;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut cancel, if killed.is_none() => {
                tracing::info!(backend = process.name(), handle = ?process.handle(), "cancel requested");
                process.kill_job().await?;
                killed = Some(KillReason::Cancelled);
                give_up_at = Some(Instant::now() + config.kill_grace);
                continue;
            }
        }

        polls += 1;
        status = status.transition(process.get_job_status().await?);
        tracing::debug!(backend = process.name(), handle = ?process.handle(), %status, polls, "polled job");

        if status.is_terminal() {
            break;
        }

        if killed.is_none() && config.timeout.is_some_and(|t| started.elapsed() >= t) {
            tracing::warn!(backend = process.name(), handle = ?process.handle(), "job timed out");
            process.kill_job().await?;
            killed = Some(KillReason::Timeout);
            give_up_at = Some(Instant::now() + config.kill_grace);
        }

        if give_up_at.is_some_and(|deadline| Instant::now() >= deadline) {
            tracing::warn!(
                backend = process.name(),
                handle = ?process.handle(),
                "job still not finished after kill, reporting it as aborted"
            );
            status = JobStatus::Aborted;
            break;
        }
    }

    tracing::info!(backend = process.name(), handle = ?process.handle(), %status, "job finished");

    Ok(JobOutcome {
        backend: process.name(),
        handle: process.handle().cloned(),
        status,
        submitted_at,
        finished_at: Utc::now(),
        polls,
        killed,
    })
}

/// Wait until the shutdown flag turns true. A dropped sender never cancels.
async fn wait_for_shutdown(mut shutdown: watch::Receiver<bool>) {
    if shutdown.wait_for(|stop| *stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Run several jobs concurrently, one task per job.
///
/// Outcomes are returned in the order the jobs were given. Setting the
/// `shutdown` flag kills every job still in flight.
pub async fn run_jobs<P>(
    jobs: Vec<(P, JobDescriptor)>,
    config: PollingConfig,
    shutdown: watch::Receiver<bool>,
) -> Vec<BatchResult<JobOutcome>>
where
    P: BatchProcess + 'static,
{
    let mut set = JoinSet::new();

    for (index, (mut process, descriptor)) in jobs.into_iter().enumerate() {
        let config = config.clone();
        let shutdown = shutdown.clone();
        set.spawn(async move {
            let outcome =
                run_job(&mut process, &descriptor, &config, wait_for_shutdown(shutdown)).await;
            (index, outcome)
        });
    }

    let mut results = set.join_all().await;
    results.sort_by_key(|(index, _)| *index);
    results.into_iter().map(|(_, outcome)| outcome).collect()
}
