//! Local backend for drover.
//!
//! Runs the job as a child process of the driver, with stdout and stderr
//! appended to the descriptor's log files. Useful on a workstation and for
//! exercising a driver without a cluster.

use camino::Utf8Path;
use drover_core::{BatchError, BatchJobHandle, BatchProcess, BatchResult, JobDescriptor, JobStatus};
use std::fs::{File, OpenOptions};
use std::process::{ExitStatus, Stdio};
use tokio::process::{Child, Command};

const BACKEND: &str = "local";

/// Adapter for a job running as a local child process.
#[derive(Debug, Default)]
pub struct LocalProcess {
    child: Option<Child>,
    handle: Option<BatchJobHandle>,
    finished: Option<JobStatus>,
}

impl LocalProcess {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exit status mapping: only a clean zero exit counts as success.
    fn status_from_exit(exit: ExitStatus) -> JobStatus {
        if exit.success() {
            JobStatus::Successful
        } else {
            JobStatus::Aborted
        }
    }

    /// Reap the child if it has exited, caching the terminal status.
    fn poll_child(&mut self) -> BatchResult<Option<JobStatus>> {
        if let Some(status) = self.finished {
            return Ok(Some(status));
        }

        let Some(child) = self.child.as_mut() else {
            return Ok(None);
        };

        match child.try_wait()? {
            Some(exit) => {
                let status = Self::status_from_exit(exit);
                tracing::info!(pid = ?self.handle, ?exit, %status, "local job finished");
                self.finished = Some(status);
                Ok(Some(status))
            }
            None => Ok(None),
        }
    }
}

fn open_log(path: &Utf8Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

impl BatchProcess for LocalProcess {
    fn name(&self) -> &'static str {
        BACKEND
    }

    fn handle(&self) -> Option<&BatchJobHandle> {
        self.handle.as_ref()
    }

    async fn start_job(&mut self, descriptor: &JobDescriptor) -> BatchResult<()> {
        if let Some(handle) = &self.handle {
            return Err(BatchError::AlreadySubmitted {
                backend: BACKEND,
                handle: handle.to_string(),
            });
        }

        descriptor.create_log_dirs()?;
        let stdout = open_log(descriptor.stdout_log())?;
        let stderr = open_log(descriptor.stderr_log())?;

        let mut cmd = Command::new(descriptor.program());
        cmd.args(&descriptor.args()[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .kill_on_drop(true);
        if let Some(dir) = descriptor.workdir() {
            cmd.current_dir(dir);
        }

        let child = cmd.spawn().map_err(|e| BatchError::Submission {
            backend: BACKEND,
            output: format!("failed to spawn {}: {}", descriptor.program(), e),
        })?;

        let pid = child.id().ok_or_else(|| BatchError::Submission {
            backend: BACKEND,
            output: format!("{} exited before its pid was read", descriptor.program()),
        })?;

        let handle = BatchJobHandle::new(pid.to_string());
        tracing::info!(pid, program = descriptor.program(), "started local job");
        self.handle = Some(handle);
        self.child = Some(child);
        Ok(())
    }

    async fn get_job_status(&mut self) -> BatchResult<JobStatus> {
        if self.handle.is_none() {
            return Err(BatchError::NotSubmitted { backend: BACKEND });
        }

        Ok(self.poll_child()?.unwrap_or(JobStatus::Running))
    }

    async fn kill_job(&mut self) -> BatchResult<()> {
        if self.poll_child()?.is_some() {
            return Ok(());
        }

        let Some(child) = self.child.as_mut() else {
            return Ok(());
        };

        tracing::warn!(pid = ?self.handle, "killing local job");
        child.start_kill().map_err(|e| BatchError::Cancellation {
            backend: BACKEND,
            message: e.to_string(),
        })
    }
}
