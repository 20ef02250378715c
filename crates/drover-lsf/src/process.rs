//! One LSF job driven through bsub, bjobs and bkill.

use crate::bjobs::{build_bjobs_args, status_from_bjobs};
use crate::bsub::{build_bsub_args, parse_bsub_output};
use drover_core::{BatchError, BatchJobHandle, BatchProcess, BatchResult, JobDescriptor, JobStatus};
use drover_parsers::{CommandError, capture_command, run_command_allow_failure, run_command_quiet};
use serde::Deserialize;
use tokio::process::Command;

const BACKEND: &str = "lsf";

/// Locations of the LSF command line tools.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LsfConfig {
    pub bsub: String,
    pub bjobs: String,
    pub bkill: String,
}

impl Default for LsfConfig {
    fn default() -> Self {
        Self {
            bsub: "bsub".to_string(),
            bjobs: "bjobs".to_string(),
            bkill: "bkill".to_string(),
        }
    }
}

/// Adapter for a single LSF job.
#[derive(Debug, Clone, Default)]
pub struct LsfProcess {
    config: LsfConfig,
    handle: Option<BatchJobHandle>,
}

impl LsfProcess {
    pub fn new(config: LsfConfig) -> Self {
        Self {
            config,
            handle: None,
        }
    }

    /// Adopt a job that was submitted earlier, e.g. by another drover run.
    pub fn attach(config: LsfConfig, handle: BatchJobHandle) -> Self {
        Self {
            config,
            handle: Some(handle),
        }
    }
}

/// bkill reports these when the job is gone already; killing it again is not a failure.
fn is_already_finished(stderr: &str) -> bool {
    stderr.contains("already finished") || stderr.contains("No matching job")
}

impl BatchProcess for LsfProcess {
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

        let mut cmd = Command::new(&self.config.bsub);
        cmd.args(build_bsub_args(descriptor));
        if let Some(dir) = descriptor.workdir() {
            cmd.current_dir(dir);
        }

        let output = capture_command(&mut cmd, "bsub")
            .await
            .map_err(|e| BatchError::Submission {
                backend: BACKEND,
                output: e.to_string(),
            })?;
        let text = output.combined();

        if !output.success {
            return Err(BatchError::Submission {
                backend: BACKEND,
                output: text,
            });
        }

        let handle = parse_bsub_output(&text).ok_or_else(|| BatchError::Submission {
            backend: BACKEND,
            output: text.trim().to_string(),
        })?;

        tracing::info!(job_id = %handle, queue = ?descriptor.queue(), "submitted LSF job");
        self.handle = Some(handle);
        Ok(())
    }

    async fn get_job_status(&mut self) -> BatchResult<JobStatus> {
        let handle = self
            .handle
            .as_ref()
            .ok_or(BatchError::NotSubmitted { backend: BACKEND })?;

        let mut cmd = Command::new(&self.config.bjobs);
        cmd.args(build_bjobs_args(handle.as_str()));

        // bjobs exits non-zero for purged jobs but still prints a JSON body
        let body = run_command_allow_failure(&mut cmd, "bjobs")
            .await
            .map_err(|e| BatchError::StatusQuery {
                backend: BACKEND,
                message: e.to_string(),
            })?;

        Ok(status_from_bjobs(handle.as_str(), &body))
    }

    async fn kill_job(&mut self) -> BatchResult<()> {
        let Some(handle) = &self.handle else {
            return Ok(());
        };

        tracing::warn!(job_id = %handle, "killing LSF job");

        let mut cmd = Command::new(&self.config.bkill);
        cmd.arg(handle.as_str());

        match run_command_quiet(&mut cmd, "bkill").await {
            Ok(()) => Ok(()),
            Err(CommandError::Failed { stderr, .. }) if is_already_finished(&stderr) => {
                tracing::debug!(job_id = %handle, "LSF job already finished");
                Ok(())
            }
            Err(e) => Err(BatchError::Cancellation {
                backend: BACKEND,
                message: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LsfConfig::default();
        assert_eq!(config.bsub, "bsub");
        assert_eq!(config.bjobs, "bjobs");
        assert_eq!(config.bkill, "bkill");
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: LsfConfig = serde_json::from_str(r#"{"bsub": "/opt/lsf/bin/bsub"}"#).unwrap();
        assert_eq!(config.bsub, "/opt/lsf/bin/bsub");
        assert_eq!(config.bkill, "bkill");
    }

    #[test]
    fn test_is_already_finished() {
        assert!(is_already_finished("Job <42>: Job has already finished"));
        assert!(is_already_finished("Job <42>: No matching job found"));
        assert!(!is_already_finished("Job <42>: Permission denied"));
    }

    #[tokio::test]
    async fn test_status_before_submit_fails() {
        let mut process = LsfProcess::default();
        let err = process.get_job_status().await.unwrap_err();
        assert!(matches!(err, BatchError::NotSubmitted { backend: "lsf" }));
    }

    #[tokio::test]
    async fn test_kill_before_submit_is_noop() {
        let mut process = LsfProcess::new(LsfConfig {
            bkill: "nonexistent_bkill_12345".to_string(),
            ..LsfConfig::default()
        });
        assert!(process.kill_job().await.is_ok());
        assert!(process.handle().is_none());
    }

    #[test]
    fn test_attach_sets_handle() {
        let process = LsfProcess::attach(LsfConfig::default(), BatchJobHandle::new("99"));
        assert_eq!(process.handle().map(|h| h.as_str()), Some("99"));
        assert_eq!(process.name(), "lsf");
    }
}
