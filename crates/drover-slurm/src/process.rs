//! One SLURM job driven through sbatch, sacct/squeue and scancel.

use crate::sacct::{build_sacct_args, build_squeue_args, parse_state_output};
use crate::sbatch::{build_sbatch_args, parse_sbatch_output};
use crate::types::SlurmJobState;
use drover_core::{BatchError, BatchJobHandle, BatchProcess, BatchResult, JobDescriptor, JobStatus};
use drover_parsers::{CommandError, capture_command, run_command_allow_failure, run_command_quiet};
use serde::Deserialize;
use tokio::process::Command;

const BACKEND: &str = "slurm";

/// Locations of the SLURM command line tools.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SlurmConfig {
    pub sbatch: String,
    pub sacct: String,
    pub squeue: String,
    pub scancel: String,
}

impl Default for SlurmConfig {
    fn default() -> Self {
        Self {
            sbatch: "sbatch".to_string(),
            sacct: "sacct".to_string(),
            squeue: "squeue".to_string(),
            scancel: "scancel".to_string(),
        }
    }
}

/// Adapter for a single SLURM job.
#[derive(Debug, Clone, Default)]
pub struct SlurmProcess {
    config: SlurmConfig,
    handle: Option<BatchJobHandle>,
}

impl SlurmProcess {
    pub fn new(config: SlurmConfig) -> Self {
        Self {
            config,
            handle: None,
        }
    }

    /// Adopt a job that was submitted earlier.
    pub fn attach(config: SlurmConfig, handle: BatchJobHandle) -> Self {
        Self {
            config,
            handle: Some(handle),
        }
    }

    /// Run one state query tool; the body decides, not the exit code.
    async fn query_state(&self, program: &str, args: Vec<String>) -> BatchResult<Option<SlurmJobState>> {
        let mut cmd = Command::new(program);
        cmd.args(args);

        let body = run_command_allow_failure(&mut cmd, program)
            .await
            .map_err(|e| BatchError::StatusQuery {
                backend: BACKEND,
                message: e.to_string(),
            })?;

        Ok(parse_state_output(&body))
    }
}

/// scancel complains like this about jobs that already ended.
fn is_already_finished(stderr: &str) -> bool {
    stderr.contains("already completing or completed") || stderr.contains("Invalid job id")
}

impl BatchProcess for SlurmProcess {
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

        let mut cmd = Command::new(&self.config.sbatch);
        cmd.args(build_sbatch_args(descriptor));

        let output = capture_command(&mut cmd, "sbatch")
            .await
            .map_err(|e| BatchError::Submission {
                backend: BACKEND,
                output: e.to_string(),
            })?;

        if !output.success {
            return Err(BatchError::Submission {
                backend: BACKEND,
                output: output.combined(),
            });
        }

        let handle = parse_sbatch_output(&output.stdout).ok_or_else(|| BatchError::Submission {
            backend: BACKEND,
            output: output.combined().trim().to_string(),
        })?;

        tracing::info!(job_id = %handle, partition = ?descriptor.queue(), "submitted SLURM job");
        self.handle = Some(handle);
        Ok(())
    }

    async fn get_job_status(&mut self) -> BatchResult<JobStatus> {
        let handle = self
            .handle
            .as_ref()
            .ok_or(BatchError::NotSubmitted { backend: BACKEND })?;

        let mut state = self
            .query_state(&self.config.sacct, build_sacct_args(handle.as_str()))
            .await?;

        // Freshly submitted jobs can take a moment to reach the accounting database
        if state.is_none() {
            state = self
                .query_state(&self.config.squeue, build_squeue_args(handle.as_str()))
                .await?;
        }

        match state {
            Some(state) => {
                tracing::debug!(job_id = %handle, ?state, "SLURM state");
                Ok(state.to_job_status())
            }
            None => {
                tracing::warn!(job_id = %handle, "no SLURM record for job, treating as aborted");
                Ok(JobStatus::Aborted)
            }
        }
    }

    async fn kill_job(&mut self) -> BatchResult<()> {
        let Some(handle) = &self.handle else {
            return Ok(());
        };

        tracing::warn!(job_id = %handle, "cancelling SLURM job");

        let mut cmd = Command::new(&self.config.scancel);
        cmd.arg(handle.as_str());

        match run_command_quiet(&mut cmd, "scancel").await {
            Ok(()) => Ok(()),
            Err(CommandError::Failed { stderr, .. }) if is_already_finished(&stderr) => {
                tracing::debug!(job_id = %handle, "SLURM job already finished");
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
    fn test_partial_config_keeps_defaults() {
        let config: SlurmConfig = serde_json::from_str(r#"{"sacct": "/usr/local/bin/sacct"}"#).unwrap();
        assert_eq!(config.sacct, "/usr/local/bin/sacct");
        assert_eq!(config.sbatch, "sbatch");
        assert_eq!(config.scancel, "scancel");
    }

    #[test]
    fn test_is_already_finished() {
        assert!(is_already_finished(
            "scancel: error: Kill job error on job id 42: Job/step already completing or completed"
        ));
        assert!(is_already_finished(
            "scancel: error: Kill job error on job id 42: Invalid job id specified"
        ));
        assert!(!is_already_finished("scancel: error: Access/permission denied"));
    }

    #[tokio::test]
    async fn test_status_before_submit_fails() {
        let mut process = SlurmProcess::default();
        let err = process.get_job_status().await.unwrap_err();
        assert!(matches!(err, BatchError::NotSubmitted { backend: "slurm" }));
    }

    #[tokio::test]
    async fn test_kill_before_submit_is_noop() {
        let mut process = SlurmProcess::default();
        assert!(process.kill_job().await.is_ok());
    }
}
