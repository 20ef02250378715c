//! SLURM job types.

use drover_core::JobStatus;

/// SLURM job state as reported by sacct or squeue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlurmJobState {
    Pending,
    Running,
    /// Suspended, requeued, resizing or otherwise paused
    Held,
    Completing,
    Completed,
    Failed,
    Cancelled,
    Timeout,
    OutOfMemory,
    NodeFailure,
    Preempted,
    Unknown(String),
}

impl SlurmJobState {
    /// Parse a state token.
    ///
    /// sacct states can carry suffixes like "CANCELLED by 12345", and squeue
    /// may print the compact two-letter codes.
    pub fn parse(s: &str) -> Self {
        let base_state = s.split_whitespace().next().unwrap_or(s);
        let base_state = base_state.trim_end_matches('+');

        match base_state.to_uppercase().as_str() {
            "PENDING" | "PD" => Self::Pending,
            "RUNNING" | "R" => Self::Running,
            "SUSPENDED" | "S" | "REQUEUED" | "RQ" | "REQUEUE_HOLD" | "REQUEUE_FED"
            | "RESIZING" | "RS" | "STOPPED" | "ST" => Self::Held,
            "COMPLETING" | "CG" => Self::Completing,
            "COMPLETED" | "CD" => Self::Completed,
            "FAILED" | "F" | "BOOT_FAIL" | "BF" | "DEADLINE" | "DL" => Self::Failed,
            "CANCELLED" | "CA" => Self::Cancelled,
            "TIMEOUT" | "TO" => Self::Timeout,
            "OUT_OF_MEMORY" | "OOM" => Self::OutOfMemory,
            "NODE_FAIL" | "NF" => Self::NodeFailure,
            "PREEMPTED" | "PR" => Self::Preempted,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Collapse onto the driver's three states.
    pub fn to_job_status(&self) -> JobStatus {
        match self {
            Self::Completed => JobStatus::Successful,
            Self::Failed
            | Self::Cancelled
            | Self::Timeout
            | Self::OutOfMemory
            | Self::NodeFailure
            | Self::Preempted => JobStatus::Aborted,
            Self::Pending
            | Self::Running
            | Self::Held
            | Self::Completing
            | Self::Unknown(_) => JobStatus::Running,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_state() {
        assert_eq!(SlurmJobState::parse("PENDING"), SlurmJobState::Pending);
        assert_eq!(SlurmJobState::parse("R"), SlurmJobState::Running);
        assert_eq!(SlurmJobState::parse("COMPLETED"), SlurmJobState::Completed);
        assert_eq!(
            SlurmJobState::parse("CANCELLED by 12345"),
            SlurmJobState::Cancelled
        );
        assert_eq!(SlurmJobState::parse("CANCELLED+"), SlurmJobState::Cancelled);
        assert_eq!(SlurmJobState::parse("OUT_OF_MEMORY"), SlurmJobState::OutOfMemory);
        assert_eq!(
            SlurmJobState::parse("SPECIAL_EXIT"),
            SlurmJobState::Unknown("SPECIAL_EXIT".to_string())
        );
    }

    #[test]
    fn test_to_job_status() {
        assert_eq!(
            SlurmJobState::Completed.to_job_status(),
            JobStatus::Successful
        );
        for state in [
            "FAILED",
            "CANCELLED",
            "TIMEOUT",
            "OUT_OF_MEMORY",
            "NODE_FAIL",
            "BOOT_FAIL",
            "DEADLINE",
            "PREEMPTED",
        ] {
            assert_eq!(
                SlurmJobState::parse(state).to_job_status(),
                JobStatus::Aborted,
                "{}",
                state
            );
        }
        for state in ["PENDING", "RUNNING", "SUSPENDED", "COMPLETING", "REQUEUED"] {
            assert_eq!(
                SlurmJobState::parse(state).to_job_status(),
                JobStatus::Running,
                "{}",
                state
            );
        }
    }
}
