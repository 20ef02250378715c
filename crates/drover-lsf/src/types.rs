//! LSF job types.

use drover_core::JobStatus;

/// LSF job status as printed in the bjobs `STAT` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LsfJobState {
    /// PEND - Job is pending
    Pending,
    /// RUN - Job is running
    Running,
    /// DONE - Job completed successfully
    Done,
    /// EXIT - Job exited with non-zero status or was killed
    Exit,
    /// PSUSP - Job suspended by user while pending
    UserSuspendedPending,
    /// USUSP - Job suspended by user while running
    UserSuspended,
    /// SSUSP - Job suspended by system
    SystemSuspended,
    /// WAIT - Chunk job member waiting to run
    Waiting,
    /// ZOMBI - Job is zombie (finished but info not available)
    Zombie,
    /// Unknown state
    Unknown(String),
}

impl LsfJobState {
    /// Parse a `STAT` token.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "PEND" => Self::Pending,
            "RUN" => Self::Running,
            "DONE" => Self::Done,
            "EXIT" => Self::Exit,
            "PSUSP" => Self::UserSuspendedPending,
            "USUSP" => Self::UserSuspended,
            "SSUSP" => Self::SystemSuspended,
            "WAIT" => Self::Waiting,
            "ZOMBI" => Self::Zombie,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Collapse onto the driver's three states.
    ///
    /// Only DONE and EXIT are final; everything else keeps the job polling.
    pub fn to_job_status(&self) -> JobStatus {
        match self {
            Self::Done => JobStatus::Successful,
            Self::Exit => JobStatus::Aborted,
            Self::Pending
            | Self::Running
            | Self::UserSuspendedPending
            | Self::UserSuspended
            | Self::SystemSuspended
            | Self::Waiting
            | Self::Zombie
            | Self::Unknown(_) => JobStatus::Running,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_state() {
        assert_eq!(LsfJobState::parse("PEND"), LsfJobState::Pending);
        assert_eq!(LsfJobState::parse("RUN"), LsfJobState::Running);
        assert_eq!(LsfJobState::parse("DONE"), LsfJobState::Done);
        assert_eq!(LsfJobState::parse("EXIT"), LsfJobState::Exit);
        assert_eq!(LsfJobState::parse("SSUSP"), LsfJobState::SystemSuspended);
        assert_eq!(
            LsfJobState::parse("UNKWN"),
            LsfJobState::Unknown("UNKWN".to_string())
        );
    }

    #[test]
    fn test_tokens_match_as_printed() {
        assert_eq!(
            LsfJobState::parse("done"),
            LsfJobState::Unknown("done".to_string())
        );
        assert_eq!(LsfJobState::parse("exit").to_job_status(), JobStatus::Running);
        assert_eq!(LsfJobState::parse(" EXIT\n"), LsfJobState::Exit);
    }

    #[test]
    fn test_to_job_status() {
        assert_eq!(LsfJobState::Done.to_job_status(), JobStatus::Successful);
        assert_eq!(LsfJobState::Exit.to_job_status(), JobStatus::Aborted);
        assert_eq!(LsfJobState::Pending.to_job_status(), JobStatus::Running);
        assert_eq!(LsfJobState::UserSuspended.to_job_status(), JobStatus::Running);
        assert_eq!(LsfJobState::Zombie.to_job_status(), JobStatus::Running);
        assert_eq!(
            LsfJobState::Unknown("UNKWN".to_string()).to_job_status(),
            JobStatus::Running
        );
    }
}
