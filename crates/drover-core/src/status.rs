//! Job lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of one submitted batch job, as seen by a driver.
///
/// There is no separate pending state: a queued, running or suspended job
/// is `Running` until the backend reports it finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Queued or executing
    Running,
    /// Finished successfully
    Successful,
    /// Failed, killed, or its record disappeared
    Aborted,
}

impl JobStatus {
    /// Terminal states end polling.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Successful | Self::Aborted)
    }

    pub fn is_success(self) -> bool {
        self == Self::Successful
    }

    /// Apply a newly observed status.
    ///
    /// Terminal states are absorbing: once a job is `Successful` or
    /// `Aborted`, later observations do not move it.
    pub fn transition(self, observed: JobStatus) -> JobStatus {
        if self.is_terminal() { self } else { observed }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Successful => "successful",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
