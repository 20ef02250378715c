//! The contract every batch backend adapter implements.

use crate::descriptor::JobDescriptor;
use crate::error::BatchResult;
use crate::status::JobStatus;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;

/// Identifier the backend assigned to a submitted job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchJobHandle(String);

impl BatchJobHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BatchJobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for BatchJobHandle {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for BatchJobHandle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Submit, poll and cancel one job on an external batch system.
///
/// An instance owns at most one job. `start_job` stores the backend
/// handle; `get_job_status` fails with
/// [`BatchError::NotSubmitted`](crate::BatchError::NotSubmitted) until it
/// has one, while `kill_job` quietly does nothing.
///
/// A status record that lacks the status field maps to
/// [`JobStatus::Aborted`] instead of an error, so the driver stops polling
/// a job whose record vanished.
pub trait BatchProcess: Send {
    /// Short backend name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Handle of the submitted job, if any.
    fn handle(&self) -> Option<&BatchJobHandle>;

    /// Submit the job described by `descriptor` and remember its handle.
    fn start_job(
        &mut self,
        descriptor: &JobDescriptor,
    ) -> impl Future<Output = BatchResult<()>> + Send;

    /// Ask the backend where the job is.
    fn get_job_status(&mut self) -> impl Future<Output = BatchResult<JobStatus>> + Send;

    /// Request cancellation. No-op before submission.
    fn kill_job(&mut self) -> impl Future<Output = BatchResult<()>> + Send;
}
