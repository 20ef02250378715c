//! Errors raised by batch adapters.

use thiserror::Error;

/// Errors that can occur while driving a batch job.
#[derive(Error, Debug)]
pub enum BatchError {
    /// Status was requested before the job was submitted.
    #[error("{backend}: job has not been submitted yet")]
    NotSubmitted { backend: &'static str },

    /// The adapter already owns a submitted job.
    #[error("{backend}: job already submitted as {handle}")]
    AlreadySubmitted {
        backend: &'static str,
        handle: String,
    },

    /// A job descriptor needs at least a program to run.
    #[error("job command line is empty")]
    EmptyCommand,

    /// The submit tool did not hand back a job id.
    #[error("{backend}: batch submission failed with output: {output}")]
    Submission {
        backend: &'static str,
        output: String,
    },

    /// The status tool could not be run.
    #[error("{backend}: status query failed: {message}")]
    StatusQuery {
        backend: &'static str,
        message: String,
    },

    /// The kill tool could not be run or reported failure.
    #[error("{backend}: cancellation failed: {message}")]
    Cancellation {
        backend: &'static str,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for adapter operations.
pub type BatchResult<T> = Result<T, BatchError>;
