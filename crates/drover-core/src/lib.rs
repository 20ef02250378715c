//! Core batch job model for drover.
//!
//! Defines the job status state machine, the job descriptor handed to
//! adapters, and the [`BatchProcess`] contract every backend implements.

pub mod descriptor;
pub mod error;
pub mod process;
pub mod status;

pub use descriptor::{DEFAULT_LOG_DIR, JobDescriptor, default_log_paths};
pub use error::{BatchError, BatchResult};
pub use process::{BatchJobHandle, BatchProcess};
pub use status::JobStatus;
