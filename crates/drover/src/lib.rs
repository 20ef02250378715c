//! Drover driver library: backend dispatch, job polling and logging setup.

pub mod backend;
pub mod logging;
pub mod polling;

pub use backend::Backend;
pub use polling::{JobOutcome, KillReason, PollingConfig, run_job, run_jobs};
