//! SLURM integration for drover.
//!
//! Submit jobs via sbatch, poll them via sacct (squeue while accounting
//! catches up), cancel via scancel.

pub mod process;
pub mod sacct;
pub mod sbatch;
pub mod types;

pub use process::{SlurmConfig, SlurmProcess};
pub use sacct::{build_sacct_args, build_squeue_args, parse_state_output};
pub use sbatch::{build_sbatch_args, parse_sbatch_output};
pub use types::SlurmJobState;
