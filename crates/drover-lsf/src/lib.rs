//! LSF integration for drover.
//!
//! Submit jobs via bsub, poll them via bjobs, cancel via bkill.

pub mod bjobs;
pub mod bsub;
pub mod process;
pub mod types;

pub use bjobs::{build_bjobs_args, parse_bjobs_json, status_from_bjobs};
pub use bsub::{build_bsub_args, parse_bsub_output};
pub use process::{LsfConfig, LsfProcess};
pub use types::LsfJobState;
