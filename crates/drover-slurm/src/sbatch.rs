//! Build sbatch command lines and parse `--parsable` output.

use drover_core::{BatchJobHandle, JobDescriptor};
use drover_parsers::shell_join;

/// Arguments passed to sbatch (without the executable itself).
///
/// The job's argv is handed over with `--wrap`, so no batch script is written.
pub fn build_sbatch_args(descriptor: &JobDescriptor) -> Vec<String> {
    let mut args = vec!["--parsable".to_string(), "--export=ALL".to_string()];

    if let Some(partition) = descriptor.queue() {
        args.push("-p".to_string());
        args.push(partition.to_string());
    }

    if let Some(name) = descriptor.job_name() {
        args.push("-J".to_string());
        args.push(name.to_string());
    }

    if let Some(dir) = descriptor.workdir() {
        args.push("-D".to_string());
        args.push(dir.to_string());
    }

    args.push("-o".to_string());
    args.push(descriptor.stdout_log().to_string());
    args.push("-e".to_string());
    args.push(descriptor.stderr_log().to_string());

    args.push("--wrap".to_string());
    args.push(shell_join(descriptor.args()));
    args
}

/// Extract the job id from `sbatch --parsable` output.
///
/// The id is the part before an optional `;cluster` suffix. Lines that do
/// not start with a numeric id (warnings, banners) are skipped.
pub fn parse_sbatch_output(output: &str) -> Option<BatchJobHandle> {
    output.lines().find_map(|line| {
        let id = line.trim().split(';').next()?.trim();
        if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
            Some(BatchJobHandle::new(id))
        } else {
            None
        }
    })
}
