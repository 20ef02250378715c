//! Query one SLURM job's state via sacct, falling back to squeue.

use crate::types::SlurmJobState;

/// Arguments for a single-job sacct state query.
///
/// `-X` drops job steps so the allocation's own state comes first.
pub fn build_sacct_args(job_id: &str) -> Vec<String> {
    vec![
        "-j".to_string(),
        job_id.to_string(),
        "-X".to_string(),
        "--noheader".to_string(),
        "--parsable2".to_string(),
        "--format".to_string(),
        "State".to_string(),
    ]
}

/// Arguments for a single-job squeue state query.
pub fn build_squeue_args(job_id: &str) -> Vec<String> {
    vec![
        "-h".to_string(),
        "-j".to_string(),
        job_id.to_string(),
        "-o".to_string(),
        "%T".to_string(),
    ]
}

/// State from the first non-empty line of sacct or squeue output.
pub fn parse_state_output(output: &str) -> Option<SlurmJobState> {
    output
        .lines()
        .map(|line| line.trim().split('|').next().unwrap_or("").trim())
        .find(|field| !field.is_empty())
        .map(SlurmJobState::parse)
}
