//! Query one LSF job's state via `bjobs -json`.

use crate::types::LsfJobState;
use drover_core::JobStatus;
use serde::Deserialize;

/// Top-level object printed by `bjobs -json`.
#[derive(Debug, Deserialize)]
struct BjobsResponse {
    #[serde(rename = "RECORDS", default)]
    records: Vec<BjobsRecord>,
}

/// One job record. Unknown jobs come back with an `ERROR` field and no `STAT`.
#[derive(Debug, Deserialize)]
struct BjobsRecord {
    #[serde(rename = "STAT")]
    stat: Option<String>,
}

/// Arguments for a single-field status query of `job_id`.
pub fn build_bjobs_args(job_id: &str) -> Vec<String> {
    vec![
        "-json".to_string(),
        "-o".to_string(),
        "stat".to_string(),
        job_id.to_string(),
    ]
}

/// Read the first record's `STAT` field.
///
/// Returns None when the body is not JSON, has no records, or the first
/// record carries no status.
pub fn parse_bjobs_json(body: &str) -> Option<LsfJobState> {
    let response: BjobsResponse = serde_json::from_str(body).ok()?;
    let record = response.records.into_iter().next()?;
    let stat = record.stat.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
    Some(LsfJobState::parse(stat))
}

/// Map a `bjobs -json` body onto a job status.
///
/// A missing record or status field means LSF no longer knows the job;
/// that is reported as `Aborted` so the driver stops polling.
pub fn status_from_bjobs(job_id: &str, body: &str) -> JobStatus {
    match parse_bjobs_json(body) {
        Some(state) => {
            tracing::debug!(job_id, ?state, "bjobs state");
            state.to_job_status()
        }
        None => {
            tracing::warn!(
                job_id,
                body = body.trim(),
                "bjobs returned no status, treating job as aborted"
            );
            JobStatus::Aborted
        }
    }
}
