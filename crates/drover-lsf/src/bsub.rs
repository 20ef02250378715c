//! Build bsub command lines and read the job id back out of its output.

use drover_core::{BatchJobHandle, JobDescriptor};
use once_cell::sync::Lazy;
use regex::Regex;

/// bsub confirms with e.g. `Job <72065926> is submitted to default queue <s>.`
static JOB_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<([0-9]+)>").unwrap());

/// Arguments passed to bsub (without the executable itself).
///
/// Layout: `-env all [-q QUEUE] [-J NAME] -eo STDERR -oo STDOUT CMD...`
pub fn build_bsub_args(descriptor: &JobDescriptor) -> Vec<String> {
    let mut args = vec!["-env".to_string(), "all".to_string()];

    if let Some(queue) = descriptor.queue() {
        args.push("-q".to_string());
        args.push(queue.to_string());
    }

    if let Some(name) = descriptor.job_name() {
        args.push("-J".to_string());
        args.push(name.to_string());
    }

    args.push("-eo".to_string());
    args.push(descriptor.stderr_log().to_string());
    args.push("-oo".to_string());
    args.push(descriptor.stdout_log().to_string());

    args.extend(descriptor.args().iter().cloned());
    args
}

/// Extract the job id from bsub output.
///
/// bsub may exit 0 while printing a rejection, so the bracketed id is the
/// only accepted proof of submission. The first bracketed integer wins;
/// non-numeric brackets such as the queue name are skipped.
pub fn parse_bsub_output(output: &str) -> Option<BatchJobHandle> {
    JOB_ID_RE
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| BatchJobHandle::new(m.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> JobDescriptor {
        JobDescriptor::new(
            ["basf2", "steering.py", "-n", "10"],
            "logs/job.out",
            "logs/job.err",
        )
        .unwrap()
    }

    #[test]
    fn test_bsub_args_without_queue() {
        let args = build_bsub_args(&descriptor());
        assert_eq!(
            args,
            [
                "-env",
                "all",
                "-eo",
                "logs/job.err",
                "-oo",
                "logs/job.out",
                "basf2",
                "steering.py",
                "-n",
                "10"
            ]
        );
        assert!(!args.iter().any(|a| a == "-q"));
    }

    #[test]
    fn test_bsub_args_with_queue() {
        let args = build_bsub_args(&descriptor().with_queue("l"));
        let q = args.iter().position(|a| a == "-q").unwrap();
        let eo = args.iter().position(|a| a == "-eo").unwrap();
        assert_eq!(args[q + 1], "l");
        assert!(q > 1 && q < eo);
        assert_eq!(&args[args.len() - 4..], ["basf2", "steering.py", "-n", "10"]);
    }

    #[test]
    fn test_bsub_args_with_job_name() {
        let args = build_bsub_args(&descriptor().with_queue("s").with_job_name("stage_1"));
        assert_eq!(
            &args[..8],
            ["-env", "all", "-q", "s", "-J", "stage_1", "-eo", "logs/job.err"]
        );
    }

    #[test]
    fn test_parse_bsub_output() {
        let handle =
            parse_bsub_output("Job <72065926> is submitted to default queue <s>.\n").unwrap();
        assert_eq!(handle.as_str(), "72065926");
    }

    #[test]
    fn test_parse_bsub_output_skips_queue_brackets() {
        let handle = parse_bsub_output("Job <123> is submitted to queue <long>.").unwrap();
        assert_eq!(handle.as_str(), "123");
    }

    #[test]
    fn test_parse_bsub_output_rejection() {
        assert!(parse_bsub_output("Bad resource requirement syntax. Job not submitted.").is_none());
        assert!(parse_bsub_output("").is_none());
        assert!(parse_bsub_output("Queue <long> is not available").is_none());
    }
}
