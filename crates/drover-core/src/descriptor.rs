//! Description of the work a batch job runs.

use crate::error::{BatchError, BatchResult};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;

/// Directory under the working directory that holds default job logs.
pub const DEFAULT_LOG_DIR: &str = "drover-logs";

/// A command line plus where its output goes.
///
/// Built once by the driver and handed to an adapter at submit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobDescriptor {
    args: Vec<String>,
    stdout_log: Utf8PathBuf,
    stderr_log: Utf8PathBuf,
    queue: Option<String>,
    job_name: Option<String>,
    workdir: Option<Utf8PathBuf>,
}

impl JobDescriptor {
    /// Create a descriptor for `args`, which must name at least a program.
    pub fn new<I, S>(
        args: I,
        stdout_log: impl Into<Utf8PathBuf>,
        stderr_log: impl Into<Utf8PathBuf>,
    ) -> BatchResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        if args.is_empty() {
            return Err(BatchError::EmptyCommand);
        }

        Ok(Self {
            args,
            stdout_log: stdout_log.into(),
            stderr_log: stderr_log.into(),
            queue: None,
            job_name: None,
            workdir: None,
        })
    }

    /// Create a descriptor logging to `<dir>/drover-logs/<name>.{stdout,stderr}.log`.
    pub fn with_default_logs<I, S>(args: I, dir: &Utf8Path, name: &str) -> BatchResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (stdout_log, stderr_log) = default_log_paths(dir, name);
        Self::new(args, stdout_log, stderr_log)
    }

    /// Select a backend queue (LSF queue, SLURM partition).
    pub fn with_queue(mut self, queue: impl Into<String>) -> Self {
        self.queue = Some(queue.into());
        self
    }

    pub fn with_job_name(mut self, name: impl Into<String>) -> Self {
        self.job_name = Some(name.into());
        self
    }

    pub fn with_workdir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.workdir = Some(dir.into());
        self
    }

    /// Full command line, program first.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn program(&self) -> &str {
        &self.args[0]
    }

    pub fn stdout_log(&self) -> &Utf8Path {
        &self.stdout_log
    }

    pub fn stderr_log(&self) -> &Utf8Path {
        &self.stderr_log
    }

    pub fn queue(&self) -> Option<&str> {
        self.queue.as_deref()
    }

    pub fn job_name(&self) -> Option<&str> {
        self.job_name.as_deref()
    }

    pub fn workdir(&self) -> Option<&Utf8Path> {
        self.workdir.as_deref()
    }

    /// Create the parent directories of both log files.
    pub fn create_log_dirs(&self) -> std::io::Result<()> {
        for log in [&self.stdout_log, &self.stderr_log] {
            if let Some(parent) = log.parent().filter(|p| !p.as_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

/// Default stdout and stderr log paths for a job called `name` under `dir`.
pub fn default_log_paths(dir: &Utf8Path, name: &str) -> (Utf8PathBuf, Utf8PathBuf) {
    let log_dir = dir.join(DEFAULT_LOG_DIR);
    (
        log_dir.join(format!("{}.stdout.log", name)),
        log_dir.join(format!("{}.stderr.log", name)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_descriptor() {
        let desc = JobDescriptor::new(["basf2", "steering.py"], "out.log", "err.log").unwrap();
        assert_eq!(desc.args(), ["basf2", "steering.py"]);
        assert_eq!(desc.program(), "basf2");
        assert_eq!(desc.stdout_log(), "out.log");
        assert_eq!(desc.stderr_log(), "err.log");
        assert!(desc.queue().is_none());
        assert!(desc.job_name().is_none());
        assert!(desc.workdir().is_none());
    }

    #[test]
    fn test_empty_command_rejected() {
        let result = JobDescriptor::new(Vec::<String>::new(), "out.log", "err.log");
        assert!(matches!(result, Err(BatchError::EmptyCommand)));
    }

    #[test]
    fn test_builder_fields() {
        let desc = JobDescriptor::new(["true"], "o", "e")
            .unwrap()
            .with_queue("s")
            .with_job_name("fei_stage_0")
            .with_workdir("/scratch/run");
        assert_eq!(desc.queue(), Some("s"));
        assert_eq!(desc.job_name(), Some("fei_stage_0"));
        assert_eq!(desc.workdir(), Some(Utf8Path::new("/scratch/run")));
    }

    #[test]
    fn test_default_log_paths() {
        let desc =
            JobDescriptor::with_default_logs(["true"], Utf8Path::new("/work"), "merge").unwrap();
        assert_eq!(desc.stdout_log(), "/work/drover-logs/merge.stdout.log");
        assert_eq!(desc.stderr_log(), "/work/drover-logs/merge.stderr.log");
    }

    #[test]
    fn test_create_log_dirs() {
        let temp = TempDir::new().unwrap();
        let dir = Utf8Path::from_path(temp.path()).unwrap();
        let desc = JobDescriptor::with_default_logs(["true"], dir, "job").unwrap();

        desc.create_log_dirs().unwrap();
        assert!(dir.join(DEFAULT_LOG_DIR).is_dir());

        let bare = JobDescriptor::new(["true"], "out.log", "err.log").unwrap();
        assert!(bare.create_log_dirs().is_ok());
    }
}
