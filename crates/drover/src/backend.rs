//! The closed set of batch backends the drover binary can drive.

use drover_cli::{BackendKind, Settings};
use drover_core::{BatchJobHandle, BatchProcess, BatchResult, JobDescriptor, JobStatus};
use drover_local::LocalProcess;
use drover_lsf::LsfProcess;
use drover_slurm::SlurmProcess;

/// One job on one of the supported backends.
#[derive(Debug)]
pub enum Backend {
    Lsf(LsfProcess),
    Slurm(SlurmProcess),
    Local(LocalProcess),
}

impl Backend {
    /// Fresh adapter for a job that is not submitted yet.
    pub fn new(kind: BackendKind, settings: &Settings) -> Self {
        match kind {
            BackendKind::Lsf => Self::Lsf(LsfProcess::new(settings.lsf.clone())),
            BackendKind::Slurm => Self::Slurm(SlurmProcess::new(settings.slurm.clone())),
            BackendKind::Local => Self::Local(LocalProcess::new()),
        }
    }

    /// Adapter bound to an already submitted job.
    ///
    /// Local jobs die with the drover process that started them, so they
    /// cannot be re-attached.
    pub fn attach(kind: BackendKind, settings: &Settings, handle: BatchJobHandle) -> Option<Self> {
        match kind {
            BackendKind::Lsf => Some(Self::Lsf(LsfProcess::attach(settings.lsf.clone(), handle))),
            BackendKind::Slurm => Some(Self::Slurm(SlurmProcess::attach(
                settings.slurm.clone(),
                handle,
            ))),
            BackendKind::Local => None,
        }
    }
}

impl BatchProcess for Backend {
    fn name(&self) -> &'static str {
        match self {
            Self::Lsf(p) => p.name(),
            Self::Slurm(p) => p.name(),
            Self::Local(p) => p.name(),
        }
    }

    fn handle(&self) -> Option<&BatchJobHandle> {
        match self {
            Self::Lsf(p) => p.handle(),
            Self::Slurm(p) => p.handle(),
            Self::Local(p) => p.handle(),
        }
    }

    async fn start_job(&mut self, descriptor: &JobDescriptor) -> BatchResult<()> {
        match self {
            Self::Lsf(p) => p.start_job(descriptor).await,
            Self::Slurm(p) => p.start_job(descriptor).await,
            Self::Local(p) => p.start_job(descriptor).await,
        }
    }

    async fn get_job_status(&mut self) -> BatchResult<JobStatus> {
        match self {
            Self::Lsf(p) => p.get_job_status().await,
            Self::Slurm(p) => p.get_job_status().await,
            Self::Local(p) => p.get_job_status().await,
        }
    }

    async fn kill_job(&mut self) -> BatchResult<()> {
        match self {
            Self::Lsf(p) => p.kill_job().await,
            Self::Slurm(p) => p.kill_job().await,
            Self::Local(p) => p.kill_job().await,
        }
    }
}
