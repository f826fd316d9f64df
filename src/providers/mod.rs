mod file;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pipeline::ExecutionRecord;

pub use file::FileBuildGraph;
#[cfg(test)]
pub use file::{BuildDefinition, GraphSnapshot};

/// A job known to the build graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobHandle {
    pub name: String,
}

impl JobHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A single build of a job, used as the correlation key for the builds it
/// triggered downstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunHandle {
    pub job: String,
    pub number: u64,
}

impl RunHandle {
    pub fn new(job: impl Into<String>, number: u64) -> Self {
        Self {
            job: job.into(),
            number,
        }
    }
}

/// Read-only view of the CI host's jobs, trigger edges and builds.
///
/// Every query is synchronous and side-effect free. Implementations bound their
/// own query cost; callers never retry.
pub trait BuildGraphProvider: Send + Sync {
    /// Resolves a job reference, `None` when no such job exists.
    fn resolve_job(&self, reference: &str) -> Option<JobHandle>;

    /// Jobs triggered by `job`, in a stable order.
    fn downstream_of(&self, job: &JobHandle) -> Vec<JobHandle>;

    /// Up to `limit` builds of `job`, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Resolution` when the build history cannot be read.
    fn recent_runs(&self, job: &JobHandle, limit: usize) -> Result<Vec<RunHandle>>;

    /// The build of `job` that belongs to `cause`.
    ///
    /// When `cause` is itself a build of `job` that build is returned; otherwise
    /// the build of `job` triggered by `cause`, if any.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Resolution` when build metadata cannot be read.
    fn build_for_run(&self, job: &JobHandle, cause: &RunHandle) -> Result<Option<ExecutionRecord>>;
}
