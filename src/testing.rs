//! Fixture helpers shared by the unit tests.

use std::collections::HashSet;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::error::{PipelineError, Result};
use crate::pipeline::{ExecutionRecord, Status};
use crate::providers::{
    BuildDefinition, BuildGraphProvider, FileBuildGraph, GraphSnapshot, JobHandle, RunHandle,
};

pub fn at_minute(minute: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 1, 10, 0, 0).unwrap() + Duration::minutes(minute)
}

/// Builds a `FileBuildGraph` job by job.
#[derive(Default)]
pub struct GraphBuilder {
    snapshot: GraphSnapshot,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a job and the jobs it triggers.
    pub fn job(mut self, name: &str, downstream: &[&str]) -> Self {
        let job = self.snapshot.jobs.entry(name.to_string()).or_default();
        job.downstream = downstream.iter().map(ToString::to_string).collect();
        self
    }

    /// Records a build started manually at `minute`.
    pub fn build(self, job: &str, number: u64, status: Status, minute: i64) -> Self {
        self.push(job, number, status, minute, None)
    }

    /// Records a build triggered by `upstream`'s build `upstream_number`.
    pub fn triggered(
        self,
        job: &str,
        number: u64,
        status: Status,
        minute: i64,
        upstream: (&str, u64),
    ) -> Self {
        let cause = RunHandle::new(upstream.0, upstream.1);
        self.push(job, number, status, minute, Some(cause))
    }

    fn push(
        mut self,
        job: &str,
        number: u64,
        status: Status,
        minute: i64,
        upstream: Option<RunHandle>,
    ) -> Self {
        self.snapshot
            .jobs
            .entry(job.to_string())
            .or_default()
            .builds
            .push(BuildDefinition {
                number,
                status,
                started_at: Some(at_minute(minute)),
                duration_secs: 60.0,
                upstream,
            });
        self
    }

    pub fn finish(self) -> FileBuildGraph {
        FileBuildGraph::new(self.snapshot)
    }
}

/// Wraps a graph and fails lookups for chosen jobs.
pub struct FailingGraph {
    pub inner: FileBuildGraph,
    pub failing_builds: HashSet<String>,
    pub failing_runs: bool,
}

impl FailingGraph {
    pub fn failing_builds(inner: FileBuildGraph, jobs: &[&str]) -> Self {
        Self {
            inner,
            failing_builds: jobs.iter().map(ToString::to_string).collect(),
            failing_runs: false,
        }
    }

    pub fn failing_runs(inner: FileBuildGraph) -> Self {
        Self {
            inner,
            failing_builds: HashSet::new(),
            failing_runs: true,
        }
    }
}

impl BuildGraphProvider for FailingGraph {
    fn resolve_job(&self, reference: &str) -> Option<JobHandle> {
        self.inner.resolve_job(reference)
    }

    fn downstream_of(&self, job: &JobHandle) -> Vec<JobHandle> {
        self.inner.downstream_of(job)
    }

    fn recent_runs(&self, job: &JobHandle, limit: usize) -> Result<Vec<RunHandle>> {
        if self.failing_runs {
            return Err(PipelineError::Resolution("history unavailable".to_string()));
        }
        self.inner.recent_runs(job, limit)
    }

    fn build_for_run(&self, job: &JobHandle, cause: &RunHandle) -> Result<Option<ExecutionRecord>> {
        if self.failing_builds.contains(&job.name) {
            return Err(PipelineError::Resolution(format!("{} timed out", job.name)));
        }
        self.inner.build_for_run(job, cause)
    }
}

/// build -> test -> deploy, where build #1 went all the way through and build
/// #2 has not triggered deploy yet.
pub fn app_graph() -> FileBuildGraph {
    GraphBuilder::new()
        .job("build", &["test"])
        .job("test", &["deploy"])
        .job("deploy", &[])
        .build("build", 1, Status::Success, 0)
        .triggered("test", 1, Status::Success, 2, ("build", 1))
        .triggered("deploy", 1, Status::Success, 4, ("test", 1))
        .build("build", 2, Status::Success, 10)
        .triggered("test", 2, Status::Success, 12, ("build", 2))
        .finish()
}
