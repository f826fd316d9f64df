use std::path::Path;

use log::{info, warn};

use super::types::{GraphSnapshot, JobDefinition};
use crate::document::read_document;
use crate::error::{PipelineError, Result};
use crate::pipeline::ExecutionRecord;
use crate::providers::{BuildGraphProvider, JobHandle, RunHandle};

/// Build graph provider backed by an exported snapshot file.
///
/// The snapshot is loaded once and never modified, so the provider can be
/// shared freely between requests.
#[derive(Debug, Clone, Default)]
pub struct FileBuildGraph {
    snapshot: GraphSnapshot,
}

impl FileBuildGraph {
    pub fn new(snapshot: GraphSnapshot) -> Self {
        Self { snapshot }
    }

    /// Loads a snapshot from a TOML, JSON or YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let snapshot: GraphSnapshot = read_document(path)?;
        info!(
            "Loaded build graph with {} jobs from: {}",
            snapshot.jobs.len(),
            path.display()
        );
        Ok(Self::new(snapshot))
    }

    fn job(&self, job: &JobHandle) -> Result<&JobDefinition> {
        self.snapshot
            .jobs
            .get(&job.name)
            .ok_or_else(|| PipelineError::Resolution(format!("no job named '{}'", job.name)))
    }
}

impl BuildGraphProvider for FileBuildGraph {
    fn resolve_job(&self, reference: &str) -> Option<JobHandle> {
        self.snapshot
            .jobs
            .contains_key(reference)
            .then(|| JobHandle::new(reference))
    }

    fn downstream_of(&self, job: &JobHandle) -> Vec<JobHandle> {
        let Some(definition) = self.snapshot.jobs.get(&job.name) else {
            return vec![];
        };

        definition
            .downstream
            .iter()
            .filter_map(|name| {
                let resolved = self.resolve_job(name);
                if resolved.is_none() {
                    warn!("Job '{}' triggers unknown job '{name}', skipping", job.name);
                }
                resolved
            })
            .collect()
    }

    fn recent_runs(&self, job: &JobHandle, limit: usize) -> Result<Vec<RunHandle>> {
        let mut numbers: Vec<u64> = self.job(job)?.builds.iter().map(|b| b.number).collect();
        numbers.sort_unstable_by(|a, b| b.cmp(a));
        numbers.dedup();

        Ok(numbers
            .into_iter()
            .take(limit)
            .map(|number| RunHandle::new(job.name.as_str(), number))
            .collect())
    }

    fn build_for_run(&self, job: &JobHandle, cause: &RunHandle) -> Result<Option<ExecutionRecord>> {
        let builds = &self.job(job)?.builds;

        let found = if cause.job == job.name {
            builds.iter().find(|b| b.number == cause.number)
        } else {
            builds
                .iter()
                .filter(|b| b.upstream.as_ref() == Some(cause))
                .max_by_key(|b| b.number)
        };

        Ok(found.map(|b| b.to_record()))
    }
}
