use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::pipeline::{ExecutionRecord, Status};
use crate::providers::RunHandle;

/// An exported build graph: every job with its trigger edges and build history.
///
/// Job order is preserved from the document so traversal stays deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub jobs: IndexMap<String, JobDefinition>,
}

/// A job definition as exported by the CI host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobDefinition {
    /// Names of the jobs this job triggers when it completes
    #[serde(default)]
    pub downstream: Vec<String>,
    /// Build history, in any order
    #[serde(default)]
    pub builds: Vec<BuildDefinition>,
}

/// One recorded build of a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildDefinition {
    /// Build number, unique per job and increasing over time
    pub number: u64,
    pub status: Status,
    pub started_at: Option<DateTime<Utc>>,
    /// Build duration in seconds
    #[serde(default)]
    pub duration_secs: f64,
    /// The upstream build that triggered this one, absent for manual or SCM starts
    pub upstream: Option<RunHandle>,
}

impl BuildDefinition {
    pub fn to_record(&self) -> ExecutionRecord {
        ExecutionRecord {
            number: self.number,
            status: self.status,
            started_at: self.started_at,
            duration: self.duration_secs,
        }
    }
}
