use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of a single build execution as reported by the build graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Success,
    Unstable,
    Failed,
    InProgress,
    Aborted,
    #[default]
    NotRun,
}

impl Status {
    /// Rank used when several executions compete for one stage slot.
    ///
    /// `InProgress > Failed > Unstable > Aborted > Success > NotRun`
    pub fn precedence(self) -> u8 {
        match self {
            Status::InProgress => 5,
            Status::Failed => 4,
            Status::Unstable => 3,
            Status::Aborted => 2,
            Status::Success => 1,
            Status::NotRun => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::Unstable => "unstable",
            Status::Failed => "failed",
            Status::InProgress => "in-progress",
            Status::Aborted => "aborted",
            Status::NotRun => "not run",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A concrete build of one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub number: u64,
    pub status: Status,
    pub started_at: Option<DateTime<Utc>>,
    /// Build duration in seconds
    pub duration: f64,
}

impl ExecutionRecord {
    /// Orders two executions by significance: status precedence first, then the
    /// most recent start, then the higher build number.
    pub fn cmp_significance(&self, other: &Self) -> Ordering {
        self.status
            .precedence()
            .cmp(&other.status.precedence())
            .then_with(|| self.started_at.cmp(&other.started_at))
            .then_with(|| self.number.cmp(&other.number))
    }
}

/// One job's slot in a pipeline.
///
/// `row` is the trigger depth at which the job was first reached from the first
/// job; stages sharing a row run as parallel tasks. `upstream` lists the stages
/// of the previous row that trigger this one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub name: String,
    pub row: usize,
    pub column: usize,
    pub upstream: Vec<String>,
    pub status: Status,
    pub build: Option<u64>,
    pub started_at: Option<DateTime<Utc>>,
    pub duration: f64,
}

impl Stage {
    pub fn new(name: impl Into<String>, row: usize, column: usize, upstream: Vec<String>) -> Self {
        Self {
            name: name.into(),
            row,
            column,
            upstream,
            status: Status::NotRun,
            build: None,
            started_at: None,
            duration: 0.0,
        }
    }

    pub fn bind(&mut self, record: &ExecutionRecord) {
        self.status = record.status;
        self.build = Some(record.number);
        self.started_at = record.started_at;
        self.duration = record.duration;
    }

    /// The execution bound to this stage, if any.
    pub fn execution(&self) -> Option<ExecutionRecord> {
        self.build.map(|number| ExecutionRecord {
            number,
            status: self.status,
            started_at: self.started_at,
            duration: self.duration,
        })
    }
}

/// An ordered list of stages rooted at a component's first job.
///
/// A prototype has no version and every stage is `NotRun`. Instances carry the
/// root build as version; the aggregated pipeline is flagged `aggregated`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    pub name: String,
    pub version: Option<String>,
    pub aggregated: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub stages: Vec<Stage>,
}

impl Pipeline {
    pub fn prototype(name: impl Into<String>, stages: Vec<Stage>) -> Self {
        Self {
            name: name.into(),
            version: None,
            aggregated: false,
            started_at: None,
            stages,
        }
    }

    pub fn first_stage(&self) -> Option<&Stage> {
        self.stages.first()
    }

    pub fn stage(&self, name: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.name == name)
    }

    /// Stages grouped by row, parallel tasks side by side.
    pub fn rows(&self) -> Vec<Vec<&Stage>> {
        let mut rows: Vec<Vec<&Stage>> = Vec::new();
        for stage in &self.stages {
            if rows.len() <= stage.row {
                rows.resize_with(stage.row + 1, Vec::new);
            }
            rows[stage.row].push(stage);
        }
        rows
    }

    /// Rolled-up status: the most significant status among all stages.
    pub fn status(&self) -> Status {
        self.stages
            .iter()
            .map(|s| s.status)
            .max_by_key(|s| s.precedence())
            .unwrap_or_default()
    }
}

/// A named group of pipeline instances, one per configured component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    pub pipelines: Vec<Pipeline>,
}

/// A component that could not be built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentError {
    pub component: String,
    pub message: String,
}

/// The result of one rendering request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ViewSnapshot {
    pub view: String,
    pub columns: u8,
    pub collected_at: DateTime<Utc>,
    pub components: Vec<Component>,
    pub errors: Vec<ComponentError>,
}
