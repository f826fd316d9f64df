use std::collections::HashMap;

use log::{debug, warn};

use super::PipelineFactory;
use crate::pipeline::Pipeline;
use crate::providers::{JobHandle, RunHandle};

impl PipelineFactory<'_> {
    /// Expands a prototype into its `limit` most recent runs, newest first.
    ///
    /// Returns fewer instances when fewer runs exist and none when `limit` is
    /// zero. A failure to list the runs degrades to an empty list.
    pub fn create_pipeline_latest(&self, prototype: &Pipeline, limit: usize) -> Vec<Pipeline> {
        if limit == 0 {
            return vec![];
        }

        self.recent_runs(prototype, limit)
            .iter()
            .take(limit)
            .map(|run| self.instantiate(prototype, run))
            .collect()
    }

    pub(super) fn recent_runs(&self, prototype: &Pipeline, limit: usize) -> Vec<RunHandle> {
        let Some(first) = prototype.first_stage() else {
            return vec![];
        };

        self.graph
            .recent_runs(&JobHandle::new(first.name.as_str()), limit)
            .unwrap_or_else(|err| {
                warn!("{}: cannot list runs of '{}': {err}", prototype.name, first.name);
                vec![]
            })
    }

    /// Binds every stage of the prototype to the build that belongs to `run`.
    ///
    /// The first stage is bound to `run` itself. Every other stage is bound to
    /// the build of its job triggered by the bound build of one of its upstream
    /// stages, tried in order. Stages left unbound stay `NotRun`.
    pub(super) fn instantiate(&self, prototype: &Pipeline, run: &RunHandle) -> Pipeline {
        let mut pipeline = prototype.clone();
        pipeline.version = Some(format!("#{}", run.number));

        let mut bound: HashMap<String, RunHandle> = HashMap::new();

        for stage in &mut pipeline.stages {
            let causes: Vec<RunHandle> = if stage.upstream.is_empty() {
                vec![run.clone()]
            } else {
                stage
                    .upstream
                    .iter()
                    .filter_map(|name| bound.get(name).cloned())
                    .collect()
            };

            let job = JobHandle::new(stage.name.as_str());
            for cause in &causes {
                match self.graph.build_for_run(&job, cause) {
                    Ok(Some(record)) => {
                        stage.bind(&record);
                        bound.insert(
                            stage.name.clone(),
                            RunHandle::new(job.name.as_str(), record.number),
                        );
                        break;
                    }
                    Ok(None) => {}
                    Err(err) => {
                        warn!(
                            "{} #{}: stage '{}' left unresolved: {err}",
                            prototype.name, run.number, stage.name
                        );
                    }
                }
            }

            if stage.build.is_none() {
                debug!("{} #{}: '{}' has not run", prototype.name, run.number, stage.name);
            }
        }

        pipeline.started_at = pipeline.first_stage().and_then(|s| s.started_at);
        pipeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Status;
    use crate::testing::{app_graph, FailingGraph, GraphBuilder};
    use pretty_assertions::assert_eq;

    fn statuses(pipeline: &Pipeline) -> Vec<Status> {
        pipeline.stages.iter().map(|s| s.status).collect()
    }

    #[test]
    fn app_scenario_marks_untriggered_deploy_as_not_run() {
        let graph = app_graph();
        let factory = PipelineFactory::new(&graph);
        let prototype = factory.extract_pipeline("App", "build").unwrap();

        let pipelines = factory.create_pipeline_latest(&prototype, 2);

        assert_eq!(pipelines.len(), 2);
        assert_eq!(pipelines[0].version.as_deref(), Some("#2"));
        assert_eq!(
            statuses(&pipelines[0]),
            vec![Status::Success, Status::Success, Status::NotRun]
        );
        assert_eq!(pipelines[1].version.as_deref(), Some("#1"));
        assert_eq!(statuses(&pipelines[1]), vec![Status::Success; 3]);
        assert_eq!(pipelines[1].stage("deploy").unwrap().build, Some(1));
    }

    #[test]
    fn zero_limit_returns_empty_list() {
        let graph = app_graph();
        let factory = PipelineFactory::new(&graph);
        let prototype = factory.extract_pipeline("App", "build").unwrap();

        assert!(factory.create_pipeline_latest(&prototype, 0).is_empty());
    }

    #[test]
    fn never_returns_more_than_limit_or_available_runs() {
        let graph = app_graph();
        let factory = PipelineFactory::new(&graph);
        let prototype = factory.extract_pipeline("App", "build").unwrap();

        assert_eq!(factory.create_pipeline_latest(&prototype, 1).len(), 1);
        assert_eq!(
            factory.create_pipeline_latest(&prototype, 10).len(),
            2,
            "Only two runs exist, no padding"
        );
    }

    #[test]
    fn instance_started_at_comes_from_first_stage() {
        let graph = app_graph();
        let factory = PipelineFactory::new(&graph);
        let prototype = factory.extract_pipeline("App", "build").unwrap();

        let pipelines = factory.create_pipeline_latest(&prototype, 1);
        assert_eq!(pipelines[0].started_at, pipelines[0].stages[0].started_at);
        assert!(pipelines[0].started_at.is_some());
    }

    #[test]
    fn correlation_ignores_calendar_order() {
        // test #5 belongs to build #1 even though it started after build #2
        let graph = GraphBuilder::new()
            .job("build", &["test"])
            .job("test", &[])
            .build("build", 1, Status::Success, 0)
            .build("build", 2, Status::Failed, 5)
            .triggered("test", 5, Status::Unstable, 30, ("build", 1))
            .finish();
        let factory = PipelineFactory::new(&graph);
        let prototype = factory.extract_pipeline("App", "build").unwrap();

        let pipelines = factory.create_pipeline_latest(&prototype, 2);

        assert_eq!(pipelines[0].stage("test").unwrap().status, Status::NotRun);
        let older = pipelines[1].stage("test").unwrap();
        assert_eq!(older.status, Status::Unstable);
        assert_eq!(older.build, Some(5));
    }

    #[test]
    fn stage_below_unbound_upstream_is_not_run() {
        let graph = GraphBuilder::new()
            .job("build", &["test"])
            .job("test", &["deploy"])
            .job("deploy", &[])
            .build("build", 1, Status::Failed, 0)
            // a deploy triggered by some other test run must not leak in
            .triggered("deploy", 9, Status::Success, 3, ("test", 99))
            .finish();
        let factory = PipelineFactory::new(&graph);
        let prototype = factory.extract_pipeline("App", "build").unwrap();

        let pipelines = factory.create_pipeline_latest(&prototype, 1);
        assert_eq!(
            statuses(&pipelines[0]),
            vec![Status::Failed, Status::NotRun, Status::NotRun]
        );
    }

    #[test]
    fn diamond_join_binds_through_any_upstream() {
        let graph = GraphBuilder::new()
            .job("build", &["unit", "lint"])
            .job("unit", &["deploy"])
            .job("lint", &["deploy"])
            .job("deploy", &[])
            .build("build", 1, Status::Success, 0)
            .triggered("unit", 1, Status::Success, 1, ("build", 1))
            .triggered("lint", 1, Status::Success, 1, ("build", 1))
            .triggered("deploy", 1, Status::InProgress, 3, ("lint", 1))
            .finish();
        let factory = PipelineFactory::new(&graph);
        let prototype = factory.extract_pipeline("App", "build").unwrap();

        let pipelines = factory.create_pipeline_latest(&prototype, 1);
        assert_eq!(
            pipelines[0].stage("deploy").unwrap().status,
            Status::InProgress,
            "deploy was triggered by lint, the second upstream"
        );
    }

    #[test]
    fn failed_stage_lookup_degrades_to_not_run() {
        let graph = FailingGraph::failing_builds(app_graph(), &["test"]);
        let factory = PipelineFactory::new(&graph);
        let prototype = factory.extract_pipeline("App", "build").unwrap();

        let pipelines = factory.create_pipeline_latest(&prototype, 2);

        assert_eq!(pipelines.len(), 2, "No run is dropped");
        for pipeline in &pipelines {
            assert_eq!(pipeline.stages[0].status, Status::Success);
            assert_eq!(pipeline.stage("test").unwrap().status, Status::NotRun);
            assert_eq!(pipeline.stage("deploy").unwrap().status, Status::NotRun);
        }
    }

    #[test]
    fn failed_run_listing_yields_no_instances() {
        let graph = FailingGraph::failing_runs(app_graph());
        let factory = PipelineFactory::new(&graph);
        let prototype = factory.extract_pipeline("App", "build").unwrap();

        assert!(factory.create_pipeline_latest(&prototype, 3).is_empty());
    }

    #[test]
    fn empty_prototype_has_no_instances() {
        let graph = app_graph();
        let factory = PipelineFactory::new(&graph);
        let prototype = Pipeline::prototype("Empty", vec![]);

        assert!(factory.create_pipeline_latest(&prototype, 3).is_empty());
    }
}
