use log::debug;

use super::{PipelineFactory, AGGREGATION_WINDOW};
use crate::pipeline::{ExecutionRecord, Pipeline};

impl PipelineFactory<'_> {
    /// Builds one pipeline summarizing the recent history of a prototype.
    ///
    /// Scans the `AGGREGATION_WINDOW` most recent runs and, for every stage,
    /// keeps the most significant execution seen: highest status precedence,
    /// then the most recent start. Stages without any execution in the window
    /// stay `NotRun`.
    pub fn create_pipeline_aggregated(&self, prototype: &Pipeline) -> Pipeline {
        let instances: Vec<Pipeline> = self
            .recent_runs(prototype, AGGREGATION_WINDOW)
            .iter()
            .take(AGGREGATION_WINDOW)
            .map(|run| self.instantiate(prototype, run))
            .collect();

        debug!("{}: aggregating {} runs", prototype.name, instances.len());

        let mut aggregated = prototype.clone();
        aggregated.aggregated = true;

        for (position, stage) in aggregated.stages.iter_mut().enumerate() {
            let most_significant = instances
                .iter()
                .filter_map(|instance| instance.stages.get(position))
                .filter_map(|s| s.execution())
                .max_by(ExecutionRecord::cmp_significance);

            if let Some(record) = most_significant {
                stage.bind(&record);
            }
        }

        aggregated.started_at = aggregated.first_stage().and_then(|s| s.started_at);
        aggregated
    }
}
