use std::collections::HashMap;

use log::debug;

use super::PipelineFactory;
use crate::error::{PipelineError, Result};
use crate::pipeline::{Pipeline, Stage};
use crate::providers::JobHandle;

impl PipelineFactory<'_> {
    /// Extracts the prototype pipeline of a component.
    ///
    /// Walks the trigger edges breadth first from `first_job`. Each job becomes
    /// one stage in the row of the depth it is first reached at; jobs reached
    /// again later (diamonds, loops, self-triggers) are not revisited. A job
    /// reached from several stages of the previous row records all of them as
    /// upstream.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::JobNotFound` if `first_job` does not resolve.
    pub fn extract_pipeline(&self, name: &str, first_job: &str) -> Result<Pipeline> {
        let root = self
            .graph
            .resolve_job(first_job)
            .ok_or_else(|| PipelineError::JobNotFound(first_job.to_string()))?;

        let mut index: HashMap<String, usize> = HashMap::from([(root.name.clone(), 0)]);
        let mut stages = vec![Stage::new(root.name.as_str(), 0, 0, vec![])];
        let mut frontier = vec![root];
        let mut row = 0;

        while !frontier.is_empty() {
            row += 1;
            let mut next: Vec<JobHandle> = Vec::new();

            for job in &frontier {
                for downstream in self.graph.downstream_of(job) {
                    if let Some(&i) = index.get(&downstream.name) {
                        let stage = &mut stages[i];
                        if stage.row == row && !stage.upstream.contains(&job.name) {
                            stage.upstream.push(job.name.clone());
                        }
                        continue;
                    }

                    debug!("{name}: '{}' -> '{}' (row {row})", job.name, downstream.name);
                    index.insert(downstream.name.clone(), stages.len());
                    stages.push(Stage::new(
                        downstream.name.as_str(),
                        row,
                        next.len(),
                        vec![job.name.clone()],
                    ));
                    next.push(downstream);
                }
            }

            frontier = next;
        }

        debug!("{name}: extracted {} stages", stages.len());
        Ok(Pipeline::prototype(name, stages))
    }
}
