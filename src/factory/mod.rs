mod aggregate;
mod extract;
mod latest;

use crate::providers::BuildGraphProvider;

/// Number of most recent root runs scanned for the aggregated pipeline.
pub const AGGREGATION_WINDOW: usize = 10;

/// Builds pipeline prototypes and their instances from a build graph.
///
/// Holds nothing but the injected provider; every call re-derives its result
/// from the graph, so one factory can serve any number of requests.
pub struct PipelineFactory<'a> {
    graph: &'a dyn BuildGraphProvider,
}

impl<'a> PipelineFactory<'a> {
    pub fn new(graph: &'a dyn BuildGraphProvider) -> Self {
        Self { graph }
    }
}
