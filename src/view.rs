use chrono::Utc;
use log::{info, warn};

use crate::config::{ComponentSpec, ViewConfig};
use crate::error::Result;
use crate::factory::PipelineFactory;
use crate::pipeline::{Component, ComponentError, ViewSnapshot};
use crate::providers::BuildGraphProvider;

/// Components built for one request, plus those that could not be built.
#[derive(Debug, Default)]
pub struct Components {
    pub components: Vec<Component>,
    pub errors: Vec<ComponentError>,
}

/// Builds every configured component.
///
/// All specs are validated before any pipeline is built. A component whose
/// first job cannot be resolved is reported in `errors` and skipped; the other
/// components are still built. When `show_aggregated` is set each component
/// starts with its aggregated pipeline, followed by up to `row_count` recent
/// instances.
///
/// # Errors
///
/// Returns `PipelineError::Validation` if any spec has a blank name.
pub fn get_components(
    graph: &dyn BuildGraphProvider,
    specs: &[ComponentSpec],
    show_aggregated: bool,
    row_count: usize,
) -> Result<Components> {
    specs.iter().try_for_each(ComponentSpec::validate)?;

    let factory = PipelineFactory::new(graph);
    let mut result = Components::default();

    for spec in specs {
        let prototype = match factory.extract_pipeline(&spec.name, &spec.first_job) {
            Ok(prototype) => prototype,
            Err(err) => {
                warn!("Skipping component '{}': {err}", spec.name);
                result.errors.push(ComponentError {
                    component: spec.name.clone(),
                    message: err.to_string(),
                });
                continue;
            }
        };

        let mut pipelines = Vec::new();
        if show_aggregated {
            pipelines.push(factory.create_pipeline_aggregated(&prototype));
        }
        pipelines.extend(factory.create_pipeline_latest(&prototype, row_count));

        result.components.push(Component {
            name: spec.name.clone(),
            pipelines,
        });
    }

    Ok(result)
}

/// A configured delivery pipeline view.
pub struct DeliveryPipelineView {
    config: ViewConfig,
}

impl DeliveryPipelineView {
    pub fn new(config: ViewConfig) -> Self {
        Self { config }
    }

    /// Computes the view against `graph`.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Validation` if the configuration is invalid.
    pub fn snapshot(&self, graph: &dyn BuildGraphProvider) -> Result<ViewSnapshot> {
        self.config.validate()?;

        info!(
            "Building view '{}' with {} components",
            self.config.name,
            self.config.component_specs.len()
        );

        let Components { components, errors } = get_components(
            graph,
            &self.config.component_specs,
            self.config.show_aggregated_pipeline,
            self.config.no_of_pipelines,
        )?;

        Ok(ViewSnapshot {
            view: self.config.name.clone(),
            columns: self.config.no_of_columns,
            collected_at: Utc::now(),
            components,
            errors,
        })
    }
}
