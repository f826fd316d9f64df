use anyhow::Result;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::document::{read_document, write_document};
use crate::error::PipelineError;

/// Most pipeline instances a view may show per component.
pub const MAX_PIPELINES: usize = 10;

/// Most component columns a view may lay out.
pub const MAX_COLUMNS: u8 = 3;

const CONFIG_CANDIDATES: [&str; 4] = [
    "delivery-pipeline.toml",
    "delivery-pipeline.json",
    "delivery-pipeline.yaml",
    "delivery-pipeline.yml",
];

/// Delivery pipeline view settings.
///
/// Holds the component chains to display and how to display them. Loaded once
/// per invocation and passed by value to the view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ViewConfig {
    /// View title
    #[serde(default = "default_view_name")]
    pub name: String,

    /// Number of columns the components are laid out in
    #[serde(default = "default_no_of_columns")]
    pub no_of_columns: u8,

    /// Number of recent pipeline instances shown per component
    #[serde(default = "default_no_of_pipelines")]
    pub no_of_pipelines: usize,

    /// Prepend an aggregated pipeline to every component
    #[serde(default)]
    pub show_aggregated_pipeline: bool,

    /// Component chains, each rooted at its first job
    #[serde(default)]
    pub component_specs: Vec<ComponentSpec>,
}

/// A named chain of jobs starting at `first_job`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ComponentSpec {
    pub name: String,
    pub first_job: String,
}

impl ComponentSpec {
    pub fn new(name: impl Into<String>, first_job: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            first_job: first_job.into(),
        }
    }

    /// # Errors
    ///
    /// Returns `PipelineError::Validation` when the name is empty or blank.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.name.trim().is_empty() {
            return Err(PipelineError::Validation(format!(
                "Please supply a title! (component starting at '{}')",
                self.first_job
            )));
        }
        Ok(())
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            name: default_view_name(),
            no_of_columns: default_no_of_columns(),
            no_of_pipelines: default_no_of_pipelines(),
            show_aggregated_pipeline: false,
            component_specs: Vec::new(),
        }
    }
}

fn default_view_name() -> String {
    "Delivery Pipeline".to_string()
}

fn default_no_of_columns() -> u8 {
    1
}

fn default_no_of_pipelines() -> usize {
    1
}

impl ViewConfig {
    /// Finds the configuration file to use.
    ///
    /// Searches in this order:
    /// 1. Specified path
    /// 2. `./delivery-pipeline.{toml,json,yaml,yml}`
    /// 3. The same names under the platform config directory, e.g.
    ///    `~/.config/delivery-pipeline/` on Linux
    pub fn locate(path: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = path {
            return Some(path.to_path_buf());
        }

        let local = CONFIG_CANDIDATES.iter().map(PathBuf::from);
        let global = dirs::config_dir()
            .map(|dir| dir.join("delivery-pipeline"))
            .into_iter()
            .flat_map(|dir| CONFIG_CANDIDATES.iter().map(move |c| dir.join(c)));

        local.chain(global).find(|candidate| candidate.exists())
    }

    /// Loads the configuration, falling back to defaults when no file is found.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly given file is missing or if the file
    /// found cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match Self::locate(path) {
            Some(found) => {
                info!("Loading view configuration from: {}", found.display());
                read_document(&found)
            }
            None => {
                debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Saves the configuration, choosing the format from the file extension.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_document(self, path)
    }

    /// Checks display options and every component spec.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Validation` on a blank component name or an
    /// out-of-range column or pipeline count.
    pub fn validate(&self) -> crate::error::Result<()> {
        if !(1..=MAX_COLUMNS).contains(&self.no_of_columns) {
            return Err(PipelineError::Validation(format!(
                "no-of-columns must be between 1 and {MAX_COLUMNS}, got {}",
                self.no_of_columns
            )));
        }

        if self.no_of_pipelines > MAX_PIPELINES {
            return Err(PipelineError::Validation(format!(
                "no-of-pipelines must be at most {MAX_PIPELINES}, got {}",
                self.no_of_pipelines
            )));
        }

        self.component_specs.iter().try_for_each(ComponentSpec::validate)
    }

    /// Points every component that starts at `old_name` to `new_name`.
    ///
    /// Returns the number of component specs updated.
    pub fn rename_job(&mut self, old_name: &str, new_name: &str) -> usize {
        let mut renamed = 0;
        for spec in &mut self.component_specs {
            if spec.first_job == old_name {
                spec.first_job = new_name.to_string();
                renamed += 1;
            }
        }
        renamed
    }
}
