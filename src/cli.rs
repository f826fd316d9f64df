use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::{ComponentSpec, ViewConfig};
use crate::factory::PipelineFactory;
use crate::output::{export_snapshot, render_stages, OutputFormat};
use crate::providers::FileBuildGraph;
use crate::view::DeliveryPipelineView;

#[derive(Parser)]
#[command(name = "delivery-pipeline")]
#[command(author, version, about = "Delivery Pipeline View", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// View configuration file (TOML, JSON or YAML)
    #[arg(short, long, global = true, env = "DELIVERY_PIPELINE_CONFIG")]
    config: Option<PathBuf>,

    /// Build graph snapshot file (TOML, JSON or YAML)
    #[arg(short, long, global = true, env = "DELIVERY_PIPELINE_GRAPH")]
    graph: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the delivery pipeline view
    Show {
        /// Number of recent pipelines per component (overrides the config)
        #[arg(short, long)]
        rows: Option<usize>,

        /// Prepend the aggregated pipeline to every component
        #[arg(short, long, default_value_t = false)]
        aggregated: bool,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Summary)]
        format: OutputFormat,

        #[arg(short, long, default_value_t = false)]
        pretty: bool,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the stages of one component chain
    Stages {
        #[arg(short, long)]
        name: String,

        #[arg(short = 'j', long)]
        first_job: String,
    },
    /// Check the view configuration
    Validate,
    /// Point components starting at a renamed job to its new name
    RenameJob {
        #[arg(long)]
        from: String,

        #[arg(long)]
        to: String,
    },
}

impl Cli {
    fn load_graph(&self) -> Result<FileBuildGraph> {
        let path = self
            .graph
            .as_deref()
            .context("No build graph given, pass --graph or set DELIVERY_PIPELINE_GRAPH")?;
        FileBuildGraph::load(path)
    }

    fn execute_show(
        &self,
        rows: Option<usize>,
        aggregated: bool,
        format: OutputFormat,
        pretty: bool,
        output: Option<&Path>,
    ) -> Result<()> {
        let mut config = ViewConfig::load(self.config.as_deref())?;
        if let Some(rows) = rows {
            config.no_of_pipelines = rows;
        }
        config.show_aggregated_pipeline |= aggregated;

        let graph = self.load_graph()?;
        let snapshot = DeliveryPipelineView::new(config).snapshot(&graph)?;

        if let Some(output_path) = output {
            let mut file = File::create(output_path)
                .with_context(|| format!("Failed to create {}", output_path.display()))?;
            export_snapshot(&snapshot, format, pretty, &mut file)?;
            info!("View written to: {}", output_path.display());
        } else {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            export_snapshot(&snapshot, format, pretty, &mut handle)?;
            handle.flush()?;
        }

        Ok(())
    }

    fn execute_stages(&self, name: &str, first_job: &str) -> Result<()> {
        let spec = ComponentSpec::new(name, first_job);
        spec.validate()?;

        let graph = self.load_graph()?;
        let prototype = PipelineFactory::new(&graph).extract_pipeline(&spec.name, &spec.first_job)?;

        print!("{}", render_stages(&prototype));
        Ok(())
    }

    fn execute_validate(&self) -> Result<()> {
        let config = ViewConfig::load(self.config.as_deref())?;
        config.validate()?;

        println!(
            "Configuration '{}' is valid ({} components)",
            config.name,
            config.component_specs.len()
        );
        Ok(())
    }

    fn execute_rename_job(&self, from: &str, to: &str) -> Result<()> {
        let path = ViewConfig::locate(self.config.as_deref())
            .context("No configuration file found to update")?;

        let mut config = ViewConfig::load(Some(path.as_path()))?;
        let renamed = config.rename_job(from, to);

        if renamed == 0 {
            info!("No component starts at '{from}', nothing to update");
            return Ok(());
        }

        config.save(&path)?;
        println!("Updated {renamed} component(s) in {}", path.display());
        Ok(())
    }

    pub fn execute(&self) -> Result<()> {
        match &self.command {
            Commands::Show {
                rows,
                aggregated,
                format,
                pretty,
                output,
            } => self.execute_show(*rows, *aggregated, *format, *pretty, output.as_deref()),
            Commands::Stages { name, first_job } => self.execute_stages(name, first_job),
            Commands::Validate => self.execute_validate(),
            Commands::RenameJob { from, to } => self.execute_rename_job(from, to),
        }
    }
}
