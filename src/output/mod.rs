mod exports;
mod styling;
mod summary;
mod tables;

use clap::ValueEnum;

pub use exports::export_snapshot;
use styling::{brand, muted};
pub use summary::render_stages;

/// How a view snapshot is written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Colour-coded tables for the terminal
    #[default]
    Summary,
    /// The snapshot as JSON
    Json,
}

/// Prints the banner to stderr.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        brand("🚚 Delivery Pipeline"),
        muted(env!("CARGO_PKG_VERSION")),
        muted("Delivery pipeline view for chained build jobs")
    );
}
