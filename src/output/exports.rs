use anyhow::Result;
use std::io::Write;

use super::summary::render_summary;
use super::OutputFormat;
use crate::pipeline::ViewSnapshot;

/// Writes a view snapshot in the requested format.
///
/// - Summary: colour-coded terminal tables
/// - JSON: the full snapshot for programmatic access
pub fn export_snapshot(
    snapshot: &ViewSnapshot,
    format: OutputFormat,
    pretty: bool,
    output: &mut dyn Write,
) -> Result<()> {
    match format {
        OutputFormat::Summary => {
            write!(output, "{}", render_summary(snapshot))?;
            Ok(())
        }
        OutputFormat::Json => export_json(snapshot, pretty, output),
    }
}

fn export_json(snapshot: &ViewSnapshot, pretty: bool, output: &mut dyn Write) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(snapshot)?
    } else {
        serde_json::to_string(snapshot)?
    };
    writeln!(output, "{json}")?;
    Ok(())
}
