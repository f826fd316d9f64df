use std::fmt::Write;

use comfy_table::{Cell, Color as TableColor};
use indexmap::IndexSet;

use crate::pipeline::{Component, Pipeline, ViewSnapshot};

use super::styling::{count, heading, muted, problem, skipped, title};
use super::tables::{color_coded_stage_cell, create_layout_table, create_table, status_color};

/// Renders a human-readable view of a snapshot.
///
/// Components are laid out in as many columns as the view asks for. Each
/// component is a table with one column per stage and one row per pipeline,
/// the aggregated pipeline first. Stage cells are colour coded by status:
/// green success, yellow unstable or in progress, red failed, grey aborted or
/// not run.
pub fn render_summary(snapshot: &ViewSnapshot) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "📦 {}", heading(&snapshot.view));
    let _ = writeln!(
        output,
        "  {} {}\n  {} {}\n",
        muted("Components:"),
        count(snapshot.components.len()),
        muted("Collected:"),
        muted(snapshot.collected_at.format("%Y-%m-%d %H:%M UTC"))
    );

    if snapshot.components.is_empty() && snapshot.errors.is_empty() {
        let _ = writeln!(output, "{}", count("No components configured."));
        return output;
    }

    let columns = usize::from(snapshot.columns.max(1));
    for chunk in snapshot.components.chunks(columns) {
        let mut layout = create_layout_table();
        layout.add_row(
            chunk
                .iter()
                .map(|component| Cell::new(render_component(component)))
                .collect::<Vec<_>>(),
        );
        let _ = writeln!(output, "{layout}\n");
    }

    if !snapshot.errors.is_empty() {
        let _ = writeln!(output, "⚠️ {}", heading("Not shown"));
        for error in &snapshot.errors {
            let _ = writeln!(
                output,
                "  {} {}",
                skipped(format!("{}:", error.component)),
                problem(&error.message)
            );
        }
    }

    output
}

fn render_component(component: &Component) -> String {
    let name = title(&component.name);

    let Some(shape) = component.pipelines.first() else {
        return format!("{name}\n{}", muted("No runs yet"));
    };

    let mut table = create_table();
    let mut header = vec![Cell::new("Pipeline").fg(TableColor::Cyan)];
    header.extend(
        shape
            .stages
            .iter()
            .map(|stage| Cell::new(&stage.name).fg(TableColor::Cyan)),
    );
    table.set_header(header);

    for pipeline in &component.pipelines {
        let mut row = vec![pipeline_label(pipeline)];
        row.extend(shape.stages.iter().map(|column| {
            pipeline
                .stage(&column.name)
                .map_or_else(|| Cell::new(""), color_coded_stage_cell)
        }));
        table.add_row(row);
    }

    format!("{name}\n{table}")
}

fn pipeline_label(pipeline: &Pipeline) -> Cell {
    let name = if pipeline.aggregated {
        "Aggregated".to_string()
    } else {
        pipeline.version.clone().unwrap_or_default()
    };

    let text = match pipeline.started_at {
        Some(started) => format!("{name}\n{}", started.format("%m-%d %H:%M")),
        None => name,
    };

    Cell::new(text).fg(status_color(pipeline.status()))
}

/// Lists the rows of a prototype, parallel stages on the same line.
pub fn render_stages(pipeline: &Pipeline) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "{}", heading(&pipeline.name));

    for (index, row) in pipeline.rows().iter().enumerate() {
        let names: Vec<&str> = row.iter().map(|s| s.name.as_str()).collect();
        let upstream: Vec<&str> = row
            .iter()
            .flat_map(|s| s.upstream.iter().map(String::as_str))
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect();

        if upstream.is_empty() {
            let _ = writeln!(output, "  {}. {}", index + 1, names.join(" | "));
        } else {
            let _ = writeln!(
                output,
                "  {}. {} {}",
                index + 1,
                names.join(" | "),
                muted(format!("(after {})", upstream.join(", ")))
            );
        }
    }

    output
}
