use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::{NOTHING, UTF8_FULL};
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

use crate::pipeline::{Stage, Status};

/// Table and cell creation helpers
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Borderless grid used to place component tables side by side.
pub fn create_layout_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(NOTHING)
        .set_content_arrangement(ContentArrangement::Disabled);
    table
}

pub fn status_color(status: Status) -> TableColor {
    match status {
        Status::Success => TableColor::Green,
        Status::Unstable | Status::InProgress => TableColor::Yellow,
        Status::Failed => TableColor::Red,
        Status::Aborted | Status::NotRun => TableColor::DarkGrey,
    }
}

pub fn color_coded_stage_cell(stage: &Stage) -> Cell {
    let text = match stage.build {
        Some(number) => format!(
            "{}\n#{number} {}",
            stage.status,
            format_duration(stage.duration)
        ),
        None => stage.status.to_string(),
    };
    Cell::new(text).fg(status_color(stage.status))
}

/// Formats seconds as `42s`, `3m 05s` or `1h 02m`.
pub fn format_duration(seconds: f64) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total = seconds.max(0.0).round() as u64;

    match (total / 3600, total % 3600 / 60, total % 60) {
        (0, 0, s) => format!("{s}s"),
        (0, m, s) => format!("{m}m {s:02}s"),
        (h, m, _) => format!("{h}h {m:02}m"),
    }
}
