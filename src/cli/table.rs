//! Table builder wrapper around comfy-table for consistent list display.

use comfy_table::{presets, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::domain::models::RiskLevel;

/// Create a standard list table with the given headers.
pub fn list_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h.to_uppercase()).set_alignment(CellAlignment::Left)),
        );
    table
}

/// Status cell colored by severity.
pub fn status_cell(status: RiskLevel) -> Cell {
    let color = match status {
        RiskLevel::Green => Color::Green,
        RiskLevel::Yellow => Color::Yellow,
        RiskLevel::Red => Color::Red,
    };
    Cell::new(status.as_str()).fg(color)
}

/// Render the table under a count header.
pub fn render_list(entity_name: &str, table: &Table, total: usize) -> String {
    if total == 0 {
        return format!("No {entity_name}s found.");
    }
    let noun = if total == 1 {
        entity_name.to_string()
    } else {
        format!("{entity_name}s")
    };
    format!("{} {noun}:\n{table}", console::style(total).bold())
}
