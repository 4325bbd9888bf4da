use crate::core::table::{Table, cell_text};
use crate::utils::text::truncate_text;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table as ComfyTable, presets};
use serde_json::Value;

const DEFAULT_CELL_WIDTH: usize = 40;

/// Terminal rendering of a [`Table`]
#[derive(Debug, Clone)]
pub struct TableDisplay {
    max_width: Option<u16>,
    cell_width: usize,
    row_limit: Option<usize>,
    use_colors: bool,
}

impl Default for TableDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl TableDisplay {
    pub fn new() -> Self {
        Self {
            max_width: None,
            cell_width: DEFAULT_CELL_WIDTH,
            row_limit: None,
            use_colors: false,
        }
    }

    pub fn with_max_width(mut self, width: u16) -> Self {
        self.max_width = Some(width);
        self
    }

    pub fn with_cell_width(mut self, width: usize) -> Self {
        self.cell_width = width.max(4);
        self
    }

    pub fn with_row_limit(mut self, limit: usize) -> Self {
        self.row_limit = Some(limit);
        self
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn bold_header(&self, text: &str) -> Cell {
        if self.use_colors {
            Cell::new(text).add_attribute(Attribute::Bold).fg(Color::Green)
        } else {
            Cell::new(text).add_attribute(Attribute::Bold)
        }
    }

    fn value_cell(&self, value: Option<&Value>) -> Cell {
        match value {
            None | Some(Value::Null) if self.use_colors => Cell::new("")
                .fg(Color::DarkGrey)
                .add_attribute(Attribute::Italic),
            None => Cell::new(""),
            Some(value) => Cell::new(truncate_text(&cell_text(value), self.cell_width)),
        }
    }

    pub fn render(&self, table: &Table) -> String {
        if table.is_empty() {
            return "No rows.".to_string();
        }

        let total_rows = table.len();
        let rows_to_display = self.row_limit.unwrap_or(total_rows).min(total_rows);

        let mut output = ComfyTable::new();
        output.load_preset(presets::UTF8_FULL);
        output.set_content_arrangement(ContentArrangement::Dynamic);
        if let Some(width) = self.max_width {
            output.set_width(width);
        }

        output.set_header(
            table
                .columns()
                .iter()
                .map(|column| self.bold_header(column))
                .collect::<Vec<Cell>>(),
        );

        for row in table.iter().take(rows_to_display) {
            let cells: Vec<Cell> = table
                .columns()
                .iter()
                .map(|column| self.value_cell(row.get(column)))
                .collect();
            output.add_row(cells);
        }

        let mut rendered = output.to_string();
        if rows_to_display != total_rows {
            rendered.push_str(&format!(
                "\nShowing {} of {} rows",
                rows_to_display, total_rows
            ));
        }
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Table {
        Table::from_values(vec![
            json!({"id": "d1", "name": "Sales", "isRefreshable": true}),
            json!({"id": "d2", "name": "Finance"}),
            json!({"id": "d3", "name": "HR", "isRefreshable": false}),
        ])
        .unwrap()
    }

    #[test]
    fn test_render_includes_headers_and_cells() {
        let rendered = TableDisplay::new().render(&sample());

        assert!(rendered.contains("isRefreshable"));
        assert!(rendered.contains("Sales"));
        assert!(rendered.contains("True"));
        assert!(rendered.contains("False"));
        assert!(!rendered.contains("Showing"));
    }

    #[test]
    fn test_render_empty_table() {
        assert_eq!(TableDisplay::new().render(&Table::new()), "No rows.");
    }

    #[test]
    fn test_render_with_row_limit() {
        let rendered = TableDisplay::new().with_row_limit(2).render(&sample());

        assert!(rendered.contains("Finance"));
        assert!(!rendered.contains("HR"));
        assert!(rendered.ends_with("Showing 2 of 3 rows"));
    }

    #[test]
    fn test_render_truncates_long_cells() {
        let table = Table::from_values(vec![json!({"expression": "x".repeat(100)})]).unwrap();
        let rendered = TableDisplay::new().with_cell_width(10).render(&table);

        assert!(rendered.contains("xxxxxxx..."));
        assert!(!rendered.contains(&"x".repeat(11)));
    }

    #[test]
    fn test_display_impl_uses_renderer() {
        let table = sample();
        assert_eq!(table.to_string(), TableDisplay::new().render(&table));
    }
}
