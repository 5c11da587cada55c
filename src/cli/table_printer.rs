use colored::Colorize;

use crate::core::models::table::{PaginationState, TableModel};

const SEPARATOR: &str = " │ ";

/// Render the current page as aligned text rows, header first.
///
/// Odd body rows are dimmed so long tables stay readable.
pub fn render_table(model: &TableModel) -> String {
    if model.header_row.is_empty() {
        return String::new();
    }

    let mut widths: Vec<usize> = model
        .header_row
        .iter()
        .map(|cell| cell.label.chars().count())
        .collect();
    let body: Vec<Vec<String>> = model
        .body_rows
        .iter()
        .map(|row| row.cells.iter().map(|c| c.to_string()).collect())
        .collect();
    for row in &body {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();

    let header: Vec<String> = model
        .header_row
        .iter()
        .zip(&widths)
        .map(|(cell, width)| pad(&cell.label, *width))
        .collect();
    out.push_str(&format!("  {}\n", header.join(SEPARATOR).bold()));

    let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    out.push_str(&format!("  {}\n", rule.join("─┼─").dimmed()));

    for (index, row) in body.iter().enumerate() {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| pad(cell, *width))
            .collect::<Vec<_>>()
            .join(SEPARATOR);
        let line = line.trim_end();
        if index % 2 == 1 {
            out.push_str(&format!("  {}\n", line.dimmed()));
        } else {
            out.push_str(&format!("  {line}\n"));
        }
    }

    out
}

/// One-line pager summary: position, total, and which moves are possible.
pub fn render_footer(state: &PaginationState) -> String {
    let previous = if state.has_previous {
        "◀ previous".normal()
    } else {
        "◀ previous".dimmed()
    };
    let next = if state.has_next {
        "next ▶".normal()
    } else {
        "next ▶".dimmed()
    };
    format!(
        "  Page {} of {} · {} {}   {}  {}",
        state.page_index + 1,
        state.page_count.max(1),
        state.total_rows,
        if state.total_rows == 1 { "entry" } else { "entries" },
        previous,
        next
    )
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{text}{}", " ".repeat(width.saturating_sub(len)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::table::{BodyRow, CellValue, HeaderCell};

    fn model() -> TableModel {
        TableModel {
            header_row: vec![
                HeaderCell {
                    key: "id".into(),
                    label: "ID".into(),
                },
                HeaderCell {
                    key: "operation".into(),
                    label: "Operation".into(),
                },
            ],
            body_rows: vec![
                BodyRow {
                    row_key: "evt-100".into(),
                    cells: vec![CellValue::from("evt-100"), CellValue::from("login")],
                },
                BodyRow {
                    row_key: "e2".into(),
                    cells: vec![CellValue::from("e2"), CellValue::Empty],
                },
            ],
        }
    }

    #[test]
    fn columns_are_padded_to_widest_cell() {
        colored::control::set_override(false);
        let text = render_table(&model());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "  ID      │ Operation");
        assert_eq!(lines[1], "  ────────┼──────────");
        assert_eq!(lines[2], "  evt-100 │ login");
        assert_eq!(lines[3], "  e2      │");
    }

    #[test]
    fn no_columns_renders_nothing() {
        assert!(render_table(&TableModel::default()).is_empty());
    }

    #[test]
    fn footer_reports_position() {
        colored::control::set_override(false);
        let state = PaginationState {
            page_index: 1,
            page_size: 2,
            total_rows: 5,
            page_count: 3,
            has_next: true,
            has_previous: true,
        };
        assert_eq!(
            render_footer(&state),
            "  Page 2 of 3 · 5 entries   ◀ previous  next ▶"
        );
    }

    #[test]
    fn empty_table_footer_shows_one_page() {
        colored::control::set_override(false);
        let state = PaginationState {
            page_index: 0,
            page_size: 20,
            total_rows: 0,
            page_count: 0,
            has_next: false,
            has_previous: false,
        };
        assert!(render_footer(&state).starts_with("  Page 1 of 1 · 0 entries"));
    }
}
